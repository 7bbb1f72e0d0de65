//! End-to-end session tests driven by a scripted prompt.

use std::fs;

use arcpick::{ArchiveFormat, Config, Error, Outcome, Plan, session};

mod common;

use common::ScriptedPrompt;

#[tokio::test]
async fn test_session_writes_archive() {
    let dir = common::tree(&[("alpha.txt", b"a"), ("beta.txt", b"b"), (".git/HEAD", b"ref")], &[]);
    let config = Config::new(dir.path());
    let mut prompt = ScriptedPrompt::new("bundle", &["alpha"], ArchiveFormat::Zip);

    let outcome = session::run(&config, &mut prompt).await.unwrap();
    let (destination, summary) = match outcome {
        Outcome::Written {
            destination,
            summary,
        } => (destination, summary),
        other => panic!("unexpected outcome: {other:?}"),
    };

    assert_eq!(destination, dir.path().join("bundle.zip"));
    assert_eq!(summary.entries_written, 1);
    assert_eq!(prompt.calls(), vec!["name", "select", "format"]);
    assert_eq!(prompt.seen_candidates.len(), 2);
    assert!(!prompt.seen_candidates.iter().any(|c| c == ".git"));
    assert_eq!(
        common::file_names(&common::read_zip(&destination)),
        vec!["alpha.txt"]
    );
}

#[tokio::test]
async fn test_overwrite_declined_leaves_file() {
    let dir = common::tree(&[("alpha.txt", b"a"), ("out.zip", b"existing bytes")], &[]);
    let config = Config::new(dir.path());
    let mut prompt = ScriptedPrompt::new("out", &["alpha"], ArchiveFormat::Zip).overwrite(false);

    let outcome = session::run(&config, &mut prompt).await.unwrap();
    assert_eq!(
        outcome,
        Outcome::OverwriteDeclined {
            destination: dir.path().join("out.zip")
        }
    );
    assert!(prompt.overwrite_asked);
    assert_eq!(fs::read(dir.path().join("out.zip")).unwrap(), b"existing bytes");
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[tokio::test]
async fn test_overwrite_accepted_replaces_file() {
    let dir = common::tree(&[("alpha.txt", b"a"), ("out.tar", b"existing bytes")], &[]);
    let config = Config::new(dir.path());
    let mut prompt = ScriptedPrompt::new("out", &["alpha"], ArchiveFormat::Tar).overwrite(true);

    let outcome = session::run(&config, &mut prompt).await.unwrap();
    assert!(matches!(outcome, Outcome::Written { .. }));
    assert_eq!(prompt.calls(), vec!["name", "select", "format", "overwrite"]);
    let entries = common::read_tar(&dir.path().join("out.tar"));
    assert_eq!(common::file_names(&entries), vec!["alpha.txt"]);
}

#[tokio::test]
async fn test_nothing_selected_writes_nothing() {
    let dir = common::tree(&[("alpha.txt", b"a")], &[]);
    let config = Config::new(dir.path());
    let mut prompt = ScriptedPrompt::new("out", &["zzzz"], ArchiveFormat::Zip);

    let outcome = session::run(&config, &mut prompt).await.unwrap();
    assert_eq!(outcome, Outcome::NothingSelected);
    assert_eq!(prompt.calls(), vec!["name", "select"]);
    assert!(!dir.path().join("out.zip").exists());
}

#[tokio::test]
async fn test_invalid_name_rejected() {
    let dir = common::tree(&[("alpha.txt", b"a")], &[]);
    let config = Config::new(dir.path());
    let mut prompt = ScriptedPrompt::new("../escape", &["alpha"], ArchiveFormat::Zip);

    let err = session::run(&config, &mut prompt).await.unwrap_err();
    assert!(matches!(err, Error::InvalidArchiveName(_)));
    assert_eq!(prompt.calls(), vec!["name"]);
}

#[tokio::test]
async fn test_enumeration_error_before_prompt() {
    let dir = common::tree(&[], &[]);
    let config = Config::new(dir.path().join("missing"));
    let mut prompt = ScriptedPrompt::new("out", &[], ArchiveFormat::Zip);

    let err = session::run(&config, &mut prompt).await.unwrap_err();
    assert!(matches!(err, Error::Enumeration { .. }));
    assert!(prompt.calls().is_empty());
}

#[tokio::test]
async fn test_recursive_session_archives_nested_file() {
    let dir = common::tree(&[("top.txt", b"t"), ("sub/nested.txt", b"n")], &[]);
    let config = Config::new(dir.path()).recursive(true);
    let mut prompt = ScriptedPrompt::new("out", &["nested"], ArchiveFormat::Zip);

    let outcome = session::run(&config, &mut prompt).await.unwrap();
    assert!(matches!(outcome, Outcome::Written { .. }));
    assert!(!prompt.seen_candidates.iter().any(|c| c == "sub"));
    let entries = common::read_zip(&dir.path().join("out.zip"));
    assert_eq!(common::file_names(&entries), vec!["sub/nested.txt"]);
}

#[tokio::test]
async fn test_plan_writes_nothing_until_started() {
    let dir = common::tree(&[("alpha.txt", b"a"), ("beta.txt", b"b")], &[]);
    let config = Config::new(dir.path());
    let mut prompt = ScriptedPrompt::new("later", &["beta"], ArchiveFormat::Tar);

    let job = match session::plan(&config, &mut prompt).unwrap() {
        Plan::Ready(job) => job,
        other => panic!("unexpected plan: {other:?}"),
    };
    assert_eq!(job.destination(), dir.path().join("later.tar"));
    assert_eq!(job.items(), ["beta.txt"]);
    assert!(!job.destination().exists());

    let destination = job.destination().to_path_buf();
    let (closed, drained) = job.start().await.unwrap().into_signals();
    let summary = closed.await.unwrap().unwrap();
    drained.await.unwrap();
    assert_eq!(summary.entries_written, 1);
    assert_eq!(common::file_names(&common::read_tar(&destination)), vec!["beta.txt"]);
}

#[test]
fn test_plan_nothing_selected() {
    let dir = common::tree(&[("alpha.txt", b"a")], &[]);
    let config = Config::new(dir.path());
    let mut prompt = ScriptedPrompt::new("out", &["zzzz"], ArchiveFormat::Zip);

    assert!(matches!(
        session::plan(&config, &mut prompt).unwrap(),
        Plan::NothingSelected
    ));
}
