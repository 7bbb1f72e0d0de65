//! Session command for the CLI.

use std::io;

use arcpick::{ArchiveJob, Config, Error, Plan, Result, WriteSummary, session};

use crate::exit_codes::{ExitCode, error_to_exit_code};
use crate::output;
use crate::prompt::TerminalPrompt;

/// Runs an interactive session and reports its outcome.
pub async fn run(config: &Config) -> ExitCode {
    let mut prompt = TerminalPrompt::new();

    let result = match session::plan(config, &mut prompt) {
        Ok(Plan::Ready(job)) => {
            let destination = job.destination().to_path_buf();
            write(job).await.map(|summary| {
                output::print_summary(&destination, &summary);
                if summary.is_clean() {
                    ExitCode::Success
                } else {
                    ExitCode::Warning
                }
            })
        }
        Ok(Plan::OverwriteDeclined { destination }) => {
            println!("Keeping existing {}", destination.display());
            Ok(ExitCode::Success)
        }
        Ok(Plan::NothingSelected) => {
            println!("Nothing selected, no archive written.");
            Ok(ExitCode::Success)
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(code) => code,
        Err(Error::Io(e)) if e.kind() == io::ErrorKind::Interrupted => {
            eprintln!("\nInterrupted");
            ExitCode::UserInterrupt
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            error_to_exit_code(&e)
        }
    }
}

/// Writes the archive, printing each completion signal as it fires.
async fn write(job: ArchiveJob) -> Result<WriteSummary> {
    let (closed_rx, drained_rx) = job.start().await?.into_signals();

    let closed = async {
        let result = closed_rx.await.map_err(|_| Error::WorkerLost)?;
        if let Ok(summary) = &result {
            output::print_closed(summary);
        }
        result
    };
    let drained = async {
        drained_rx.await.map_err(|_| Error::WorkerLost)?;
        output::print_drained();
        Ok::<(), Error>(())
    };

    let (closed, drained) = tokio::join!(closed, drained);
    let summary = closed?;
    drained?;
    Ok(summary)
}
