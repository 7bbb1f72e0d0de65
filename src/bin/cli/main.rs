//! CLI tool for interactive archiving.

mod commands;
mod exit_codes;
mod output;
mod prompt;

use clap::Parser;
use std::path::PathBuf;

use arcpick::Config;
use exit_codes::ExitCode;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Pick files interactively and pack them into an archive
#[derive(Parser, Debug)]
#[command(name = "arcpick")]
#[command(author, version, about = "Pick files interactively and pack them into an archive", long_about = None)]
pub struct Cli {
    /// Descend into subdirectories and offer their files individually
    #[arg(short = 'r', long)]
    recursive: bool,

    /// Disable all ignore rules, including the built-in .git exclusion
    #[arg(short = 'a', long)]
    all: bool,

    /// Ignore file read from the working directory
    #[arg(long, env = "ARCPICK_IGNORE_FILE", default_value = arcpick::config::DEFAULT_IGNORE_FILE)]
    ignore_file: PathBuf,

    /// Working directory (defaults to the current directory)
    #[arg(short = 'C', long = "directory", value_name = "DIR")]
    directory: Option<PathBuf>,

    /// Print debug output
    #[arg(short = 'v', long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> Config {
        Config::new(self.directory.clone().unwrap_or_else(|| PathBuf::from(".")))
            .recursive(self.recursive)
            .allow_all(self.all)
            .ignore_file(self.ignore_file.clone())
    }
}

/// Default log filter; `RUST_LOG` overrides it unless `--verbose` is given.
fn log_filter(verbose: bool) -> &'static str {
    if verbose { "arcpick=debug" } else { "arcpick=warn" }
}

/// Installs the stderr log backend. Library `log` records reach it through
/// the `tracing-log` bridge.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new(log_filter(true))
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| log_filter(false).into())
    };
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_filter(filter);
    // a second init (tests) leaves the first subscriber in place
    let _ = tracing_subscriber::registry().with(layer).try_init();
}

fn main() {
    // Set up Ctrl+C handler
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupted");
        // dialoguer hides the cursor while a prompt is active
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(exit_codes::USER_INTERRUPT);
    })
    .ok();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() {
                ExitCode::BadArgs
            } else {
                ExitCode::Success
            };
            let _ = e.print();
            std::process::exit(code.code());
        }
    };

    init_logging(cli.verbose);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: cannot start runtime: {}", e);
            std::process::exit(ExitCode::FatalError.code());
        }
    };

    let exit_code = runtime.block_on(commands::run(&cli.config()));
    std::process::exit(exit_code.code());
}
