//! Tree Mirror CLI
//!
//! Keeps a replica directory identical to a source directory, one pass per
//! interval.

mod cli;
mod config;
mod error;
mod scheduler;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use mirror_core::{LogSink, Reconciler, RotatingFileSink, StateIndex, StdoutSink, Tee};

use cli::Cli;
use config::MirrorConfig;
use error::{CliError, Result};
use scheduler::Scheduler;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.kind() == ErrorKind::MissingRequiredArgument => {
            // Usage goes to stdout and the loop is never entered
            println!("{}", Cli::command().render_usage());
            println!();
            println!("Run {} for details.", "mirror --help".cyan());
            return Ok(());
        }
        Err(e) => e.exit(),
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_target(cli.verbose)
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("tracing subscriber already installed");
    }
    tracing::debug!("Verbose mode enabled");

    let config = MirrorConfig::from_cli(&cli)?;
    let log = RotatingFileSink::open(&config.log_file, config.rotation)?;
    let mut sink = Tee::new(StdoutSink, log);

    let index = match StateIndex::scan(&config.replica) {
        Ok(index) => index,
        Err(e) => {
            sink.second.record(&format!("Startup failed: {e}"));
            return Err(e.into());
        }
    };

    tracing::info!(
        source = %config.source.display(),
        replica = %config.replica.display(),
        interval_secs = config.interval.as_secs_f64(),
        "starting"
    );

    let reconciler = Reconciler::new(&config.source, &config.replica, index, sink);
    let mut scheduler = Scheduler::new(reconciler, config.interval);

    if config.once {
        return match scheduler.tick() {
            Some(_) => Ok(()),
            None => Err(CliError::user("the pass did not complete")),
        };
    }
    scheduler.run_forever()
}
