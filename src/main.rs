//! env-switch-import
//!
//! Imports per-environment Claude `.env` files into the cc-switch provider
//! database or the CodeSwitch provider document.

use anyhow::Result;
use clap::Parser;
use env_switch_import::cli::Cli;
use env_switch_import::config::ConfigLoader;
use env_switch_import::error::ImportError;
use env_switch_import::pipeline::run_import;
use env_switch_import::report::ImportReport;
use std::fs::OpenOptions;
use std::process::ExitCode;
use tracing::debug;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli.log, cli.verbose) {
        eprintln!("error: {:#}", e);
        return ExitCode::from(1);
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.downcast_ref::<ImportError>() {
            Some(import_error) => {
                eprintln!("error: {}", import_error);
                ExitCode::from(import_error.exit_code())
            }
            None => {
                eprintln!("error: {:#}", e);
                ExitCode::from(1)
            }
        },
    }
}

/// Install the global subscriber based on the `--log` option.
///
/// `RUST_LOG`, when set, replaces the level chosen by `--verbose`.
fn init_logging(log: &str, verbose: bool) -> Result<()> {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let filter = || {
        EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy()
    };

    match log {
        "0" | "off" => {
            // No logging
        }
        "1" | "stdout" => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter())
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        "2" | "stderr" => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter())
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        filename => {
            // Log to file (append mode)
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(filename)?;
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter())
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let loader = ConfigLoader::load(cli.config.clone(), cli.overrides())?;
    for (tier, path) in loader.sources() {
        debug!(%tier, path = %path.display(), "Loaded config file");
    }
    let config = loader.into_config();

    let report = run_import(&config, cli.command.target())?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &ImportReport) {
    if report.dry_run {
        for line in &report.preview {
            println!("{}", line);
        }
    }
    println!("{}", report.summary());
    if let Some(ref backup) = report.backup {
        println!("backup: {}", backup.display());
    }
}
