//! CLI command definitions for env-switch-import
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod import;

use clap::{Parser, Subcommand, ValueEnum};
use import::{CcSwitchArgs, CodeSwitchArgs};
use serde_json::{Value, json};
use std::path::PathBuf;

use crate::types::{ImportMode, TargetKind};

/// Import mode as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ModeArg {
    /// Add new providers, keep existing ones as they are (default)
    #[default]
    Incremental,
    /// Rewrite existing providers from the env files
    Overwrite,
}

impl From<ModeArg> for ImportMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Incremental => ImportMode::Incremental,
            ModeArg::Overwrite => ImportMode::Overwrite,
        }
    }
}

/// Import Claude .env files into cc-switch and CodeSwitch provider stores
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Root directory of env files (overrides config)
    #[arg(short, long, global = true)]
    pub env_root: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Import into the cc-switch SQLite database
    CcSwitch(CcSwitchArgs),

    /// Import into the CodeSwitch provider JSON document
    CodeSwitch(CodeSwitchArgs),
}

impl Command {
    pub fn target(&self) -> TargetKind {
        match self {
            Command::CcSwitch(_) => TargetKind::CcSwitch,
            Command::CodeSwitch(_) => TargetKind::CodeSwitch,
        }
    }
}

impl Cli {
    /// Command-line configuration tier. Unset flags are null so they never
    /// shadow lower tiers.
    pub fn overrides(&self) -> Value {
        let mut tier = json!({ "env_root": self.env_root });
        let command = match &self.command {
            Command::CcSwitch(args) => args.overrides(),
            Command::CodeSwitch(args) => args.overrides(),
        };
        crate::config::merge_into(&mut tier, command);
        tier
    }
}

/// `Some(true)` for a set flag, `None` otherwise.
pub(crate) fn flag(set: bool) -> Option<bool> {
    set.then_some(true)
}

pub(crate) fn mode_value(mode: Option<ModeArg>) -> Option<&'static str> {
    mode.map(|m| ImportMode::from(m).as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_cc_switch() {
        let cli = Cli::try_parse_from([
            "env-switch-import",
            "--env-root",
            "/envs",
            "cc-switch",
            "--db",
            "/cc.db",
            "--mode",
            "overwrite",
            "--dry-run",
        ])
        .unwrap();

        assert_eq!(cli.command.target(), TargetKind::CcSwitch);
        assert_eq!(cli.log, "2");
        let tier = cli.overrides();
        assert_eq!(tier["env_root"], "/envs");
        assert_eq!(tier["mode"], "overwrite");
        assert_eq!(tier["dry_run"], true);
        assert_eq!(tier["cc_switch"]["db_path"], "/cc.db");
        assert!(tier["cc_switch"]["id_prefix"].is_null());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["env-switch-import", "code-switch", "-v", "--backup"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.command.target(), TargetKind::CodeSwitch);

        let tier = cli.overrides();
        assert!(tier["env_root"].is_null());
        assert!(tier["mode"].is_null());
        assert!(tier["dry_run"].is_null());
        assert_eq!(tier["code_switch"]["backup"], true);
    }

    #[test]
    fn test_invalid_mode_rejected() {
        let result = Cli::try_parse_from(["env-switch-import", "cc-switch", "--mode", "replace"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["env-switch-import"]).is_err());
    }
}
