//! Arguments for the two import subcommands.

use clap::Args;
use serde_json::{Value, json};
use std::path::PathBuf;

use super::{ModeArg, flag, mode_value};

/// Arguments for the cc-switch subcommand
#[derive(Args, Debug)]
pub struct CcSwitchArgs {
    /// Path to the cc-switch database (must already exist)
    #[arg(long, value_name = "FILE")]
    pub db: Option<PathBuf>,

    /// Prefix for derived provider ids
    #[arg(long, value_name = "PREFIX")]
    pub id_prefix: Option<String>,

    /// Import mode
    ///
    /// incremental: insert new providers, leave existing rows untouched.
    /// overwrite: also rewrite name, settings and notes of existing rows.
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Report what would change, then roll back
    #[arg(long)]
    pub dry_run: bool,
}

impl CcSwitchArgs {
    pub fn overrides(&self) -> Value {
        json!({
            "mode": mode_value(self.mode),
            "dry_run": flag(self.dry_run),
            "cc_switch": {
                "db_path": self.db,
                "id_prefix": self.id_prefix,
            },
        })
    }
}

/// Arguments for the code-switch subcommand
#[derive(Args, Debug)]
pub struct CodeSwitchArgs {
    /// Path to the provider document (created if missing)
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Import mode
    ///
    /// incremental: keep existing providers and merge model patterns in.
    /// overwrite: replace the provider list with the imported set.
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Print the resulting provider list without writing
    #[arg(long)]
    pub dry_run: bool,

    /// Keep a .bak copy of the previous document
    #[arg(long)]
    pub backup: bool,
}

impl CodeSwitchArgs {
    pub fn overrides(&self) -> Value {
        json!({
            "mode": mode_value(self.mode),
            "dry_run": flag(self.dry_run),
            "code_switch": {
                "out_path": self.out,
                "backup": flag(self.backup),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_flags_are_null() {
        let args = CodeSwitchArgs {
            out: None,
            mode: None,
            dry_run: false,
            backup: false,
        };
        let tier = args.overrides();
        assert!(tier["mode"].is_null());
        assert!(tier["dry_run"].is_null());
        assert!(tier["code_switch"]["out_path"].is_null());
        assert!(tier["code_switch"]["backup"].is_null());
    }

    #[test]
    fn test_set_flags() {
        let args = CcSwitchArgs {
            db: Some(PathBuf::from("/cc.db")),
            id_prefix: Some("x_".to_string()),
            mode: Some(ModeArg::Incremental),
            dry_run: false,
        };
        let tier = args.overrides();
        assert_eq!(tier["mode"], "incremental");
        assert_eq!(tier["cc_switch"]["db_path"], "/cc.db");
        assert_eq!(tier["cc_switch"]["id_prefix"], "x_");
    }
}
