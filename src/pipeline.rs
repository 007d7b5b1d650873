//! Import pipeline: env records in, one target store updated, a report out.
//!
//! Both targets share the same front half (discover, parse, record). The
//! back half is behind [`ImportTarget`] so the driver does not care whether
//! it is talking to the cc-switch database or the CodeSwitch document.

use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::ImportConfig;
use crate::db::Database;
use crate::db::import::ImportOptions;
use crate::db::now_ms;
use crate::document::{DocumentOptions, import_document};
use crate::env::{EnvRecord, load_env_records};
use crate::error::ImportResult;
use crate::report::ImportReport;
use crate::types::{ImportMode, TargetKind};

/// A provider store that env records can be imported into.
pub trait ImportTarget {
    fn kind(&self) -> TargetKind;

    /// Database or document path this target writes.
    fn destination(&self) -> &Path;

    /// Import `records`. With `dry_run`, compute the same result but leave
    /// the store untouched.
    fn import(
        &mut self,
        records: &[EnvRecord],
        mode: ImportMode,
        dry_run: bool,
    ) -> ImportResult<ImportReport>;
}

/// cc-switch providers table.
pub struct RelationalTarget {
    db: Database,
    id_prefix: String,
    app_type: String,
}

impl RelationalTarget {
    pub fn new(db: Database, id_prefix: impl Into<String>, app_type: impl Into<String>) -> Self {
        Self {
            db,
            id_prefix: id_prefix.into(),
            app_type: app_type.into(),
        }
    }

    pub fn open(path: &Path, id_prefix: &str, app_type: &str) -> ImportResult<Self> {
        Ok(Self::new(Database::open(path)?, id_prefix, app_type))
    }
}

impl ImportTarget for RelationalTarget {
    fn kind(&self) -> TargetKind {
        TargetKind::CcSwitch
    }

    fn destination(&self) -> &Path {
        self.db.path()
    }

    fn import(
        &mut self,
        records: &[EnvRecord],
        mode: ImportMode,
        dry_run: bool,
    ) -> ImportResult<ImportReport> {
        let options = ImportOptions {
            mode,
            id_prefix: self.id_prefix.clone(),
            app_type: self.app_type.clone(),
            dry_run,
        };
        let outcome = self.db.import_env_records(records, &options)?;

        let mut report = ImportReport::new(self.kind(), mode, dry_run, self.db.path().to_path_buf());
        report.env_files = records.len();
        report.candidates = records.len();
        report.counts = outcome.counts;
        report.preview = outcome.preview;
        Ok(report)
    }
}

/// CodeSwitch provider document.
pub struct DocumentTarget {
    path: PathBuf,
    backup: bool,
    id_seed: Option<i64>,
}

impl DocumentTarget {
    pub fn new(path: impl Into<PathBuf>, backup: bool) -> Self {
        Self {
            path: path.into(),
            backup,
            id_seed: None,
        }
    }

    /// Fix the floor for new entry ids instead of using the clock.
    pub fn with_id_seed(mut self, seed: i64) -> Self {
        self.id_seed = Some(seed);
        self
    }
}

impl ImportTarget for DocumentTarget {
    fn kind(&self) -> TargetKind {
        TargetKind::CodeSwitch
    }

    fn destination(&self) -> &Path {
        &self.path
    }

    fn import(
        &mut self,
        records: &[EnvRecord],
        mode: ImportMode,
        dry_run: bool,
    ) -> ImportResult<ImportReport> {
        let options = DocumentOptions {
            mode,
            dry_run,
            backup: self.backup,
        };
        let seed = self.id_seed.unwrap_or_else(now_ms);
        let outcome = import_document(&self.path, records, &options, seed)?;

        let mut report = ImportReport::new(self.kind(), mode, dry_run, self.path.clone());
        report.env_files = records.len();
        report.candidates = outcome.candidates;
        report.existing = outcome.existing;
        report.counts = outcome.counts;
        report.preview = outcome.preview;
        report.backup = outcome.backup;
        Ok(report)
    }
}

/// Open the target `kind` as configured.
pub fn open_target(config: &ImportConfig, kind: TargetKind) -> ImportResult<Box<dyn ImportTarget>> {
    Ok(match kind {
        TargetKind::CcSwitch => Box::new(RelationalTarget::open(
            &config.cc_switch.db_path,
            &config.cc_switch.id_prefix,
            &config.cc_switch.app_type,
        )?),
        TargetKind::CodeSwitch => Box::new(DocumentTarget::new(
            &config.code_switch.out_path,
            config.code_switch.backup,
        )),
    })
}

/// Run one import end to end.
///
/// Env files are loaded before the target is opened, so a bad env root fails
/// without touching either store.
pub fn run_import(config: &ImportConfig, kind: TargetKind) -> ImportResult<ImportReport> {
    let records = load_env_records(&config.env_root, &config.extension)?;
    let mut target = open_target(config, kind)?;
    info!(
        kind = %kind,
        destination = %target.destination().display(),
        mode = %config.mode,
        dry_run = config.dry_run,
        envs = records.len(),
        "Starting import"
    );
    target.import(&records, config.mode, config.dry_run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::PROVIDERS_SCHEMA;
    use crate::error::ImportError;
    use crate::types::RowAction;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        config: ImportConfig,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let envs = dir.path().join("envs");
        fs::create_dir_all(envs.join("teamA")).unwrap();
        fs::write(
            envs.join("teamA/acct1.env"),
            "ANTHROPIC_BASE_URL=https://api.example.com\nANTHROPIC_AUTH_TOKEN=tok\nANTHROPIC_MODEL=m1\n",
        )
        .unwrap();

        let db_path = dir.path().join("cc.db");
        let conn = rusqlite::Connection::open(&db_path).unwrap();
        conn.execute_batch(PROVIDERS_SCHEMA).unwrap();
        drop(conn);

        let config = ImportConfig::with_paths(envs, db_path, dir.path().join("out/providers.json"));
        Fixture { _dir: dir, config }
    }

    #[test]
    fn test_run_import_relational() {
        let fx = fixture();
        let report = run_import(&fx.config, TargetKind::CcSwitch).unwrap();
        assert_eq!(report.counts.inserted, 1);
        assert_eq!(report.env_files, 1);

        let report = run_import(&fx.config, TargetKind::CcSwitch).unwrap();
        assert_eq!(report.counts.inserted, 0);
        assert_eq!(report.counts.skipped, 1);
        assert!(matches!(
            report.preview[0],
            crate::report::PreviewEntry::Row { action: RowAction::Skipped, .. }
        ));
    }

    #[test]
    fn test_run_import_document() {
        let fx = fixture();
        let report = run_import(&fx.config, TargetKind::CodeSwitch).unwrap();
        assert_eq!(report.counts.inserted, 1);
        assert!(fx.config.code_switch.out_path.exists());
    }

    #[test]
    fn test_missing_env_root_fails_before_target() {
        let mut fx = fixture();
        fx.config.env_root = fx.config.env_root.join("missing");
        fx.config.cc_switch.db_path = fx.config.cc_switch.db_path.with_extension("absent");

        let err = run_import(&fx.config, TargetKind::CcSwitch).unwrap_err();
        assert!(matches!(err, ImportError::EnvRootNotFound(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_missing_database_fails() {
        let mut fx = fixture();
        fx.config.cc_switch.db_path = fx.config.cc_switch.db_path.with_extension("absent");
        let err = run_import(&fx.config, TargetKind::CcSwitch).unwrap_err();
        assert!(matches!(err, ImportError::DatabaseNotFound(_)));
    }
}
