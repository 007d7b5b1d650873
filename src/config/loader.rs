//! Configuration loader with tier-based merging.
//!
//! Tiers, lowest to highest priority: built-in defaults, the user config
//! file, an explicit config file, environment variables, command-line
//! overrides. Each tier is a JSON value merged field by field before the
//! result is deserialized into an [`ImportConfig`].

use super::merge::merge_tiers;
use super::types::ImportConfig;
use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Explicit config file.
pub const CONFIG_PATH_VAR: &str = "ENV_SWITCH_IMPORT_CONFIG";
/// User config directory (default: `~/.env-switch-import`).
pub const USER_DIR_VAR: &str = "ENV_SWITCH_IMPORT_USER_DIR";
pub const ENV_ROOT_VAR: &str = "ENV_SWITCH_IMPORT_ENV_ROOT";
pub const DB_PATH_VAR: &str = "ENV_SWITCH_IMPORT_DB_PATH";
pub const OUT_PATH_VAR: &str = "ENV_SWITCH_IMPORT_OUT_PATH";
pub const ID_PREFIX_VAR: &str = "ENV_SWITCH_IMPORT_ID_PREFIX";

const CONFIG_FILE_NAME: &str = "config.yaml";

/// Configuration tier priority (lowest to highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigTier {
    Defaults = 0,
    User = 1,
    Explicit = 2,
    Environment = 3,
    CommandLine = 4,
}

impl std::fmt::Display for ConfigTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigTier::Defaults => write!(f, "defaults"),
            ConfigTier::User => write!(f, "user"),
            ConfigTier::Explicit => write!(f, "explicit"),
            ConfigTier::Environment => write!(f, "environment"),
            ConfigTier::CommandLine => write!(f, "command line"),
        }
    }
}

/// Locations the loader reads from.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// Home directory, used for default paths and `~` expansion.
    pub home_dir: Option<PathBuf>,
    /// User-level config directory.
    pub user_dir: Option<PathBuf>,
    /// Explicit config file; must exist when set.
    pub explicit_file: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover paths from the environment, preferring `explicit_file`.
    pub fn discover(explicit_file: Option<PathBuf>) -> Self {
        let home_dir = dirs::home_dir();
        let user_dir = std::env::var(USER_DIR_VAR)
            .ok()
            .map(PathBuf::from)
            .or_else(|| home_dir.as_ref().map(|h| h.join(".env-switch-import")));
        let explicit_file =
            explicit_file.or_else(|| std::env::var(CONFIG_PATH_VAR).ok().map(PathBuf::from));

        Self {
            home_dir,
            user_dir,
            explicit_file,
        }
    }
}

/// Loaded configuration plus the files it came from.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: ImportConfig,
    sources: Vec<(ConfigTier, PathBuf)>,
}

impl ConfigLoader {
    /// Load from discovered paths and the process environment.
    pub fn load(explicit_file: Option<PathBuf>, overrides: Value) -> Result<Self> {
        Self::load_with(
            &ConfigPaths::discover(explicit_file),
            |name| std::env::var(name).ok(),
            overrides,
        )
    }

    /// Load with explicit paths and an environment lookup.
    pub fn load_with<F>(paths: &ConfigPaths, env: F, overrides: Value) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut tiers = vec![default_tier(paths.home_dir.as_deref())];
        let mut sources = Vec::new();

        if let Some(ref user_dir) = paths.user_dir {
            let file = user_dir.join(CONFIG_FILE_NAME);
            if file.is_file() {
                match read_yaml(&file) {
                    Ok(value) => {
                        tiers.push(value);
                        sources.push((ConfigTier::User, file));
                    }
                    Err(e) => warn!(path = %file.display(), error = %e, "Ignoring unreadable user config"),
                }
            }
        }

        if let Some(ref file) = paths.explicit_file {
            tiers.push(read_yaml(file)?);
            sources.push((ConfigTier::Explicit, file.clone()));
        }

        tiers.push(env_tier(env));
        tiers.push(overrides);

        let merged = merge_tiers(tiers);
        debug!(config = %merged, "Merged configuration tiers");
        let mut config: ImportConfig = serde_json::from_value(merged).context(
            "incomplete configuration: set env_root, cc_switch.db_path and code_switch.out_path",
        )?;

        let home = paths.home_dir.as_deref();
        config.env_root = expand_tilde(&config.env_root, home);
        config.cc_switch.db_path = expand_tilde(&config.cc_switch.db_path, home);
        config.code_switch.out_path = expand_tilde(&config.code_switch.out_path, home);

        Ok(Self { config, sources })
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    pub fn into_config(self) -> ImportConfig {
        self.config
    }

    /// Config files that contributed, in merge order.
    pub fn sources(&self) -> &[(ConfigTier, PathBuf)] {
        &self.sources
    }
}

/// Built-in defaults. Paths are only present when a home directory is known.
fn default_tier(home: Option<&Path>) -> Value {
    let path = |rel: &str| home.map(|h| h.join(rel).to_string_lossy().into_owned());
    json!({
        "env_root": path(".claude/envs"),
        "cc_switch": { "db_path": path(".cc-switch/cc-switch.db") },
        "code_switch": { "out_path": path(".code-switch/claude-code.json") },
    })
}

fn env_tier<F>(env: F) -> Value
where
    F: Fn(&str) -> Option<String>,
{
    json!({
        "env_root": env(ENV_ROOT_VAR),
        "cc_switch": {
            "db_path": env(DB_PATH_VAR),
            "id_prefix": env(ID_PREFIX_VAR),
        },
        "code_switch": { "out_path": env(OUT_PATH_VAR) },
    })
}

fn read_yaml(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let value: Value = serde_yaml::from_str(&content)
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(value)
}

/// Expand a leading `~` to `home`.
pub fn expand_tilde(path: &Path, home: Option<&Path>) -> PathBuf {
    let Some(home) = home else {
        return path.to_path_buf();
    };
    match path.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ImportMode;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn paths(home: &Path) -> ConfigPaths {
        ConfigPaths {
            home_dir: Some(home.to_path_buf()),
            user_dir: Some(home.join(".env-switch-import")),
            explicit_file: None,
        }
    }

    #[test]
    fn test_defaults_from_home() {
        let home = TempDir::new().unwrap();
        let loader = ConfigLoader::load_with(&paths(home.path()), no_env, Value::Null).unwrap();
        let config = loader.config();

        assert_eq!(config.env_root, home.path().join(".claude/envs"));
        assert_eq!(config.cc_switch.db_path, home.path().join(".cc-switch/cc-switch.db"));
        assert_eq!(
            config.code_switch.out_path,
            home.path().join(".code-switch/claude-code.json")
        );
        assert_eq!(config.cc_switch.id_prefix, "env_");
        assert_eq!(config.mode, ImportMode::Incremental);
        assert!(loader.sources().is_empty());
    }

    #[test]
    fn test_tier_precedence() {
        let home = TempDir::new().unwrap();
        let user_dir = home.path().join(".env-switch-import");
        fs::create_dir_all(&user_dir).unwrap();
        fs::write(
            user_dir.join("config.yaml"),
            "env_root: ~/user-envs\nmode: overwrite\ncc_switch:\n  id_prefix: user_\n",
        )
        .unwrap();
        let explicit = home.path().join("explicit.yaml");
        fs::write(&explicit, "cc_switch:\n  id_prefix: explicit_\n").unwrap();

        let mut p = paths(home.path());
        p.explicit_file = Some(explicit);
        let env: HashMap<&str, &str> = HashMap::from([(DB_PATH_VAR, "/env/cc.db")]);
        let overrides = json!({"code_switch": {"backup": true}});

        let loader =
            ConfigLoader::load_with(&p, |k| env.get(k).map(|v| v.to_string()), overrides).unwrap();
        let config = loader.config();

        assert_eq!(config.env_root, home.path().join("user-envs"));
        assert_eq!(config.mode, ImportMode::Overwrite);
        assert_eq!(config.cc_switch.id_prefix, "explicit_");
        assert_eq!(config.cc_switch.db_path, PathBuf::from("/env/cc.db"));
        assert!(config.code_switch.backup);
        assert_eq!(loader.sources().len(), 2);
        assert_eq!(loader.sources()[0].0, ConfigTier::User);
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let home = TempDir::new().unwrap();
        let mut p = paths(home.path());
        p.explicit_file = Some(home.path().join("missing.yaml"));
        assert!(ConfigLoader::load_with(&p, no_env, Value::Null).is_err());
    }

    #[test]
    fn test_without_home_paths_must_be_given() {
        let p = ConfigPaths::default();
        assert!(ConfigLoader::load_with(&p, no_env, Value::Null).is_err());

        let overrides = json!({
            "env_root": "/envs",
            "cc_switch": {"db_path": "/cc.db"},
            "code_switch": {"out_path": "/out.json"},
        });
        let loader = ConfigLoader::load_with(&p, no_env, overrides).unwrap();
        assert_eq!(loader.config().env_root, PathBuf::from("/envs"));
    }

    #[test]
    fn test_expand_tilde() {
        let home = Path::new("/home/u");
        assert_eq!(expand_tilde(Path::new("~/x"), Some(home)), PathBuf::from("/home/u/x"));
        assert_eq!(expand_tilde(Path::new("~"), Some(home)), PathBuf::from("/home/u"));
        assert_eq!(expand_tilde(Path::new("/abs"), Some(home)), PathBuf::from("/abs"));
        assert_eq!(expand_tilde(Path::new("~/x"), None), PathBuf::from("~/x"));
    }
}
