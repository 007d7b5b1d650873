//! Configuration system.
//!
//! Consolidates configuration from several tiers with field-by-field merging:
//! 1. **Defaults** - paths below the user's home directory
//! 2. **User** - `~/.env-switch-import/config.yaml`
//! 3. **Explicit** - `--config` or `ENV_SWITCH_IMPORT_CONFIG`
//! 4. **Environment** - `ENV_SWITCH_IMPORT_*` variables
//! 5. **Command line** - subcommand flags
//!
//! ## Environment Variables
//! - `ENV_SWITCH_IMPORT_CONFIG` - Explicit config file
//! - `ENV_SWITCH_IMPORT_USER_DIR` - User config dir (default: `~/.env-switch-import`)
//! - `ENV_SWITCH_IMPORT_ENV_ROOT` - Env file root
//! - `ENV_SWITCH_IMPORT_DB_PATH` - cc-switch database
//! - `ENV_SWITCH_IMPORT_OUT_PATH` - CodeSwitch provider document
//! - `ENV_SWITCH_IMPORT_ID_PREFIX` - cc-switch provider id prefix

mod loader;
mod merge;
mod types;

pub use loader::{ConfigLoader, ConfigPaths, ConfigTier, expand_tilde};
pub use merge::{merge_into, merge_tiers};
pub use types::*;
