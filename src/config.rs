//! Ledger configuration loaded from a TOML file.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::interaction::{SoulItem, DEFAULT_UNAUTHORIZED_MESSAGE};
use crate::soul::SoulRegistry;

pub const CONFIG_ENV_VAR: &str = "MECHANIC_SOULS_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "mechanic_souls.toml";

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_message_key() -> String {
    DEFAULT_UNAUTHORIZED_MESSAGE.to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LedgerConfig {
    /// Directory holding `souls/*.toml`
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Translation key shown when a player uses the soul by hand
    #[serde(default = "default_message_key")]
    pub unauthorized_message_key: String,
    /// Register the shipped recipes before loading data files
    #[serde(default = "default_true")]
    pub use_builtin_recipes: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            unauthorized_message_key: default_message_key(),
            use_builtin_recipes: true,
        }
    }
}

impl LedgerConfig {
    /// Load from a TOML file, falling back to defaults when it is missing
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            warn!("Config file {:?} does not exist, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {:?}: {}", path, e))?;
        let config: LedgerConfig =
            toml::from_str(&content).map_err(|e| format!("Failed to parse {:?}: {}", path, e))?;

        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Path named by `MECHANIC_SOULS_CONFIG`, or the default file name
    pub fn path_from_env() -> PathBuf {
        std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Build the recipe table this config describes
    pub fn build_registry(&self) -> Result<SoulRegistry, String> {
        let mut registry = if self.use_builtin_recipes {
            SoulRegistry::builtin()
        } else {
            SoulRegistry::new()
        };
        registry.load_from_directory(&self.data_dir)?;
        Ok(registry)
    }

    pub fn soul_item(&self) -> SoulItem {
        SoulItem::new(&self.unauthorized_message_key)
    }
}
