//! CLI configuration

use std::path::PathBuf;
use std::sync::Arc;

use gasval_engine::ReferenceTables;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CliError, CliResult};

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CliConfig {
    /// Reference tables document (JSON or YAML); built-in dataset when unset
    pub reference_tables: Option<PathBuf>,

    /// JSON file holding the CEP historical samples
    pub store_path: Option<PathBuf>,
}

impl CliConfig {
    /// Load configuration from file
    pub fn load(path: Option<&str>) -> CliResult<Self> {
        let config_path = match path {
            Some(p) => PathBuf::from(p),
            None => Self::default_config_path()?,
        };

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            let config: CliConfig =
                toml::from_str(&contents).map_err(|e| CliError::Config(e.to_string()))?;
            debug!(path = %config_path.display(), "Loaded configuration");
            Ok(config)
        } else {
            Ok(CliConfig::default())
        }
    }

    /// Reference tables to validate against
    pub fn tables(&self) -> CliResult<Arc<ReferenceTables>> {
        let tables = match &self.reference_tables {
            Some(path) => ReferenceTables::load(path)?,
            None => ReferenceTables::default(),
        };
        Ok(Arc::new(tables))
    }

    /// Historical store location
    pub fn store_path(&self) -> CliResult<PathBuf> {
        match &self.store_path {
            Some(path) => Ok(path.clone()),
            None => {
                let data_dir = dirs::data_dir()
                    .ok_or_else(|| CliError::Config("Cannot find data directory".into()))?;
                Ok(data_dir.join("gasval").join("cep-samples.json"))
            }
        }
    }

    /// Get the default configuration file path
    fn default_config_path() -> CliResult<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| CliError::Config("Cannot find config directory".into()))?;
        Ok(config_dir.join("gasval").join("config.toml"))
    }
}
