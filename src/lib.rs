use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use self::errors::CrudsError;

pub mod editor;
pub mod errors;
pub mod parse;
pub mod products;
pub mod search;
pub mod shell;
pub mod store;
pub mod table;

pub const CONFIG_FILE: &str = "cruds.config";

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct CrudsConfig {
    pub currency: char,
    pub data_dir: PathBuf,
    pub storage_key: String,
}

impl Default for CrudsConfig {
    fn default() -> Self {
        Self {
            currency: '$',
            data_dir: dirs::data_dir()
                .map(|dir| dir.join("cruds"))
                .unwrap_or_else(|| PathBuf::from(".cruds")),
            storage_key: "products".to_string(),
        }
    }
}

pub fn parse_config(path: Option<&Path>) -> Result<CrudsConfig, CrudsError> {
    let config_path = match path {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir()?.join(CONFIG_FILE),
    };

    if !config_path.exists() {
        if path.is_some() {
            return Err(CrudsError::InvalidArgument(format!(
                "No config file found at {}",
                config_path.display()
            )));
        }
        debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(CrudsConfig::default());
    }

    info!(path = %config_path.display(), "reading config");
    let config = std::fs::read_to_string(config_path)?;
    let config: CrudsConfig = toml::from_str(&config)?;
    Ok(config)
}
