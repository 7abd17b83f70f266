use anyhow::Result;
use config::{Config, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    pub backend_url: String,
    pub ground_truth_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:5000".to_string(),
            ground_truth_path: "./Data/ground-truth-retrieval.csv".to_string(),
        }
    }
}

pub fn config_path() -> PathBuf {
    let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config_dir.join("fridgechef").join("config.toml")
}

pub fn load_config() -> Result<AppConfig> {
    let defaults = AppConfig::default();

    let s = Config::builder()
        .set_default("backend_url", defaults.backend_url)?
        .set_default("ground_truth_path", defaults.ground_truth_path)?
        .add_source(File::from(config_path()).required(false))
        .add_source(config::Environment::with_prefix("FRIDGECHEF")) // e.g. FRIDGECHEF_BACKEND_URL
        .build()?;

    Ok(s.try_deserialize()?)
}
