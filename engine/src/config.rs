//! Server configuration from the environment

use std::path::PathBuf;

use crate::recipe::DEFAULT_DATA_URL;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Dataset path or URL
    pub data_source: String,
    /// Directory for the conversation and feedback logs
    pub log_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            data_source: DEFAULT_DATA_URL.to_string(),
            log_dir: PathBuf::from("./data"),
        }
    }
}

impl ServerConfig {
    /// `HOST`, `PORT`, `FRIDGECHEF_DATA_URL`, `FRIDGECHEF_LOG_DIR`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            data_source: lookup("FRIDGECHEF_DATA_URL").unwrap_or(defaults.data_source),
            log_dir: lookup("FRIDGECHEF_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_and_overrides() {
        let config = ServerConfig::from_lookup(|_| None);
        assert_eq!(config.addr(), "0.0.0.0:5000");
        assert_eq!(config.data_source, DEFAULT_DATA_URL);

        let env: HashMap<&str, &str> = [
            ("PORT", "8080"),
            ("FRIDGECHEF_DATA_URL", "./Data/RecipeData.json"),
        ]
        .into_iter()
        .collect();
        let config = ServerConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_source, "./Data/RecipeData.json");
        assert_eq!(config.log_dir, PathBuf::from("./data"));
    }

    #[test]
    fn test_bad_port_falls_back() {
        let config = ServerConfig::from_lookup(|key| (key == "PORT").then(|| "http".to_string()));
        assert_eq!(config.port, 5000);
    }
}
