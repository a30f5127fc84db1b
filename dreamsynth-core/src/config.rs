use config::{Config, File};
use serde::Deserialize;

use crate::error::DreamSynthError;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DreamSynthConfig {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub completion: CompletionSettings,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 10000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CompletionSettings {
    pub model: String,
    pub timeout_seconds: u64,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            model: "openai/gpt-3.5-turbo".to_string(),
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "dreams.json".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "https://will11521.github.io".to_string(),
                "https://will11521.github.io/dreamsynth-frontend".to_string(),
            ],
        }
    }
}

impl DreamSynthConfig {
    /// Load configuration from an optional TOML file, then apply the `PORT`
    /// environment override.
    pub fn load(path: &str) -> Result<Self, DreamSynthError> {
        let s = Config::builder()
            .add_source(File::with_name(path).required(false))
            .build()?;
        let mut cfg: Self = s.try_deserialize()?;

        if let Ok(port) = std::env::var("PORT") {
            cfg.http.port = port
                .parse()
                .map_err(|source| DreamSynthError::InvalidPort {
                    value: port.clone(),
                    source,
                })?;
        }

        Ok(cfg)
    }
}
