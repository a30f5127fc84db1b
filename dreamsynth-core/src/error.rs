use thiserror::Error;

#[derive(Error, Debug)]
pub enum DreamSynthError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid PORT value {value:?}: {source}")]
    InvalidPort {
        value: String,
        source: std::num::ParseIntError,
    },
}
