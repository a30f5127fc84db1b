pub mod completion;
pub mod config;
pub mod error;
pub mod models;
pub mod store;

pub use completion::{
    CompletionClient, CompletionConfig, CompletionError, OPENROUTER_BASE_URL,
};
pub use config::{CorsConfig, DreamSynthConfig, HttpConfig, StorageConfig};
pub use error::DreamSynthError;
pub use models::DreamRecord;
pub use store::{DreamStore, StorageError};
