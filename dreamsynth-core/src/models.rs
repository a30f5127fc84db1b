use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user-submitted dream journal entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DreamRecord {
    pub title: String,
    pub mood: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl DreamRecord {
    /// Build a record stamped with the current UTC time.
    pub fn new(
        title: impl Into<String>,
        mood: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            mood: mood.into(),
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}
