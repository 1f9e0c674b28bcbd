//! Error types shared by photo-ingest crates

use thiserror::Error;

/// Result type alias for common operations
pub type Result<T> = std::result::Result<T, PhotoError>;

/// Errors raised by the shared helpers in this crate
#[derive(Error, Debug)]
pub enum PhotoError {
    #[error("Invalid log setting '{value}' for {setting}")]
    InvalidLogSetting { setting: &'static str, value: String },
}

impl PhotoError {
    /// Create an invalid log setting error
    pub fn invalid_log_setting(setting: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidLogSetting {
            setting,
            value: value.into(),
        }
    }
}
