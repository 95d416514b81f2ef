//! Error types for Geoservices

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeoservicesError {
    // Request errors
    #[error("Invalid value for parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Unsupported operation: {operation}")]
    UnsupportedOperation { operation: String },

    // Collaborator errors
    #[error("Response rendering failed: {reason}")]
    Render { reason: String },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl GeoservicesError {
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter { name: name.into(), reason: reason.into() }
    }
}

impl From<serde_json::Error> for GeoservicesError {
    fn from(err: serde_json::Error) -> Self {
        GeoservicesError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GeoservicesError>;
