//! Error types for Keel

use thiserror::Error;

/// The main error type for Keel operations
#[derive(Debug, Error)]
pub enum KeelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Invalid template: {0}")]
    Document(String),

    #[error("Duplicate resource name: {0}")]
    DuplicateResource(String),

    #[error("Schema load error: {0}")]
    SchemaLoad(String),

    #[error("Invalid constraint schema for {resource_type}: {reason}")]
    SchemaValidation {
        resource_type: String,
        reason: String,
    },

    #[error("Duplicate rule id: {0}")]
    DuplicateRule(String),

    #[error("Unknown rule id: {0}")]
    UnknownRule(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for Keel operations
pub type Result<T> = std::result::Result<T, KeelError>;

impl From<toml::de::Error> for KeelError {
    fn from(err: toml::de::Error) -> Self {
        KeelError::TomlParse(err.to_string())
    }
}

impl From<toml_edit::TomlError> for KeelError {
    fn from(err: toml_edit::TomlError) -> Self {
        KeelError::TomlParse(err.to_string())
    }
}
