//! Error types for bilingue.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BilingueError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    Configuration { key: String, message: String },

    #[error("Configuration error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    // Audio source errors
    #[error("Unsupported or corrupt audio in {path}: {message}")]
    AudioFormat { path: String, message: String },

    #[error("Audio export failed for {path}: {message}")]
    AudioExport { path: String, message: String },

    // Run-level control
    #[error("Run cancelled before completion")]
    Cancelled,

    #[error("Manifest serialization failed: {0}")]
    ManifestSerialize(#[from] serde_json::Error),

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, BilingueError>;
