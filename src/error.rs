//! Error types for filerepo
//!
//! Defines one error enum covering every failure mode of manifest generation.
//! Uses thiserror for ergonomic error handling.

use thiserror::Error;

/// Result type alias for filerepo operations
pub type Result<T> = std::result::Result<T, FileRepoError>;

/// Error type for filerepo operations
#[derive(Error, Debug)]
pub enum FileRepoError {
    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory walk errors (missing base directory, permission denied)
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// XML reader/writer errors
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// An attribute value holds characters that XML 1.0 cannot represent
    #[error("Invalid character in {attribute} attribute: {value:?}")]
    InvalidCharacter { attribute: String, value: String },

    /// Manifest parsing errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Repository description errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}
