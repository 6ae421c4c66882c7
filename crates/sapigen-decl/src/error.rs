//! Frontend error types.

use sapigen_core::ModelError;

/// Errors that can occur while loading declarations.
#[derive(Debug, thiserror::Error)]
pub enum DeclError {
    /// Failed to parse a C signature or type spelling.
    #[error("invalid C declaration `{input}`: {detail}")]
    InvalidCSignature { input: String, detail: String },

    /// The declaration file is structurally wrong.
    #[error("invalid declaration file: {detail}")]
    InvalidDeclaration { detail: String },

    /// The declarations do not form a valid model.
    #[error("invalid declarations: {0}")]
    Model(#[from] ModelError),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for frontend operations.
pub type Result<T> = std::result::Result<T, DeclError>;
