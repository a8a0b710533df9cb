//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The content type is not one the body editor understands.
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),

    /// The request body does not parse for its declared content type.
    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// Formatting is only offered for JSON bodies.
    #[error("formatting is only available for JSON bodies")]
    FormatUnsupported,

    /// A required field was left blank.
    #[error("{0} is required")]
    BlankField(&'static str),

    /// An identifier is invalid or empty.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
