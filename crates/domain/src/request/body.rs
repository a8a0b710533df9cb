//! HTTP Request body types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Declared content type of a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BodyContentType {
    /// `application/json`
    #[default]
    #[serde(rename = "application/json")]
    Json,
    /// `text/plain`
    #[serde(rename = "text/plain")]
    Text,
}

impl BodyContentType {
    /// Returns the MIME type string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Text => "text/plain",
        }
    }

    /// Returns true if the editor offers a format action for this type.
    #[must_use]
    pub const fn supports_format(self) -> bool {
        matches!(self, Self::Json)
    }
}

impl fmt::Display for BodyContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BodyContentType {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        // Parameters such as `; charset=utf-8` do not change the editor mode.
        let essence = s.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "application/json" => Ok(Self::Json),
            "text/plain" => Ok(Self::Text),
            _ => Err(DomainError::UnsupportedContentType(s.to_string())),
        }
    }
}

/// Pretty-prints a JSON body with two-space indentation.
///
/// # Errors
///
/// Returns `DomainError::FormatUnsupported` for non-JSON content and
/// `DomainError::InvalidBody` when the text does not parse. The input is
/// never modified, so a failed format leaves the caller's text intact.
pub fn format_body(content_type: BodyContentType, text: &str) -> DomainResult<String> {
    if !content_type.supports_format() {
        return Err(DomainError::FormatUnsupported);
    }
    let value = parse_json(text)?;
    serde_json::to_string_pretty(&value).map_err(|e| DomainError::InvalidBody(e.to_string()))
}

/// Normalizes a body for committing.
///
/// JSON bodies that are blank commit as an empty "no body" value; any other
/// JSON must parse and is minified. Plain text is committed verbatim.
///
/// # Errors
///
/// Returns `DomainError::InvalidBody` when a non-blank JSON body does not
/// parse.
pub fn prepare_body_for_save(content_type: BodyContentType, text: &str) -> DomainResult<String> {
    match content_type {
        BodyContentType::Json if text.trim().is_empty() => Ok(String::new()),
        BodyContentType::Json => {
            let value = parse_json(text)?;
            serde_json::to_string(&value).map_err(|e| DomainError::InvalidBody(e.to_string()))
        }
        BodyContentType::Text => Ok(text.to_string()),
    }
}

fn parse_json(text: &str) -> DomainResult<serde_json::Value> {
    serde_json::from_str(text).map_err(|e| DomainError::InvalidBody(format!("Invalid JSON: {e}")))
}
