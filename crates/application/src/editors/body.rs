//! Body editor.
//!
//! Saving is explicit: nothing is committed until the user saves, and a JSON
//! body must parse before it is minified and committed.

use pulse_domain::request::{format_body, prepare_body_for_save};
use pulse_domain::{BodyContentType, DomainResult};

/// Holds the declared content type and raw text of a request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyEditor {
    content_type: BodyContentType,
    text: String,
    error: Option<String>,
}

impl BodyEditor {
    /// Creates an editor over a stored body.
    #[must_use]
    pub fn new(content_type: BodyContentType, text: impl Into<String>) -> Self {
        Self {
            content_type,
            text: text.into(),
            error: None,
        }
    }

    /// Returns the raw text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the declared content type.
    #[must_use]
    pub const fn content_type(&self) -> BodyContentType {
        self.content_type
    }

    /// Returns the last format or save error shown to the user.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns true if the format action should be offered.
    #[must_use]
    pub const fn can_format(&self) -> bool {
        self.content_type.supports_format()
    }

    /// Replaces the raw text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.error = None;
    }

    /// Changes the declared content type.
    pub fn set_content_type(&mut self, content_type: BodyContentType) {
        self.content_type = content_type;
        self.error = None;
    }

    /// Re-serializes a JSON body with indentation.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the text untouched, if the body is not JSON
    /// or does not parse.
    pub fn format(&mut self) -> DomainResult<()> {
        match format_body(self.content_type, &self.text) {
            Ok(formatted) => {
                self.text = formatted;
                self.error = None;
                Ok(())
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Produces the content to commit on save.
    ///
    /// # Errors
    ///
    /// Returns an error if a non-blank JSON body does not parse; the save
    /// must then be blocked.
    pub fn prepare_save(&mut self) -> DomainResult<String> {
        prepare_body_for_save(self.content_type, &self.text).inspect_err(|err| {
            self.error = Some(err.to_string());
        })
    }
}
