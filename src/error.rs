//! Structured error types for the Folio exporter.
//!
//! Layout itself never fails: every resume shape has a rendering. Errors come
//! from the edges of the pipeline: parsing input, validating it upstream of
//! layout, serializing the output and writing files.

use thiserror::Error;

/// The unified error type returned by all public Folio API functions.
#[derive(Debug, Error)]
pub enum FolioError {
    /// JSON input failed to parse as a resume record or layout override.
    #[error("Failed to parse input: {source}{}", hint_suffix(.hint))]
    ParseError {
        source: serde_json::Error,
        hint: String,
    },
    /// The input parsed but cannot be exported (e.g. a blank name).
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Document serialization failed.
    #[error("Render error: {0}")]
    RenderError(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl FolioError {
    /// The message shown to an end user. Details stay in the logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            FolioError::ParseError { .. } => {
                "The resume data could not be read. Please check it and try again."
            }
            FolioError::InvalidInput(_) => {
                "Some required resume details are missing. Please complete them before exporting."
            }
            FolioError::RenderError(_) => "Failed to generate the document. Please try again.",
            FolioError::Io(_) => "The document could not be saved. Please try again.",
        }
    }
}

impl From<serde_json::Error> for FolioError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the resume schema. Check field names and types.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input; is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        FolioError::ParseError { source: e, hint }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_errors_carry_a_hint() {
        let err: FolioError = serde_json::from_str::<serde_json::Value>("{ \"name\": }")
            .unwrap_err()
            .into();
        let text = err.to_string();
        assert!(text.starts_with("Failed to parse input"));
        assert!(text.contains("Hint: Check for trailing commas"));
    }

    #[test]
    fn user_messages_hide_details() {
        let err = FolioError::RenderError("content stream overflow".to_string());
        assert!(!err.user_message().contains("overflow"));
        let err = FolioError::InvalidInput("name is required".to_string());
        assert!(err.user_message().contains("required resume details"));
    }
}
