//! Learnloom error types

use thiserror::Error;

/// Minimum number of characters (after trimming) required before generation
pub const MIN_CONTENT_CHARS: usize = 50;

/// Learnloom error type
#[derive(Error, Debug)]
pub enum Error {
    /// No content has been submitted
    #[error("No content provided")]
    ContentMissing,

    /// Content is shorter than the generation minimum
    #[error("Content too short: {len} characters (min {MIN_CONTENT_CHARS})")]
    ContentTooShort { len: usize },

    /// Uploaded file type cannot be converted to text
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// Document could not be read as text
    #[error("Document error: {0}")]
    Document(String),

    /// Generation service or upstream model is rate limiting
    #[error("Rate limited by generation service")]
    RateLimited,

    /// Generation service or upstream model requires payment
    #[error("Payment required by generation service")]
    PaymentRequired,

    /// Network failure or non-success HTTP status
    #[error("Generation service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Response body could not be parsed into the expected schema
    #[error("Malformed generation response: {0}")]
    MalformedResponse(String),

    /// Generation succeeded but produced no concepts
    #[error("No concepts found in generated content")]
    NoConceptsFound,

    /// Generation succeeded but produced no questions
    #[error("No questions found in generated content")]
    NoQuestionsFound,

    /// A generation call is already pending on this client
    #[error("A generation request is already in progress")]
    GenerationInProgress,

    /// The pending generation call was cancelled by the caller
    #[error("Generation cancelled")]
    Cancelled,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Text suitable for a transient user-facing notification
    pub fn user_message(&self) -> String {
        match self {
            Error::ContentMissing => "Please paste or upload content first.".to_string(),
            Error::ContentTooShort { .. } => format!(
                "Content is too short. Please provide at least {} characters.",
                MIN_CONTENT_CHARS
            ),
            Error::UnsupportedFileType(ext) if ext == "doc" => {
                "Legacy .doc files are not supported. Please save the document as .docx or .txt."
                    .to_string()
            }
            Error::UnsupportedFileType(ext) => {
                format!("Files of type '{}' are not supported. Use .txt, .md or .docx.", ext)
            }
            Error::RateLimited => "Rate limits exceeded, please try later.".to_string(),
            Error::PaymentRequired => {
                "Payment required, please add funds to your AI workspace.".to_string()
            }
            Error::NoConceptsFound => "Could not extract concepts from the content.".to_string(),
            Error::NoQuestionsFound => {
                "Could not generate questions from the content.".to_string()
            }
            Error::GenerationInProgress => {
                "Generation already in progress, please wait.".to_string()
            }
            Error::Cancelled => "Generation was cancelled.".to_string(),
            _ => "Generation failed. Please try again.".to_string(),
        }
    }
}

/// Result type alias for Learnloom operations
pub type Result<T> = std::result::Result<T, Error>;

/// Validate source content against the generation minimum.
///
/// Length is counted in characters of the trimmed text.
pub fn validate_content(content: &str) -> Result<&str> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(Error::ContentMissing);
    }
    let len = trimmed.chars().count();
    if len < MIN_CONTENT_CHARS {
        return Err(Error::ContentTooShort { len });
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_content_missing() {
        assert!(matches!(validate_content(""), Err(Error::ContentMissing)));
        assert!(matches!(validate_content("  \n\t "), Err(Error::ContentMissing)));
    }

    #[test]
    fn test_validate_content_too_short() {
        let err = validate_content(&"a".repeat(49)).unwrap_err();
        assert!(matches!(err, Error::ContentTooShort { len: 49 }));
    }

    #[test]
    fn test_validate_content_trims_before_counting() {
        let padded = format!("   {}   ", "a".repeat(49));
        assert!(matches!(
            validate_content(&padded),
            Err(Error::ContentTooShort { len: 49 })
        ));
        assert!(validate_content(&"a".repeat(50)).is_ok());
    }

    #[test]
    fn test_validate_content_counts_chars_not_bytes() {
        // 25 two-byte characters: 50 bytes but only 25 chars
        let text = "é".repeat(25);
        assert!(matches!(
            validate_content(&text),
            Err(Error::ContentTooShort { len: 25 })
        ));
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(
            Error::RateLimited.user_message(),
            "Rate limits exceeded, please try later."
        );
        assert!(Error::UnsupportedFileType("doc".to_string())
            .user_message()
            .contains(".docx"));
        assert!(Error::ServiceUnavailable("boom".to_string())
            .user_message()
            .contains("try again"));
    }
}
