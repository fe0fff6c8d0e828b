use thiserror::Error;

/// Message shown when a generation is submitted without a prompt.
pub const EMPTY_PROMPT_MESSAGE: &str = "Please enter a prompt to generate an image.";

/// Message shown when the zip archive could not be assembled.
pub const ARCHIVE_FAILED_MESSAGE: &str = "Failed to create the zip file.";

/// Raw text used when a failed call carries no message of its own.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred.";

#[derive(Debug, Error)]
pub enum StudioError {
    /// The request was rejected locally; no call was made.
    #[error("{0}")]
    Validation(String),

    /// The generation call failed. The message is the raw text from the
    /// service or transport and is meant to go through the classifier.
    #[error("{0}")]
    ExternalService(String),

    #[error("{0}")]
    Archive(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StudioError {
    pub fn empty_prompt() -> Self {
        StudioError::Validation(EMPTY_PROMPT_MESSAGE.to_string())
    }

    pub fn archive_failed() -> Self {
        StudioError::Archive(ARCHIVE_FAILED_MESSAGE.to_string())
    }

    /// The raw message a failure carries, falling back to a generic text
    /// when the underlying error was blank.
    pub fn raw_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            UNEXPECTED_ERROR_MESSAGE.to_string()
        } else {
            message
        }
    }
}

impl From<reqwest::Error> for StudioError {
    fn from(err: reqwest::Error) -> Self {
        StudioError::ExternalService(err.to_string())
    }
}

impl From<serde_json::Error> for StudioError {
    fn from(err: serde_json::Error) -> Self {
        StudioError::ExternalService(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StudioError>;
