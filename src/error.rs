use thiserror::Error;

/// Failure of a single `translate` call, whatever provider served it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("No response received from provider")]
    NoResponse,

    #[error("Provider returned an empty response body")]
    EmptyBody,

    #[error("Failed to decode provider response: {0}")]
    Decode(String),

    #[error("Client error {status}: {}", .detail.as_deref().unwrap_or("no details"))]
    Client { status: u16, detail: Option<String> },

    #[error("Server error {status}")]
    Server { status: u16 },

    #[error("Unexpected HTTP status {status}")]
    UnexpectedStatus { status: u16 },

    #[error("Unexpected response shape: {0}")]
    UnexpectedResponse(String),

    #[error("Unexpected language code: {0}")]
    UnexpectedLanguageCode(String),

    #[error("Model refused to translate: {0}")]
    Refusal(String),

    #[error("Expected {expected} translations but provider returned {actual}")]
    AlignmentMismatch { expected: usize, actual: usize },

    #[error("Internal inconsistency: {0}")]
    Internal(String),
}

impl TranslationError {
    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Client { status, .. }
            | Self::Server { status }
            | Self::UnexpectedStatus { status } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TranslationError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

#[derive(Error, Debug)]
pub enum LingoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("File not found: {0}")]
    FileNotFound(String),
}

pub type Result<T> = std::result::Result<T, LingoError>;
