//! Normalization of transport results and HTTP statuses into
//! [`TranslationError`].

use tracing::warn;

use super::ProviderAdapter;
use crate::error::TranslationError;
use crate::transport::{HttpResponse, TransportError};

impl From<TransportError> for TranslationError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::Unreachable(message) => Self::Transport(message),
            TransportError::InvalidRequest(message) => {
                Self::Transport(format!("invalid request: {}", message))
            }
            TransportError::Interrupted(message) => {
                Self::Transport(format!("response interrupted: {}", message))
            }
            TransportError::Timeout => Self::Transport("request timed out".to_string()),
            TransportError::NoResponse => Self::NoResponse,
        }
    }
}

/// Return the body of a successful response, or the matching error.
pub fn classify(
    response: HttpResponse,
    adapter: &dyn ProviderAdapter,
) -> Result<Vec<u8>, TranslationError> {
    let HttpResponse { status, body } = response;

    match status {
        200..=299 if body.iter().all(u8::is_ascii_whitespace) => Err(TranslationError::EmptyBody),
        200..=299 => Ok(body),
        400..=499 => {
            let detail = adapter.error_detail(&body).or_else(|| raw_detail(&body));
            warn!(
                "{} rejected the request with {}: {}",
                adapter.provider(),
                status,
                detail.as_deref().unwrap_or("-")
            );
            Err(TranslationError::Client { status, detail })
        }
        500..=599 => Err(TranslationError::Server { status }),
        _ => Err(TranslationError::UnexpectedStatus { status }),
    }
}

fn raw_detail(body: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(body).trim().to_string();
    (!text.is_empty()).then_some(text)
}
