// OpenAI chat completion adapter
//
// The model is asked to answer with JSON only; the answer arrives as a string
// inside the completion envelope and is decoded by the normalize module.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::normalize::translations_from_completion;
use super::{Dispatch, ProviderAdapter, Renditions, TranslationSource};
use crate::batch::BatchLimits;
use crate::error::TranslationError;
use crate::language::{Language, Provider};
use crate::transport::HttpRequest;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Small batches keep the answer short enough to stay well-formed JSON
const LIMITS: BatchLimits = BatchLimits::new(25, 1000);

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

pub struct OpenAIAdapter {
    api_key: String,
    context: Option<String>,
    model: String,
    base_url: String,
}

impl OpenAIAdapter {
    pub fn new(
        api_key: String,
        context: Option<String>,
        model: Option<String>,
        base_url: Option<String>,
    ) -> Self {
        Self {
            api_key,
            context,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn system_prompt(&self, source: Language, target: Language) -> String {
        let mut prompt = format!(
            r#"You are a professional translator of software user interfaces.
Translate each line of the user message from {source} ({source_code}) to {target} ({target_code}).

Each line has the form `<text> KEY:<key> COMMENT:<comment>`. Translate only <text>; KEY and COMMENT are context and must not appear in the output.

Respond with JSON only, no prose and no markdown, in exactly this shape:
{{"translations":[{{"text":"<translation of line 1>"}},{{"text":"<translation of line 2>"}}]}}
Return exactly one entry per input line, in the same order.

If a key contains "button", "action" or "title", the text is shown on a button or heading: keep the translation as short as the original and avoid full sentences.
Keep placeholders such as %@, %d, {{name}} and line breaks unchanged."#,
            source = source.name(),
            source_code = source.code(),
            target = target.name(),
            target_code = target.code(),
        );

        if let Some(context) = self.context.as_deref().filter(|c| !c.trim().is_empty()) {
            prompt.push_str("\n\nContext about the app: ");
            prompt.push_str(context);
        }

        prompt
    }

    fn user_prompt(sources: &[TranslationSource]) -> String {
        sources
            .iter()
            .map(|s| {
                format!(
                    "{} KEY:{} COMMENT:{}",
                    s.text,
                    s.key,
                    s.comment.as_deref().unwrap_or("N/A")
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl ProviderAdapter for OpenAIAdapter {
    fn provider(&self) -> Provider {
        Provider::OpenAI
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn limits(&self) -> BatchLimits {
        LIMITS
    }

    fn dispatch(&self) -> Dispatch {
        Dispatch::PerTarget
    }

    fn build_request(
        &self,
        sources: &[TranslationSource],
        source_language: Language,
        targets: &[Language],
    ) -> HttpRequest {
        debug_assert_eq!(targets.len(), 1, "per-target requests carry exactly one target");
        let target = targets[0];
        info!(
            "Translating {} texts from {} to {} with {} ({})",
            sources.len(),
            source_language,
            target,
            Provider::OpenAI,
            self.model
        );

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: self.system_prompt(source_language, target),
                },
                Message {
                    role: "user".to_string(),
                    content: Self::user_prompt(sources),
                },
            ],
            temperature: 0.0,
        };
        let body = serde_json::to_vec(&request)
            .expect("chat request holds only strings and numbers and always serializes");

        HttpRequest::post(CHAT_COMPLETIONS_PATH)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .body(body)
    }

    fn parse_response(
        &self,
        body: &[u8],
        sources: &[TranslationSource],
        targets: &[Language],
    ) -> Result<Vec<Renditions>, TranslationError> {
        let target = *targets
            .first()
            .ok_or_else(|| TranslationError::Internal("no target language for OpenAI response".to_string()))?;

        let texts = translations_from_completion(body, sources.len())?;
        Ok(texts.into_iter().map(|text| vec![(target, text)]).collect())
    }

    fn error_detail(&self, body: &[u8]) -> Option<String> {
        serde_json::from_slice::<ErrorResponse>(body)
            .ok()
            .map(|e| e.error.message)
    }
}
