use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Dispatch, ProviderAdapter, Renditions, TranslationSource};
use crate::batch::BatchLimits;
use crate::error::TranslationError;
use crate::language::{Language, Provider};
use crate::transport::HttpRequest;

pub const DEFAULT_BASE_URL: &str = "https://api.cognitive.microsofttranslator.com";
const TRANSLATE_PATH: &str = "/translate";
const API_VERSION: &str = "3.0";

const LIMITS: BatchLimits = BatchLimits::new(100, 10_000);

#[derive(Debug, Serialize)]
struct TextElement<'a> {
    #[serde(rename = "Text")]
    text: &'a str,
}

/// One element per source text
#[derive(Debug, Deserialize)]
struct TranslateResult {
    translations: Vec<TargetTranslation>,
}

#[derive(Debug, Deserialize)]
struct TargetTranslation {
    text: String,
    to: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: i64,
    message: String,
}

/// Microsoft Translator v3 adapter; a single request covers all targets.
pub struct MicrosoftAdapter {
    subscription_key: String,
    region: Option<String>,
    base_url: String,
}

impl MicrosoftAdapter {
    pub fn new(subscription_key: String, region: Option<String>, base_url: Option<String>) -> Self {
        Self {
            subscription_key,
            region,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }
}

impl ProviderAdapter for MicrosoftAdapter {
    fn provider(&self) -> Provider {
        Provider::Microsoft
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn limits(&self) -> BatchLimits {
        LIMITS
    }

    fn dispatch(&self) -> Dispatch {
        Dispatch::MultiTarget
    }

    fn build_request(
        &self,
        sources: &[TranslationSource],
        source_language: Language,
        targets: &[Language],
    ) -> HttpRequest {
        info!(
            "Translating {} texts from {} to {} languages with {}",
            sources.len(),
            source_language,
            targets.len(),
            Provider::Microsoft
        );

        let elements: Vec<TextElement> = sources
            .iter()
            .map(|s| TextElement { text: &s.text })
            .collect();
        let body = serde_json::to_vec(&elements).expect("text elements always serialize");

        let mut request = HttpRequest::post(TRANSLATE_PATH)
            .query("api-version", API_VERSION)
            .query("from", source_language.locale(Provider::Microsoft));
        for target in targets {
            request = request.query("to", target.target_locale(Provider::Microsoft));
        }

        request = request.header("Ocp-Apim-Subscription-Key", self.subscription_key.as_str());
        if let Some(region) = &self.region {
            request = request.header("Ocp-Apim-Subscription-Region", region.as_str());
        }

        request.header("Content-Type", "application/json").body(body)
    }

    fn parse_response(
        &self,
        body: &[u8],
        _sources: &[TranslationSource],
        targets: &[Language],
    ) -> Result<Vec<Renditions>, TranslationError> {
        let results: Vec<TranslateResult> = serde_json::from_slice(body)?;

        results
            .into_iter()
            .map(|result| renditions_for(result, targets))
            .collect()
    }

    fn error_detail(&self, body: &[u8]) -> Option<String> {
        serde_json::from_slice::<ErrorResponse>(body)
            .ok()
            .map(|e| format!("{} (code {})", e.error.message, e.error.code))
    }
}

/// Map one source's translations back to languages. Each requested target
/// must come back exactly once.
fn renditions_for(result: TranslateResult, targets: &[Language]) -> Result<Renditions, TranslationError> {
    if result.translations.len() != targets.len() {
        return Err(TranslationError::AlignmentMismatch {
            expected: targets.len(),
            actual: result.translations.len(),
        });
    }

    let mut renditions: Renditions = Vec::with_capacity(targets.len());
    for t in result.translations {
        let language = match Language::from_locale(Provider::Microsoft, &t.to) {
            Some(language) => language,
            None => return Err(TranslationError::UnexpectedLanguageCode(t.to)),
        };
        if !targets.contains(&language) {
            return Err(TranslationError::UnexpectedResponse(format!(
                "translation into {} was not requested",
                language
            )));
        }
        if renditions.iter().any(|(seen, _)| *seen == language) {
            return Err(TranslationError::UnexpectedResponse(format!(
                "{} translated more than once",
                language
            )));
        }
        renditions.push((language, t.text));
    }

    Ok(renditions)
}
