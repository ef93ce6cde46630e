use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Dispatch, ProviderAdapter, Renditions, TranslationSource};
use crate::batch::BatchLimits;
use crate::error::TranslationError;
use crate::language::{Language, Provider};
use crate::transport::HttpRequest;

pub const FREE_BASE_URL: &str = "https://api-free.deepl.com";
pub const PRO_BASE_URL: &str = "https://api.deepl.com";
const TRANSLATE_PATH: &str = "/v2/translate";

/// Free-tier auth keys carry this suffix
const FREE_KEY_SUFFIX: &str = ":fx";

const LIMITS: BatchLimits = BatchLimits::new(50, 30_000);

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    text: Vec<&'a str>,
    source_lang: &'a str,
    target_lang: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translations: Vec<DeepLTranslation>,
}

#[derive(Debug, Deserialize)]
struct DeepLTranslation {
    #[allow(dead_code)]
    #[serde(default)]
    detected_source_language: Option<String>,
    text: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: String,
    #[serde(default)]
    detail: Option<String>,
}

/// DeepL adapter; one request per target language.
pub struct DeepLAdapter {
    api_key: String,
    base_url: String,
}

impl DeepLAdapter {
    pub fn new(api_key: String, base_url: Option<String>) -> Self {
        let base_url = base_url.unwrap_or_else(|| Self::endpoint_for_key(&api_key).to_string());
        Self { api_key, base_url }
    }

    pub fn endpoint_for_key(api_key: &str) -> &'static str {
        if api_key.trim_end().ends_with(FREE_KEY_SUFFIX) {
            FREE_BASE_URL
        } else {
            PRO_BASE_URL
        }
    }
}

impl ProviderAdapter for DeepLAdapter {
    fn provider(&self) -> Provider {
        Provider::DeepL
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
            "Translating {} texts from {} to {} with {}",
            sources.len(),
            source_language,
            target,
            Provider::DeepL
        );

        let request = TranslateRequest {
            text: sources.iter().map(|s| s.text.as_str()).collect(),
            source_lang: source_language.locale(Provider::DeepL),
            target_lang: target.target_locale(Provider::DeepL),
        };
        let body = serde_json::to_vec(&request).expect("DeepL request always serializes");

        HttpRequest::post(TRANSLATE_PATH)
            .header("Authorization", format!("DeepL-Auth-Key {}", self.api_key))
            .header("Content-Type", "application/json")
            .body(body)
    }

    fn parse_response(
        &self,
        body: &[u8],
        _sources: &[TranslationSource],
        targets: &[Language],
    ) -> Result<Vec<Renditions>, TranslationError> {
        let target = *targets
            .first()
            .ok_or_else(|| TranslationError::Internal("no target language for DeepL response".to_string()))?;

        let response: TranslateResponse = serde_json::from_slice(body)?;
        Ok(response
            .translations
            .into_iter()
            .map(|t| vec![(target, t.text)])
            .collect())
    }

    fn error_detail(&self, body: &[u8]) -> Option<String> {
        let error: ErrorResponse = serde_json::from_slice(body).ok()?;
        Some(match error.detail {
            Some(detail) => format!("{} ({})", error.message, detail),
            None => error.message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_endpoint_selection() {
        assert_eq!(DeepLAdapter::endpoint_for_key("1234-abcd:fx"), FREE_BASE_URL);
        assert_eq!(DeepLAdapter::endpoint_for_key("1234-abcd"), PRO_BASE_URL);
        assert_eq!(DeepLAdapter::endpoint_for_key("fx"), PRO_BASE_URL);
    }

    #[test]
    fn test_request_shape() {
        let adapter = DeepLAdapter::new("key:fx".to_string(), None);
        let sources = vec![
            TranslationSource::new("greeting", "Hello"),
            TranslationSource::new("farewell", "Goodbye").with_comment("ignored by DeepL"),
        ];
        let request = adapter.build_request(&sources, Language::German, &[Language::English]);

        assert_eq!(request.path, "/v2/translate");
        assert_eq!(request.header_value("Authorization"), Some("DeepL-Auth-Key key:fx"));

        let body: Value = serde_json::from_slice(&request.body).unwrap();
        assert_eq!(body["text"], serde_json::json!(["Hello", "Goodbye"]));
        assert_eq!(body["source_lang"], "DE");
        assert_eq!(body["target_lang"], "EN-US");
    }

    #[test]
    fn test_parse_response() {
        let adapter = DeepLAdapter::new("key".to_string(), None);
        let body = br#"{"translations":[
            {"detected_source_language":"EN","text":"Hallo"},
            {"detected_source_language":"EN","text":"Tschuess"}
        ]}"#;
        let sources = vec![TranslationSource::new("a", "Hello"), TranslationSource::new("b", "Bye")];

        let parsed = adapter.parse_response(body, &sources, &[Language::German]).unwrap();
        assert_eq!(
            parsed,
            vec![
                vec![(Language::German, "Hallo".to_string())],
                vec![(Language::German, "Tschuess".to_string())],
            ]
        );
    }

    #[test]
    fn test_parse_response_wrong_shape() {
        let adapter = DeepLAdapter::new("key".to_string(), None);
        let err = adapter
            .parse_response(br#"{"result":[]}"#, &[], &[Language::German])
            .unwrap_err();
        assert!(matches!(err, TranslationError::Decode(_)));
    }

    #[test]
    fn test_error_detail() {
        let adapter = DeepLAdapter::new("key".to_string(), None);
        assert_eq!(
            adapter.error_detail(br#"{"message":"Wrong endpoint"}"#),
            Some("Wrong endpoint".to_string())
        );
        assert_eq!(
            adapter.error_detail(br#"{"message":"Value for 'target_lang' not supported.","detail":"EN"}"#),
            Some("Value for 'target_lang' not supported. (EN)".to_string())
        );
        assert_eq!(adapter.error_detail(b""), None);
    }

    #[test]
    #[should_panic]
    fn test_request_without_target_panics() {
        let adapter = DeepLAdapter::new("key".to_string(), None);
        adapter.build_request(&[TranslationSource::new("k1", "Love")], Language::English, &[]);
    }
}
