// Multi-provider translation
//
// Each provider is an adapter that only knows how to build its own request
// and read its own response; the orchestrator owns batching, dispatch,
// positional zipping and error normalization:
// - Microsoft: one request covers every target language
// - DeepL: one request per target language
// - OpenAI: one chat completion per target language, JSON embedded in content
//
// To add a provider, implement ProviderAdapter and register it in
// AdapterFactory::create.

pub mod deepl;
pub mod microsoft;
pub mod normalize;
pub mod openai;
pub mod orchestrator;
pub mod response;

use serde::{Deserialize, Serialize};

use crate::batch::BatchLimits;
use crate::config::TranslatorConfig;
use crate::error::{Result, TranslationError};
use crate::language::{Language, Provider};
use crate::transport::HttpRequest;

pub use orchestrator::Translator;

/// A string to translate, identified by the caller's key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationSource {
    pub key: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl TranslationSource {
    pub fn new(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

impl AsRef<str> for TranslationSource {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// One translated string for one target language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub language: Language,
    pub translated_text: String,
    pub key: String,
}

/// How many target languages one request can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    MultiTarget,
    PerTarget,
}

/// Translated strings for a single source, one per returned language.
pub type Renditions = Vec<(Language, String)>;

/// Request/response contract of one translation provider.
pub trait ProviderAdapter: Send + Sync {
    fn provider(&self) -> Provider;

    fn base_url(&self) -> &str;

    fn limits(&self) -> BatchLimits;

    fn dispatch(&self) -> Dispatch;

    /// Build the request for `sources`. Per-target adapters receive exactly
    /// one target language and panic on an empty slice.
    fn build_request(
        &self,
        sources: &[TranslationSource],
        source_language: Language,
        targets: &[Language],
    ) -> HttpRequest;

    /// Decode a successful response body into one entry per source, in
    /// source order.
    fn parse_response(
        &self,
        body: &[u8],
        sources: &[TranslationSource],
        targets: &[Language],
    ) -> std::result::Result<Vec<Renditions>, TranslationError>;

    /// Human-readable message from the provider's error body, if it has one.
    fn error_detail(&self, body: &[u8]) -> Option<String>;
}

/// Factory for creating provider adapters
pub struct AdapterFactory;

impl AdapterFactory {
    pub fn create(config: &TranslatorConfig) -> Result<Box<dyn ProviderAdapter>> {
        let api_key = config.effective_api_key()?;
        let base_url = config.base_url.clone();

        let adapter: Box<dyn ProviderAdapter> = match config.provider {
            Provider::Microsoft => Box::new(microsoft::MicrosoftAdapter::new(
                api_key,
                config.region.clone(),
                base_url,
            )),
            Provider::DeepL => Box::new(deepl::DeepLAdapter::new(api_key, base_url)),
            Provider::OpenAI => Box::new(openai::OpenAIAdapter::new(
                api_key,
                config.context.clone(),
                config.model.clone(),
                base_url,
            )),
        };
        Ok(adapter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_for(provider: Provider, api_key: &str) -> TranslatorConfig {
        TranslatorConfig {
            provider,
            api_key: api_key.to_string(),
            ..TranslatorConfig::default()
        }
    }

    #[test]
    fn test_factory_picks_adapter_per_provider() {
        for provider in Provider::ALL {
            let adapter = AdapterFactory::create(&config_for(*provider, "key")).unwrap();
            assert_eq!(adapter.provider(), *provider);
        }
    }

    #[test]
    fn test_factory_selects_deepl_free_endpoint() {
        let free = AdapterFactory::create(&config_for(Provider::DeepL, "abc:fx")).unwrap();
        let pro = AdapterFactory::create(&config_for(Provider::DeepL, "abc")).unwrap();
        assert_eq!(free.base_url(), deepl::FREE_BASE_URL);
        assert_eq!(pro.base_url(), deepl::PRO_BASE_URL);
    }

    #[test]
    fn test_factory_honors_base_url_override() {
        let mut config = config_for(Provider::OpenAI, "key");
        config.base_url = Some("http://localhost:8080".to_string());
        let adapter = AdapterFactory::create(&config).unwrap();
        assert_eq!(adapter.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_dispatch_modes() {
        let ms = AdapterFactory::create(&config_for(Provider::Microsoft, "k")).unwrap();
        let openai = AdapterFactory::create(&config_for(Provider::OpenAI, "k")).unwrap();
        assert_eq!(ms.dispatch(), Dispatch::MultiTarget);
        assert_eq!(openai.dispatch(), Dispatch::PerTarget);
    }

    #[test]
    fn test_source_deserializes_without_comment() {
        let source: TranslationSource =
            serde_json::from_str(r#"{"key":"k1","text":"Love"}"#).unwrap();
        assert_eq!(source, TranslationSource::new("k1", "Love"));
    }
}
