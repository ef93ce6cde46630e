use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::response::classify;
use super::{AdapterFactory, Dispatch, ProviderAdapter, Translation, TranslationSource};
use crate::config::TranslatorConfig;
use crate::error::{Result, TranslationError};
use crate::language::{Language, Provider};
use crate::transport::{ReqwestTransport, Transport};

/// Drives one provider adapter over batches and target languages.
///
/// Holds only immutable configuration, so one instance can serve concurrent
/// callers. Each `translate` call is a fresh attempt: no retries, no caching.
pub struct Translator {
    adapter: Box<dyn ProviderAdapter>,
    transport: Arc<dyn Transport>,
}

impl Translator {
    pub fn new(adapter: Box<dyn ProviderAdapter>, transport: Arc<dyn Transport>) -> Self {
        Self { adapter, transport }
    }

    /// Build the adapter for the configured provider and a reqwest transport.
    pub fn from_config(config: &TranslatorConfig) -> Result<Self> {
        let adapter = AdapterFactory::create(config)?;
        let transport = ReqwestTransport::new(Duration::from_secs(config.timeout_secs))?;
        Ok(Self::new(adapter, Arc::new(transport)))
    }

    pub fn provider(&self) -> Provider {
        self.adapter.provider()
    }

    /// Translate `sources` into every language in `targets`.
    ///
    /// Requests run one after another. The first failure aborts the call and
    /// discards everything translated so far.
    ///
    /// Multi-target providers yield results ordered by source, then by the
    /// languages the provider returned; per-target providers yield all
    /// sources for the first target, then all sources for the next.
    pub async fn translate(
        &self,
        sources: &[TranslationSource],
        source_language: Language,
        targets: &[Language],
    ) -> std::result::Result<Vec<Translation>, TranslationError> {
        if sources.is_empty() || targets.is_empty() {
            debug!("Nothing to translate");
            return Ok(Vec::new());
        }

        let batches = self.adapter.limits().split(sources);
        info!(
            "Translating {} texts into {} languages with {} ({} batches)",
            sources.len(),
            targets.len(),
            self.adapter.provider(),
            batches.len()
        );

        let mut translations = Vec::with_capacity(sources.len() * targets.len());
        match self.adapter.dispatch() {
            Dispatch::MultiTarget => {
                for batch in &batches {
                    translations.extend(self.translate_batch(batch, source_language, targets).await?);
                }
            }
            Dispatch::PerTarget => {
                for target in targets {
                    for batch in &batches {
                        let single = std::slice::from_ref(target);
                        translations.extend(self.translate_batch(batch, source_language, single).await?);
                    }
                }
            }
        }

        info!("Received {} translations", translations.len());
        Ok(translations)
    }

    async fn translate_batch(
        &self,
        batch: &[TranslationSource],
        source_language: Language,
        targets: &[Language],
    ) -> std::result::Result<Vec<Translation>, TranslationError> {
        let request = self.adapter.build_request(batch, source_language, targets);
        let response = self.transport.execute(self.adapter.base_url(), request).await?;
        let body = classify(response, self.adapter.as_ref())?;

        let renditions = self.adapter.parse_response(&body, batch, targets)?;
        if renditions.len() != batch.len() {
            return Err(TranslationError::AlignmentMismatch {
                expected: batch.len(),
                actual: renditions.len(),
            });
        }
        if let Some(short) = renditions.iter().find(|r| r.len() != targets.len()) {
            return Err(TranslationError::AlignmentMismatch {
                expected: targets.len(),
                actual: short.len(),
            });
        }

        Ok(batch
            .iter()
            .zip(renditions)
            .flat_map(|(source, rendered)| {
                rendered.into_iter().map(move |(language, translated_text)| Translation {
                    language,
                    translated_text,
                    key: source.key.clone(),
                })
            })
            .collect())
    }
}
