use std::path::Path;
use tokio::fs;
use tracing::{info, warn};

use crate::error::{LingoError, Result};
use crate::language::Language;
use crate::translate::{Translation, TranslationSource, Translator};

pub struct Workflow {
    translator: Translator,
}

impl Workflow {
    pub fn new(translator: Translator) -> Self {
        Self { translator }
    }

    /// Translate a JSON file of sources and write the translations as JSON,
    /// to `output` when given or to stdout otherwise.
    pub async fn translate_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        source_language: Language,
        target_languages: &[Language],
        output_path: Option<Q>,
    ) -> Result<Vec<Translation>> {
        let input_path = input_path.as_ref();
        info!("Processing sources file: {}", input_path.display());

        let sources = load_sources(input_path).await?;
        if sources.is_empty() {
            warn!("No sources found in {}", input_path.display());
        }

        let targets: Vec<Language> = target_languages
            .iter()
            .copied()
            .filter(|target| {
                let same = *target == source_language;
                if same {
                    warn!("Skipping target {} because it is the source language", target);
                }
                !same
            })
            .collect();

        let translations = self
            .translator
            .translate(&sources, source_language, &targets)
            .await?;

        let json = serde_json::to_string_pretty(&translations)?;
        match output_path {
            Some(path) => {
                let path = path.as_ref();
                fs::write(path, json).await?;
                info!("Wrote {} translations to {}", translations.len(), path.display());
            }
            None => println!("{}", json),
        }

        Ok(translations)
    }
}

/// Read a JSON array of `{key, text, comment?}` objects.
pub async fn load_sources<P: AsRef<Path>>(path: P) -> Result<Vec<TranslationSource>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LingoError::FileNotFound(path.display().to_string()));
    }

    let content = fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&content)?)
}

/// Parse a comma-separated list of language tags.
pub fn parse_languages(list: &str) -> Result<Vec<Language>> {
    list.split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::parse)
        .collect()
}
