use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{LingoError, Result};
use crate::language::Provider;

/// Environment variable consulted when no API key is configured
pub const API_KEY_ENV: &str = "LINGOSYNC_API_KEY";

fn default_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub translator: TranslatorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorConfig {
    /// Translation provider: microsoft, deepl or openai
    pub provider: Provider,
    /// Subscription key (Microsoft), auth key (DeepL) or API key (OpenAI)
    #[serde(default)]
    pub api_key: String,
    /// Azure resource region, required for regional Microsoft keys
    #[serde(default)]
    pub region: Option<String>,
    /// Free-text context appended to the OpenAI system prompt
    #[serde(default)]
    pub context: Option<String>,
    /// OpenAI model override
    #[serde(default)]
    pub model: Option<String>,
    /// Base URL override, e.g. for a proxy
    #[serde(default)]
    pub base_url: Option<String>,
    /// Transport timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            provider: Provider::DeepL,
            api_key: String::new(),
            region: None,
            context: None,
            model: None,
            base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl TranslatorConfig {
    /// Configured key, falling back to `LINGOSYNC_API_KEY`.
    pub fn effective_api_key(&self) -> Result<String> {
        if !self.api_key.trim().is_empty() {
            return Ok(self.api_key.trim().to_string());
        }
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
            _ => Err(LingoError::Config(format!(
                "API key not configured for {}",
                self.provider
            ))),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| LingoError::Config(format!("Failed to read config file: {}", e)))?;

        Ok(toml::from_str(&content)?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| LingoError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| LingoError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}
