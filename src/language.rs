//! Language catalog.
//!
//! Every provider spells locales its own way: Microsoft uses lowercase BCP-47
//! tags with script subtags (`zh-Hans`), DeepL uses uppercase codes and
//! insists on a regional variant for some target languages (`EN-US`), and
//! the OpenAI prompt uses plain BCP-47 tags plus the English language name.
//! This module keeps all of those spellings in one table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LingoError;

/// Supported translation providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Microsoft,
    #[serde(rename = "deepl")]
    DeepL,
    #[serde(rename = "openai")]
    OpenAI,
}

impl Provider {
    pub const ALL: &'static [Self] = &[Self::Microsoft, Self::DeepL, Self::OpenAI];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Microsoft => "microsoft",
            Self::DeepL => "deepl",
            Self::OpenAI => "openai",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Microsoft => "Microsoft Translator",
            Self::DeepL => "DeepL",
            Self::OpenAI => "OpenAI",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Provider {
    type Err = LingoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "microsoft" | "azure" | "bing" => Ok(Self::Microsoft),
            "deepl" => Ok(Self::DeepL),
            "openai" | "chatgpt" => Ok(Self::OpenAI),
            other => Err(LingoError::Config(format!("Unknown provider: {}", other))),
        }
    }
}

/// Human languages the translator can work with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    English,
    German,
    French,
    Spanish,
    Italian,
    Portuguese,
    BrazilianPortuguese,
    Dutch,
    Polish,
    Russian,
    Ukrainian,
    Czech,
    Swedish,
    Danish,
    Finnish,
    NorwegianBokmal,
    Turkish,
    Greek,
    Japanese,
    Korean,
    ChineseSimplified,
    ChineseTraditional,
}

struct LocaleEntry {
    language: Language,
    name: &'static str,
    /// Plain BCP-47 tag, also used for the OpenAI prompt
    tag: &'static str,
    microsoft: &'static str,
    deepl_source: &'static str,
    deepl_target: &'static str,
}

const fn entry(
    language: Language,
    name: &'static str,
    tag: &'static str,
    microsoft: &'static str,
    deepl_source: &'static str,
    deepl_target: &'static str,
) -> LocaleEntry {
    LocaleEntry {
        language,
        name,
        tag,
        microsoft,
        deepl_source,
        deepl_target,
    }
}

// Reverse lookups return the first matching row, so ambiguous DeepL source
// codes (PT, ZH) resolve to the row listed first.
static LOCALES: &[LocaleEntry] = &[
    entry(Language::English, "English", "en", "en", "EN", "EN-US"),
    entry(Language::German, "German", "de", "de", "DE", "DE"),
    entry(Language::French, "French", "fr", "fr", "FR", "FR"),
    entry(Language::Spanish, "Spanish", "es", "es", "ES", "ES"),
    entry(Language::Italian, "Italian", "it", "it", "IT", "IT"),
    entry(Language::Portuguese, "Portuguese", "pt-PT", "pt-pt", "PT", "PT-PT"),
    entry(Language::BrazilianPortuguese, "Brazilian Portuguese", "pt-BR", "pt", "PT", "PT-BR"),
    entry(Language::Dutch, "Dutch", "nl", "nl", "NL", "NL"),
    entry(Language::Polish, "Polish", "pl", "pl", "PL", "PL"),
    entry(Language::Russian, "Russian", "ru", "ru", "RU", "RU"),
    entry(Language::Ukrainian, "Ukrainian", "uk", "uk", "UK", "UK"),
    entry(Language::Czech, "Czech", "cs", "cs", "CS", "CS"),
    entry(Language::Swedish, "Swedish", "sv", "sv", "SV", "SV"),
    entry(Language::Danish, "Danish", "da", "da", "DA", "DA"),
    entry(Language::Finnish, "Finnish", "fi", "fi", "FI", "FI"),
    entry(Language::NorwegianBokmal, "Norwegian Bokmål", "nb", "nb", "NB", "NB"),
    entry(Language::Turkish, "Turkish", "tr", "tr", "TR", "TR"),
    entry(Language::Greek, "Greek", "el", "el", "EL", "EL"),
    entry(Language::Japanese, "Japanese", "ja", "ja", "JA", "JA"),
    entry(Language::Korean, "Korean", "ko", "ko", "KO", "KO"),
    entry(Language::ChineseSimplified, "Chinese (Simplified)", "zh-Hans", "zh-Hans", "ZH", "ZH-HANS"),
    entry(Language::ChineseTraditional, "Chinese (Traditional)", "zh-Hant", "zh-Hant", "ZH", "ZH-HANT"),
];

impl Language {
    pub fn all() -> impl Iterator<Item = Language> {
        LOCALES.iter().map(|e| e.language)
    }

    fn entry(self) -> &'static LocaleEntry {
        // Rows are listed in variant order
        &LOCALES[self as usize]
    }

    /// English name, as used in prompts.
    pub fn name(self) -> &'static str {
        self.entry().name
    }

    /// Plain BCP-47 tag (e.g. "de", "zh-Hans").
    pub fn code(self) -> &'static str {
        self.entry().tag
    }

    /// Spelling used when this language is the source of a request.
    pub fn locale(self, provider: Provider) -> &'static str {
        let e = self.entry();
        match provider {
            Provider::Microsoft => e.microsoft,
            Provider::DeepL => e.deepl_source,
            Provider::OpenAI => e.tag,
        }
    }

    /// Spelling used when this language is a translation target.
    pub fn target_locale(self, provider: Provider) -> &'static str {
        match provider {
            Provider::DeepL => self.entry().deepl_target,
            _ => self.locale(provider),
        }
    }

    /// Map a provider's locale spelling back to a language.
    ///
    /// Accepts both source and target spellings, ignoring ASCII case.
    pub fn from_locale(provider: Provider, locale: &str) -> Option<Language> {
        let locale = locale.trim();
        LOCALES
            .iter()
            .find(|e| match provider {
                Provider::Microsoft => e.microsoft.eq_ignore_ascii_case(locale),
                Provider::DeepL => {
                    e.deepl_source.eq_ignore_ascii_case(locale)
                        || e.deepl_target.eq_ignore_ascii_case(locale)
                }
                Provider::OpenAI => e.tag.eq_ignore_ascii_case(locale),
            })
            .map(|e| e.language)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Language {
    type Err = LingoError;

    /// Parse a BCP-47 tag ("de", "pt-BR", "zh-Hans"), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().replace('_', "-");
        LOCALES
            .iter()
            .find(|e| e.tag.eq_ignore_ascii_case(&code))
            .map(|e| e.language)
            .ok_or_else(|| LingoError::UnsupportedLanguage(s.to_string()))
    }
}
