//! Lingosync - batch translation of UI strings
//!
//! Translates (key, text, comment) sources through Microsoft Translator,
//! DeepL or OpenAI and returns one uniform list of translations, or a single
//! normalized error.

pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod language;
pub mod translate;
pub mod transport;
pub mod workflow;

pub use error::{LingoError, Result, TranslationError};
pub use language::{Language, Provider};
pub use translate::{Translation, TranslationSource, Translator};
