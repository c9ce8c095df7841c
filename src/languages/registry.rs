//! Language registry: Single source of truth for supported translation directions.
//!
//! The registry holds two independent, ordered tables:
//!
//! - language pair → model identifier (which directions are supported)
//! - language code → display name (what to show in a language picker)
//!
//! It is built once at startup and shared read-only; there is no global
//! instance and nothing can be added after construction.

use crate::languages::{LanguagePair, ModelId};
use anyhow::{bail, Result};

/// Built-in pair table, in the order it is reported to clients.
const BUILTIN_PAIRS: &[(&str, &str, &str)] = &[
    ("en", "fr", "Helsinki-NLP/opus-mt-en-fr"),
    ("en", "de", "Helsinki-NLP/opus-mt-en-de"),
    ("en", "es", "Helsinki-NLP/opus-mt-en-es"),
    ("en", "hi", "Helsinki-NLP/opus-mt-en-hi"),
    ("en", "zh", "Helsinki-NLP/opus-mt-en-zh"),
    ("fr", "en", "Helsinki-NLP/opus-mt-fr-en"),
    ("de", "en", "Helsinki-NLP/opus-mt-de-en"),
    ("es", "en", "Helsinki-NLP/opus-mt-es-en"),
    ("hi", "en", "Helsinki-NLP/opus-mt-hi-en"),
    ("zh", "en", "Helsinki-NLP/opus-mt-zh-en"),
];

/// Built-in display names.
const BUILTIN_LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("fr", "French"),
    ("de", "German"),
    ("es", "Spanish"),
    ("hi", "Hindi"),
    ("zh", "Chinese"),
];

/// Immutable mapping of supported language pairs and language names.
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    pairs: Vec<(LanguagePair, ModelId)>,
    languages: Vec<(String, String)>,
}

impl LanguageRegistry {
    /// Build a registry from explicit tables.
    ///
    /// Order is preserved as given. A pair may appear only once, since it must
    /// resolve to at most one model; the same goes for a language code.
    pub fn new(
        pairs: Vec<(LanguagePair, ModelId)>,
        languages: Vec<(String, String)>,
    ) -> Result<Self> {
        for (i, (pair, _)) in pairs.iter().enumerate() {
            if pairs[..i].iter().any(|(seen, _)| seen == pair) {
                bail!("Duplicate language pair in registry: {}", pair);
            }
        }
        for (i, (code, _)) in languages.iter().enumerate() {
            if languages[..i].iter().any(|(seen, _)| seen == code) {
                bail!("Duplicate language code in registry: '{}'", code);
            }
        }

        Ok(Self { pairs, languages })
    }

    /// The registry served by the relay: Helsinki-NLP opus-mt models to and
    /// from English.
    pub fn builtin() -> Self {
        Self {
            pairs: BUILTIN_PAIRS
                .iter()
                .map(|(source, target, model)| {
                    (LanguagePair::new(*source, *target), ModelId::new(*model))
                })
                .collect(),
            languages: BUILTIN_LANGUAGES
                .iter()
                .map(|(code, name)| (code.to_string(), name.to_string()))
                .collect(),
        }
    }

    /// Look up the model serving a pair.
    ///
    /// Exact match only: no reverse-direction fallback and no default model.
    ///
    /// # Arguments
    /// * `pair` - The requested direction, with codes exactly as the caller sent them
    ///
    /// # Returns
    /// * `Some(&ModelId)` if the pair is registered
    /// * `None` otherwise
    pub fn resolve(&self, pair: &LanguagePair) -> Option<&ModelId> {
        self.pairs
            .iter()
            .find(|(candidate, _)| candidate == pair)
            .map(|(_, model)| model)
    }

    /// All supported pairs, in table order.
    pub fn supported_pairs(&self) -> impl Iterator<Item = &LanguagePair> {
        self.pairs.iter().map(|(pair, _)| pair)
    }

    /// Get the display name of a language code.
    ///
    /// Independent of pair support: a named code may appear in no pair.
    pub fn language_name(&self, code: &str) -> Option<&str> {
        self.languages
            .iter()
            .find(|(candidate, _)| candidate == code)
            .map(|(_, name)| name.as_str())
    }

    /// All `(code, display name)` entries, in table order.
    pub fn languages(&self) -> impl Iterator<Item = (&str, &str)> {
        self.languages
            .iter()
            .map(|(code, name)| (code.as_str(), name.as_str()))
    }

    /// Codes used by some supported pair that have no display name.
    pub fn unnamed_codes(&self) -> Vec<&str> {
        let mut unnamed: Vec<&str> = Vec::new();
        for pair in self.supported_pairs() {
            for code in [pair.source(), pair.target()] {
                if self.language_name(code).is_none() && !unnamed.contains(&code) {
                    unnamed.push(code);
                }
            }
        }
        unnamed
    }
}
