//! Language pair and model identifier value types.
//!
//! A `LanguagePair` is an ordered `(source, target)` combination of language
//! codes. It is never normalized: `"EN"` and `"en"` are different codes, and
//! `en-fr` is a different direction from `fr-en`.

use std::fmt;

/// An ordered translation direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguagePair {
    /// Language code of the input text (e.g., "en")
    source: String,

    /// Language code of the requested output (e.g., "fr")
    target: String,
}

impl LanguagePair {
    /// Create a pair from its two language codes, exactly as given.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Get the source language code.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Get the target language code.
    pub fn target(&self) -> &str {
        &self.target
    }
}

impl fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.source, self.target)
    }
}

/// Opaque name of the external model serving one language pair
/// (e.g., "Helsinki-NLP/opus-mt-en-fr").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelId(String);

impl ModelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
