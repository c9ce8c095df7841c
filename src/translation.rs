use crate::error::ProxyError;
use crate::languages::{LanguagePair, LanguageRegistry};
use crate::provider::ProviderClient;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{info, warn};

/// Incoming translation request.
///
/// Fields are optional at the wire level so that an absent field is reported
/// as `InvalidRequest` like an empty one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranslationRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub source_lang: Option<String>,
    #[serde(default)]
    pub target_lang: Option<String>,
}

impl TranslationRequest {
    pub fn new(text: &str, source_lang: &str, target_lang: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            source_lang: Some(source_lang.to_string()),
            target_lang: Some(target_lang.to_string()),
        }
    }
}

/// Successful translation. Language codes echo the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationResult {
    pub translated_text: String,
    pub source_lang: String,
    pub target_lang: String,
}

/// What the relay can translate, as reported by `GET /languages`
#[derive(Debug, Clone, Serialize)]
pub struct Capabilities {
    pub supported_pairs: Vec<String>,
    pub languages: Map<String, Value>,
}

/// The translation proxy: validates requests against the registry and
/// forwards them to the provider.
#[derive(Debug, Clone)]
pub struct Translator {
    registry: Arc<LanguageRegistry>,
    provider: ProviderClient,
}

impl Translator {
    pub fn new(registry: Arc<LanguageRegistry>, provider: ProviderClient) -> Self {
        Self { registry, provider }
    }

    /// Supported pairs and language names, in registry order.
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            supported_pairs: supported_pairs(&self.registry),
            languages: self
                .registry
                .languages()
                .map(|(code, name)| (code.to_string(), Value::String(name.to_string())))
                .collect(),
        }
    }

    /// Translate one request.
    ///
    /// Checks run in order: required fields, pair support, provider call,
    /// response extraction. The provider is called at most once.
    ///
    /// # Arguments
    /// * `request` - The caller's text and language codes
    ///
    /// # Returns
    /// * `Ok(TranslationResult)` echoing the request's language codes
    /// * `Err(ProxyError::InvalidRequest)` if a field is absent or blank
    /// * `Err(ProxyError::UnsupportedPair)` if no model serves the direction
    /// * `Err` with a provider kind or `EmptyTranslation` if the outbound call fails
    pub async fn translate(
        &self,
        request: &TranslationRequest,
    ) -> Result<TranslationResult, ProxyError> {
        let (text, source_lang, target_lang) = required_fields(request)?;

        let pair = LanguagePair::new(source_lang, target_lang);
        let model = self
            .registry
            .resolve(&pair)
            .ok_or_else(|| ProxyError::UnsupportedPair {
                pair: pair.to_string(),
                supported: supported_pairs(&self.registry).join(", "),
            })?;

        info!(
            "Translating from {} to {} using {}",
            source_lang, target_lang, model
        );

        let translated_text = self
            .provider
            .translate(model, text)
            .await
            .inspect_err(|e| {
                if e.is_provider_error() {
                    warn!("Provider call to {} failed for {}", model, pair);
                }
            })?;

        Ok(TranslationResult {
            translated_text,
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
        })
    }
}

fn supported_pairs(registry: &LanguageRegistry) -> Vec<String> {
    registry.supported_pairs().map(|p| p.to_string()).collect()
}

/// Text counts as missing when blank; language codes when empty.
fn required_fields(request: &TranslationRequest) -> Result<(&str, &str, &str), ProxyError> {
    let text = request
        .text
        .as_deref()
        .filter(|t| !t.trim().is_empty());
    let source_lang = request.source_lang.as_deref().filter(|c| !c.is_empty());
    let target_lang = request.target_lang.as_deref().filter(|c| !c.is_empty());

    match (text, source_lang, target_lang) {
        (Some(text), Some(source), Some(target)) => Ok((text, source, target)),
        _ => Err(ProxyError::InvalidRequest),
    }
}
