use crate::config::Config;
use crate::error::ProxyError;
use crate::languages::ModelId;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Inference request body
#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

/// The two response shapes a translation model may return:
/// `[{ "translation_text": ... }]` or `{ "translation_text": ... }`
#[derive(Debug)]
enum InferenceResponse {
    Batch(Vec<Value>),
    Single(Map<String, Value>),
    Unrecognized(Value),
}

impl From<Value> for InferenceResponse {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => InferenceResponse::Batch(items),
            Value::Object(map) => InferenceResponse::Single(map),
            other => InferenceResponse::Unrecognized(other),
        }
    }
}

impl InferenceResponse {
    /// Only the first element of a batch is considered
    fn into_translation(self) -> Option<String> {
        let text = match &self {
            InferenceResponse::Batch(items) => items
                .first()
                .and_then(|first| first.get("translation_text")),
            InferenceResponse::Single(map) => map.get("translation_text"),
            InferenceResponse::Unrecognized(value) => {
                debug!("Provider response is neither an array nor an object: {}", value);
                None
            }
        };

        text.and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }
}

/// Extract the translated text from a successful provider response body.
///
/// Returns `None` when the body matches neither shape, or matches one but
/// carries no non-empty string `translation_text`.
pub fn extract_translation(body: &str) -> Option<String> {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => InferenceResponse::from(value).into_translation(),
        Err(e) => {
            debug!("Provider response is not JSON: {}", e);
            None
        }
    }
}

/// Client for the external inference provider.
///
/// Makes exactly one attempt per call; failures are reported, never retried.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl ProviderClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, api_token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_token,
        }
    }

    /// Build the HTTP client from configuration (timeout, certificate policy).
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut builder = reqwest::Client::builder();

        if let Some(timeout) = config.provider_timeout {
            builder = builder.timeout(timeout);
        }

        if config.provider_accept_invalid_certs {
            warn!(
                "TLS certificate validation is DISABLED for provider calls to {}",
                config.provider_base_url
            );
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .context("Failed to build provider HTTP client")?;

        Ok(Self::new(
            client,
            config.provider_base_url.clone(),
            config.provider_api_token.clone(),
        ))
    }

    /// Endpoint serving a model: the base URL with the model identifier appended
    pub fn model_url(&self, model: &ModelId) -> String {
        format!("{}{}", self.base_url, model)
    }

    /// Translate `text` with `model`.
    ///
    /// Sends one `POST <base><model>` with body `{ "inputs": text }`. There is
    /// no retry: a failed call is reported to the caller as is.
    ///
    /// # Arguments
    /// * `model` - The model resolved for the request's language pair
    /// * `text` - The text to translate, forwarded verbatim
    ///
    /// # Returns
    /// * `Ok(String)` with the non-empty translated text
    /// * `Err(ProxyError::ProviderStatus)` if the provider answered with a non-success status
    /// * `Err(ProxyError::ProviderUnreachable)` if the call failed or timed out
    /// * `Err(ProxyError::EmptyTranslation)` if a success response carried no usable text
    pub async fn translate(&self, model: &ModelId, text: &str) -> Result<String, ProxyError> {
        let url = self.model_url(model);
        debug!("POST {}", url);

        let mut request = self
            .client
            .post(&url)
            .json(&InferenceRequest { inputs: text });

        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            return Err(ProxyError::ProviderStatus { status, body });
        }

        let body = response.text().await?;

        extract_translation(&body).ok_or(ProxyError::EmptyTranslation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{body_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn model() -> ModelId {
        ModelId::new("Helsinki-NLP/opus-mt-en-fr")
    }

    fn client_for(server: &MockServer, token: Option<&str>) -> ProviderClient {
        ProviderClient::new(
            reqwest::Client::new(),
            format!("{}/models/", server.uri()),
            token.map(str::to_string),
        )
    }

    // ==================== extract_translation Tests ====================

    #[test]
    fn test_extract_from_array_shape() {
        let body = r#"[{"translation_text": "Bonjour"}]"#;
        assert_eq!(extract_translation(body).as_deref(), Some("Bonjour"));
    }

    #[test]
    fn test_extract_from_object_shape() {
        let body = r#"{"translation_text": "Hallo"}"#;
        assert_eq!(extract_translation(body).as_deref(), Some("Hallo"));
    }

    #[test]
    fn test_extract_uses_first_array_element() {
        let body = r#"[{"translation_text": "Hola"}, {"translation_text": "Buenas"}]"#;
        assert_eq!(extract_translation(body).as_deref(), Some("Hola"));
    }

    #[test]
    fn test_extract_ignores_extra_fields() {
        let body = r#"[{"translation_text": "Bonjour", "score": 0.98}]"#;
        assert_eq!(extract_translation(body).as_deref(), Some("Bonjour"));
    }

    #[test]
    fn test_extract_empty_object() {
        assert_eq!(extract_translation("{}"), None);
    }

    #[test]
    fn test_extract_empty_array() {
        assert_eq!(extract_translation("[]"), None);
    }

    #[test]
    fn test_extract_first_element_without_text() {
        assert_eq!(extract_translation(r#"[{"generated_text": "Bonjour"}]"#), None);
    }

    #[test]
    fn test_extract_empty_string_is_none() {
        assert_eq!(extract_translation(r#"[{"translation_text": ""}]"#), None);
        assert_eq!(extract_translation(r#"{"translation_text": ""}"#), None);
    }

    #[test]
    fn test_extract_unparseable_body() {
        assert_eq!(extract_translation("not json"), None);
        assert_eq!(extract_translation(r#""Bonjour""#), None);
        assert_eq!(extract_translation("null"), None);
    }

    #[test]
    fn test_extract_array_of_strings_is_none() {
        assert_eq!(extract_translation(r#"["Bonjour"]"#), None);
        assert_eq!(extract_translation(r#"[["Bonjour"]]"#), None);
    }

    #[test]
    fn test_extract_ignores_malformed_later_elements() {
        let body = r#"[{"translation_text": "Hola"}, {"translation_text": 5}, "junk"]"#;
        assert_eq!(extract_translation(body).as_deref(), Some("Hola"));
    }

    #[test]
    fn test_extract_array_shape_does_not_fall_back_to_object_field() {
        assert_eq!(extract_translation(r#"[5, {"translation_text": "Hola"}]"#), None);
    }

    #[test]
    fn test_extract_wrong_field_type() {
        assert_eq!(extract_translation(r#"{"translation_text": 42}"#), None);
    }

    // ==================== Request Body Tests ====================

    #[test]
    fn test_inference_request_serialization() {
        let json = serde_json::to_value(InferenceRequest { inputs: "Hello" }).expect("serialize");
        assert_eq!(json, serde_json::json!({ "inputs": "Hello" }));
    }

    #[test]
    fn test_model_url_concatenates_identifier() {
        let client = ProviderClient::new(
            reqwest::Client::new(),
            "https://api-inference.huggingface.co/models/",
            None,
        );
        assert_eq!(
            client.model_url(&model()),
            "https://api-inference.huggingface.co/models/Helsinki-NLP/opus-mt-en-fr"
        );
    }

    // ==================== translate Tests ====================

    #[tokio::test]
    async fn test_translate_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/Helsinki-NLP/opus-mt-en-fr"))
            .and(header("Content-Type", "application/json"))
            .and(body_json(serde_json::json!({ "inputs": "Hello" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([{ "translation_text": "Bonjour" }])),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let result = client_for(&mock_server, None)
            .translate(&model(), "Hello")
            .await
            .expect("Should succeed");

        assert_eq!(result, "Bonjour");
    }

    #[tokio::test]
    async fn test_translate_sends_bearer_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(header("Authorization", "Bearer hf_test"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "translation_text": "Bonjour" })),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let result = client_for(&mock_server, Some("hf_test"))
            .translate(&model(), "Hello")
            .await;

        assert_eq!(result.expect("Should succeed"), "Bonjour");
    }

    #[tokio::test]
    async fn test_translate_non_success_status_not_retried() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(503).set_body_string(r#"{"error":"Model is loading"}"#),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server, None)
            .translate(&model(), "Hello")
            .await
            .unwrap_err();

        match &err {
            ProxyError::ProviderStatus { status, body } => {
                assert_eq!(status.as_u16(), 503);
                assert_eq!(body, r#"{"error":"Model is loading"}"#);
            }
            other => panic!("Expected ProviderStatus, got {:?}", other),
        }
        assert!(err.detail().contains("503"));
    }

    #[tokio::test]
    async fn test_translate_success_without_text() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server, None)
            .translate(&model(), "Hello")
            .await
            .unwrap_err();

        assert!(matches!(err, ProxyError::EmptyTranslation));
    }

    #[tokio::test]
    async fn test_translate_unreachable_provider() {
        // Nothing listens on the discard port
        let client = ProviderClient::new(reqwest::Client::new(), "http://127.0.0.1:9/models/", None);

        let err = client.translate(&model(), "Hello").await.unwrap_err();

        assert!(matches!(err, ProxyError::ProviderUnreachable(_)));
        assert!(err.is_provider_error());
    }

    #[tokio::test]
    async fn test_translate_times_out() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "translation_text": "Bonjour" }))
                    .set_delay(std::time::Duration::from_secs(2)),
            )
            .mount(&mock_server)
            .await;

        let config = Config {
            provider_base_url: format!("{}/models/", mock_server.uri()),
            provider_timeout: Some(std::time::Duration::from_millis(200)),
            ..Config::default()
        };
        let client = ProviderClient::from_config(&config).expect("client");

        let err = client.translate(&model(), "Hello").await.unwrap_err();
        assert!(matches!(err, ProxyError::ProviderUnreachable(_)));
    }
}
