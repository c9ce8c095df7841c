//! Error taxonomy for the translation proxy.
//!
//! Every failure a request can hit is one of these variants. Each renders as
//! `{ "detail": "..." }` with a 400 or 500 status and affects only the
//! request that produced it.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProxyError {
    /// A required field is absent or empty, or the body is not valid JSON.
    #[error("Missing required fields: text, source_lang, target_lang")]
    InvalidRequest,

    /// The requested direction has no registered model.
    #[error("Language pair {pair} is not supported. Supported pairs: {supported}")]
    UnsupportedPair { pair: String, supported: String },

    /// The provider answered with a non-success status.
    #[error("Translation error: HF API error: {} - {body}", .status.as_u16())]
    ProviderStatus { status: StatusCode, body: String },

    /// The provider could not be reached or the exchange broke off.
    #[error("Translation error: HF API request failed: {0}")]
    ProviderUnreachable(#[from] reqwest::Error),

    /// The provider succeeded but returned no usable translation.
    #[error("Translation error: No translation returned from API")]
    EmptyTranslation,

    /// Anything else, e.g. a handler that panicked.
    #[error("Translation error: {0}")]
    Internal(String),
}

impl ProxyError {
    /// HTTP status reported to the caller.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::InvalidRequest | ProxyError::UnsupportedPair { .. } => {
                StatusCode::BAD_REQUEST
            }
            ProxyError::ProviderStatus { .. }
            | ProxyError::ProviderUnreachable(_)
            | ProxyError::EmptyTranslation
            | ProxyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the failure lies with the outbound call.
    pub fn is_provider_error(&self) -> bool {
        matches!(
            self,
            ProxyError::ProviderStatus { .. } | ProxyError::ProviderUnreachable(_)
        )
    }

    /// Message placed in the response's `detail` field.
    pub fn detail(&self) -> String {
        self.to_string()
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed ({}): {}", status.as_u16(), self);
        } else {
            tracing::warn!("Request rejected ({}): {}", status.as_u16(), self);
        }

        (status, Json(json!({ "detail": self.detail() }))).into_response()
    }
}
