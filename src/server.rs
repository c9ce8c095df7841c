//! HTTP surface of the relay.
//!
//! Routes:
//! - `GET  /`          liveness / identity
//! - `GET  /languages` supported pairs and language names
//! - `POST /translate` translate one text
//! - `GET  /health`    health check with timestamp
//!
//! Browser requests are accepted from a single configured origin. A request
//! whose `Origin` header names any other origin is answered with 403 before it
//! reaches a handler; requests without an `Origin` header pass through.

use crate::config::Config;
use crate::error::ProxyError;
use crate::translation::{Capabilities, TranslationRequest, TranslationResult, Translator};
use anyhow::{Context, Result};
use axum::{
    extract::{rejection::JsonRejection, Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};
use std::any::Any;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub translator: Arc<Translator>,
    pub allowed_origin: HeaderValue,
}

impl AppState {
    pub fn new(translator: Translator, config: &Config) -> Result<Self> {
        let allowed_origin = HeaderValue::from_str(&config.allowed_origin)
            .with_context(|| format!("ALLOWED_ORIGIN is not a valid origin: '{}'", config.allowed_origin))?;

        Ok(Self {
            translator: Arc::new(translator),
            allowed_origin,
        })
    }
}

/// Build the router with CORS, origin guard, panic recovery and request tracing.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(state.allowed_origin.clone())
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(root))
        .route("/languages", get(languages))
        .route("/translate", post(translate))
        .route("/health", get(health))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
        .layer(middleware::from_fn_with_state(state.clone(), reject_foreign_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn reject_foreign_origin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(origin) = request.headers().get(header::ORIGIN) {
        if origin != &state.allowed_origin {
            warn!("Rejected request from origin {:?}", origin);
            return (
                StatusCode::FORBIDDEN,
                Json(json!({ "detail": "Origin not allowed" })),
            )
                .into_response();
        }
    }

    next.run(request).await
}

/// Turn a handler panic into a `500 { detail }` instead of a dropped connection
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unexpected failure".to_string()
    };

    ProxyError::Internal(message).into_response()
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "Multilingual Translator API is running!",
        "status": "active",
        "backend": "Rust + Axum",
    }))
}

async fn languages(State(state): State<AppState>) -> Json<Capabilities> {
    Json(state.translator.capabilities())
}

async fn translate(
    State(state): State<AppState>,
    payload: Result<Json<TranslationRequest>, JsonRejection>,
) -> Result<Json<TranslationResult>, ProxyError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Unreadable translation request: {}", rejection.body_text());
        ProxyError::InvalidRequest
    })?;

    let result = state.translator.translate(&request).await?;
    Ok(Json(result))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}
