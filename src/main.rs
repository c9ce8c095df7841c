use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};
use translation_relay::{
    config::Config,
    languages::LanguageRegistry,
    provider::ProviderClient,
    server::{create_router, AppState},
    translation::Translator,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when not present)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("translation_relay=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;

    let registry = Arc::new(LanguageRegistry::builtin());
    let unnamed = registry.unnamed_codes();
    if !unnamed.is_empty() {
        warn!("Language codes without a display name: {}", unnamed.join(", "));
    }

    let provider = ProviderClient::from_config(&config)?;
    let translator = Translator::new(registry, provider);
    let state = AppState::new(translator, &config)?;
    let app = create_router(state);

    let addr = config.bind_address();
    info!("Server is running on http://{}", addr);
    info!("CORS enabled for {}", config.allowed_origin);
    info!("Provider base URL: {}", config.provider_base_url);
    match config.provider_timeout {
        Some(timeout) => info!("Provider timeout: {}s", timeout.as_secs()),
        None => warn!("Provider timeout disabled"),
    }

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
