use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use goldfish_bot::api::{self, AppState};
use goldfish_bot::auth::SignatureVerifier;
use goldfish_bot::config::Config;
use goldfish_bot::discord::DiscordHttp;
use goldfish_bot::metrics;
use goldfish_bot::pager::SessionRegistry;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load();
    metrics::register_metrics();

    let Some(token) = config.bot_token.clone() else {
        tracing::error!("BOT_TOKEN is not set");
        std::process::exit(1);
    };

    let verifier = match config.public_key.as_deref().map(SignatureVerifier::from_hex) {
        Some(Ok(v)) => Some(Arc::new(v)),
        Some(Err(e)) => {
            tracing::error!("DISCORD_PUBLIC_KEY is invalid: {e}");
            std::process::exit(1);
        }
        None => {
            tracing::warn!("DISCORD_PUBLIC_KEY is not set; /interactions is disabled");
            None
        }
    };
    if config.relay_secret.is_none() {
        tracing::warn!("RELAY_SECRET is not set; /api/paginations is disabled");
    }

    let state = AppState {
        sessions: SessionRegistry::new(),
        channels: Arc::new(DiscordHttp::new(config.api_base.clone(), token)),
        verifier,
        relay_secret: config.relay_secret.clone(),
    };
    let app = api::router(state).layer(TraceLayer::new_for_http());

    let listener = match tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to port {}: {e}", config.port);
            std::process::exit(1);
        }
    };

    tracing::info!("goldfish-bot listening on port {}", config.port);
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}
