use axum::http::{HeaderValue, Method};
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod constants;
mod error;
mod models;
mod services;
mod store;

use config::Config;
use constants::API_VERSION;
use services::{GameService, SeededRandom};
use store::{GameStore, MemoryStore, RedisStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "squares_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!("Starting Squares Backend Server");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("API Version: {}", API_VERSION);

    // Initialize game store
    let store: Arc<dyn GameStore> = if config.uses_memory_store() {
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(RedisStore::connect(&config.redis_url).await?)
    };

    let game = GameService::new(
        store,
        Box::new(SeededRandom::new(config.shuffle_seed)),
        config.game_state_key.clone(),
    );
    tracing::info!("Game store backend={} key={}", config.game_store, game.key());

    let app_state = api::AppState {
        game,
        config: config.clone(),
    };

    // Build router
    let app = build_router(app_state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: api::AppState) -> Router {
    // CORS configuration
    let cors = cors_from_config(&state.config);

    Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        // Squares board
        .route(
            "/api/game",
            get(api::game::get_game)
                .post(api::game::post_action)
                .options(api::game::preflight)
                .fallback(api::game::method_not_allowed),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_from_config(config: &Config) -> CorsLayer {
    let raw = config.cors_allowed_origins.trim();
    if raw.is_empty() || raw == "*" {
        return CorsLayer::very_permissive();
    }

    let allowed: Vec<HeaderValue> = raw
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<HeaderValue>().ok())
        .collect();

    if allowed.is_empty() {
        tracing::warn!("No valid CORS origins parsed; falling back to permissive");
        return CorsLayer::very_permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
