//! Gatekeeper - guarded write service
//!
//! Serves the posts API. Every write runs through a lilt rule before it
//! touches the database.

mod config;
mod db;
mod domain;
mod error;
mod middleware;
mod state;

#[cfg(test)]
mod test_utils;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, Method};
use axum::{
    middleware as axum_middleware,
    routing::get,
    Router,
};
use lilt::gate::Gate;
use lilt::registry::default_registry;
use lilt::store::PgPolicyStore;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{create_db_pool, Config};
use crate::db::PgPostStore;
use crate::domain::{health, posts};
use crate::middleware::identity::{identity_middleware, USER_ID_HEADER};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "gatekeeper=debug,lilt=debug,tower_http=debug".into());
    if config.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting Gatekeeper");
    tracing::info!("Environment: {}", config.environment);

    // Compile rules before touching the network
    let gate = Gate::from_config(&config.gate, default_registry())?;
    tracing::info!(
        actions = ?gate.actions(),
        deadline_ms = gate.deadline().as_millis() as u64,
        "Rules compiled"
    );

    // Create database pool
    tracing::info!("Connecting to database...");
    let db_pool = create_db_pool(&config.database_url).await?;
    tracing::info!("Database connected");

    // Create app state
    let state = AppState::new(
        gate,
        Arc::new(PgPolicyStore::new(db_pool.clone())),
        Arc::new(PgPostStore::new(db_pool)),
        config.clone(),
    );

    // Build router
    let app = create_router(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware.
fn create_router(state: AppState) -> Router {
    // Health routes
    let health_routes = Router::new()
        .route("/", get(health::health_check))
        .route("/live", get(health::liveness));

    // Post routes; the create rule reads the caller identity
    let post_routes = Router::new()
        .route("/", get(posts::list_posts).post(posts::create_post))
        .layer(axum_middleware::from_fn(identity_middleware));

    // CORS configuration - permissive for development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::ORIGIN,
            header::HeaderName::from_static(USER_ID_HEADER),
        ]);

    // Layers are applied bottom-up, so CORS must be last to wrap everything
    Router::new()
        .nest("/health", health_routes)
        .nest("/api/posts", post_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
