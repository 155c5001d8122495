//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request errors are rendered by the
//! domain crates.

mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use auth::{
    AuthConfig, GateSet, InMemoryDirectory, PgDirectory, TokenCodec, auth_router,
    auth_router_generic,
};
use axum::{
    Router, http,
    http::{Method, header},
};
use cart::{CartStore, InMemoryCatalog, PgDeviceCatalog, cart_router, cart_router_generic};
use platform::rate_limit::TokenBucket;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,cart=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    // Shared across every route: one codec, one rate limiter, one cart store
    let auth_config = Arc::new(config.auth.clone());
    let codec = Arc::new(TokenCodec::from_config(&auth_config)?);
    let bucket = Arc::new(TokenBucket::new(config.rate_limit.clone()));
    let gates = GateSet::new(bucket, codec.clone(), &auth_config);
    let store = Arc::new(CartStore::new());

    tracing::info!(
        burst = config.rate_limit.burst,
        per_second = config.rate_limit.per_second,
        token_ttl_secs = auth_config.token_ttl.as_secs(),
        "Gates configured"
    );

    let api = match &config.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await?;

            tracing::info!("Connected to database");

            auth_router(PgDirectory::new(pool.clone()), codec, auth_config, &gates).merge(
                cart_router(PgDeviceCatalog::new(pool), store, &gates),
            )
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using empty in-memory directories");
            in_memory_routes(codec, auth_config, &gates, store)
        }
    };

    let cors = cors_layer(&config.frontend_origins);

    // Build router
    let app = Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = config.bind_addr;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn in_memory_routes(
    codec: Arc<TokenCodec>,
    auth_config: Arc<AuthConfig>,
    gates: &GateSet,
    store: Arc<CartStore>,
) -> Router {
    let directory = Arc::new(InMemoryDirectory::new());
    auth_router_generic(directory.clone(), directory, codec, auth_config, gates).merge(
        cart_router_generic(Arc::new(InMemoryCatalog::sample()), store, gates.authenticated()),
    )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed_origins: Vec<http::HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([header::CONTENT_TYPE, header::ACCEPT]))
        .allow_credentials(true)
}
