//! Tokenshop backend server
//!
//! HTTP API for the customer storefront plus the capability-gated admin
//! surface, with a WebSocket change feed for order activity.

use axum::http::{HeaderValue, Method};
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};

use tokenshop_server::config::Config;
use tokenshop_server::middleware::{
    hsts_header, rate_limit_layer, request_tracing, security_headers, RateLimiter,
};
use tokenshop_server::state::AppState;
use tokenshop_server::{db, handlers, routes, websocket};

#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .init();

    tracing::info!(environment = config.environment.as_str(), "Starting up");

    let db_pool = match db::create_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database connection failed: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = db::run_migrations(&db_pool).await {
        tracing::error!("Migration failed: {}", e);
        std::process::exit(1);
    }

    let rate_limiter = RateLimiter::new(config.rate_limit_rps);

    // Periodically drop idle rate-limit buckets so the per-client map
    // stays bounded over long uptimes.
    let sweeper = rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(300));
        loop {
            interval.tick().await;
            sweeper.sweep(Duration::from_secs(600)).await;
            let clients = sweeper.tracked_clients().await;
            tracing::debug!(clients, "Rate limiter buckets swept");
        }
    });

    let cors = configure_cors(&config);
    let is_production = config.environment.is_production();

    let port = config.port;
    let app_state = AppState::new(config, db_pool);

    // Customer routes sit behind the rate limiter; admin routes are
    // gated by staff sessions instead.
    let storefront = routes::storefront_routes().layer(axum::middleware::from_fn(
        move |req, next| {
            let limiter = rate_limiter.clone();
            rate_limit_layer(limiter)(req, next)
        },
    ));

    let admin = Router::new()
        .merge(routes::token_routes())
        .merge(routes::catalog_routes())
        .merge(routes::order_routes())
        .merge(routes::refund_routes())
        .merge(routes::permission_routes())
        .merge(routes::coupon_routes());

    let mut app = Router::new()
        .route("/health", get(handlers::health))
        .route("/ws", get(websocket::ws_handler))
        .merge(storefront)
        .merge(admin)
        .with_state(app_state)
        .layer(axum::middleware::from_fn(security_headers))
        .layer(axum::middleware::from_fn(request_tracing))
        .layer(cors);

    if is_production {
        app = app.layer(axum::middleware::from_fn(hsts_header));
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Change feed available at ws://{}/ws", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server shutdown complete");
}

fn configure_cors(config: &Config) -> CorsLayer {
    let Some(allowed) = config
        .cors_allowed_origins
        .as_deref()
        .filter(|s| !s.is_empty())
    else {
        tracing::warn!("CORS_ALLOWED_ORIGINS not set, allowing all origins (permissive)");
        return CorsLayer::permissive();
    };

    let origins: Vec<HeaderValue> = allowed
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_err() {
            tracing::error!("Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => tracing::error!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
