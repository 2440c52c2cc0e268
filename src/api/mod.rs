//! HTTP surface.
//!
//! | Method | Path              | Handler                  |
//! |--------|-------------------|--------------------------|
//! | GET    | `/plans`          | [`routes::plans_handler`] |
//! | GET    | `/reviews`        | [`routes::reviews_handler`] |
//! | POST   | `/reviews`        | [`routes::submit_review_handler`] |
//! | GET    | `/reviews/public` | [`routes::public_reviews_handler`] |
//! | GET    | `/health`         | [`routes::health_handler`] |
//!
//! The plan and review routes are mounted a second time under `/api` for the
//! frontend's original paths. Every failure body is `{"message": "..."}`.
use std::time::Duration;

use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::get,
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

pub mod routes;

use crate::adapters;
use crate::config::SiteConfig;
use crate::core::{ConfigProvider, SiteServices};
use crate::utils::error::{Result, SiteError};
use routes::{
    health_handler, plans_handler, public_reviews_handler, reviews_handler, submit_review_handler,
};

fn site_routes() -> Router<SiteServices> {
    Router::new()
        .route("/plans", get(plans_handler))
        .route("/reviews", get(reviews_handler).post(submit_review_handler))
        .route("/reviews/public", get(public_reviews_handler))
}

pub fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    if allowed_origins.is_empty() {
        return Ok(cors.allow_origin(Any));
    }

    let origins = allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin.trim_end_matches('/')).map_err(|e| {
                SiteError::InvalidConfigValueError {
                    field: "server.allowed_origins".to_string(),
                    value: origin.clone(),
                    reason: e.to_string(),
                }
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(cors.allow_origin(AllowOrigin::list(origins)))
}

pub fn router(services: SiteServices, allowed_origins: &[String]) -> Result<Router> {
    Ok(Router::new()
        .merge(site_routes())
        .nest("/api", site_routes())
        .route("/health", get(health_handler))
        .layer(cors_layer(allowed_origins)?)
        .layer(TraceLayer::new_for_http())
        .with_state(services))
}

/// Connects storage, binds the listener and serves until a shutdown signal.
pub async fn start_server(config: SiteConfig) -> Result<()> {
    info!("Connecting storage...");
    let backends = adapters::connect(&config).await?;
    let services = SiteServices::new(backends, &config);

    let app = router(services, config.allowed_origins())?;

    let address = config.bind_address();
    info!("Binding to {address}");
    let listener = TcpListener::bind(address).await?;
    info!("Server running on {address}");

    serve(listener, app).await?;

    info!("Server shut down");
    Ok(())
}

pub async fn serve(listener: TcpListener, app: Router) -> Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
