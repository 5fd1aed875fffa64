pub mod api;
pub mod transfer;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};

use crate::constants::MAX_UPLOAD_BYTES;
use crate::services::SharedDataset;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub dataset: SharedDataset,
    pub started_at: Instant,
}

/// Start the axum server
pub async fn serve(dataset: SharedDataset, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    tracing::info!("Starting stockboard server");

    let app_state = AppState {
        dataset,
        started_at: Instant::now(),
    };

    // The dashboard frontend may be served from anywhere during development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers(Any);

    tracing::info!("Registering routes:");
    tracing::info!("  GET  /health");
    tracing::info!("  GET  /filters");
    tracing::info!("  GET  /summary?month=10&industry=Technology");
    tracing::info!("  GET  /monthly?month=all&industry=all");
    tracing::info!("  GET  /rankings?k=5&direction=top");
    tracing::info!("  GET  /locations?k=5");
    tracing::info!("  GET  /fluctuations?brand=Apple%20Inc.&start_date=2024-10-01");
    tracing::info!("  GET  /download?month=10");
    tracing::info!("  POST /upload (multipart CSV)");

    let app = Router::new()
        .route("/health", get(api::health_handler))
        .route("/filters", get(api::filters_handler))
        .route("/summary", get(api::summary_handler))
        .route("/monthly", get(api::monthly_handler))
        .route("/rankings", get(api::rankings_handler))
        .route("/locations", get(api::locations_handler))
        .route("/fluctuations", get(api::fluctuations_handler))
        .route("/download", get(transfer::download_handler))
        .route("/upload", post(transfer::upload_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .with_state(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
