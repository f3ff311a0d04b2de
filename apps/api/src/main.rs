mod autosave;
mod config;
mod cv;
mod db;
mod errors;
mod export;
mod layout;
mod models;
mod render;
mod routes;
mod state;
mod viewer;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::autosave::{AutosaveQueue, COMMIT_QUIET_PERIOD};
use crate::config::Config;
use crate::db::create_pool;
use crate::export::ExportClient;
use crate::layout::LayoutConfig;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Folio API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized");

    // Initialize export client
    let exporter = ExportClient::new(config.export_service_url.clone());
    info!("Export client initialized ({})", config.export_service_url);

    // Debounced autosave queue
    let autosave = Arc::new(AutosaveQueue::new(db.clone(), COMMIT_QUIET_PERIOD));

    // Layout geometry: A4 at 96 dpi with the reference stylesheet constants
    let layout = LayoutConfig::default();
    info!(
        "Layout config: {}x{}px content, {}px body line",
        layout.content_width_px, layout.page_budget_px, layout.line_height_px
    );

    // Build app state
    let state = AppState {
        db,
        s3,
        exporter,
        config: config.clone(),
        layout,
        autosave,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "folio-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
