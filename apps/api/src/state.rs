use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::autosave::AutosaveQueue;
use crate::config::Config;
use crate::export::ExportClient;
use crate::layout::LayoutConfig;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub s3: S3Client,
    /// Client for the external render service that turns the export unit
    /// into the final fixed-format document.
    pub exporter: ExportClient,
    pub config: Config,
    /// Page geometry and calibrated spacing constants for pagination.
    pub layout: LayoutConfig,
    /// Debounced per-user document commits.
    pub autosave: Arc<AutosaveQueue>,
}
