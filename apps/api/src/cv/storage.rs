//! CV document persistence.
//!
//! Schema (`cv_documents`): one JSONB row per saved version.
//!
//! ```text
//! cv_documents (
//!     id         UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     user_id    UUID NOT NULL,
//!     version    INTEGER NOT NULL,
//!     data       JSONB NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
//!     UNIQUE (user_id, version)
//! )
//! ```
//!
//! Saves are append-only: every commit INSERTs the next version, never
//! UPDATEs an existing row. Loads return the latest version.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::cv::CvDocument;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CvDocumentRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub version: i32,
    pub data: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Loads the latest saved document for a user, or `None` when nothing has
/// been saved yet.
pub async fn load_document(pool: &PgPool, user_id: Uuid) -> Result<Option<CvDocument>> {
    let row: Option<CvDocumentRow> = sqlx::query_as(
        "SELECT * FROM cv_documents WHERE user_id = $1 ORDER BY version DESC LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let document = serde_json::from_value(row.data)
                .context("stored cv document does not match the current schema")?;
            Ok(Some(document))
        }
        None => Ok(None),
    }
}

/// Commits a new document version as an append-only INSERT and returns the
/// version number written.
pub async fn save_document(pool: &PgPool, user_id: Uuid, document: &CvDocument) -> Result<i32> {
    let current_max: Option<i32> =
        sqlx::query_scalar("SELECT MAX(version) FROM cv_documents WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;
    let new_version = current_max.unwrap_or(0) + 1;

    sqlx::query(
        r#"
        INSERT INTO cv_documents (user_id, version, data)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(user_id)
    .bind(new_version)
    .bind(serde_json::to_value(document).context("serializing cv document")?)
    .execute(pool)
    .await?;

    Ok(new_version)
}
