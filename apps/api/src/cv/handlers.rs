//! CV API handlers: load/save, pagination, preview, export.
//!
//! Pagination is CPU-bound (it measures every candidate layout), so each
//! recompute runs inside `tokio::task::spawn_blocking` to keep the async
//! executor unblocked. No pagination state is cached server-side — every
//! request recomputes from the stored document, which is what makes the
//! result idempotent.

use axum::{
    extract::{Path, Query, State},
    response::Html,
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::store_export;
use crate::layout::{compute_pages_or_fallback, export_page, PageContent, TextMeasurer};
use crate::models::cv::CvDocument;
use crate::render::html::render_page_html;
use crate::state::AppState;
use crate::viewer::PageCursor;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Serialize)]
pub struct PagesResponse {
    pub page_count: usize,
    pub pages: Vec<PageContent>,
}

#[derive(Serialize)]
pub struct SinglePageResponse {
    pub page: usize,
    pub page_count: usize,
    pub shows_navigation: bool,
    pub content: PageContent,
}

#[derive(Serialize)]
pub struct ExportResponse {
    pub s3_key: String,
    pub size_bytes: usize,
}

/// GET /api/v1/cv
pub async fn handle_get_document(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<CvDocument>, AppError> {
    let document = crate::cv::storage::load_document(&state.db, params.user_id)
        .await?
        .unwrap_or_default();
    Ok(Json(document))
}

/// PUT /api/v1/cv
///
/// Echoes the submitted document immediately; the authoritative commit is
/// debounced so a burst of keystroke-driven saves costs one DB write.
pub async fn handle_put_document(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
    Json(document): Json<CvDocument>,
) -> Result<Json<CvDocument>, AppError> {
    validate_entry_ids(&document)?;
    state.autosave.submit(params.user_id, document.clone());
    Ok(Json(document))
}

/// GET /api/v1/cv/pages
pub async fn handle_get_pages(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<PagesResponse>, AppError> {
    let pages = paginate(&state, params.user_id).await?;
    Ok(Json(PagesResponse {
        page_count: pages.len(),
        pages,
    }))
}

/// GET /api/v1/cv/pages/:page
///
/// Out-of-range page numbers clamp instead of erroring, mirroring the
/// viewer's jump behavior.
pub async fn handle_get_page(
    State(state): State<AppState>,
    Path(page): Path<usize>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<SinglePageResponse>, AppError> {
    let pages = paginate(&state, params.user_id).await?;
    let mut cursor = PageCursor::new(pages.len());
    cursor.jump_to(page);
    let content = pages[cursor.current() - 1].clone();
    Ok(Json(SinglePageResponse {
        page: cursor.current(),
        page_count: cursor.page_count(),
        shows_navigation: cursor.shows_navigation(),
        content,
    }))
}

/// GET /api/v1/cv/preview/:page
///
/// Full-fidelity HTML of one page, for the preview pane.
pub async fn handle_get_preview(
    State(state): State<AppState>,
    Path(page): Path<usize>,
    Query(params): Query<UserIdQuery>,
) -> Result<Html<String>, AppError> {
    let pages = paginate(&state, params.user_id).await?;
    let mut cursor = PageCursor::new(pages.len());
    cursor.jump_to(page);
    Ok(Html(render_page_html(&pages[cursor.current() - 1])))
}

/// POST /api/v1/cv/export
///
/// Hands the external renderer a single unpaginated content unit (the whole
/// unfiltered document), stores the returned binary payload, and echoes the
/// storage key.
pub async fn handle_export(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ExportResponse>, AppError> {
    let document = crate::cv::storage::load_document(&state.db, params.user_id)
        .await?
        .unwrap_or_default();

    let unit = export_page(&document);
    let payload = state
        .exporter
        .render_pdf(&unit)
        .await
        .map_err(|e| AppError::Export(format!("Export render call failed: {e}")))?;

    let size_bytes = payload.len();
    let s3_key = store_export(
        &state.s3,
        &state.config.s3_bucket,
        params.user_id,
        payload,
    )
    .await?;

    Ok(Json(ExportResponse { s3_key, size_bytes }))
}

/// Loads the user's document and recomputes its page sequence off the async
/// executor. Measurement failures degrade to a single unpaginated page.
async fn paginate(state: &AppState, user_id: Uuid) -> Result<Vec<PageContent>, AppError> {
    let document = crate::cv::storage::load_document(&state.db, user_id)
        .await?
        .unwrap_or_default();
    let config = state.layout.clone();

    let pages = tokio::task::spawn_blocking(move || {
        let measurer = TextMeasurer::new(config.clone());
        compute_pages_or_fallback(&document, &config, &measurer)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in pagination: {e}")))?;

    Ok(pages)
}

/// Entry ids must be unique within their collection; they are the stable
/// keys continuations and the editor both rely on.
fn validate_entry_ids(document: &CvDocument) -> Result<(), AppError> {
    fn check<'a, I: Iterator<Item = &'a str>>(ids: I, section: &str) -> Result<(), AppError> {
        let mut seen = HashSet::new();
        for id in ids {
            if id.is_empty() {
                return Err(AppError::Validation(format!(
                    "{section} entry has an empty id"
                )));
            }
            if !seen.insert(id) {
                return Err(AppError::Validation(format!(
                    "duplicate {section} entry id: {id}"
                )));
            }
        }
        Ok(())
    }

    check(document.experience.iter().map(|e| e.id.as_str()), "experience")?;
    check(document.education.iter().map(|e| e.id.as_str()), "education")?;
    check(document.projects.iter().map(|p| p.id.as_str()), "project")?;
    check(document.skills.iter().map(|s| s.id.as_str()), "skill")?;
    check(document.references.iter().map(|r| r.id.as_str()), "reference")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cv::{Experience, Skill};

    fn make_document() -> CvDocument {
        CvDocument {
            experience: vec![
                Experience {
                    id: "e1".to_string(),
                    job_title: "Engineer".to_string(),
                    ..Default::default()
                },
                Experience {
                    id: "e2".to_string(),
                    job_title: "Lead".to_string(),
                    ..Default::default()
                },
            ],
            skills: vec![Skill {
                id: "s1".to_string(),
                description: "Rust".to_string(),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_unique_ids_pass_validation() {
        assert!(validate_entry_ids(&make_document()).is_ok());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut document = make_document();
        document.experience[1].id = "e1".to_string();
        let err = validate_entry_ids(&document).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_empty_id_rejected() {
        let mut document = make_document();
        document.skills[0].id = String::new();
        assert!(validate_entry_ids(&document).is_err());
    }

    #[test]
    fn test_same_id_allowed_across_collections() {
        let mut document = make_document();
        document.skills[0].id = "e1".to_string();
        assert!(
            validate_entry_ids(&document).is_ok(),
            "ids are scoped per collection"
        );
    }
}
