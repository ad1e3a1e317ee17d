//! Paste HTTP handlers.

use crate::{
    error::{HttpError, PlainHttpError},
    extract::AppJson,
    models::paste::*,
    AppError, AppState, Config,
};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Confirmation text in a create response.
pub const CREATED_MESSAGE: &str = "Paste created successfully";
/// Confirmation text in an update response.
pub const UPDATED_MESSAGE: &str = "Paste saved successfully";

/// Body returned after a successful create.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedPaste {
    pub id: String,
    pub message: String,
    /// Human-facing share link.
    pub link: String,
    /// JSON API location of the new paste.
    pub api: String,
}

/// Body returned after a successful update.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedPaste {
    pub message: String,
    pub updated_at: DateTime<Utc>,
}

/// Recent-listing row with its share link.
#[derive(Debug, Serialize, Deserialize)]
pub struct RecentEntry {
    #[serde(flatten)]
    pub summary: PasteSummary,
    pub link: String,
}

fn view_link(config: &Config, id: &str) -> String {
    format!("{}/view.html?id={}", config.public_url, id)
}

fn api_link(config: &Config, id: &str) -> String {
    format!("{}/api/paste/{}", config.public_url, id)
}

fn check_size(config: &Config, content: &str) -> Result<(), AppError> {
    if content.len() > config.max_paste_size {
        return Err(AppError::Validation(format!(
            "Paste size exceeds maximum of {} bytes",
            config.max_paste_size
        )));
    }
    Ok(())
}

/// Create a new paste.
///
/// # Returns
/// `201 Created` with the new id and its links.
///
/// # Errors
/// Returns 400 for missing, empty or oversized content and 500 when the
/// insert fails.
pub async fn create_paste(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreatePasteRequest>,
) -> Result<impl IntoResponse, HttpError> {
    if let Some(content) = req.content.as_deref() {
        check_size(&state.config, content)?;
    }

    let paste = state.db.pastes.create(&req)?;
    tracing::info!(
        "Created paste {} ({} bytes, language: {})",
        paste.id,
        paste.content.len(),
        paste.language
    );

    let body = CreatedPaste {
        link: view_link(&state.config, &paste.id),
        api: api_link(&state.config, &paste.id),
        id: paste.id,
        message: CREATED_MESSAGE.to_string(),
    };
    Ok((StatusCode::CREATED, Json(body)))
}

/// Replace a paste's content.
///
/// # Returns
/// The new `updatedAt` timestamp.
///
/// # Errors
/// Returns 400 for missing, empty or oversized content, 404 for an unknown id.
pub async fn update_paste(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(req): AppJson<UpdatePasteRequest>,
) -> Result<Json<UpdatedPaste>, HttpError> {
    let content = require_content(req.content.as_deref())?;
    check_size(&state.config, content)?;

    let updated_at = state.db.pastes.update(&id, content)?;
    tracing::info!("Updated paste {}", id);
    Ok(Json(UpdatedPaste {
        message: UPDATED_MESSAGE.to_string(),
        updated_at,
    }))
}

/// Fetch a paste as JSON, counting a view unless `?action=no-view`.
///
/// # Errors
/// Returns 404 for an unknown id and 410 once the paste has expired.
pub async fn get_paste(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Option<Query<ViewQuery>>,
) -> Result<Json<Paste>, HttpError> {
    let query = query.map(|Query(query)| query).unwrap_or_default();
    let paste = state.db.pastes.get(&id, query.counts_view())?;
    tracing::debug!("Read paste {} (views: {})", paste.id, paste.views);
    Ok(Json(paste))
}

/// Serve only the content of a paste as `text/plain`. Never counts a view.
///
/// # Errors
/// Returns 404 or 410 with a plain-text body.
pub async fn get_raw_paste(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, PlainHttpError> {
    let content = state.db.pastes.get_raw(&id)?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        content,
    ))
}

/// List the newest public, unexpired pastes.
///
/// Unusable `limit` values fall back to the default instead of failing.
///
/// # Errors
/// Returns 500 only when storage access fails.
pub async fn list_recent(
    State(state): State<AppState>,
    query: Option<Query<RecentQuery>>,
) -> Result<Json<Vec<RecentEntry>>, HttpError> {
    let query = query.map(|Query(query)| query).unwrap_or_default();
    let limit = query.resolved_limit();
    let entries = state
        .db
        .pastes
        .list_recent(limit)?
        .into_iter()
        .map(|summary| RecentEntry {
            link: view_link(&state.config, &summary.id),
            summary,
        })
        .collect();
    Ok(Json(entries))
}

#[cfg(test)]
mod tests {
    use super::{api_link, check_size, view_link};
    use crate::{AppError, Config};

    fn config() -> Config {
        Config {
            db_path: "/tmp/codevault-test".to_string(),
            port: 3000,
            max_paste_size: 8,
            public_url: "https://paste.example".to_string(),
            cors_origins: Vec::new(),
        }
    }

    #[test]
    fn links_are_built_from_public_url() {
        let config = config();
        assert_eq!(
            view_link(&config, "abc"),
            "https://paste.example/view.html?id=abc"
        );
        assert_eq!(api_link(&config, "abc"), "https://paste.example/api/paste/abc");
    }

    #[test]
    fn size_check_is_inclusive_of_limit() {
        let config = config();
        assert!(check_size(&config, "12345678").is_ok());
        assert!(matches!(
            check_size(&config, "123456789"),
            Err(AppError::Validation(_))
        ));
    }
}
