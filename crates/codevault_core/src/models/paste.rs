//! Paste-related data models and input schemas.

use crate::constants::{DEFAULT_LANGUAGE, DEFAULT_RECENT_LIMIT, DEFAULT_TITLE};
use crate::error::AppError;
use crate::expiry::{compute_expiry, is_expired, ExpiresIn, Expiry};
use crate::text::{non_blank, parse_leading_int};
use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

/// Query value that opts a JSON read out of view counting.
pub const NO_VIEW_ACTION: &str = "no-view";

/// Paste record stored in the database and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paste {
    pub id: String,
    pub title: String,
    pub content: String,
    pub language: String,
    pub is_private: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub expires_at: Expiry,
    pub views: u64,
}

/// Listing row for the public recent feed. Never carries content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasteSummary {
    pub id: String,
    pub title: String,
    pub language: String,
    pub created_at: DateTime<Utc>,
    pub views: u64,
}

/// Privacy flag as a client may send it.
///
/// Only `true`, `false`, `"true"` and `"false"` are meaningful; anything else
/// resolves to private.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PrivacyFlag {
    Bool(bool),
    Text(String),
    Other(IgnoredAny),
}

impl From<bool> for PrivacyFlag {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Resolve an optional privacy flag, defaulting to private.
pub fn resolve_privacy(flag: Option<&PrivacyFlag>) -> bool {
    match flag {
        Some(PrivacyFlag::Bool(value)) => *value,
        Some(PrivacyFlag::Text(text)) if text == "false" => false,
        _ => true,
    }
}

/// Request payload for creating a paste.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePasteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub language: Option<String>,
    pub is_private: Option<PrivacyFlag>,
    pub expires_in: Option<ExpiresIn>,
}

impl CreatePasteRequest {
    /// Minimal request carrying only content.
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }
}

/// Request payload for updating a paste's content.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePasteRequest {
    pub content: Option<String>,
}

/// Query parameters for reading a paste as JSON.
#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    pub action: Option<String>,
}

impl ViewQuery {
    /// Whether this read should increment the view counter.
    pub fn counts_view(&self) -> bool {
        self.action.as_deref() != Some(NO_VIEW_ACTION)
    }
}

/// Query parameters for the recent listing.
///
/// `limit` stays a raw string so non-numeric input falls back to the default
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<String>,
}

impl RecentQuery {
    /// Effective row count for this query.
    pub fn resolved_limit(&self) -> usize {
        normalize_recent_limit(self.limit.as_deref())
    }
}

/// Resolve a raw `limit` value.
///
/// The leading integer is used; missing, non-numeric, zero or negative input
/// falls back to [`DEFAULT_RECENT_LIMIT`]. There is no upper bound; a value
/// wider than `usize` saturates.
pub fn normalize_recent_limit(raw: Option<&str>) -> usize {
    match raw.and_then(parse_leading_int) {
        Some(value) if value > 0 => usize::try_from(value).unwrap_or(usize::MAX),
        _ => DEFAULT_RECENT_LIMIT,
    }
}

/// Reject missing or empty content.
///
/// # Errors
/// Returns [`AppError::Validation`] when `content` is `None` or empty.
pub fn require_content(content: Option<&str>) -> Result<&str, AppError> {
    match content {
        Some(content) if !content.is_empty() => Ok(content),
        _ => Err(AppError::Validation("content must not be empty".to_string())),
    }
}

impl Paste {
    /// Build a new record from a validated create request.
    ///
    /// Applies the title, language and privacy defaults and fixes the expiry
    /// relative to `now`. Title and language are stored exactly as sent; only
    /// a missing, empty or whitespace-only value takes the default.
    pub fn from_request(
        id: String,
        content: &str,
        request: &CreatePasteRequest,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: non_blank(request.title.as_deref())
                .unwrap_or(DEFAULT_TITLE)
                .to_string(),
            content: content.to_string(),
            language: non_blank(request.language.as_deref())
                .unwrap_or(DEFAULT_LANGUAGE)
                .to_string(),
            is_private: resolve_privacy(request.is_private.as_ref()),
            created_at: now,
            updated_at: None,
            expires_at: compute_expiry(request.expires_in.as_ref(), now),
            views: 0,
        }
    }

    /// Whether the paste is past its expiry at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        is_expired(&self.expires_at, now)
    }

    /// Whether the paste belongs in the public recent listing at `now`.
    pub fn is_listed(&self, now: DateTime<Utc>) -> bool {
        !self.is_private && !self.is_expired(now)
    }
}

impl From<&Paste> for PasteSummary {
    fn from(value: &Paste) -> Self {
        Self {
            id: value.id.clone(),
            title: value.title.clone(),
            language: value.language.clone(),
            created_at: value.created_at,
            views: value.views,
        }
    }
}
