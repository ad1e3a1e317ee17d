//! Database integration tests.

use super::*;
use crate::error::AppError;
use crate::expiry::{ExpiresIn, Expiry};
use crate::models::paste::*;
use crate::test_support::{fixed_now, setup_temp_db};
use chrono::Duration;
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::TempDir;

fn public_request(content: &str) -> CreatePasteRequest {
    CreatePasteRequest {
        is_private: Some(PrivacyFlag::Bool(false)),
        ..CreatePasteRequest::with_content(content)
    }
}

mod persistence;
