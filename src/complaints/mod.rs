mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

/// Submissions allowed per user per local calendar day.
pub const DAILY_COMPLAINT_LIMIT: i64 = 10;
pub const TITLE_FROM_DESCRIPTION_CHARS: usize = 80;
pub const UNTITLED: &str = "Untitled Report";

pub fn router() -> Router<AppState> {
    handlers::complaint_routes()
}
