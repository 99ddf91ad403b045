use crate::state::AppState;
use axum::Router;

pub mod badge;
mod dto;
pub mod handlers;
pub mod repo;

/// Points granted on sign-up.
pub const REGISTRATION_POINTS: i64 = 10;
/// Points granted for each submitted complaint.
pub const SUBMISSION_POINTS: i64 = 10;
pub const LEADERBOARD_SIZE: i64 = 20;

pub fn router() -> Router<AppState> {
    handlers::profile_routes()
}
