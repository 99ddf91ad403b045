use axum::{extract::State, routing::get, Json, Router};
use tracing::{instrument, warn};

use super::{
    badge::Badge,
    dto::{LeaderboardEntry, Profile, ProfileData},
    repo, LEADERBOARD_SIZE,
};
use crate::{
    auth::{extractors::CurrentUser, repo_types::PublicUser},
    envelope::Envelope,
    error::{AppError, AppResult},
    state::AppState,
};

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/users/profile", get(get_profile))
        .route("/users/leaderboard", get(get_leaderboard))
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn get_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Envelope<ProfileData>>> {
    let Some(user) = PublicUser::find_by_id(&state.db, user.id).await? else {
        warn!("profile requested for missing user");
        return Err(AppError::NotFound("User not found".into()));
    };
    let total_reports = repo::count_reports(&state.db, user.id).await?;
    let badge = Badge::for_points(user.points);

    Ok(Json(Envelope::success(ProfileData {
        user: Profile {
            user,
            total_reports,
            badge,
        },
    })))
}

#[instrument(skip(state))]
pub async fn get_leaderboard(
    State(state): State<AppState>,
) -> AppResult<Json<Envelope<Vec<LeaderboardEntry>>>> {
    let rows = repo::top_citizens(&state.db, LEADERBOARD_SIZE).await?;
    let entries = rows.into_iter().map(LeaderboardEntry::from).collect();
    Ok(Json(Envelope::success(entries)))
}
