use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{
        CategoryList, ComplaintData, ComplaintList, CreateComplaintRequest, CreatedComplaint,
        UpdateStatusRequest, UpdatedComplaint, Upvoted,
    },
    repo,
    repo_types::IssueStats,
    services,
};
use crate::{
    auth::extractors::{AdminUser, CurrentUser},
    db,
    envelope::Envelope,
    error::AppResult,
    state::AppState,
};

pub fn complaint_routes() -> Router<AppState> {
    Router::new()
        .route("/complaints", get(list_all).post(create_complaint))
        .route("/complaints/mine", get(list_mine))
        .route("/complaints/stats", get(stats))
        .route("/complaints/:id/upvote", post(upvote))
        .route("/complaints/:id/status", patch(update_status))
        .route("/categories", get(list_categories))
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn create_complaint(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<CreateComplaintRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Envelope<CreatedComplaint>>)> {
    let Json(payload) = payload?;
    let issue = services::submit(
        &state.db,
        user.id,
        state.config.local_offset,
        payload,
        db::now_utc(),
    )
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::success(ComplaintData { complaint: issue })),
    ))
}

#[instrument(skip_all)]
pub async fn list_all(State(state): State<AppState>) -> AppResult<Json<Envelope<ComplaintList>>> {
    let complaints = repo::list_all(&state.db).await?;
    Ok(Json(Envelope::list(
        complaints.len(),
        ComplaintList { complaints },
    )))
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn list_mine(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Envelope<ComplaintList>>> {
    let complaints = repo::list_by_user(&state.db, user.id).await?;
    Ok(Json(Envelope::list(
        complaints.len(),
        ComplaintList { complaints },
    )))
}

#[instrument(skip_all)]
pub async fn stats(State(state): State<AppState>) -> AppResult<Json<Envelope<IssueStats>>> {
    let stats = repo::stats(&state.db).await?;
    Ok(Json(Envelope::success(stats)))
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn upvote(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<Envelope<Upvoted>>> {
    let Path(id) = id?;
    let upvotes = services::upvote(&state.db, id).await?;
    Ok(Json(Envelope::success(Upvoted { id, upvotes })))
}

#[instrument(skip_all, fields(admin_id = admin.id))]
pub async fn update_status(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> AppResult<Json<Envelope<UpdatedComplaint>>> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let complaint =
        services::change_status(&state.db, id, payload.status, payload.is_escalated).await?;
    Ok(Json(Envelope::success(ComplaintData { complaint })))
}

#[instrument(skip_all)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<Envelope<CategoryList>>> {
    let categories = repo::list_categories(&state.db).await?;
    Ok(Json(Envelope::list(
        categories.len(),
        CategoryList { categories },
    )))
}
