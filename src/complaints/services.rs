use sqlx::SqlitePool;
use time::{Duration, OffsetDateTime, Time, UtcOffset};
use tracing::{error, info, warn};

use super::{
    dto::CreateComplaintRequest,
    repo::{self, NewIssue},
    repo_types::{CreatedIssue, IssueListItem, IssueStatus},
    DAILY_COMPLAINT_LIMIT, TITLE_FROM_DESCRIPTION_CHARS, UNTITLED,
};
use crate::{
    auth::repo_types::User,
    db,
    error::{AppError, AppResult},
    profiles::SUBMISSION_POINTS,
};

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Like `non_blank` but hands back the text untouched.
fn present(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

/// Given title, else the start of the description, else a placeholder.
pub fn derive_title(title: Option<&str>, description: Option<&str>) -> String {
    if let Some(t) = non_blank(title) {
        return t.to_string();
    }
    match present(description) {
        Some(d) => d.chars().take(TITLE_FROM_DESCRIPTION_CHARS).collect(),
        None => UNTITLED.to_string(),
    }
}

/// The local calendar day containing `now`, as a half-open UTC range in stored form.
pub fn day_bounds(now: OffsetDateTime, offset: UtcOffset) -> (OffsetDateTime, OffsetDateTime) {
    let start = now.to_offset(offset).replace_time(Time::MIDNIGHT);
    let end = start + Duration::days(1);
    (db::to_stored(start), db::to_stored(end))
}

fn check_coordinates(lat: Option<f64>, lon: Option<f64>) -> AppResult<()> {
    if let Some(lat) = lat {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(AppError::Validation("latitude must be between -90 and 90".into()));
        }
    }
    if let Some(lon) = lon {
        if !(-180.0..=180.0).contains(&lon) {
            return Err(AppError::Validation("longitude must be between -180 and 180".into()));
        }
    }
    Ok(())
}

/// An id must exist; a name that matches nothing simply leaves the issue uncategorized.
async fn resolve_category(
    db: &SqlitePool,
    category_id: Option<i64>,
    category: Option<&str>,
) -> AppResult<Option<i64>> {
    if let Some(id) = category_id {
        if !repo::category_exists(db, id).await? {
            return Err(AppError::Validation(format!("Unknown category_id {id}")));
        }
        return Ok(Some(id));
    }
    match non_blank(category) {
        Some(name) => {
            let id = repo::find_category_id_by_name(db, name).await?;
            if id.is_none() {
                warn!(category = name, "unknown category name; storing without category");
            }
            Ok(id)
        }
        None => Ok(None),
    }
}

/// Validate, enforce the daily quota, store the issue, then award points.
///
/// The insert and the award are separate writes. If the award fails the issue
/// stays stored and the error is returned to the caller.
pub async fn submit(
    db: &SqlitePool,
    user_id: i64,
    offset: UtcOffset,
    req: CreateComplaintRequest,
    now: OffsetDateTime,
) -> AppResult<CreatedIssue> {
    let title = non_blank(req.title.as_deref());
    let description = present(req.description.as_deref());
    if title.is_none() && description.is_none() {
        return Err(AppError::Validation(
            "Please provide a title or description for the complaint".into(),
        ));
    }
    check_coordinates(req.latitude, req.longitude)?;

    let category_id = resolve_category(db, req.category_id, req.category.as_deref()).await?;

    let (start, end) = day_bounds(now, offset);
    let today = repo::count_user_issues_between(db, user_id, start, end).await?;
    if today >= DAILY_COMPLAINT_LIMIT {
        warn!(user_id, today, "daily complaint limit reached");
        return Err(AppError::RateLimited(format!(
            "You have reached the daily limit of {DAILY_COMPLAINT_LIMIT} complaints."
        )));
    }

    let title = derive_title(title, description);
    let new = NewIssue {
        user_id,
        category_id,
        title: &title,
        description: description.unwrap_or(""),
        latitude: req.latitude,
        longitude: req.longitude,
        address: non_blank(req.address.as_deref()).unwrap_or(""),
        photo_url: non_blank(req.photo_url.as_deref()),
    };
    let issue = repo::insert_issue(db, new, db::to_stored(now)).await?;

    if let Err(e) = User::award_points(db, user_id, SUBMISSION_POINTS).await {
        error!(
            error = %format!("{e:#}"),
            user_id,
            issue_id = issue.id,
            "issue stored but points not awarded"
        );
        return Err(e.into());
    }

    info!(user_id, issue_id = issue.id, ?category_id, "complaint submitted");
    Ok(issue)
}

pub async fn upvote(db: &SqlitePool, issue_id: i64) -> AppResult<i64> {
    repo::increment_upvotes(db, issue_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No complaint found with that ID".into()))
}

pub async fn change_status(
    db: &SqlitePool,
    issue_id: i64,
    status: IssueStatus,
    escalated: Option<bool>,
) -> AppResult<IssueListItem> {
    if !repo::update_status(db, issue_id, status, escalated, db::now_utc()).await? {
        return Err(AppError::NotFound("No complaint found with that ID".into()));
    }
    info!(issue_id, ?status, ?escalated, "complaint status changed");
    repo::find_by_id(db, issue_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No complaint found with that ID".into()))
}
