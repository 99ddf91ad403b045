use anyhow::Context;
use sqlx::SqlitePool;
use time::OffsetDateTime;

use super::repo_types::{Category, CreatedIssue, IssueListItem, IssueStats, IssueStatus};

pub struct NewIssue<'a> {
    pub user_id: i64,
    pub category_id: Option<i64>,
    pub title: &'a str,
    pub description: &'a str,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: &'a str,
    pub photo_url: Option<&'a str>,
}

const LIST_COLUMNS: &str = r#"
    i.id, i.title, i.description, i.status, i.is_escalated, i.priority, i.priority_score,
    i.address, i.photo_url, i.upvotes, i.created_at, i.updated_at,
    c.name AS category
"#;

pub async fn find_category_id_by_name(db: &SqlitePool, name: &str) -> anyhow::Result<Option<i64>> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM categories WHERE name = ?")
        .bind(name)
        .fetch_optional(db)
        .await
        .context("find category by name")?;
    Ok(row.map(|(id,)| id))
}

pub async fn category_exists(db: &SqlitePool, id: i64) -> anyhow::Result<bool> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM categories WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await
        .context("find category by id")?;
    Ok(row.is_some())
}

pub async fn list_categories(db: &SqlitePool) -> anyhow::Result<Vec<Category>> {
    let rows = sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY id")
        .fetch_all(db)
        .await
        .context("list categories")?;
    Ok(rows)
}

/// Issues a user created in `[start, end)`.
pub async fn count_user_issues_between(
    db: &SqlitePool,
    user_id: i64,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> anyhow::Result<i64> {
    let (count,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*)
          FROM issues
         WHERE user_id = ? AND created_at >= ? AND created_at < ?
        "#,
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_one(db)
    .await
    .context("count issues for day")?;
    Ok(count)
}

pub async fn insert_issue(
    db: &SqlitePool,
    new: NewIssue<'_>,
    now: OffsetDateTime,
) -> anyhow::Result<CreatedIssue> {
    let issue = sqlx::query_as::<_, CreatedIssue>(
        r#"
        INSERT INTO issues (user_id, category_id, title, description, latitude, longitude,
                            address, photo_url, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id, title, status, priority, created_at
        "#,
    )
    .bind(new.user_id)
    .bind(new.category_id)
    .bind(new.title)
    .bind(new.description)
    .bind(new.latitude)
    .bind(new.longitude)
    .bind(new.address)
    .bind(new.photo_url)
    .bind(now)
    .bind(now)
    .fetch_one(db)
    .await
    .context("insert issue")?;
    Ok(issue)
}

/// Every issue, newest first, with category and reporter names.
pub async fn list_all(db: &SqlitePool) -> anyhow::Result<Vec<IssueListItem>> {
    let sql = format!(
        r#"
        SELECT {LIST_COLUMNS}, u.name AS reporter_name
          FROM issues i
          LEFT JOIN categories c ON c.id = i.category_id
          LEFT JOIN users u ON u.id = i.user_id
         ORDER BY i.created_at DESC, i.id DESC
        "#
    );
    let rows = sqlx::query_as::<_, IssueListItem>(&sql)
        .fetch_all(db)
        .await
        .context("list all issues")?;
    Ok(rows)
}

pub async fn list_by_user(db: &SqlitePool, user_id: i64) -> anyhow::Result<Vec<IssueListItem>> {
    let sql = format!(
        r#"
        SELECT {LIST_COLUMNS}, NULL AS reporter_name
          FROM issues i
          LEFT JOIN categories c ON c.id = i.category_id
         WHERE i.user_id = ?
         ORDER BY i.created_at DESC, i.id DESC
        "#
    );
    let rows = sqlx::query_as::<_, IssueListItem>(&sql)
        .bind(user_id)
        .fetch_all(db)
        .await
        .context("list issues by user")?;
    Ok(rows)
}

pub async fn find_by_id(db: &SqlitePool, id: i64) -> anyhow::Result<Option<IssueListItem>> {
    let sql = format!(
        r#"
        SELECT {LIST_COLUMNS}, u.name AS reporter_name
          FROM issues i
          LEFT JOIN categories c ON c.id = i.category_id
          LEFT JOIN users u ON u.id = i.user_id
         WHERE i.id = ?
        "#
    );
    let row = sqlx::query_as::<_, IssueListItem>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await
        .context("find issue")?;
    Ok(row)
}

/// Full scan with conditional aggregation; nothing is cached.
pub async fn stats(db: &SqlitePool) -> anyhow::Result<IssueStats> {
    let stats = sqlx::query_as::<_, IssueStats>(
        r#"
        SELECT
            COUNT(*) AS total,
            COALESCE(SUM(CASE WHEN status = 'Submitted'   THEN 1 ELSE 0 END), 0) AS submitted,
            COALESCE(SUM(CASE WHEN status = 'In Progress' THEN 1 ELSE 0 END), 0) AS in_progress,
            COALESCE(SUM(CASE WHEN status = 'Resolved'    THEN 1 ELSE 0 END), 0) AS resolved,
            COALESCE(SUM(CASE WHEN status = 'Closed'      THEN 1 ELSE 0 END), 0) AS closed,
            COALESCE(SUM(CASE WHEN is_escalated = 1       THEN 1 ELSE 0 END), 0) AS escalated
        FROM issues
        "#,
    )
    .fetch_one(db)
    .await
    .context("issue stats")?;
    Ok(stats)
}

/// Returns the new upvote count, or `None` for an unknown issue.
pub async fn increment_upvotes(db: &SqlitePool, id: i64) -> anyhow::Result<Option<i64>> {
    let row: Option<(i64,)> =
        sqlx::query_as("UPDATE issues SET upvotes = upvotes + 1 WHERE id = ? RETURNING upvotes")
            .bind(id)
            .fetch_optional(db)
            .await
            .context("upvote issue")?;
    Ok(row.map(|(n,)| n))
}

/// Returns whether the issue existed.
pub async fn update_status(
    db: &SqlitePool,
    id: i64,
    status: IssueStatus,
    escalated: Option<bool>,
    now: OffsetDateTime,
) -> anyhow::Result<bool> {
    let res = sqlx::query(
        r#"
        UPDATE issues
           SET status = ?, is_escalated = COALESCE(?, is_escalated), updated_at = ?
         WHERE id = ?
        "#,
    )
    .bind(status)
    .bind(escalated)
    .bind(now)
    .bind(id)
    .execute(db)
    .await
    .context("update issue status")?;
    Ok(res.rows_affected() == 1)
}
