use anyhow::Context;
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Clone, FromRow)]
pub struct LeaderboardRow {
    pub id: i64,
    pub name: String,
    pub points: i64,
    pub reports: i64,
}

pub async fn count_reports(db: &SqlitePool, user_id: i64) -> anyhow::Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM issues WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(db)
        .await
        .context("count reports")?;
    Ok(count)
}

/// Citizens by points, highest first. Ties keep whatever order SQLite yields.
pub async fn top_citizens(db: &SqlitePool, limit: i64) -> anyhow::Result<Vec<LeaderboardRow>> {
    let rows = sqlx::query_as::<_, LeaderboardRow>(
        r#"
        SELECT u.id, u.name, u.points, COUNT(i.id) AS reports
          FROM users u
          LEFT JOIN issues i ON i.user_id = u.id
         WHERE u.role = 'citizen'
         GROUP BY u.id
         ORDER BY u.points DESC
         LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(db)
    .await
    .context("leaderboard")?;
    Ok(rows)
}
