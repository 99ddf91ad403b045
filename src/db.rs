use std::str::FromStr;

use anyhow::Context;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use time::{OffsetDateTime, UtcOffset};
use tracing::info;

/// Opens the SQLite pool. The file is created on first use and foreign keys are enforced.
pub async fn connect(database_url: &str) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("parse database url {database_url}"))?
        .create_if_missing(true)
        .foreign_keys(true);

    // An in-memory database only exists for the connection that created it.
    let in_memory = database_url.contains(":memory:");
    let max_connections = if in_memory { 1 } else { 10 };

    let mut pool = SqlitePoolOptions::new().max_connections(max_connections);
    if in_memory {
        pool = pool.idle_timeout(None).max_lifetime(None);
    }
    let db = pool
        .connect_with(options)
        .await
        .context("connect to database")?;
    info!(%database_url, max_connections, "database connected");
    Ok(db)
}

pub async fn migrate(db: &SqlitePool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(db)
        .await
        .context("run migrations")?;
    Ok(())
}

/// Current time as it is written to the database.
pub fn now_utc() -> OffsetDateTime {
    to_stored(OffsetDateTime::now_utc())
}

/// Timestamps are stored as UTC text at whole-second precision so that SQLite
/// can compare and sort them as plain strings.
pub fn to_stored(t: OffsetDateTime) -> OffsetDateTime {
    let t = t.to_offset(UtcOffset::UTC);
    t.replace_nanosecond(0).unwrap_or(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_database_gets_schema_and_categories() {
        let db = connect("sqlite::memory:").await.expect("connect");
        migrate(&db).await.expect("migrate");

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM categories")
            .fetch_one(&db)
            .await
            .unwrap();
        assert_eq!(count, 8);

        // Running again is a no-op.
        migrate(&db).await.expect("second migrate");
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        let db = connect("sqlite::memory:").await.unwrap();
        migrate(&db).await.unwrap();

        let res = sqlx::query("INSERT INTO issues (user_id, title) VALUES (?, ?)")
            .bind(999_i64)
            .bind("orphan")
            .execute(&db)
            .await;
        assert!(res.is_err());
    }

    #[test]
    fn stored_timestamps_are_utc_seconds() {
        let local = time::macros::datetime!(2024-03-10 23:30:15.75 +02:00);
        let stored = to_stored(local);
        assert_eq!(stored.offset(), UtcOffset::UTC);
        assert_eq!(stored.nanosecond(), 0);
        assert_eq!(stored, time::macros::datetime!(2024-03-10 21:30:15 UTC));
    }
}
