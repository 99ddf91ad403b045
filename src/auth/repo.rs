use anyhow::Context;
use sqlx::SqlitePool;
use time::OffsetDateTime;

use crate::auth::repo_types::{PublicUser, User};

pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub phone: Option<&'a str>,
    pub points: i64,
}

impl User {
    /// Find a user by (already normalized) email.
    pub async fn find_by_email(db: &SqlitePool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, phone, role, points, created_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await
        .context("find user by email")?;
        Ok(user)
    }

    /// Insert a citizen account. The raw `sqlx::Error` is kept so callers can spot
    /// unique violations on `email`.
    pub async fn create(
        db: &SqlitePool,
        new: NewUser<'_>,
        now: OffsetDateTime,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, phone, points, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, name, email, password_hash, phone, role, points, created_at
            "#,
        )
        .bind(new.name)
        .bind(new.email)
        .bind(new.password_hash)
        .bind(new.phone)
        .bind(new.points)
        .bind(now)
        .fetch_one(db)
        .await
    }

    /// Adds `amount` points to the user. Fails when no user row matched.
    pub async fn award_points(db: &SqlitePool, user_id: i64, amount: i64) -> anyhow::Result<()> {
        let res = sqlx::query("UPDATE users SET points = points + ? WHERE id = ?")
            .bind(amount)
            .bind(user_id)
            .execute(db)
            .await
            .context("award points")?;
        anyhow::ensure!(res.rows_affected() == 1, "award points: no user with id {user_id}");
        Ok(())
    }
}

impl PublicUser {
    /// Load a user without the credential column.
    pub async fn find_by_id(db: &SqlitePool, id: i64) -> anyhow::Result<Option<PublicUser>> {
        let user = sqlx::query_as::<_, PublicUser>(
            r#"
            SELECT id, name, email, role, points, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
        .context("find user by id")?;
        Ok(user)
    }
}
