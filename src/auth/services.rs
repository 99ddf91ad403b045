use axum::extract::FromRef;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::{
    auth::{
        dto::{LoginRequest, RegisterRequest},
        jwt::JwtKeys,
        password::{hash_password_async, verify_decoy_async, verify_password_async},
        repo::NewUser,
        repo_types::{PublicUser, User},
    },
    db,
    error::{AppError, AppResult},
    profiles::REGISTRATION_POINTS,
    state::AppState,
};

pub const MIN_PASSWORD_LEN: usize = 8;
const BAD_LOGIN: &str = "Incorrect email or password";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub async fn register(state: &AppState, req: RegisterRequest) -> AppResult<(String, PublicUser)> {
    let name = req.name.trim();
    let email = normalize_email(&req.email);

    if name.is_empty() || email.is_empty() || req.password.is_empty() {
        return Err(AppError::Validation(
            "Please provide name, email, and password".into(),
        ));
    }
    if !is_valid_email(&email) {
        warn!(%email, "invalid email");
        return Err(AppError::Validation("Invalid email".into()));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    if User::find_by_email(&state.db, &email).await?.is_some() {
        warn!(%email, "email already registered");
        return Err(AppError::Conflict("Email already in use".into()));
    }

    let hash = hash_password_async(req.password).await?;
    let phone = req.phone.as_deref().map(str::trim).filter(|p| !p.is_empty());

    let new = NewUser {
        name,
        email: &email,
        password_hash: &hash,
        phone,
        points: REGISTRATION_POINTS,
    };
    let user = match User::create(&state.db, new, db::now_utc()).await {
        Ok(u) => u,
        // Lost a race with a concurrent registration for the same address.
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            return Err(AppError::Conflict("Email already in use".into()));
        }
        Err(e) => return Err(e.into()),
    };

    let token = JwtKeys::from_ref(state).sign(user.id)?;
    info!(user_id = user.id, email = %user.email, "user registered");
    Ok((token, user.into()))
}

/// Unknown email and wrong password produce the same error.
pub async fn login(state: &AppState, req: LoginRequest) -> AppResult<(String, PublicUser)> {
    let email = normalize_email(&req.email);
    if email.is_empty() || req.password.is_empty() {
        return Err(AppError::Validation("Please provide email and password".into()));
    }

    let Some(user) = User::find_by_email(&state.db, &email).await? else {
        warn!(%email, "login unknown email");
        verify_decoy_async(req.password).await?;
        return Err(AppError::Unauthorized(BAD_LOGIN.into()));
    };

    if !verify_password_async(req.password, user.password_hash.clone()).await? {
        warn!(user_id = user.id, "login invalid password");
        return Err(AppError::Unauthorized(BAD_LOGIN.into()));
    }

    let token = JwtKeys::from_ref(state).sign(user.id)?;
    info!(user_id = user.id, "user logged in");
    Ok((token, user.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo_types::Role;
    use crate::error::ErrorKind;

    fn register_req(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            phone: None,
        }
    }

    #[test]
    fn email_pattern() {
        assert!(is_valid_email("ana@city.gov"));
        assert!(!is_valid_email("ana@city"));
        assert!(!is_valid_email("ana city@x.org"));
        assert!(!is_valid_email(""));
    }

    #[tokio::test]
    async fn register_starts_citizen_with_ten_points() {
        let state = AppState::fake().await;
        let (token, user) = register(&state, register_req("Ana", " Ana@City.gov ", "longenough"))
            .await
            .unwrap();
        assert_eq!(user.email, "ana@city.gov");
        assert_eq!(user.points, 10);
        assert_eq!(user.role, Role::Citizen);

        let claims = JwtKeys::from_ref(&state).verify(&token).unwrap();
        assert_eq!(claims.sub, user.id);

        let (stored,): (String,) = sqlx::query_as("SELECT password_hash FROM users WHERE id = ?")
            .bind(user.id)
            .fetch_one(&state.db)
            .await
            .unwrap();
        assert!(!stored.contains("longenough"));
    }

    #[tokio::test]
    async fn register_requires_fields() {
        let state = AppState::fake().await;
        let err = register(&state, register_req("", "a@b.co", "longenough"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = register(&state, register_req("A", "a@b.co", "short"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts_regardless_of_case() {
        let state = AppState::fake().await;
        register(&state, register_req("Ana", "ana@city.gov", "longenough"))
            .await
            .unwrap();

        let err = register(&state, register_req("Ana 2", "ana@city.gov", "longenough"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let err = register(&state, register_req("Ana 3", "ANA@City.GOV", "longenough"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn login_does_not_leak_which_part_was_wrong() {
        let state = AppState::fake().await;
        register(&state, register_req("Ana", "ana@city.gov", "longenough"))
            .await
            .unwrap();

        let wrong_password = login(
            &state,
            LoginRequest {
                email: "ana@city.gov".into(),
                password: "not-the-one".into(),
            },
        )
        .await
        .unwrap_err();
        let unknown_email = login(
            &state,
            LoginRequest {
                email: "nobody@city.gov".into(),
                password: "longenough".into(),
            },
        )
        .await
        .unwrap_err();

        assert_eq!(wrong_password.kind(), ErrorKind::Unauthorized);
        assert_eq!(unknown_email.kind(), ErrorKind::Unauthorized);
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn login_succeeds_with_mixed_case_email() {
        let state = AppState::fake().await;
        let (_, registered) = register(&state, register_req("Ana", "ana@city.gov", "longenough"))
            .await
            .unwrap();
        let (token, user) = login(
            &state,
            LoginRequest {
                email: "Ana@City.gov".into(),
                password: "longenough".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(user.id, registered.id);
        assert!(!token.is_empty());
    }
}
