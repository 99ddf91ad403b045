use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use super::{
    jwt::JwtKeys,
    repo_types::{PublicUser, Role},
};
use crate::{error::AppError, state::AppState};

/// The authenticated caller, freshly loaded from the database.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub PublicUser);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| {
                AppError::Unauthorized(
                    "You are not logged in! Please log in to get access.".into(),
                )
            })?;

        // Expect "Bearer <token>"
        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Unauthorized("Invalid Authorization header".into()))?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "invalid or expired token");
            AppError::Unauthorized("Invalid or expired token. Please log in again.".into())
        })?;

        let user = PublicUser::find_by_id(&state.db, claims.sub)
            .await?
            .ok_or_else(|| {
                warn!(user_id = claims.sub, "token for missing user");
                AppError::Unauthorized(
                    "The user belonging to this token no longer exists.".into(),
                )
            })?;

        Ok(CurrentUser(user))
    }
}

/// A `CurrentUser` holding the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub PublicUser);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if user.role != Role::Admin {
            warn!(user_id = user.id, "admin route denied");
            return Err(AppError::Forbidden(
                "You do not have permission to perform this action".into(),
            ));
        }
        Ok(AdminUser(user))
    }
}
