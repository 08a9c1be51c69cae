use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use foodgram_shared::Error;

use crate::{error::ApiError, routes::AppState};

/// Caller identified by `Authorization: Token <jwt>` (or `Bearer <jwt>`).
///
/// Use `Option<AuthUser>` on public endpoints; a malformed or stale token is
/// still rejected there.
pub struct AuthUser(pub foodgram_user::AuthUser);

fn token(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value
        .strip_prefix("Token ")
        .or_else(|| value.strip_prefix("Bearer "))?
        .trim();

    (!token.is_empty()).then(|| token.to_owned())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = token(parts) else {
            return Err(Error::Unauthorized.into());
        };

        Ok(AuthUser(state.user_command.authenticate(&token).await?))
    }
}

impl OptionalFromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        let Some(token) = token(parts) else {
            return Ok(None);
        };

        Ok(Some(AuthUser(
            state.user_command.authenticate(&token).await?,
        )))
    }
}

impl AuthUser {
    pub fn id(&self) -> i64 {
        self.0.id
    }
}
