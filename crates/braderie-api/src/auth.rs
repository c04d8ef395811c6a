//! Bearer-token authentication.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::debug;

use braderie_models::User;

use crate::error::ApiError;
use crate::state::AppState;

/// Error body for a request carrying no `Authorization` header at all.
pub const NO_TOKEN: &str = "Token non envoyé !";
/// Error body for a token that matches no stored user.
pub const INVALID_TOKEN: &str = "Token présent mais non valide !";

/// Authenticated user extracted from the request.
///
/// Extraction performs exactly one store lookup: the user whose stored token
/// equals the bearer token, compared byte for byte.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // A header that is present but not valid UTF-8 is a bad token, not a
        // missing one.
        let header = match parts.headers.get(AUTHORIZATION) {
            None => return Err(ApiError::unauthorized(NO_TOKEN)),
            Some(value) => value
                .to_str()
                .map_err(|_| ApiError::unauthorized(INVALID_TOKEN))?,
        };

        let token = header.strip_prefix("Bearer ").unwrap_or(header);

        let user = state
            .users
            .find_by_token(token)
            .await?
            .ok_or_else(|| ApiError::unauthorized(INVALID_TOKEN))?;

        debug!(user_id = %user.id, "Authenticated request");
        Ok(AuthUser { user })
    }
}
