use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use bloommap_board::BoardError;
use bloommap_common::AuthContext;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::jwt::{parse_auth_cookie, parse_bearer};
use crate::AppState;

/// The signed-in user, if any. Invalid or expired tokens count as signed out,
/// and so does a failed privilege lookup.
pub struct CurrentUser(pub Option<AuthContext>);

/// A signed-in user. Rejects with 401 when there is none and with the
/// lookup error when the data service fails.
pub struct RequireUser(pub AuthContext);

fn token_from_parts(parts: &Parts) -> Option<String> {
    let bearer = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_bearer);
    if let Some(token) = bearer {
        return Some(token.to_string());
    }
    parts
        .headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_auth_cookie)
        .map(str::to_string)
}

async fn resolve(parts: &Parts, state: &AppState) -> Result<Option<AuthContext>, ApiError> {
    let Some(token) = token_from_parts(parts) else {
        return Ok(None);
    };
    let claims = match state.jwt.verify_token(&token) {
        Ok(claims) => claims,
        Err(e) => {
            debug!(error = %e, "Ignoring invalid access token");
            return Ok(None);
        }
    };
    let session = state
        .board
        .session_for(&claims.sub, claims.display_name())
        .await?;
    Ok(Some(AuthContext {
        session,
        access_token: token,
    }))
}

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match resolve(parts, state).await {
            Ok(user) => Ok(CurrentUser(user)),
            Err(e) => {
                warn!(error = %e, "Profile lookup failed, continuing signed out");
                Ok(CurrentUser(None))
            }
        }
    }
}

impl FromRequestParts<Arc<AppState>> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match resolve(parts, state).await? {
            Some(ctx) => Ok(RequireUser(ctx)),
            None => Err(BoardError::Unauthenticated.into()),
        }
    }
}
