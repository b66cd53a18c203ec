use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use super::jwt::JwtKeys;
use crate::{error::AppError, state::AppState};

/// Authenticated caller, resolved from the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub i64);

/// Returns the token after an exact `"Bearer "` prefix, or an empty candidate.
pub(crate) fn bearer_token(headers: &HeaderMap) -> &str {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or("")
}

fn authenticate(keys: &JwtKeys, headers: &HeaderMap) -> Result<AuthUser, AppError> {
    let token = bearer_token(headers);
    match keys.verify(token) {
        Ok(claims) => Ok(AuthUser(claims.sub)),
        Err(e) => {
            warn!(error = %e, "rejected bearer token");
            Err(AppError::Unauthorized)
        }
    }
}

/// Route layer that rejects the request before any handler or body
/// extraction runs, and stores the caller in the request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let keys = JwtKeys::from_ref(&state);
    let user = authenticate(&keys, req.headers())?;
    tracing::Span::current().record("user_id", user.0);
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(*user);
        }
        authenticate(&JwtKeys::from_ref(state), &parts.headers)
    }
}
