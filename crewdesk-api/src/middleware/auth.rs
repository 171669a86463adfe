/// Authentication middleware
///
/// Validates the `Authorization: Bearer <token>` header, resolves the
/// token's subject against the store, and injects the resulting
/// [`CurrentUser`] into request extensions. Handlers extract it with
/// Axum's `Extension` extractor:
///
/// ```ignore
/// async fn handler(Extension(CurrentUser(user)): Extension<CurrentUser>) { ... }
/// ```
///
/// Every failure mode (missing header, malformed header, bad signature,
/// expired token, or a token whose user no longer exists) yields the
/// same 401 payload.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::{app::AppState, error::ApiError};
use crewdesk_shared::{auth::jwt, models::User};

/// The authenticated user, resolved once per request
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Bearer-token authentication layer for the protected subtree
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(ApiError::credentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(ApiError::credentials)?;

    let claims = jwt::validate_token(token, state.jwt_secret())?;

    // A valid token for a vanished user is indistinguishable from a bad
    // token on the wire.
    let user = state
        .store
        .user_by_id(claims.sub)
        .await?
        .ok_or_else(ApiError::credentials)?;

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}
