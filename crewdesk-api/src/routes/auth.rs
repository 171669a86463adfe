/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/auth/signup` - create an account, returns a bearer token
/// - `POST /api/auth/login` - exchange credentials for a bearer token
/// - `GET  /api/auth/me` - the authenticated user
///
/// Signup accepts an optional role (default `team_member`). Accounts are
/// immutable once created.

use axum::{extract::State, Extension, Json};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::auth::CurrentUser,
    views::UserPublic,
};
use crewdesk_shared::{
    auth::{
        jwt::{create_token, Claims},
        password,
    },
    models::{Role, User},
};

/// Signup request
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(min = 1, message = "Full name must not be empty"))]
    pub full_name: String,

    /// Optional role; defaults to `team_member`
    #[serde(default)]
    pub role: Option<Role>,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token response shared by signup and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: UserPublic,
}

fn issue_token(state: &AppState, user_id: Uuid) -> ApiResult<String> {
    let claims = Claims::new(user_id, Duration::hours(state.config.jwt.expiration_hours));
    create_token(&claims, state.jwt_secret())
        .map_err(|e| ApiError::Internal(format!("failed to issue token: {e}")))
}

/// Creates a new account
///
/// # Errors
///
/// - `400` validation failure or "Email already registered"
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate()
        .map_err(|e| ApiError::Validation(super::validation_message(&e)))?;

    if state.store.user_by_email(&req.email).await?.is_some() {
        return Err(ApiError::Validation("Email already registered".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;
    let user = User::new(
        req.email,
        password_hash,
        req.full_name,
        req.role.unwrap_or(Role::TeamMember),
    );
    state.store.insert_user(&user).await?;

    let access_token = issue_token(&state, user.id)?;

    Ok(Json(AuthResponse {
        access_token,
        token_type: "bearer".to_string(),
        user: user.into(),
    }))
}

/// Exchanges credentials for a bearer token
///
/// # Errors
///
/// - `401` "Incorrect email or password" for an unknown email or a
///   mismatch; the two cases are indistinguishable on the wire
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let Some(user) = state.store.user_by_email(&req.email).await? else {
        return Err(ApiError::Unauthorized(
            "Incorrect email or password".to_string(),
        ));
    };

    if !password::verify_password(&req.password, &user.password)? {
        return Err(ApiError::Unauthorized(
            "Incorrect email or password".to_string(),
        ));
    }

    let access_token = issue_token(&state, user.id)?;

    Ok(Json(AuthResponse {
        access_token,
        token_type: "bearer".to_string(),
        user: user.into(),
    }))
}

/// Returns the authenticated user's projection
pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<UserPublic> {
    Json(user.into())
}
