/// User directory endpoint
///
/// # Endpoints
///
/// - `GET /api/users` - all users, password hashes stripped
///
/// Visible to any authenticated user; the projection feeds member pickers
/// on the frontend.

use axum::{extract::State, Json};

use crate::{app::AppState, error::ApiResult, views::UserPublic};

/// Lists every user as a public projection
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserPublic>>> {
    let users = state.store.list_users().await?;
    Ok(Json(users.into_iter().map(UserPublic::from).collect()))
}
