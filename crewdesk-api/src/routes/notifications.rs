/// Notification endpoints
///
/// # Endpoints
///
/// - `GET /api/notifications?limit=50&unread_only=false` - newest first
/// - `PUT /api/notifications/{id}/read` - mark one read
/// - `PUT /api/notifications/mark-all-read`
/// - `GET /api/notifications/unread-count`
///
/// Strictly recipient-scoped: even admins cannot list or mark another
/// user's notifications.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::auth::CurrentUser,
};
use crewdesk_shared::models::Notification;

use super::MutationResponse;

/// List query parameters
#[derive(Debug, Deserialize)]
pub struct NotificationsQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,

    #[serde(default)]
    pub unread_only: bool,
}

fn default_limit() -> i64 {
    50
}

/// Unread count response
#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    pub unread_count: u64,
}

/// Lists the caller's notifications, newest first
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<NotificationsQuery>,
) -> ApiResult<Json<Vec<Notification>>> {
    let notifications = state
        .store
        .notifications_for_user(user.id, query.unread_only, query.limit)
        .await?;
    Ok(Json(notifications))
}

/// Marks one notification read (recipient only)
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MutationResponse>> {
    let notification = state
        .store
        .notification_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Notification not found".to_string()))?;

    if notification.user_id != user.id {
        return Err(ApiError::Forbidden(
            "Permission denied to modify this notification".to_string(),
        ));
    }

    state.store.mark_notification_read(notification.id).await?;

    Ok(Json(MutationResponse::new("Notification marked as read")))
}

/// Marks all of the caller's notifications read
pub async fn mark_all_read(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<MutationResponse>> {
    state.store.mark_all_notifications_read(user.id).await?;

    Ok(Json(MutationResponse::new(
        "All notifications marked as read",
    )))
}

/// Returns the caller's unread count
pub async fn unread_count(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<UnreadCountResponse>> {
    let unread_count = state.store.count_unread_notifications(user.id).await?;
    Ok(Json(UnreadCountResponse { unread_count }))
}
