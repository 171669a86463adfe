/// Comment endpoints
///
/// # Endpoints
///
/// - `POST   /api/comments` - comment on a task the caller can view
/// - `GET    /api/comments/{task_id}` - a task's comments, oldest first
/// - `DELETE /api/comments/{id}` - author or admin
///
/// Comments are immutable; there is no update. Posting notifies the
/// task's stakeholders through the fanout planner.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::auth::CurrentUser,
    views,
};
use crewdesk_shared::{
    access,
    fanout::{self, ChangeEvent},
    models::{Comment, Project, Task},
};

use super::{dispatch_notifications, CreatedResponse, MutationResponse};

/// Create request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    pub task_id: Uuid,

    #[validate(length(min = 1, message = "Comment must not be empty"))]
    pub content: String,
}

async fn task_with_project(state: &AppState, task_id: Uuid) -> ApiResult<(Task, Project)> {
    let task = state
        .store
        .task_by_id(task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;
    let project = state
        .store
        .project_by_id(task.project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;
    Ok((task, project))
}

/// Posts a comment and notifies the task's stakeholders
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<CreateCommentRequest>,
) -> ApiResult<Json<CreatedResponse>> {
    req.validate()
        .map_err(|e| ApiError::Validation(super::validation_message(&e)))?;

    let (task, project) = task_with_project(&state, req.task_id).await?;

    if !access::can_view_task(&user, &project, &task) {
        return Err(ApiError::Forbidden(
            "Access denied to comment on this task".to_string(),
        ));
    }

    let comment = Comment::new(task.id, user.id, req.content);
    state.store.insert_comment(&comment).await?;

    let batch = fanout::plan(
        &ChangeEvent::CommentAdded {
            project: &project,
            task: &task,
            author_name: &user.full_name,
        },
        user.id,
    );
    dispatch_notifications(state.store.as_ref(), batch).await;

    Ok(Json(CreatedResponse {
        id: comment.id,
        message: "Comment added successfully".to_string(),
    }))
}

/// Lists a task's comments, oldest first, with author details
pub async fn list_task_comments(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<Vec<views::CommentView>>> {
    let (task, project) = task_with_project(&state, task_id).await?;

    if !access::can_view_task(&user, &project, &task) {
        return Err(ApiError::Forbidden(
            "Access denied to view comments on this task".to_string(),
        ));
    }

    let comments = state.store.comments_for_task(task.id).await?;
    let mut enriched = Vec::with_capacity(comments.len());
    for comment in comments {
        enriched.push(views::comment_view(state.store.as_ref(), comment).await?);
    }
    Ok(Json(enriched))
}

/// Deletes a comment (author or admin)
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MutationResponse>> {
    let comment = state
        .store
        .comment_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Comment not found".to_string()))?;

    if !access::can_delete_comment(&user, &comment) {
        return Err(ApiError::Forbidden(
            "Permission denied to delete this comment".to_string(),
        ));
    }

    state.store.delete_comment(comment.id).await?;

    Ok(Json(MutationResponse::new("Comment deleted successfully")))
}
