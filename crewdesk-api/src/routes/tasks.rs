/// Task endpoints
///
/// # Endpoints
///
/// - `POST   /api/tasks` - create in a project the caller can view
/// - `GET    /api/tasks?status=&project_id=` - scoped, filtered list
/// - `GET    /api/tasks/{id}` - detail with comments
/// - `PUT    /api/tasks/{id}` - role-gated field rules (below)
/// - `DELETE /api/tasks/{id}` - admin, task creator, or project creator
///
/// # Update rules
///
/// Admins, the task creator, and the project creator may update any
/// field, each validated independently. An assignee outside that set may
/// submit a payload containing `status` and nothing else: any other field
/// rejects the whole request, as does an unknown status value, and no
/// partial write happens. Assignees must always be project members or the
/// project creator; that holds for every actor, admins included.
///
/// Status changes and reassignments feed the fanout planner; both use the
/// pre-update task document for message text and stakeholders.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
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
    models::{Project, Task, TaskPatch, TaskStatus},
    store::{TaskFilter, TaskVisibility},
};

use super::{dispatch_notifications, CreatedResponse, MutationResponse};

/// Create request; tasks always start in `todo`
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,

    #[serde(default)]
    pub description: String,

    pub project_id: Uuid,

    pub assigned_to: Option<Uuid>,

    pub due_date: Option<DateTime<Utc>>,
}

/// Update request; absent fields stay unchanged
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assigned_to: Option<Uuid>,
    pub status: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

impl UpdateTaskRequest {
    /// Whether the payload touches anything an assignee may not change
    fn has_non_status_fields(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || self.assigned_to.is_some()
            || self.due_date.is_some()
    }
}

/// List query filters
#[derive(Debug, Deserialize)]
pub struct TaskListQuery {
    pub status: Option<String>,
    pub project_id: Option<Uuid>,
}

/// Fetches a task and its parent project together
async fn task_with_project(state: &AppState, id: Uuid) -> ApiResult<(Task, Project)> {
    let task = state
        .store
        .task_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;
    let project = state
        .store
        .project_by_id(task.project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;
    Ok((task, project))
}

/// Rejects an assignee that does not exist or is not on the project
async fn ensure_valid_assignee(
    state: &AppState,
    project: &Project,
    assignee: Uuid,
) -> ApiResult<()> {
    if state.store.user_by_id(assignee).await?.is_none() {
        return Err(ApiError::Validation("Assigned user not found".to_string()));
    }
    if !access::is_valid_assignee(project, assignee) {
        return Err(ApiError::Validation(
            "Can only assign tasks to project team members".to_string(),
        ));
    }
    Ok(())
}

/// Creates a task and notifies the assignee, if any
pub async fn create_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<Json<CreatedResponse>> {
    req.validate()
        .map_err(|e| ApiError::Validation(super::validation_message(&e)))?;

    let project = state
        .store
        .project_by_id(req.project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    if !access::can_view_project(&user, &project) {
        return Err(ApiError::Forbidden(
            "Access denied to this project".to_string(),
        ));
    }

    if let Some(assignee) = req.assigned_to {
        ensure_valid_assignee(&state, &project, assignee).await?;
    }

    let task = Task::new(
        project.id,
        req.title,
        req.description,
        req.assigned_to,
        req.due_date,
        user.id,
    );
    state.store.insert_task(&task).await?;

    if let Some(assignee) = task.assigned_to {
        let batch = fanout::plan(
            &ChangeEvent::TaskAssigned {
                project_id: project.id,
                project_title: &project.title,
                task_title: &task.title,
                assignee,
            },
            user.id,
        );
        dispatch_notifications(state.store.as_ref(), batch).await;
    }

    Ok(Json(CreatedResponse {
        id: task.id,
        message: "Task created successfully".to_string(),
    }))
}

/// Lists tasks visible to the caller, with optional filters
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<TaskListQuery>,
) -> ApiResult<Json<Vec<views::TaskView>>> {
    let status = match &query.status {
        Some(s) => Some(
            s.parse::<TaskStatus>()
                .map_err(|e| ApiError::Validation(e.to_string()))?,
        ),
        None => None,
    };

    let visible_to = if user.is_admin() {
        None
    } else {
        let project_ids = state
            .store
            .projects_for_user(user.id)
            .await?
            .into_iter()
            .map(|p| p.id)
            .collect();
        Some(TaskVisibility {
            user_id: user.id,
            project_ids,
        })
    };

    let filter = TaskFilter {
        status,
        project_id: query.project_id,
        assigned_to: None,
        visible_to,
    };

    let tasks = state.store.list_tasks(&filter).await?;
    let mut enriched = Vec::with_capacity(tasks.len());
    for task in tasks {
        enriched.push(views::task_view(state.store.as_ref(), task).await?);
    }
    Ok(Json(enriched))
}

/// Returns one task with comments
pub async fn get_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<views::TaskDetail>> {
    let (task, project) = task_with_project(&state, id).await?;

    if !access::can_view_task(&user, &project, &task) {
        return Err(ApiError::Forbidden(
            "Access denied to this task".to_string(),
        ));
    }

    Ok(Json(views::task_detail(state.store.as_ref(), task).await?))
}

/// Updates a task under the role-gated field rules
pub async fn update_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<MutationResponse>> {
    let (task, project) = task_with_project(&state, id).await?;

    // Reject an unknown status string before touching anything, in both
    // branches below.
    let new_status = match &req.status {
        Some(s) => Some(
            s.parse::<TaskStatus>()
                .map_err(|e| ApiError::Validation(e.to_string()))?,
        ),
        None => None,
    };

    let mut patch = TaskPatch::new();

    if access::can_edit_task(&user, &project, &task) {
        patch.title = req.title;
        patch.description = req.description;
        patch.status = new_status;
        patch.due_date = req.due_date;
        if let Some(assignee) = req.assigned_to {
            ensure_valid_assignee(&state, &project, assignee).await?;
            patch.assigned_to = Some(assignee);
        }
    } else if task.assigned_to == Some(user.id) {
        // Status-only carve-out: the whole payload must be just `status`.
        if req.has_non_status_fields() {
            return Err(ApiError::Forbidden(
                "Assignees can only update task status".to_string(),
            ));
        }
        let Some(status) = new_status else {
            return Err(ApiError::Forbidden(
                "Assignees can only update task status".to_string(),
            ));
        };
        patch.status = Some(status);
    } else {
        return Err(ApiError::Forbidden(
            "Permission denied to update this task".to_string(),
        ));
    }

    state.store.update_task(task.id, &patch).await?;

    let mut batch = Vec::new();
    if let Some(status) = patch.status {
        if status != task.status {
            batch.extend(fanout::plan(
                &ChangeEvent::StatusChanged {
                    project: &project,
                    task: &task,
                    new_status: status,
                },
                user.id,
            ));
        }
    }
    if let Some(assignee) = patch.assigned_to {
        if task.assigned_to != Some(assignee) {
            batch.extend(fanout::plan(
                &ChangeEvent::TaskAssigned {
                    project_id: project.id,
                    project_title: &project.title,
                    task_title: &task.title,
                    assignee,
                },
                user.id,
            ));
        }
    }
    dispatch_notifications(state.store.as_ref(), batch).await;

    Ok(Json(MutationResponse::new("Task updated successfully")))
}

/// Deletes a task and its comments
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MutationResponse>> {
    let (task, project) = task_with_project(&state, id).await?;

    if !access::can_edit_task(&user, &project, &task) {
        return Err(ApiError::Forbidden(
            "Permission denied to delete this task".to_string(),
        ));
    }

    state.store.delete_comments_for_task(task.id).await?;
    state.store.delete_task(task.id).await?;

    Ok(Json(MutationResponse::new("Task deleted successfully")))
}
