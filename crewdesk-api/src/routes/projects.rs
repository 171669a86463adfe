/// Project endpoints
///
/// # Endpoints
///
/// - `POST   /api/projects` - create (admin only)
/// - `GET    /api/projects` - list, scoped to the caller
/// - `GET    /api/projects/{id}` - detail with tasks and progress
/// - `PUT    /api/projects/{id}` - update (admin or creator)
/// - `DELETE /api/projects/{id}` - delete with cascade (admin or creator)
///
/// Team membership is validated atomically on create and update: one
/// unknown user id rejects the whole write. Newly added members are
/// notified through the fanout planner; deletion purges the project's
/// tasks, their comments, and notifications linking to the project.

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
    models::{Project, ProjectPatch},
    store::TaskFilter,
};

use super::{dispatch_notifications, CreatedResponse, MutationResponse};

/// Create request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub team_members: Vec<Uuid>,
}

/// Update request; absent fields stay unchanged
#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub team_members: Option<Vec<Uuid>>,
}

/// Rejects the write if any id does not resolve to an existing user
async fn ensure_users_exist(state: &AppState, ids: &[Uuid]) -> ApiResult<()> {
    if ids.is_empty() {
        return Ok(());
    }
    let found = state.store.users_by_ids(ids).await?;
    let missing = access::missing_user_ids(ids, &found);
    if !missing.is_empty() {
        let missing: Vec<String> = missing.iter().map(Uuid::to_string).collect();
        return Err(ApiError::Validation(format!(
            "Invalid user IDs: {}",
            missing.join(", ")
        )));
    }
    Ok(())
}

/// Creates a project (admin only) and notifies its initial members
pub async fn create_project(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<Json<CreatedResponse>> {
    if !user.is_admin() {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }
    req.validate()
        .map_err(|e| ApiError::Validation(super::validation_message(&e)))?;

    ensure_users_exist(&state, &req.team_members).await?;

    let project = Project::new(req.title, req.description, user.id, req.team_members);
    state.store.insert_project(&project).await?;

    let batch = fanout::plan(
        &ChangeEvent::TeamChanged {
            project_id: project.id,
            project_title: &project.title,
            old_members: &[],
            new_members: &project.team_members,
        },
        user.id,
    );
    dispatch_notifications(state.store.as_ref(), batch).await;

    Ok(Json(CreatedResponse {
        id: project.id,
        message: "Project created successfully".to_string(),
    }))
}

/// Lists projects the caller may view, enriched
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<views::ProjectView>>> {
    let projects = if user.is_admin() {
        state.store.list_projects().await?
    } else {
        state.store.projects_for_user(user.id).await?
    };

    let mut enriched = Vec::with_capacity(projects.len());
    for project in projects {
        enriched.push(views::project_view(state.store.as_ref(), project).await?);
    }
    Ok(Json(enriched))
}

/// Returns one project with its tasks and progress
pub async fn get_project(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<views::ProjectDetail>> {
    let project = state
        .store
        .project_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    if !access::can_view_project(&user, &project) {
        return Err(ApiError::Forbidden(
            "Access denied to this project".to_string(),
        ));
    }

    Ok(Json(views::project_detail(state.store.as_ref(), project).await?))
}

/// Updates a project and notifies newly added members
pub async fn update_project(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProjectRequest>,
) -> ApiResult<Json<MutationResponse>> {
    let project = state
        .store
        .project_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    if !access::can_manage_project(&user, &project) {
        return Err(ApiError::Forbidden(
            "Only admin or project creator can update projects".to_string(),
        ));
    }

    let mut patch = ProjectPatch::new();
    patch.title = req.title;
    patch.description = req.description;
    if let Some(members) = req.team_members {
        ensure_users_exist(&state, &members).await?;
        patch.team_members = Some(members);
    }

    state.store.update_project(project.id, &patch).await?;

    if let Some(new_members) = &patch.team_members {
        let batch = fanout::plan(
            &ChangeEvent::TeamChanged {
                project_id: project.id,
                project_title: &project.title,
                old_members: &project.team_members,
                new_members,
            },
            user.id,
        );
        dispatch_notifications(state.store.as_ref(), batch).await;
    }

    Ok(Json(MutationResponse::new("Project updated successfully")))
}

/// Deletes a project, cascading to tasks, comments, and notifications
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MutationResponse>> {
    let project = state
        .store
        .project_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    if !access::can_manage_project(&user, &project) {
        return Err(ApiError::Forbidden(
            "Only admin or project creator can delete projects".to_string(),
        ));
    }

    // Cascade order: comments need the task ids, so resolve those first.
    // Each step is an independent write; there is no cross-document
    // transaction backing this.
    let tasks = state
        .store
        .list_tasks(&TaskFilter::for_project(project.id))
        .await?;
    let task_ids: Vec<Uuid> = tasks.iter().map(|t| t.id).collect();

    state.store.delete_comments_for_tasks(&task_ids).await?;
    state.store.delete_tasks_in_project(project.id).await?;
    state
        .store
        .delete_notifications_linking(&fanout::project_link(project.id))
        .await?;
    state.store.delete_project(project.id).await?;

    Ok(Json(MutationResponse::new("Project deleted successfully")))
}
