/// Read-time enrichment views
///
/// Entities go out enriched with denormalized detail subsets joined at
/// read time; there is no denormalized storage. The only user projection
/// ever joined is [`UserSummary`] (id, name, email); full user responses
/// use [`UserPublic`], which never carries the password hash.
///
/// Enrichment issues one store query per joined detail. That is N+1 by
/// construction and accepted at this system's scale.

use serde::Serialize;
use uuid::Uuid;

use crewdesk_shared::{
    models::{Comment, Project, Task, TaskStatus, User},
    store::{StatusCounts, Store, StoreError, TaskFilter},
};

/// Minimal user projection joined onto other entities
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Full user projection for user-facing responses
///
/// This is the only way a user leaves the API; the password hash has no
/// serializable path out.
#[derive(Debug, Clone, Serialize)]
pub struct UserPublic {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: crewdesk_shared::models::Role,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserPublic {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Task counts attached to a project list item
#[derive(Debug, Clone, Serialize)]
pub struct TaskStats {
    pub total: u64,
    pub todo: u64,
    pub in_progress: u64,
    pub done: u64,
}

impl From<StatusCounts> for TaskStats {
    fn from(counts: StatusCounts) -> Self {
        Self {
            total: counts.total(),
            todo: counts.todo,
            in_progress: counts.in_progress,
            done: counts.done,
        }
    }
}

/// Minimal project projection joined onto tasks
#[derive(Debug, Clone, Serialize)]
pub struct ProjectRef {
    pub id: Uuid,
    pub title: String,
}

/// Project list item: project + member/creator details + task stats
#[derive(Debug, Serialize)]
pub struct ProjectView {
    #[serde(flatten)]
    pub project: Project,
    pub team_member_details: Vec<UserSummary>,
    pub creator_details: Option<UserSummary>,
    pub task_stats: TaskStats,
}

/// Project detail: member/creator details + enriched tasks + progress
#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub team_member_details: Vec<UserSummary>,
    pub creator_details: Option<UserSummary>,
    pub tasks: Vec<TaskView>,
    pub progress: f64,
}

/// Task with project/assignee/creator details
#[derive(Debug, Serialize)]
pub struct TaskView {
    #[serde(flatten)]
    pub task: Task,
    pub project_details: Option<ProjectRef>,
    pub assignee_details: Option<UserSummary>,
    pub creator_details: Option<UserSummary>,
}

/// Task detail: the enriched task plus its comments
#[derive(Debug, Serialize)]
pub struct TaskDetail {
    #[serde(flatten)]
    pub view: TaskView,
    pub comments: Vec<CommentView>,
}

/// Comment with author details
#[derive(Debug, Serialize)]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: Comment,
    pub author_details: Option<UserSummary>,
}

/// Completion percentage, one decimal place; 0 when there are no tasks
pub fn progress(total: usize, done: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (done as f64 / total as f64 * 1000.0).round() / 10.0
}

/// Joins the summary for one user id, absent if the id dangles
pub async fn user_summary(store: &dyn Store, id: Uuid) -> Result<Option<UserSummary>, StoreError> {
    Ok(store.user_by_id(id).await?.map(|u| UserSummary::from(&u)))
}

/// Builds a project list item
pub async fn project_view(store: &dyn Store, project: Project) -> Result<ProjectView, StoreError> {
    let team = store.users_by_ids(&project.team_members).await?;
    let creator_details = user_summary(store, project.created_by).await?;
    let counts = store
        .task_status_counts(&TaskFilter::for_project(project.id))
        .await?;

    Ok(ProjectView {
        team_member_details: team.iter().map(UserSummary::from).collect(),
        creator_details,
        task_stats: counts.into(),
        project,
    })
}

/// Builds a project detail with embedded tasks and progress
pub async fn project_detail(
    store: &dyn Store,
    project: Project,
) -> Result<ProjectDetail, StoreError> {
    let team = store.users_by_ids(&project.team_members).await?;
    let creator_details = user_summary(store, project.created_by).await?;

    let raw_tasks = store
        .list_tasks(&TaskFilter::for_project(project.id))
        .await?;
    let total = raw_tasks.len();
    let done = raw_tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Done)
        .count();

    let mut tasks = Vec::with_capacity(raw_tasks.len());
    for task in raw_tasks {
        tasks.push(task_view(store, task).await?);
    }

    Ok(ProjectDetail {
        team_member_details: team.iter().map(UserSummary::from).collect(),
        creator_details,
        tasks,
        progress: progress(total, done),
        project,
    })
}

/// Builds an enriched task
pub async fn task_view(store: &dyn Store, task: Task) -> Result<TaskView, StoreError> {
    let project_details = store
        .project_by_id(task.project_id)
        .await?
        .map(|p| ProjectRef {
            id: p.id,
            title: p.title,
        });

    let assignee_details = match task.assigned_to {
        Some(id) => user_summary(store, id).await?,
        None => None,
    };
    let creator_details = user_summary(store, task.created_by).await?;

    Ok(TaskView {
        project_details,
        assignee_details,
        creator_details,
        task,
    })
}

/// Builds a task detail with its comments, oldest first
pub async fn task_detail(store: &dyn Store, task: Task) -> Result<TaskDetail, StoreError> {
    let raw_comments = store.comments_for_task(task.id).await?;
    let mut comments = Vec::with_capacity(raw_comments.len());
    for comment in raw_comments {
        comments.push(comment_view(store, comment).await?);
    }

    Ok(TaskDetail {
        view: task_view(store, task).await?,
        comments,
    })
}

/// Builds an enriched comment
pub async fn comment_view(store: &dyn Store, comment: Comment) -> Result<CommentView, StoreError> {
    let author_details = user_summary(store, comment.author_id).await?;
    Ok(CommentView {
        author_details,
        comment,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crewdesk_shared::models::Role;

    #[test]
    fn test_progress_guards_empty_project() {
        assert_eq!(progress(0, 0), 0.0);
    }

    #[test]
    fn test_progress_rounds_to_one_decimal() {
        assert_eq!(progress(4, 1), 25.0);
        assert_eq!(progress(3, 1), 33.3);
        assert_eq!(progress(3, 2), 66.7);
        assert_eq!(progress(2, 2), 100.0);
    }

    #[test]
    fn test_user_public_never_carries_password() {
        let user = User::new(
            "a@b.com".to_string(),
            "$argon2id$secret-hash".to_string(),
            "A".to_string(),
            Role::TeamMember,
        );
        let json = serde_json::to_value(UserPublic::from(user)).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "a@b.com");
    }

    #[test]
    fn test_task_stats_total() {
        let stats = TaskStats::from(StatusCounts {
            todo: 2,
            in_progress: 1,
            done: 1,
        });
        assert_eq!(stats.total, 4);
    }
}
