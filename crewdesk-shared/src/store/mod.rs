/// Store abstraction
///
/// Every component addresses the document store through the [`Store`]
/// trait, injected explicitly rather than reached through a global handle.
/// The production backend is MongoDB ([`mongo::MongoStore`]); tests swap in
/// the in-memory [`memory::MemoryStore`] without touching any handler code.
///
/// The trait deliberately exposes only the query shapes the system needs:
/// exact-match lookups, `$in`-style batch lookups, group-by-status counts,
/// and `$set`-style partial updates. Nothing here relies on backend
/// transactions or indexes beyond the unique-email lookup; invariants
/// (dangling references, duplicate emails) are enforced by the handlers
/// before writes. Cross-document operations (a mutation plus its fanout
/// inserts, or a cascade delete) are separate writes with no shared
/// atomicity; a crash between them is an accepted inconsistency.

pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{Comment, Notification, Project, ProjectPatch, Task, TaskPatch, TaskStatus, User};

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Backend failure (connection, serialization, query)
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Filter for task listing and counting
///
/// All clauses are combined with AND. `visible_to` restricts the result to
/// tasks a non-admin caller may see: assigned to them, or in one of the
/// given projects.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub project_id: Option<Uuid>,
    pub assigned_to: Option<Uuid>,
    pub visible_to: Option<TaskVisibility>,
}

/// Visibility scope for non-admin task queries
#[derive(Debug, Clone)]
pub struct TaskVisibility {
    /// The caller; matches tasks assigned to them
    pub user_id: Uuid,

    /// Projects the caller can view; matches tasks in any of them
    pub project_ids: Vec<Uuid>,
}

impl TaskFilter {
    /// Filter scoped to a single project
    pub fn for_project(project_id: Uuid) -> Self {
        Self {
            project_id: Some(project_id),
            ..Self::default()
        }
    }

    /// Filter scoped to a single assignee
    pub fn for_assignee(user_id: Uuid) -> Self {
        Self {
            assigned_to: Some(user_id),
            ..Self::default()
        }
    }

    /// Whether a task matches every clause of this filter
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(status) = self.status {
            if task.status != status {
                return false;
            }
        }
        if let Some(project_id) = self.project_id {
            if task.project_id != project_id {
                return false;
            }
        }
        if let Some(assigned_to) = self.assigned_to {
            if task.assigned_to != Some(assigned_to) {
                return false;
            }
        }
        if let Some(vis) = &self.visible_to {
            let assigned = task.assigned_to == Some(vis.user_id);
            let in_project = vis.project_ids.contains(&task.project_id);
            if !assigned && !in_project {
                return false;
            }
        }
        true
    }
}

/// Task counts grouped by status
///
/// All three canonical buckets are always present, zero-filled when a
/// bucket has no matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct StatusCounts {
    pub todo: u64,
    pub in_progress: u64,
    pub done: u64,
}

impl StatusCounts {
    /// Total across all buckets
    pub fn total(&self) -> u64 {
        self.todo + self.in_progress + self.done
    }

    /// Adds one task to the matching bucket
    pub fn record(&mut self, status: TaskStatus) {
        match status {
            TaskStatus::Todo => self.todo += 1,
            TaskStatus::InProgress => self.in_progress += 1,
            TaskStatus::Done => self.done += 1,
        }
    }
}

/// Document store operations
///
/// Implementations must preserve two ordering contracts: comments for a
/// task come back ascending by `created_at`, notifications for a user
/// descending. Every other listing order is unspecified.
#[async_trait]
pub trait Store: Send + Sync {
    // Users

    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;
    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    /// Batch lookup; unknown ids are simply absent from the result
    async fn users_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, StoreError>;
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;
    async fn count_users(&self) -> Result<u64, StoreError>;

    // Projects

    async fn insert_project(&self, project: &Project) -> Result<(), StoreError>;
    async fn project_by_id(&self, id: Uuid) -> Result<Option<Project>, StoreError>;
    async fn list_projects(&self) -> Result<Vec<Project>, StoreError>;
    /// Projects where the user is a team member or the creator
    async fn projects_for_user(&self, user_id: Uuid) -> Result<Vec<Project>, StoreError>;
    async fn update_project(&self, id: Uuid, patch: &ProjectPatch) -> Result<(), StoreError>;
    async fn delete_project(&self, id: Uuid) -> Result<(), StoreError>;
    async fn count_projects(&self) -> Result<u64, StoreError>;

    // Tasks

    async fn insert_task(&self, task: &Task) -> Result<(), StoreError>;
    async fn task_by_id(&self, id: Uuid) -> Result<Option<Task>, StoreError>;
    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, StoreError>;
    async fn count_tasks(&self, filter: &TaskFilter) -> Result<u64, StoreError>;
    /// Group-by-status counts over the filtered set
    async fn task_status_counts(&self, filter: &TaskFilter) -> Result<StatusCounts, StoreError>;
    /// Tasks not yet done with a due date in `[start, end)`, optionally
    /// restricted to one assignee
    async fn count_tasks_due_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        assigned_to: Option<Uuid>,
    ) -> Result<u64, StoreError>;
    async fn update_task(&self, id: Uuid, patch: &TaskPatch) -> Result<(), StoreError>;
    async fn delete_task(&self, id: Uuid) -> Result<(), StoreError>;
    async fn delete_tasks_in_project(&self, project_id: Uuid) -> Result<(), StoreError>;

    // Comments

    async fn insert_comment(&self, comment: &Comment) -> Result<(), StoreError>;
    async fn comment_by_id(&self, id: Uuid) -> Result<Option<Comment>, StoreError>;
    /// Ascending by `created_at`
    async fn comments_for_task(&self, task_id: Uuid) -> Result<Vec<Comment>, StoreError>;
    async fn delete_comment(&self, id: Uuid) -> Result<(), StoreError>;
    async fn delete_comments_for_task(&self, task_id: Uuid) -> Result<(), StoreError>;
    async fn delete_comments_for_tasks(&self, task_ids: &[Uuid]) -> Result<(), StoreError>;

    // Notifications

    async fn insert_notifications(&self, batch: &[Notification]) -> Result<(), StoreError>;
    async fn notification_by_id(&self, id: Uuid) -> Result<Option<Notification>, StoreError>;
    /// Descending by `created_at`, at most `limit` records
    async fn notifications_for_user(
        &self,
        user_id: Uuid,
        unread_only: bool,
        limit: i64,
    ) -> Result<Vec<Notification>, StoreError>;
    async fn mark_notification_read(&self, id: Uuid) -> Result<(), StoreError>;
    async fn mark_all_notifications_read(&self, user_id: Uuid) -> Result<(), StoreError>;
    async fn count_unread_notifications(&self, user_id: Uuid) -> Result<u64, StoreError>;
    /// Purges notifications whose link targets the given path
    async fn delete_notifications_linking(&self, link: &str) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task_with(status: TaskStatus, project_id: Uuid, assignee: Option<Uuid>) -> Task {
        let mut task = Task::new(
            project_id,
            "t".to_string(),
            String::new(),
            assignee,
            None,
            Uuid::new_v4(),
        );
        task.status = status;
        task
    }

    #[test]
    fn test_filter_matches_status_and_project() {
        let project = Uuid::new_v4();
        let task = task_with(TaskStatus::Done, project, None);

        let mut filter = TaskFilter::for_project(project);
        filter.status = Some(TaskStatus::Done);
        assert!(filter.matches(&task));

        filter.status = Some(TaskStatus::Todo);
        assert!(!filter.matches(&task));
    }

    #[test]
    fn test_visibility_matches_assignee_or_project() {
        let me = Uuid::new_v4();
        let my_project = Uuid::new_v4();
        let filter = TaskFilter {
            visible_to: Some(TaskVisibility {
                user_id: me,
                project_ids: vec![my_project],
            }),
            ..TaskFilter::default()
        };

        // Assigned to me, foreign project
        assert!(filter.matches(&task_with(TaskStatus::Todo, Uuid::new_v4(), Some(me))));
        // My project, assigned elsewhere
        assert!(filter.matches(&task_with(TaskStatus::Todo, my_project, Some(Uuid::new_v4()))));
        // Neither
        assert!(!filter.matches(&task_with(TaskStatus::Todo, Uuid::new_v4(), None)));
    }

    #[test]
    fn test_status_counts_record_and_total() {
        let mut counts = StatusCounts::default();
        counts.record(TaskStatus::Todo);
        counts.record(TaskStatus::Done);
        counts.record(TaskStatus::Done);
        assert_eq!(counts.todo, 1);
        assert_eq!(counts.in_progress, 0);
        assert_eq!(counts.done, 2);
        assert_eq!(counts.total(), 3);
    }
}
