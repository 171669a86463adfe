/// In-memory store backend
///
/// A [`Store`] implementation over plain vectors, used by the integration
/// tests (and handy for demos) so the full HTTP stack runs without a
/// MongoDB instance. Linear scans are fine at test scale.
///
/// The ordering contracts match the MongoDB backend: comments ascend by
/// `created_at`, notifications descend.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{StatusCounts, Store, StoreError, TaskFilter};
use crate::models::{Comment, Notification, Project, ProjectPatch, Task, TaskPatch, TaskStatus, User};

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    projects: Vec<Project>,
    tasks: Vec<Task>,
    comments: Vec<Comment>,
    notifications: Vec<Notification>,
}

/// In-memory [`Store`]
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().expect("store lock poisoned")
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().expect("store lock poisoned")
    }
}

#[async_trait]
impl Store for MemoryStore {
    // Users

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        self.write().users.push(user.clone());
        Ok(())
    }

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.read().users.iter().find(|u| u.id == id).cloned())
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.read().users.iter().find(|u| u.email == email).cloned())
    }

    async fn users_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, StoreError> {
        Ok(self
            .read()
            .users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.read().users.clone())
    }

    async fn count_users(&self) -> Result<u64, StoreError> {
        Ok(self.read().users.len() as u64)
    }

    // Projects

    async fn insert_project(&self, project: &Project) -> Result<(), StoreError> {
        self.write().projects.push(project.clone());
        Ok(())
    }

    async fn project_by_id(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        Ok(self.read().projects.iter().find(|p| p.id == id).cloned())
    }

    async fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        Ok(self.read().projects.clone())
    }

    async fn projects_for_user(&self, user_id: Uuid) -> Result<Vec<Project>, StoreError> {
        Ok(self
            .read()
            .projects
            .iter()
            .filter(|p| p.has_member(user_id) || p.created_by == user_id)
            .cloned()
            .collect())
    }

    async fn update_project(&self, id: Uuid, patch: &ProjectPatch) -> Result<(), StoreError> {
        let mut inner = self.write();
        if let Some(project) = inner.projects.iter_mut().find(|p| p.id == id) {
            if let Some(title) = &patch.title {
                project.title = title.clone();
            }
            if let Some(description) = &patch.description {
                project.description = description.clone();
            }
            if let Some(members) = &patch.team_members {
                project.team_members = members.clone();
            }
            project.updated_at = patch.updated_at;
        }
        Ok(())
    }

    async fn delete_project(&self, id: Uuid) -> Result<(), StoreError> {
        self.write().projects.retain(|p| p.id != id);
        Ok(())
    }

    async fn count_projects(&self) -> Result<u64, StoreError> {
        Ok(self.read().projects.len() as u64)
    }

    // Tasks

    async fn insert_task(&self, task: &Task) -> Result<(), StoreError> {
        self.write().tasks.push(task.clone());
        Ok(())
    }

    async fn task_by_id(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        Ok(self.read().tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, StoreError> {
        Ok(self
            .read()
            .tasks
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect())
    }

    async fn count_tasks(&self, filter: &TaskFilter) -> Result<u64, StoreError> {
        Ok(self.read().tasks.iter().filter(|t| filter.matches(t)).count() as u64)
    }

    async fn task_status_counts(&self, filter: &TaskFilter) -> Result<StatusCounts, StoreError> {
        let mut counts = StatusCounts::default();
        for task in self.read().tasks.iter().filter(|t| filter.matches(t)) {
            counts.record(task.status);
        }
        Ok(counts)
    }

    async fn count_tasks_due_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        assigned_to: Option<Uuid>,
    ) -> Result<u64, StoreError> {
        Ok(self
            .read()
            .tasks
            .iter()
            .filter(|t| t.status != TaskStatus::Done)
            .filter(|t| t.due_date.map(|due| due >= start && due < end).unwrap_or(false))
            .filter(|t| assigned_to.map(|uid| t.assigned_to == Some(uid)).unwrap_or(true))
            .count() as u64)
    }

    async fn update_task(&self, id: Uuid, patch: &TaskPatch) -> Result<(), StoreError> {
        let mut inner = self.write();
        if let Some(task) = inner.tasks.iter_mut().find(|t| t.id == id) {
            if let Some(title) = &patch.title {
                task.title = title.clone();
            }
            if let Some(description) = &patch.description {
                task.description = description.clone();
            }
            if let Some(status) = patch.status {
                task.status = status;
            }
            if let Some(assigned_to) = patch.assigned_to {
                task.assigned_to = Some(assigned_to);
            }
            if let Some(due_date) = patch.due_date {
                task.due_date = Some(due_date);
            }
            task.updated_at = patch.updated_at;
        }
        Ok(())
    }

    async fn delete_task(&self, id: Uuid) -> Result<(), StoreError> {
        self.write().tasks.retain(|t| t.id != id);
        Ok(())
    }

    async fn delete_tasks_in_project(&self, project_id: Uuid) -> Result<(), StoreError> {
        self.write().tasks.retain(|t| t.project_id != project_id);
        Ok(())
    }

    // Comments

    async fn insert_comment(&self, comment: &Comment) -> Result<(), StoreError> {
        self.write().comments.push(comment.clone());
        Ok(())
    }

    async fn comment_by_id(&self, id: Uuid) -> Result<Option<Comment>, StoreError> {
        Ok(self.read().comments.iter().find(|c| c.id == id).cloned())
    }

    async fn comments_for_task(&self, task_id: Uuid) -> Result<Vec<Comment>, StoreError> {
        let mut comments: Vec<Comment> = self
            .read()
            .comments
            .iter()
            .filter(|c| c.task_id == task_id)
            .cloned()
            .collect();
        comments.sort_by_key(|c| c.created_at);
        Ok(comments)
    }

    async fn delete_comment(&self, id: Uuid) -> Result<(), StoreError> {
        self.write().comments.retain(|c| c.id != id);
        Ok(())
    }

    async fn delete_comments_for_task(&self, task_id: Uuid) -> Result<(), StoreError> {
        self.write().comments.retain(|c| c.task_id != task_id);
        Ok(())
    }

    async fn delete_comments_for_tasks(&self, task_ids: &[Uuid]) -> Result<(), StoreError> {
        self.write().comments.retain(|c| !task_ids.contains(&c.task_id));
        Ok(())
    }

    // Notifications

    async fn insert_notifications(&self, batch: &[Notification]) -> Result<(), StoreError> {
        self.write().notifications.extend_from_slice(batch);
        Ok(())
    }

    async fn notification_by_id(&self, id: Uuid) -> Result<Option<Notification>, StoreError> {
        Ok(self
            .read()
            .notifications
            .iter()
            .find(|n| n.id == id)
            .cloned())
    }

    async fn notifications_for_user(
        &self,
        user_id: Uuid,
        unread_only: bool,
        limit: i64,
    ) -> Result<Vec<Notification>, StoreError> {
        let mut notifications: Vec<Notification> = self
            .read()
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .filter(|n| !unread_only || !n.is_read)
            .cloned()
            .collect();
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        notifications.truncate(limit.max(0) as usize);
        Ok(notifications)
    }

    async fn mark_notification_read(&self, id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.write();
        if let Some(notification) = inner.notifications.iter_mut().find(|n| n.id == id) {
            notification.is_read = true;
        }
        Ok(())
    }

    async fn mark_all_notifications_read(&self, user_id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.write();
        for notification in inner.notifications.iter_mut().filter(|n| n.user_id == user_id) {
            notification.is_read = true;
        }
        Ok(())
    }

    async fn count_unread_notifications(&self, user_id: Uuid) -> Result<u64, StoreError> {
        Ok(self
            .read()
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id && !n.is_read)
            .count() as u64)
    }

    async fn delete_notifications_linking(&self, link: &str) -> Result<(), StoreError> {
        self.write().notifications.retain(|n| n.link != link);
        Ok(())
    }
}
