/// MongoDB store backend
///
/// Documents are keyed by their application-level `id` field (UUID v4
/// string); the driver's own `_id` is never read. Uuids and timestamps are
/// written through serde, so filters built here must serialize boundary
/// values the same way (`to_bson`) to compare like with like.

use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson, Bson, Document},
    options::FindOptions,
    Client, Collection, Database,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{StatusCounts, Store, StoreError, TaskFilter};
use crate::models::{Comment, Notification, Project, ProjectPatch, Task, TaskPatch, TaskStatus, User};

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for StoreError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// MongoDB-backed [`Store`]
#[derive(Clone)]
pub struct MongoStore {
    users: Collection<User>,
    projects: Collection<Project>,
    tasks: Collection<Task>,
    comments: Collection<Comment>,
    notifications: Collection<Notification>,
}

impl MongoStore {
    /// Connects to MongoDB and binds the collections
    ///
    /// # Example
    ///
    /// ```no_run
    /// use crewdesk_shared::store::mongo::MongoStore;
    ///
    /// # async fn example() -> Result<(), crewdesk_shared::store::StoreError> {
    /// let store = MongoStore::connect("mongodb://localhost:27017", "crewdesk").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str, db_name: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(url).await?;
        tracing::info!(database = db_name, "connected to MongoDB");
        Ok(Self::with_database(&client.database(db_name)))
    }

    /// Binds the collections of an existing database handle
    pub fn with_database(db: &Database) -> Self {
        Self {
            users: db.collection("users"),
            projects: db.collection("projects"),
            tasks: db.collection("tasks"),
            comments: db.collection("comments"),
            notifications: db.collection("notifications"),
        }
    }
}

fn id_filter(id: Uuid) -> Document {
    doc! { "id": id.to_string() }
}

fn ids_to_strings(ids: &[Uuid]) -> Vec<String> {
    ids.iter().map(Uuid::to_string).collect()
}

/// Builds the query document for a [`TaskFilter`]
fn task_query(filter: &TaskFilter) -> Document {
    let mut query = Document::new();
    if let Some(status) = filter.status {
        query.insert("status", status.as_str());
    }
    if let Some(project_id) = filter.project_id {
        query.insert("project_id", project_id.to_string());
    }
    if let Some(assigned_to) = filter.assigned_to {
        query.insert("assigned_to", assigned_to.to_string());
    }
    if let Some(vis) = &filter.visible_to {
        query.insert(
            "$or",
            vec![
                doc! { "assigned_to": vis.user_id.to_string() },
                doc! { "project_id": { "$in": ids_to_strings(&vis.project_ids) } },
            ],
        );
    }
    query
}

#[async_trait]
impl Store for MongoStore {
    // Users

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        self.users.insert_one(user, None).await?;
        Ok(())
    }

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.find_one(id_filter(id), None).await?)
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.find_one(doc! { "email": email }, None).await?)
    }

    async fn users_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, StoreError> {
        let filter = doc! { "id": { "$in": ids_to_strings(ids) } };
        Ok(self.users.find(filter, None).await?.try_collect().await?)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.users.find(doc! {}, None).await?.try_collect().await?)
    }

    async fn count_users(&self) -> Result<u64, StoreError> {
        Ok(self.users.count_documents(doc! {}, None).await?)
    }

    // Projects

    async fn insert_project(&self, project: &Project) -> Result<(), StoreError> {
        self.projects.insert_one(project, None).await?;
        Ok(())
    }

    async fn project_by_id(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        Ok(self.projects.find_one(id_filter(id), None).await?)
    }

    async fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        Ok(self.projects.find(doc! {}, None).await?.try_collect().await?)
    }

    async fn projects_for_user(&self, user_id: Uuid) -> Result<Vec<Project>, StoreError> {
        let uid = user_id.to_string();
        let filter = doc! {
            "$or": [
                { "team_members": &uid },
                { "created_by": &uid },
            ]
        };
        Ok(self.projects.find(filter, None).await?.try_collect().await?)
    }

    async fn update_project(&self, id: Uuid, patch: &ProjectPatch) -> Result<(), StoreError> {
        let mut set = doc! { "updated_at": to_bson(&patch.updated_at)? };
        if let Some(title) = &patch.title {
            set.insert("title", title.as_str());
        }
        if let Some(description) = &patch.description {
            set.insert("description", description.as_str());
        }
        if let Some(members) = &patch.team_members {
            set.insert("team_members", ids_to_strings(members));
        }
        self.projects
            .update_one(id_filter(id), doc! { "$set": set }, None)
            .await?;
        Ok(())
    }

    async fn delete_project(&self, id: Uuid) -> Result<(), StoreError> {
        self.projects.delete_one(id_filter(id), None).await?;
        Ok(())
    }

    async fn count_projects(&self) -> Result<u64, StoreError> {
        Ok(self.projects.count_documents(doc! {}, None).await?)
    }

    // Tasks

    async fn insert_task(&self, task: &Task) -> Result<(), StoreError> {
        self.tasks.insert_one(task, None).await?;
        Ok(())
    }

    async fn task_by_id(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        Ok(self.tasks.find_one(id_filter(id), None).await?)
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, StoreError> {
        let query = task_query(filter);
        Ok(self.tasks.find(query, None).await?.try_collect().await?)
    }

    async fn count_tasks(&self, filter: &TaskFilter) -> Result<u64, StoreError> {
        Ok(self.tasks.count_documents(task_query(filter), None).await?)
    }

    async fn task_status_counts(&self, filter: &TaskFilter) -> Result<StatusCounts, StoreError> {
        let pipeline = vec![
            doc! { "$match": task_query(filter) },
            doc! { "$group": { "_id": "$status", "count": { "$sum": 1 } } },
        ];
        let mut cursor = self.tasks.aggregate(pipeline, None).await?;

        let mut counts = StatusCounts::default();
        while let Some(group) = cursor.try_next().await? {
            let n = match group.get("count") {
                Some(Bson::Int32(n)) => *n as u64,
                Some(Bson::Int64(n)) => *n as u64,
                _ => 0,
            };
            match group.get_str("_id") {
                Ok("todo") => counts.todo = n,
                Ok("in_progress") => counts.in_progress = n,
                Ok("done") => counts.done = n,
                _ => {}
            }
        }
        Ok(counts)
    }

    async fn count_tasks_due_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        assigned_to: Option<Uuid>,
    ) -> Result<u64, StoreError> {
        let mut query = doc! {
            "due_date": { "$gte": to_bson(&start)?, "$lt": to_bson(&end)? },
            "status": { "$ne": TaskStatus::Done.as_str() },
        };
        if let Some(user_id) = assigned_to {
            query.insert("assigned_to", user_id.to_string());
        }
        Ok(self.tasks.count_documents(query, None).await?)
    }

    async fn update_task(&self, id: Uuid, patch: &TaskPatch) -> Result<(), StoreError> {
        let mut set = doc! { "updated_at": to_bson(&patch.updated_at)? };
        if let Some(title) = &patch.title {
            set.insert("title", title.as_str());
        }
        if let Some(description) = &patch.description {
            set.insert("description", description.as_str());
        }
        if let Some(status) = patch.status {
            set.insert("status", status.as_str());
        }
        if let Some(assigned_to) = patch.assigned_to {
            set.insert("assigned_to", assigned_to.to_string());
        }
        if let Some(due_date) = &patch.due_date {
            set.insert("due_date", to_bson(due_date)?);
        }
        self.tasks
            .update_one(id_filter(id), doc! { "$set": set }, None)
            .await?;
        Ok(())
    }

    async fn delete_task(&self, id: Uuid) -> Result<(), StoreError> {
        self.tasks.delete_one(id_filter(id), None).await?;
        Ok(())
    }

    async fn delete_tasks_in_project(&self, project_id: Uuid) -> Result<(), StoreError> {
        self.tasks
            .delete_many(doc! { "project_id": project_id.to_string() }, None)
            .await?;
        Ok(())
    }

    // Comments

    async fn insert_comment(&self, comment: &Comment) -> Result<(), StoreError> {
        self.comments.insert_one(comment, None).await?;
        Ok(())
    }

    async fn comment_by_id(&self, id: Uuid) -> Result<Option<Comment>, StoreError> {
        Ok(self.comments.find_one(id_filter(id), None).await?)
    }

    async fn comments_for_task(&self, task_id: Uuid) -> Result<Vec<Comment>, StoreError> {
        let options = FindOptions::builder()
            .sort(doc! { "created_at": 1 })
            .build();
        let filter = doc! { "task_id": task_id.to_string() };
        Ok(self
            .comments
            .find(filter, options)
            .await?
            .try_collect()
            .await?)
    }

    async fn delete_comment(&self, id: Uuid) -> Result<(), StoreError> {
        self.comments.delete_one(id_filter(id), None).await?;
        Ok(())
    }

    async fn delete_comments_for_task(&self, task_id: Uuid) -> Result<(), StoreError> {
        self.comments
            .delete_many(doc! { "task_id": task_id.to_string() }, None)
            .await?;
        Ok(())
    }

    async fn delete_comments_for_tasks(&self, task_ids: &[Uuid]) -> Result<(), StoreError> {
        self.comments
            .delete_many(doc! { "task_id": { "$in": ids_to_strings(task_ids) } }, None)
            .await?;
        Ok(())
    }

    // Notifications

    async fn insert_notifications(&self, batch: &[Notification]) -> Result<(), StoreError> {
        if batch.is_empty() {
            return Ok(());
        }
        self.notifications.insert_many(batch, None).await?;
        Ok(())
    }

    async fn notification_by_id(&self, id: Uuid) -> Result<Option<Notification>, StoreError> {
        Ok(self.notifications.find_one(id_filter(id), None).await?)
    }

    async fn notifications_for_user(
        &self,
        user_id: Uuid,
        unread_only: bool,
        limit: i64,
    ) -> Result<Vec<Notification>, StoreError> {
        let mut filter = doc! { "user_id": user_id.to_string() };
        if unread_only {
            filter.insert("is_read", false);
        }
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .limit(limit)
            .build();
        Ok(self
            .notifications
            .find(filter, options)
            .await?
            .try_collect()
            .await?)
    }

    async fn mark_notification_read(&self, id: Uuid) -> Result<(), StoreError> {
        self.notifications
            .update_one(id_filter(id), doc! { "$set": { "is_read": true } }, None)
            .await?;
        Ok(())
    }

    async fn mark_all_notifications_read(&self, user_id: Uuid) -> Result<(), StoreError> {
        self.notifications
            .update_many(
                doc! { "user_id": user_id.to_string(), "is_read": false },
                doc! { "$set": { "is_read": true } },
                None,
            )
            .await?;
        Ok(())
    }

    async fn count_unread_notifications(&self, user_id: Uuid) -> Result<u64, StoreError> {
        let filter = doc! { "user_id": user_id.to_string(), "is_read": false };
        Ok(self.notifications.count_documents(filter, None).await?)
    }

    async fn delete_notifications_linking(&self, link: &str) -> Result<(), StoreError> {
        self.notifications
            .delete_many(doc! { "link": link }, None)
            .await?;
        Ok(())
    }
}
