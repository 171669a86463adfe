/// Comment model
///
/// Comments are immutable once created; the only mutation is deletion by
/// the author or an admin.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Comment document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Unique comment id (UUID v4)
    pub id: Uuid,

    /// Task the comment belongs to
    pub task_id: Uuid,

    /// Comment author
    pub author_id: Uuid,

    /// Comment body
    pub content: String,

    /// When the comment was posted
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Creates a new comment document with a fresh id
    pub fn new(task_id: Uuid, author_id: Uuid, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            task_id,
            author_id,
            content,
            created_at: Utc::now(),
        }
    }
}
