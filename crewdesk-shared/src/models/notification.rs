/// Notification model
///
/// Notifications are created exclusively by the fanout planner (see
/// `crate::fanout`) after a state-changing mutation; user actions never
/// insert them directly. The only user-driven mutation is mark-read, and
/// only by the recipient. Repeated identical triggers always produce new
/// records; there is no dedup or collapse.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of event that produced a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ProjectAdded,
    TaskAssigned,
    StatusChanged,
    CommentAdded,
}

impl NotificationKind {
    /// Gets the kind as its wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::ProjectAdded => "project_added",
            NotificationKind::TaskAssigned => "task_assigned",
            NotificationKind::StatusChanged => "status_changed",
            NotificationKind::CommentAdded => "comment_added",
        }
    }
}

/// Notification document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Unique notification id (UUID v4)
    pub id: Uuid,

    /// Recipient user id
    pub user_id: Uuid,

    /// Human-readable message
    pub message: String,

    /// Event kind
    #[serde(rename = "type")]
    pub kind: NotificationKind,

    /// Frontend link, always `/projects/{project_id}`
    pub link: String,

    /// Whether the recipient has marked it read
    pub is_read: bool,

    /// When the notification was created
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Creates an unread notification with a fresh id
    pub fn new(user_id: Uuid, kind: NotificationKind, message: String, link: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            message,
            kind,
            link,
            is_read: false,
            created_at: Utc::now(),
        }
    }
}
