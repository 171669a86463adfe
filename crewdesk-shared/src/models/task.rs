/// Task model
///
/// Tasks belong to a project and are always created in `Todo` status. The
/// assignee, when present, must be a project team member or the project
/// creator; handlers validate that before any write.
///
/// # Status
///
/// `todo` → `in_progress` → `done` on the wire, though no transition order
/// is enforced: any status may be written at any time by an authorized
/// actor. `TaskStatus::humanize` produces the user-facing form used in
/// notification messages ("In Progress" etc.).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    /// All statuses, in canonical bucket order
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    /// Gets the status as its wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }

    /// Human-readable form used in notification messages
    pub fn humanize(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "Todo",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = InvalidTaskStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(TaskStatus::Todo),
            "in_progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            other => Err(InvalidTaskStatus(other.to_string())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognized status string
#[derive(Debug, thiserror::Error)]
#[error("Invalid task status: {0}")]
pub struct InvalidTaskStatus(pub String);

/// Task document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique task id (UUID v4)
    pub id: Uuid,

    /// Owning project; must reference an existing project
    pub project_id: Uuid,

    /// Task title
    pub title: String,

    /// Free-form description
    pub description: String,

    /// Assignee; must be a project member or the project creator
    pub assigned_to: Option<Uuid>,

    /// Current status
    pub status: TaskStatus,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// User who created the task
    pub created_by: Uuid,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task document in `Todo` status with a fresh id
    pub fn new(
        project_id: Uuid,
        title: String,
        description: String,
        assigned_to: Option<Uuid>,
        due_date: Option<DateTime<Utc>>,
        created_by: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            project_id,
            title,
            description,
            assigned_to,
            status: TaskStatus::Todo,
            due_date,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for a task
///
/// Only `Some` fields are written; `updated_at` is always written. An
/// assignee can only ever be replaced, not cleared, mirroring the update
/// payload, where an absent field means "leave unchanged".
#[derive(Debug, Clone)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub assigned_to: Option<Uuid>,
    pub due_date: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl TaskPatch {
    /// An empty patch stamped with the current time
    pub fn new() -> Self {
        Self {
            title: None,
            description: None,
            status: None,
            assigned_to: None,
            due_date: None,
            updated_at: Utc::now(),
        }
    }
}

impl Default for TaskPatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status_as_str() {
        assert_eq!(TaskStatus::Todo.as_str(), "todo");
        assert_eq!(TaskStatus::InProgress.as_str(), "in_progress");
        assert_eq!(TaskStatus::Done.as_str(), "done");
    }

    #[test]
    fn test_task_status_humanize() {
        assert_eq!(TaskStatus::Todo.humanize(), "Todo");
        assert_eq!(TaskStatus::InProgress.humanize(), "In Progress");
        assert_eq!(TaskStatus::Done.humanize(), "Done");
    }

    #[test]
    fn test_task_status_round_trip() {
        for status in TaskStatus::ALL {
            assert_eq!(status.as_str().parse::<TaskStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_task_status_rejects_unknown() {
        let err = "blocked".parse::<TaskStatus>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid task status: blocked");
    }

    #[test]
    fn test_new_task_starts_todo() {
        let task = Task::new(
            Uuid::new_v4(),
            "Write docs".to_string(),
            String::new(),
            None,
            None,
            Uuid::new_v4(),
        );
        assert_eq!(task.status, TaskStatus::Todo);
        assert!(task.assigned_to.is_none());
    }
}
