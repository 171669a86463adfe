/// Domain documents for Crewdesk
///
/// This module contains the five document types the store persists, plus
/// the patch structs used for partial updates.
///
/// # Models
///
/// - `user`: accounts and the admin/team-member role
/// - `project`: projects with an embedded team-member id set
/// - `task`: tasks with status, optional assignee and due date
/// - `comment`: immutable comments on tasks
/// - `notification`: fanout-generated notifications
///
/// All ids are UUID v4 and all timestamps are UTC; both serialize as
/// strings, so documents can be queried by exact match in any backend.

pub mod comment;
pub mod notification;
pub mod project;
pub mod task;
pub mod user;

pub use comment::Comment;
pub use notification::{Notification, NotificationKind};
pub use project::{Project, ProjectPatch};
pub use task::{Task, TaskPatch, TaskStatus};
pub use user::{Role, User};
