/// Project model
///
/// A project embeds its team membership as a set of user ids. Membership
/// entries must reference existing users; the check happens in the handlers
/// before any write, the store itself enforces nothing. Deleting a project
/// cascades to its tasks, their comments, and notifications linking to it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Project document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Unique project id (UUID v4)
    pub id: Uuid,

    /// Project title
    pub title: String,

    /// Free-form description
    pub description: String,

    /// User who created the project
    pub created_by: Uuid,

    /// Member user ids; must reference existing users
    pub team_members: Vec<Uuid>,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last updated
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Creates a new project document with a fresh id
    pub fn new(
        title: String,
        description: String,
        created_by: Uuid,
        team_members: Vec<Uuid>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            created_by,
            team_members,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the given user is in the team-member set
    pub fn has_member(&self, user_id: Uuid) -> bool {
        self.team_members.contains(&user_id)
    }
}

/// Partial update for a project
///
/// Only `Some` fields are written; `updated_at` is always written.
/// Membership changes replace the whole set.
#[derive(Debug, Clone)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub team_members: Option<Vec<Uuid>>,
    pub updated_at: DateTime<Utc>,
}

impl ProjectPatch {
    /// An empty patch stamped with the current time
    pub fn new() -> Self {
        Self {
            title: None,
            description: None,
            team_members: None,
            updated_at: Utc::now(),
        }
    }
}

impl Default for ProjectPatch {
    fn default() -> Self {
        Self::new()
    }
}
