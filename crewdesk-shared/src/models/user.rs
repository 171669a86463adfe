/// User model
///
/// Users are created at signup and are immutable afterwards: there are no
/// update or delete operations. The `password` field holds an Argon2id hash
/// (see `auth::password`), never plaintext, and must be stripped from every
/// response by the API layer.
///
/// # Example
///
/// ```
/// use crewdesk_shared::models::{Role, User};
///
/// let user = User::new(
///     "dev@example.com".to_string(),
///     "$argon2id$...".to_string(),
///     "Dev Example".to_string(),
///     Role::TeamMember,
/// );
/// assert_eq!(user.role, Role::TeamMember);
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account role
///
/// `Admin` passes every access-control check; `TeamMember` is scoped to
/// projects where they are creator, listed member, or task assignee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    TeamMember,
}

impl Role {
    /// Gets the role as its wire string
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::TeamMember => "team_member",
        }
    }
}

/// User account document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user id (UUID v4)
    pub id: Uuid,

    /// Email address, unique across all users
    pub email: String,

    /// Argon2id password hash
    pub password: String,

    /// Display name
    pub full_name: String,

    /// Account role
    pub role: Role,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user document with a fresh id
    pub fn new(email: String, password_hash: String, full_name: String, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            password: password_hash,
            full_name,
            role,
            created_at: Utc::now(),
        }
    }

    /// Whether this account has the admin role
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
