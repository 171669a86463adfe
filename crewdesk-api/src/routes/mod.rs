/// API route handlers, organized by resource
///
/// - `health`: liveness probe
/// - `auth`: signup, login, current user
/// - `users`: user directory
/// - `projects`: project CRUD with membership fanout
/// - `tasks`: task CRUD with status/assignment fanout
/// - `comments`: comments with stakeholder fanout
/// - `notifications`: per-user notification feed
/// - `dashboard`: role-scoped statistics

pub mod auth;
pub mod comments;
pub mod dashboard;
pub mod health;
pub mod notifications;
pub mod projects;
pub mod tasks;
pub mod users;

use serde::Serialize;
use uuid::Uuid;

use crewdesk_shared::{models::Notification, store::Store};

/// Response for create operations
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: Uuid,
    pub message: String,
}

/// Response for update/delete operations
#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub message: String,
}

impl MutationResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Persists a planned fanout batch, fire-and-forget
///
/// The primary mutation is already durable by the time this runs; a
/// failed notification insert is logged and swallowed, never surfaced to
/// the caller.
pub(crate) async fn dispatch_notifications(store: &dyn Store, batch: Vec<Notification>) {
    if batch.is_empty() {
        return;
    }
    let count = batch.len();
    if let Err(err) = store.insert_notifications(&batch).await {
        tracing::warn!(count, "failed to persist notifications: {err}");
    }
}

/// Flattens validator output into the single-message error payload
pub(crate) fn validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .flat_map(|(_, field_errors)| field_errors.iter())
        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .next()
        .unwrap_or_else(|| "Request validation failed".to_string())
}
