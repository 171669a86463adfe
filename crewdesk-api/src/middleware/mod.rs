/// Middleware for the API server
///
/// - `auth`: bearer-token authentication and current-user resolution

pub mod auth;
