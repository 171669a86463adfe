//! # Crewdesk API Server
//!
//! Axum HTTP server for the Crewdesk project/task management backend.
//!
//! ## Modules
//!
//! - `app`: application state and router builder
//! - `config`: environment-based configuration
//! - `error`: unified error type and HTTP mapping
//! - `middleware`: bearer-token authentication
//! - `routes`: per-resource handlers
//! - `views`: read-time enrichment projections

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod views;
