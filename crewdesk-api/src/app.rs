/// Application state and router builder
///
/// The state carries the injected store handle and the configuration;
/// handlers never touch a global. Cloning is cheap (two Arcs).
///
/// # Example
///
/// ```no_run
/// use crewdesk_api::{app::{build_router, AppState}, config::Config};
/// use crewdesk_shared::store::mongo::MongoStore;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let store = MongoStore::connect(&config.store.url, &config.store.database).await?;
/// let state = AppState::new(Arc::new(store), config);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{config::Config, middleware::auth::require_auth, routes};
use crewdesk_shared::store::Store;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Injected document store
    pub store: Arc<dyn Store>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    /// Gets the JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router
///
/// # Architecture
///
/// ```text
/// /api
/// ├── /health                          # public
/// ├── /auth/signup, /auth/login        # public
/// ├── /auth/me, /users                 # bearer token
/// ├── /projects[/{id}]                 # bearer token
/// ├── /tasks[/{id}]                    # bearer token
/// ├── /comments[...]                   # bearer token
/// ├── /notifications[...]              # bearer token
/// └── /dashboard/stats                 # bearer token
/// ```
///
/// Middleware, outermost first: request tracing, CORS, then bearer-token
/// authentication on the protected subtree only.
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/auth/signup", post(routes::auth::signup))
        .route("/auth/login", post(routes::auth::login));

    let protected_routes = Router::new()
        .route("/auth/me", get(routes::auth::me))
        .route("/users", get(routes::users::list_users))
        .route(
            "/projects",
            post(routes::projects::create_project).get(routes::projects::list_projects),
        )
        .route(
            "/projects/:id",
            get(routes::projects::get_project)
                .put(routes::projects::update_project)
                .delete(routes::projects::delete_project),
        )
        .route(
            "/tasks",
            post(routes::tasks::create_task).get(routes::tasks::list_tasks),
        )
        .route(
            "/tasks/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route("/comments", post(routes::comments::create_comment))
        // One segment serves both shapes: GET takes a task id, DELETE a
        // comment id.
        .route(
            "/comments/:id",
            get(routes::comments::list_task_comments).delete(routes::comments::delete_comment),
        )
        .route("/notifications", get(routes::notifications::list_notifications))
        .route(
            "/notifications/unread-count",
            get(routes::notifications::unread_count),
        )
        .route(
            "/notifications/mark-all-read",
            put(routes::notifications::mark_all_read),
        )
        .route(
            "/notifications/:id/read",
            put(routes::notifications::mark_read),
        )
        .route("/dashboard/stats", get(routes::dashboard::stats))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    let cors = if state.config.api.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
    };

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}
