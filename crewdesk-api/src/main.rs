//! Crewdesk API server binary
//!
//! Boots tracing, loads configuration from the environment, connects the
//! MongoDB store, and serves the router.
//!
//! ```bash
//! MONGO_URL=mongodb://localhost:27017 \
//! JWT_SECRET=$(openssl rand -hex 32) \
//! cargo run -p crewdesk-api
//! ```

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crewdesk_api::{
    app::{build_router, AppState},
    config::Config,
};
use crewdesk_shared::store::mongo::MongoStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crewdesk_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!(
        "Crewdesk API v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let store = MongoStore::connect(&config.store.url, &config.store.database).await?;

    let bind_address = config.bind_address();
    let state = AppState::new(Arc::new(store), config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("listening on http://{bind_address}");
    axum::serve(listener, app).await?;

    Ok(())
}
