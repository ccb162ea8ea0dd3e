use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(database = %config.mongodb.database, "Connecting to MongoDB");
    let mongo_client =
        database::mongodb::connect_from_config_with_retry(&config.mongodb, None).await?;
    let db = mongo_client.database(&config.mongodb.database);

    let hasher = config.password.hasher()?;

    let state = AppState {
        mongo_client: mongo_client.clone(),
        db,
    };

    let api_routes = api::routes(&state, hasher);
    let app = create_router::<openapi::ApiDoc>(api_routes, &config.server)?
        .merge(health_router(config.app));

    info!("Starting Users API with graceful shutdown (30s timeout)");

    create_production_app(app, &config.server, Duration::from_secs(30), async move {
        info!("Shutting down: closing MongoDB connections");
        mongo_client.shutdown().await;
        info!("MongoDB connection closed successfully");
    })
    .await?;

    info!("Users API shutdown complete");
    Ok(())
}
