use std::net::SocketAddr;

use anyhow::Context;
use healthstore_api::{app, worker, AppState};
use healthstore_store::{app_config::Config, SeedData};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "healthstore_api=debug,healthstore_sale=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting {} on port {}", config.store.name, config.server.port);

    let seed = match &config.catalog.seed_path {
        Some(path) => SeedData::load(path).context("Failed to load seed data")?,
        None => {
            tracing::warn!("No catalog.seed_path configured, starting with an empty catalog");
            SeedData::default()
        }
    };

    let app_state = AppState::from_seed(seed, &config).context("Invalid seed data")?;

    tokio::spawn(worker::start_sale_worker(
        app_state.sales_tx.subscribe(),
        app_state.customers.clone(),
    ));

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
