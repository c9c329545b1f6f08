use anyhow::{Context, Result};
use learnhub_config::LearnhubConfig;
use learnhub_server::{AppState, init_tracing, serve};
use learnhub_store::Store;
use tracing::info;

pub async fn cmd_serve(config: LearnhubConfig) -> Result<()> {
    init_tracing(config.log()).context("initialise logging")?;

    info!("Opening database...");
    let store = Store::open(&config)
        .await
        .with_context(|| format!("open database {}", config.database().url))?;

    serve(AppState::new(store.clone()), config.server())
        .await
        .context("run http server")?;

    store.close().await.context("close database")?;
    Ok(())
}
