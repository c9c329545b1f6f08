use std::path::Path;

use anyhow::{Context, Result};
use learnhub_client::LearnhubClient;
use learnhub_config::{LearnhubConfig, load_config_from_path, load_config_or_default};

/// Load config from `path`, or from `learnhub.{json,yaml,yml}` in the current
/// directory, falling back to defaults. `LEARNHUB_*` variables win.
pub fn load_config(path: Option<&Path>) -> Result<LearnhubConfig> {
    let config = match path {
        Some(path) => load_config_from_path(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => load_config_or_default(None).context("load learnhub config")?,
    };
    config
        .with_env_overrides()
        .context("apply environment overrides")
}

/// API client for `server`, cached per the loaded config.
pub fn connect_client(server: &str, config: &LearnhubConfig) -> Result<LearnhubClient> {
    LearnhubClient::new(server, config.cache())
        .with_context(|| format!("create client for {server}"))
}
