use learnhub_config::LogConfig;
use tracing_subscriber::{EnvFilter, fmt};

use crate::ServerError;

/// Install the global subscriber. `RUST_LOG` wins over the configured filter.
pub fn init_tracing(config: &LogConfig) -> Result<(), ServerError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .map_err(|e| ServerError::Tracing(e.to_string()))?;

    let builder = fmt().with_env_filter(filter);
    let result = if config.format.is_json() {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| ServerError::Tracing(e.to_string()))
}
