pub mod config;
pub mod error;
pub mod file_format;
pub mod loader;
pub mod log_format;

pub use config::{
    CacheConfig, DatabaseConfig, ENV_DATABASE_URL, ENV_PORT, LearnhubConfig, LogConfig,
    PasswordConfig, ServerConfig,
};
pub use error::ConfigError;
pub use file_format::FileFormat;
pub use loader::{
    CONFIG_STEM, config_file_names, find_config, load_config_from_path, load_config_or_default,
    render_config,
};
pub use log_format::LogFormat;
