use std::fs;
use std::path::{Path, PathBuf};

use crate::config::LearnhubConfig;
use crate::error::ConfigError;
use crate::file_format::FileFormat;

/// Base name of the config file, without extension.
pub const CONFIG_STEM: &str = "learnhub";

/// Candidate config file names, in lookup order.
pub fn config_file_names() -> [String; 3] {
    [FileFormat::Json, FileFormat::Yaml, FileFormat::Yml]
        .map(|f| format!("{CONFIG_STEM}.{}", f.extension()))
}

/// First existing config file in `dir`.
pub fn find_config(dir: &Path) -> Option<PathBuf> {
    config_file_names()
        .into_iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
}

/// Load config from a specific path; the extension picks the parser.
pub fn load_config_from_path(path: &Path) -> Result<LearnhubConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    let format = FileFormat::from_path(path)
        .ok_or_else(|| ConfigError::UnsupportedFormat(path.to_path_buf()))?;

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    if format.is_yaml() {
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    } else {
        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Load config from `dir` (or the current directory), with fallback to
/// defaults when no config file exists.
pub fn load_config_or_default(dir: Option<&Path>) -> Result<LearnhubConfig, ConfigError> {
    let dir = dir.unwrap_or_else(|| Path::new("."));
    match find_config(dir) {
        Some(path) => load_config_from_path(&path),
        None => Ok(LearnhubConfig::default()),
    }
}

/// Serialize `config` in `format`.
pub fn render_config(config: &LearnhubConfig, format: FileFormat) -> Result<String, ConfigError> {
    if format.is_yaml() {
        serde_yaml::to_string(config).map_err(|e| ConfigError::Serialize(e.to_string()))
    } else {
        serde_json::to_string_pretty(config).map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::tempdir;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let tmp = tempdir().unwrap();
        let config = load_config_or_default(Some(tmp.path())).unwrap();
        assert_eq!(config, LearnhubConfig::default());
    }

    #[rstest]
    #[case(FileFormat::Json)]
    #[case(FileFormat::Yaml)]
    #[case(FileFormat::Yml)]
    fn rendered_config_loads_back(#[case] format: FileFormat) {
        let tmp = tempdir().unwrap();
        let mut config = LearnhubConfig::default();
        config.server.port = 5555;

        let path = tmp.path().join(format!("{CONFIG_STEM}.{}", format.extension()));
        fs::write(&path, render_config(&config, format).unwrap()).unwrap();

        assert_eq!(find_config(tmp.path()), Some(path.clone()));
        assert_eq!(load_config_from_path(&path).unwrap(), config);
        assert_eq!(load_config_or_default(Some(tmp.path())).unwrap(), config);
    }

    #[test]
    fn json_wins_over_yaml() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("learnhub.yaml"), "server:\n  port: 1\n").unwrap();
        fs::write(tmp.path().join("learnhub.json"), r#"{"server":{"port":2}}"#).unwrap();

        let config = load_config_or_default(Some(tmp.path())).unwrap();
        assert_eq!(config.server.port, 2);
    }

    #[test]
    fn unsupported_extension() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("learnhub.toml");
        fs::write(&path, "").unwrap();
        assert!(matches!(
            load_config_from_path(&path),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn parse_error_names_the_file() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("learnhub.json");
        fs::write(&path, "{not json").unwrap();
        let err = load_config_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("learnhub.json"));
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let tmp = tempdir().unwrap();
        let err = load_config_from_path(&tmp.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }
}
