use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use colored::Colorize;
use learnhub_config::{CONFIG_STEM, FileFormat, LearnhubConfig, find_config, render_config};

/// Write the default config as `learnhub.<format>` in the current directory.
pub fn cmd_init(format: FileFormat) -> Result<PathBuf> {
    let cwd = env::current_dir().context("read current directory")?;
    if let Some(existing) = find_config(&cwd) {
        bail!("{} already exists", existing.display());
    }

    let path = PathBuf::from(format!("{CONFIG_STEM}.{}", format.extension()));
    let text = render_config(&LearnhubConfig::default(), format)
        .context("serialize default config")?;
    fs::write(&path, text).with_context(|| format!("write {}", path.display()))?;
    println!("{} {}", "Created".bright_green(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::CwdGuard;
    use learnhub_config::load_config_from_path;
    use rstest::rstest;
    use serial_test::serial;
    use tempfile::tempdir;

    #[rstest]
    #[case(FileFormat::Json, "learnhub.json")]
    #[case(FileFormat::Yaml, "learnhub.yaml")]
    #[case(FileFormat::Yml, "learnhub.yml")]
    #[serial]
    fn cmd_init_writes_loadable_defaults(#[case] format: FileFormat, #[case] name: &str) {
        let tmp = tempdir().unwrap();
        let _guard = CwdGuard::new(tmp.path());

        let path = cmd_init(format).unwrap();
        assert_eq!(path, PathBuf::from(name));
        assert_eq!(
            load_config_from_path(&path).unwrap(),
            LearnhubConfig::default()
        );
    }

    #[test]
    #[serial]
    fn cmd_init_refuses_to_overwrite() {
        let tmp = tempdir().unwrap();
        let _guard = CwdGuard::new(tmp.path());

        cmd_init(FileFormat::Json).unwrap();
        let err = cmd_init(FileFormat::Yaml).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert!(!PathBuf::from("learnhub.yaml").exists());
    }
}
