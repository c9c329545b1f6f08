use anyhow::{Context, Result};
use colored::Colorize;
use learnhub_config::LearnhubConfig;
use learnhub_core::DashboardStats;
use learnhub_store::Store;

use super::admin::print_stats;

/// Print the effective configuration, then open the database and report its contents.
pub async fn cmd_status(config: &LearnhubConfig) -> Result<DashboardStats> {
    println!("{}", "Configuration:".bright_cyan().bold());
    println!(
        "  {} {}",
        "Listen address:".cyan(),
        config.server().address().bright_white()
    );
    println!(
        "  {} {}",
        "Database:".cyan(),
        config.database().url.bright_white()
    );
    println!(
        "  {} {}",
        "Max connections:".cyan(),
        config.database().max_connections.to_string().bright_white()
    );
    println!(
        "  {} {} {}",
        "Body limit:".cyan(),
        config.server().body_limit_bytes.to_string().bright_white(),
        "bytes".bright_white()
    );
    println!("  {} {:?}", "Log format:".cyan(), config.log().format);
    println!(
        "  {} {}",
        "Log filter:".cyan(),
        config.log().filter.bright_white()
    );
    println!();

    let store = Store::open(config)
        .await
        .with_context(|| format!("open database {}", config.database().url))?;
    store.ping().await.context("ping database")?;
    let stats = store.stats().await.context("collect stats")?;
    store.close().await.context("close database")?;

    println!(
        "{} {}",
        "Status:".bright_cyan().bold(),
        "Database reachable.".bright_green()
    );
    print_stats(&stats);
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config_in(dir: &std::path::Path) -> LearnhubConfig {
        let mut config = LearnhubConfig::default();
        config.database.url = format!("sqlite://{}?mode=rwc", dir.join("status.db").display());
        config
    }

    #[tokio::test]
    async fn cmd_status_on_fresh_database() {
        let tmp = tempdir().unwrap();
        let stats = cmd_status(&config_in(tmp.path())).await.unwrap();
        assert_eq!(stats, DashboardStats::default());
        assert!(tmp.path().join("status.db").exists());
    }

    #[tokio::test]
    async fn cmd_status_reports_unreachable_database() {
        let tmp = tempdir().unwrap();
        let mut config = LearnhubConfig::default();
        config.database.url = format!(
            "sqlite://{}?mode=ro",
            tmp.path().join("missing").join("nope.db").display()
        );
        let err = cmd_status(&config).await.unwrap_err();
        assert!(err.to_string().contains("open database"));
    }
}
