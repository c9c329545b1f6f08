use anyhow::{Context, Result};
use learnhub_config::LearnhubConfig;
use schemars::schema_for;

/// JSON Schema of the config file, pretty-printed.
pub fn render_schema() -> Result<String> {
    let schema = schema_for!(LearnhubConfig);
    serde_json::to_string_pretty(&schema).context("serialize config schema")
}

pub fn cmd_schema() -> Result<()> {
    println!("{}", render_schema()?);
    Ok(())
}
