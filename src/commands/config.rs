//! Config command handler.

use anyhow::Context;
use promptmenu::PromptMenuConfig;

/// Config command.
pub fn cmd_config(config: &PromptMenuConfig, show: bool) -> anyhow::Result<()> {
    if !show {
        println!("Use --show to print the effective configuration.");
        return Ok(());
    }

    println!("Current Configuration");
    println!("=====================");
    println!();
    println!("Store File: {}", config.store_path().display());
    println!();

    let rendered = toml::to_string_pretty(config).context("failed to render configuration")?;
    println!("{rendered}");
    Ok(())
}
