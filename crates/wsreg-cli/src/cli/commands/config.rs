//! Config command handlers.

use anyhow::{Context, Result};
use wsreg_core::config;

pub fn path() {
    println!("{}", config::paths::config_path().display());
}

pub fn init() -> Result<()> {
    let config_path = config::paths::config_path();
    config::Config::init(&config_path)
        .with_context(|| format!("init config at {}", config_path.display()))?;
    println!("Created config at {}", config_path.display());
    Ok(())
}

pub fn set_api_url(url: &str) -> Result<()> {
    let url = url.trim();
    url::Url::parse(url).with_context(|| format!("'{url}' is not a valid URL"))?;
    config::Config::save_api_base_url(url)?;
    println!(
        "Saved api_base_url to {}",
        config::paths::config_path().display()
    );
    Ok(())
}
