//! Default command: the full-screen client.

use anyhow::Result;
use wsreg_core::config::Config;

#[cfg(feature = "tui")]
pub async fn run(config: &Config) -> Result<()> {
    wsreg_tui::run_interactive(config).await
}

#[cfg(not(feature = "tui"))]
pub async fn run(_config: &Config) -> Result<()> {
    anyhow::bail!("This build has no interactive client. Run `wsreg --help` for commands.")
}
