//! Full-screen TUI for workshop registration.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod overlays;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, Write, stderr};

use anyhow::Result;
pub use features::{admin, catalog, login};
pub use runtime::TuiRuntime;
use wsreg_core::api::ApiClient;
use wsreg_core::config::{self, Config};
use wsreg_core::session::SessionStore;

/// Runs the interactive TUI until the user quits.
pub async fn run_interactive(config: &Config) -> Result<()> {
    if !stderr().is_terminal() {
        anyhow::bail!(
            "The interactive client requires a terminal.\n\
             Use `wsreg workshops` and the other subcommands for non-interactive use."
        );
    }

    let client = ApiClient::from_config(config)?;
    let store = SessionStore::open_default();

    let mut err = stderr();
    writeln!(err, "Workshop Registration")?;
    writeln!(err, "API: {}", client.base_url())?;
    let config_path = config::paths::config_path();
    if config_path.exists() {
        writeln!(err, "Config: {}", config_path.display())?;
    }
    err.flush()?;

    let mut runtime = TuiRuntime::new(client, store)?;
    runtime.run()?;
    drop(runtime);

    writeln!(stderr(), "Goodbye!")?;
    Ok(())
}
