//! CLI command handlers.

pub mod admin;
pub mod config;
pub mod rating;
pub mod session;
pub mod tui;
pub mod workshops;

use anyhow::{Context as _, Result, bail};
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{ContentArrangement, Row, Table};
use wsreg_core::api::ApiClient;
use wsreg_core::config::Config;
use wsreg_core::models::{Identity, Workshop};
use wsreg_core::reconcile::{self, PersonalData};
use wsreg_core::session::SessionStore;

pub const NOT_LOGGED_IN: &str = "Not logged in. Run `wsreg login <TICKET_ID>` first.";

/// What every one-shot command needs: config and the session store.
pub struct Context<'a> {
    pub config: &'a Config,
    pub store: SessionStore,
}

impl<'a> Context<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            store: SessionStore::open_default(),
        }
    }

    /// Built on demand so offline commands work without an API URL.
    pub fn client(&self) -> Result<ApiClient> {
        ApiClient::from_config(self.config)
    }

    pub fn require_session(&self) -> Result<Identity> {
        match self.store.restore() {
            Some(identity) => Ok(identity),
            None => bail!(NOT_LOGGED_IN),
        }
    }
}

/// Fetches the catalog or fails the command.
pub async fn fetch_catalog(client: &ApiClient) -> Result<Vec<Workshop>> {
    match reconcile::refresh_catalog(client).await {
        Some(catalog) => Ok(catalog),
        None => bail!("Failed to load workshops from {}", client.base_url()),
    }
}

/// Fetches the attendee's registrations and ratings or fails the command.
pub async fn fetch_personal(client: &ApiClient, ticket_id: &str) -> Result<PersonalData> {
    reconcile::fetch_personal(client, ticket_id)
        .await
        .with_context(|| format!("Failed to load registrations for {ticket_id}"))
}

pub fn find_workshop<'a>(catalog: &'a [Workshop], workshop_id: &str) -> Result<&'a Workshop> {
    match catalog.iter().find(|w| w.id == workshop_id) {
        Some(workshop) => Ok(workshop),
        None => bail!("Unknown workshop '{workshop_id}'"),
    }
}

pub fn table(header: impl Into<Row>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}
