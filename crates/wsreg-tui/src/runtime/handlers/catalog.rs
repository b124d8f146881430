use wsreg_core::api::ApiClient;
use wsreg_core::reconcile;

use crate::common::TaskId;
use crate::events::{CatalogUiEvent, UiEvent};

/// Re-fetches the public catalog.
pub async fn catalog_load(client: ApiClient, task: TaskId) -> UiEvent {
    let workshops = reconcile::refresh_catalog(&client).await;
    UiEvent::Catalog(CatalogUiEvent::Loaded { task, workshops })
}
