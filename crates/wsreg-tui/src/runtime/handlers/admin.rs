use wsreg_core::actions;
use wsreg_core::api::ApiClient;
use wsreg_core::models::{Identity, Workshop};
use wsreg_core::reconcile;

use crate::common::TaskId;
use crate::events::{AdminUiEvent, UiEvent};

/// Re-fetches the catalog, then the admin data scoped against it.
///
/// `fallback_catalog` scopes the admin fetch when the catalog fetch fails.
pub async fn admin_load(
    client: ApiClient,
    task: TaskId,
    admin: Identity,
    fallback_catalog: Vec<Workshop>,
) -> UiEvent {
    let catalog = reconcile::refresh_catalog(&client).await;
    let data = reconcile::refresh_admin(
        &client,
        &admin,
        catalog.as_deref().unwrap_or(&fallback_catalog),
    )
    .await;
    UiEvent::Admin(AdminUiEvent::Loaded {
        task,
        ticket_id: admin.ticket_id,
        catalog,
        admin: data,
    })
}

pub async fn admin_withdraw(
    client: ApiClient,
    task: TaskId,
    admin: Identity,
    ticket_id: String,
    workshop_id: String,
    participant: String,
    fallback_catalog: Vec<Workshop>,
) -> UiEvent {
    let result = actions::admin_withdraw(&client, &admin, &ticket_id, &workshop_id, &fallback_catalog)
        .await
        .map_err(|err| err.message);
    UiEvent::Admin(AdminUiEvent::Withdrawn {
        task,
        ticket_id: admin.ticket_id,
        participant,
        result,
    })
}
