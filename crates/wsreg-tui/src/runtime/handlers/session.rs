use wsreg_core::actions;
use wsreg_core::api::ApiClient;
use wsreg_core::reconcile;
use wsreg_core::session::SessionStore;

use crate::common::TaskId;
use crate::events::{SessionUiEvent, UiEvent};

/// Logs in, persists the session, and loads personal data.
pub async fn login(client: ApiClient, store: SessionStore, task: TaskId, ticket_id: String) -> UiEvent {
    let result = actions::login(&client, &store, &ticket_id)
        .await
        .map_err(|err| err.message);
    UiEvent::Session(SessionUiEvent::LoginFinished { task, result })
}

pub async fn personal_load(client: ApiClient, task: TaskId, ticket_id: String) -> UiEvent {
    let personal = reconcile::refresh_personal(&client, &ticket_id).await;
    UiEvent::Session(SessionUiEvent::PersonalLoaded {
        task,
        ticket_id,
        personal,
    })
}

/// Removes the persisted session. Failures are logged; the in-memory
/// session is already gone.
pub fn clear_session(store: &SessionStore) {
    if let Err(err) = store.clear() {
        tracing::warn!(path = %store.path().display(), "failed to clear session: {err:#}");
    }
}
