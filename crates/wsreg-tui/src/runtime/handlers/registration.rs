use wsreg_core::actions;
use wsreg_core::api::ApiClient;

use crate::events::{RegistrationAction, RegistrationUiEvent, UiEvent};

/// Registers or withdraws, then re-fetches catalog and personal data.
pub async fn registration(
    client: ApiClient,
    ticket_id: String,
    workshop_id: String,
    action: RegistrationAction,
) -> UiEvent {
    let result = match action {
        RegistrationAction::Register => actions::register(&client, &ticket_id, &workshop_id).await,
        RegistrationAction::Withdraw => actions::withdraw(&client, &ticket_id, &workshop_id).await,
    }
    .map_err(|err| err.message);

    UiEvent::Registration(RegistrationUiEvent::Finished {
        ticket_id,
        workshop_id,
        action,
        result,
    })
}
