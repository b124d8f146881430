use wsreg_core::actions;
use wsreg_core::api::ApiClient;
use wsreg_core::rating::RatingDraft;

use crate::common::TaskId;
use crate::events::{RatingUiEvent, UiEvent};

pub async fn submit_rating(
    client: ApiClient,
    task: TaskId,
    ticket_id: String,
    workshop_id: String,
    draft: RatingDraft,
) -> UiEvent {
    let result = actions::submit_rating(&client, &ticket_id, &workshop_id, &draft)
        .await
        .map_err(|err| err.message);
    UiEvent::Rating(RatingUiEvent::Submitted {
        task,
        ticket_id,
        workshop_id,
        result,
    })
}
