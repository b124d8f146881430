//! `wsreg rate`.

use anyhow::{Result, bail};
use wsreg_core::actions::{self, RATING_THANKS};
use wsreg_core::models::LearnedSomething;
use wsreg_core::rating::RatingDraft;

use super::{Context, fetch_personal};

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum Learned {
    Yes,
    No,
}

impl From<Learned> for LearnedSomething {
    fn from(value: Learned) -> Self {
        match value {
            Learned::Yes => LearnedSomething::Yes,
            Learned::No => LearnedSomething::No,
        }
    }
}

pub async fn rate(
    ctx: &Context<'_>,
    workshop_id: &str,
    content: u8,
    speaker: u8,
    learned: Learned,
    feedback: String,
) -> Result<()> {
    let identity = ctx.require_session()?;
    let client = ctx.client()?;

    let personal = fetch_personal(&client, &identity.ticket_id).await?;
    if !personal.is_registered(workshop_id) {
        bail!("You are not registered for workshop '{workshop_id}'.");
    }
    if personal.has_rated(workshop_id) {
        bail!("You have already rated workshop '{workshop_id}'.");
    }

    let draft = RatingDraft {
        content_satisfaction: content,
        speaker_effectiveness: speaker,
        learned_something: Some(learned.into()),
        additional_feedback: feedback,
    };
    actions::submit_rating(&client, &identity.ticket_id, workshop_id, &draft).await?;
    println!("{RATING_THANKS}");
    Ok(())
}
