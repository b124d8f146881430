//! Admin commands: registrations listing, ratings summary, force-withdraw.

use std::io::{self, BufRead, Write};

use anyhow::{Context as _, Result, bail};
use wsreg_core::actions::{self, NO_WORKSHOP_ACCESS, admin_withdraw_prompt, admin_withdraw_success};
use wsreg_core::models::{Identity, LearnedSomething};
use wsreg_core::reconcile;
use wsreg_core::stats::{RatingSummary, format_mean, stars_for_mean};
use wsreg_core::text::{display_date, spots_left, stars};

use super::{Context, fetch_catalog, find_workshop, table};

fn require_admin(ctx: &Context<'_>) -> Result<Identity> {
    let identity = ctx.require_session()?;
    if !identity.is_admin {
        bail!("{} is not an admin.", identity.ticket_id);
    }
    Ok(identity)
}

pub async fn registrations(ctx: &Context<'_>) -> Result<()> {
    let admin = require_admin(ctx)?;
    let client = ctx.client()?;
    let catalog = fetch_catalog(&client).await?;

    let accessible = reconcile::accessible_workshops(&admin.admin_scope, &catalog);
    if accessible.is_empty() {
        println!("No Workshop Access");
        return Ok(());
    }

    let registrations = client
        .admin_registrations(&admin.ticket_id)
        .await
        .context("Failed to load registrations")?;
    let by_workshop = reconcile::group_by_workshop(registrations);

    for workshop in accessible {
        let participants = by_workshop.get(&workshop.id).map_or(&[][..], Vec::as_slice);
        println!(
            "{} [{}] {}/{} ({})",
            workshop.title,
            workshop.id,
            workshop.current_registrations,
            workshop.max_capacity,
            spots_left(workshop.available_spots())
        );
        if participants.is_empty() {
            println!("  No registrations yet\n");
            continue;
        }
        let mut out = table(["Participant", "Ticket", "Registered"]);
        for registration in participants {
            out.add_row(vec![
                registration.participant_name(),
                registration.ticket_id.clone(),
                display_date(&registration.registration_time),
            ]);
        }
        println!("{out}\n");
    }
    Ok(())
}

pub async fn ratings(ctx: &Context<'_>, workshop_id: &str) -> Result<()> {
    let admin = require_admin(ctx)?;
    if !admin.can_administer(workshop_id) {
        bail!(NO_WORKSHOP_ACCESS);
    }
    let client = ctx.client()?;
    let catalog = fetch_catalog(&client).await?;
    let workshop = find_workshop(&catalog, workshop_id)?;

    let ratings = client
        .admin_workshop_ratings(&admin.ticket_id, workshop_id)
        .await
        .context("Failed to load ratings")?;

    println!("{}", workshop.title);
    let Some(summary) = RatingSummary::from_ratings(&ratings) else {
        println!("No ratings submitted yet");
        return Ok(());
    };

    println!(
        "Content satisfaction:  {} {}",
        stars(stars_for_mean(summary.content_mean)),
        format_mean(summary.content_mean)
    );
    println!(
        "Speaker effectiveness: {} {}",
        stars(stars_for_mean(summary.speaker_mean)),
        format_mean(summary.speaker_mean)
    );
    println!(
        "Learned something new: {}/{} ({}%)",
        summary.learned_yes,
        summary.count,
        summary.learned_percentage()
    );
    println!("{} Total Responses", summary.count);

    let mut out = table(["Name", "Submitted", "Content", "Speaker", "Learned", "Feedback"]);
    for rating in &ratings {
        let learned = match rating.learned_something {
            Some(LearnedSomething::Yes) => "Learned New",
            _ => "No New Learning",
        };
        out.add_row(vec![
            rating.rater_name(),
            display_date(&rating.submitted_at),
            rating.content_satisfaction.to_string(),
            rating.speaker_effectiveness.to_string(),
            learned.to_string(),
            rating.feedback().unwrap_or("").to_string(),
        ]);
    }
    println!("{out}");
    Ok(())
}

pub async fn withdraw(ctx: &Context<'_>, ticket_id: &str, workshop_id: &str, yes: bool) -> Result<()> {
    let admin = require_admin(ctx)?;
    if !admin.can_administer(workshop_id) {
        bail!(NO_WORKSHOP_ACCESS);
    }
    let client = ctx.client()?;
    let catalog = fetch_catalog(&client).await?;

    let registrations = client
        .admin_registrations(&admin.ticket_id)
        .await
        .context("Failed to load registrations")?;
    let Some(registration) = registrations
        .iter()
        .find(|r| r.ticket_id == ticket_id && r.workshop_id == workshop_id)
    else {
        bail!("{ticket_id} is not registered for workshop '{workshop_id}'.");
    };
    let participant = registration.participant_name();

    if !yes && !confirm(&admin_withdraw_prompt(&participant, ticket_id))? {
        println!("Cancelled.");
        return Ok(());
    }

    actions::admin_withdraw(&client, &admin, ticket_id, workshop_id, &catalog).await?;
    println!("{}", admin_withdraw_success(&participant));
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    let mut out = io::stdout();
    write!(out, "{prompt} [y/N] ")?;
    out.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "YES" | "Yes"))
}
