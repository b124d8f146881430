//! Catalog and self-service registration commands.

use std::collections::HashSet;

use anyhow::Result;
use wsreg_core::actions::{self, Refreshed};
use wsreg_core::reconcile::{self, PersonalData};
use wsreg_core::text::{display_date, spots_left};

use super::{Context, fetch_catalog, fetch_personal, find_workshop, table};

pub async fn list(ctx: &Context<'_>) -> Result<()> {
    let client = ctx.client()?;
    let catalog = fetch_catalog(&client).await?;
    if catalog.is_empty() {
        println!("No workshops available.");
        return Ok(());
    }

    let session = ctx.store.restore();
    let personal = match &session {
        Some(identity) => fetch_personal(&client, &identity.ticket_id).await?,
        None => PersonalData::default(),
    };
    let views = reconcile::workshop_views(&catalog, session.as_ref(), &personal, &HashSet::new());

    let mut header = vec!["ID", "Title", "Time", "Location", "Spots"];
    if session.is_some() {
        header.push("Status");
    }
    let mut out = table(header);
    for view in views {
        let workshop = view.workshop;
        let mut row = vec![
            workshop.id.clone(),
            workshop.title.clone(),
            workshop.time.clone(),
            workshop.location.clone(),
            spots_left(view.available_spots),
        ];
        if session.is_some() {
            let status = match (view.registered, view.rated) {
                (true, true) => "Registered, rated",
                (true, false) => "Registered",
                (false, _) if !view.can_register() => "Full",
                (false, _) => "",
            };
            row.push(status.to_string());
        }
        out.add_row(row);
    }
    println!("{out}");
    Ok(())
}

pub async fn register(ctx: &Context<'_>, workshop_id: &str) -> Result<()> {
    let identity = ctx.require_session()?;
    let client = ctx.client()?;
    let refreshed = actions::register(&client, &identity.ticket_id, workshop_id).await?;
    println!("Registered for {}.", title_of(&refreshed, workshop_id));
    Ok(())
}

pub async fn withdraw(ctx: &Context<'_>, workshop_id: &str) -> Result<()> {
    let identity = ctx.require_session()?;
    let client = ctx.client()?;
    let refreshed = actions::withdraw(&client, &identity.ticket_id, workshop_id).await?;
    println!("Withdrew from {}.", title_of(&refreshed, workshop_id));
    Ok(())
}

fn title_of(refreshed: &Refreshed, workshop_id: &str) -> String {
    refreshed
        .catalog
        .as_deref()
        .and_then(|catalog| find_workshop(catalog, workshop_id).ok())
        .map_or_else(|| workshop_id.to_string(), |w| w.title.clone())
}

pub async fn mine(ctx: &Context<'_>) -> Result<()> {
    let identity = ctx.require_session()?;
    let client = ctx.client()?;
    let catalog = fetch_catalog(&client).await?;
    let personal = fetch_personal(&client, &identity.ticket_id).await?;

    let mine = reconcile::my_registrations(&catalog, &personal);
    if mine.is_empty() {
        println!("You haven't registered for any workshops yet.");
        return Ok(());
    }

    let mut out = table(["ID", "Title", "Time", "Location", "Registered", "Rated"]);
    for entry in mine {
        out.add_row(vec![
            entry.workshop.id.clone(),
            entry.workshop.title.clone(),
            entry.workshop.time.clone(),
            entry.workshop.location.clone(),
            display_date(&entry.registration.registration_time),
            if entry.rated { "yes" } else { "no" }.to_string(),
        ]);
    }
    println!("{out}");
    Ok(())
}
