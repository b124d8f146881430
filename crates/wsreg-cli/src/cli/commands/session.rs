//! Login, logout and whoami.

use anyhow::{Result, bail};
use wsreg_core::actions;

use super::Context;

pub async fn login(ctx: &Context<'_>, ticket_input: &str) -> Result<()> {
    let Some(ticket_id) = actions::normalize_ticket(ticket_input) else {
        bail!("Please enter your ticket ID");
    };
    let client = ctx.client()?;
    let outcome = actions::login(&client, &ctx.store, &ticket_id).await?;

    let identity = &outcome.identity;
    println!("Logged in as {} ({})", identity.full_name(), identity.ticket_id);
    if identity.is_admin {
        println!("Admin access: {}", identity.admin_scope.label());
    }
    println!(
        "{} registration(s), {} rating(s) on record.",
        outcome.personal.registrations.len(),
        outcome.personal.ratings.len()
    );
    Ok(())
}

pub fn logout(ctx: &Context<'_>) -> Result<()> {
    let had_session = ctx.store.restore().is_some();
    ctx.store.clear()?;
    if had_session {
        println!("Logged out.");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}

pub fn whoami(ctx: &Context<'_>) {
    match ctx.store.restore() {
        Some(identity) => {
            println!("{} ({})", identity.full_name(), identity.ticket_id);
            if identity.is_admin {
                println!("Admin access: {}", identity.admin_scope.label());
            }
        }
        None => println!("Not logged in."),
    }
}
