use anyhow::Result;
use eventide_domain::RsvpState;

use crate::context::AppContext;
use crate::render;

pub async fn rsvp(ctx: &AppContext, event_id: &str) -> Result<()> {
    ctx.rsvp.rsvp(event_id).await?;
    println!("You're going to {event_id}");
    Ok(())
}

pub async fn cancel(ctx: &AppContext, event_id: &str) -> Result<()> {
    ctx.rsvp.cancel(event_id).await?;
    println!("RSVP to {event_id} cancelled");
    Ok(())
}

pub async fn toggle(ctx: &AppContext, event_id: &str) -> Result<()> {
    let current = ctx.rsvp.state(event_id).await?;
    match ctx.rsvp.toggle(event_id, current).await? {
        RsvpState::Rsvped => println!("You're going to {event_id}"),
        RsvpState::NotRsvped => println!("RSVP to {event_id} cancelled"),
    }
    Ok(())
}

pub async fn status(ctx: &AppContext, event_id: &str) -> Result<()> {
    println!("{}", ctx.rsvp.state(event_id).await?);
    Ok(())
}

pub async fn attendees(ctx: &AppContext, event_id: &str) -> Result<()> {
    let attendees = ctx.rsvp.list_attendees(event_id).await?;
    println!("{} attending", attendees.len());
    for attendee in &attendees {
        println!("  {}", render::attendee_line(attendee));
    }
    Ok(())
}
