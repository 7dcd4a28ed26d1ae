use anyhow::Result;
use chrono::Local;

use crate::context::AppContext;
use crate::render;

/// List events for a city, highlighting the nearby ones.
pub async fn list(ctx: &AppContext, city: Option<String>, state: Option<String>) -> Result<()> {
    let city = city.unwrap_or_else(|| ctx.config.events_api.default_city.clone());
    let state = state.unwrap_or_else(|| ctx.config.events_api.default_state.clone());

    let events = ctx.feed.fetch_events(&city, &state).await;
    if events.is_empty() {
        println!("No events found for {city}, {state}");
        return Ok(());
    }

    println!("Nearby");
    for event in ctx.feed.highlights() {
        println!("  {}", render::event_line(&event));
    }
    println!();
    println!("All events in {city}, {state}");
    for event in &events {
        let marker = if ctx.favorites.is_favorite(&event.id) { "★" } else { " " };
        println!("{marker} {}", render::event_line(event));
    }
    Ok(())
}

/// Detail view for one event from the default listing.
pub async fn show(ctx: &AppContext, event_id: &str) -> Result<()> {
    let event = super::favorites::resolve_event(ctx, event_id).await?;
    let now = Local::now().naive_local();
    println!("{}", render::event_detail(&event, now, ctx.favorites.is_favorite(&event.id)));
    if ctx.auth.current_user().is_some() {
        println!("  rsvp {}", ctx.rsvp.state(&event.id).await?);
    }
    Ok(())
}
