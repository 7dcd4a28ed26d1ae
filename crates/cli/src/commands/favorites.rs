use anyhow::{anyhow, Result};
use eventide_domain::EventSummary;

use crate::context::AppContext;
use crate::render;

pub fn list(ctx: &AppContext) -> Result<()> {
    let favorites = ctx.favorites.list_favorites();
    if favorites.is_empty() {
        println!("No favorites yet");
    }
    for event in &favorites {
        println!("{}", render::event_line(event));
    }
    Ok(())
}

pub async fn add(ctx: &AppContext, event_id: &str) -> Result<()> {
    let event = resolve_event(ctx, event_id).await?;
    let name = event.name.clone();
    if ctx.favorites.add_favorite(event).await {
        println!("Added \"{name}\" to favorites");
    } else {
        println!("\"{name}\" is already a favorite");
    }
    Ok(())
}

pub async fn remove(ctx: &AppContext, event_id: &str) -> Result<()> {
    if ctx.favorites.remove_favorite(event_id).await {
        println!("Removed {event_id} from favorites");
    } else {
        println!("{event_id} was not a favorite");
    }
    Ok(())
}

/// Find an event among the favorites or, failing that, the default listing.
pub async fn resolve_event(ctx: &AppContext, event_id: &str) -> Result<EventSummary> {
    if let Some(event) = ctx.favorites.list_favorites().into_iter().find(|e| e.id == event_id) {
        return Ok(event);
    }
    let listing = &ctx.config.events_api;
    ctx.feed.fetch_events(&listing.default_city, &listing.default_state).await;
    ctx.feed.find(event_id).ok_or_else(|| {
        anyhow!(
            "Event {event_id} not found in {}, {}",
            listing.default_city,
            listing.default_state
        )
    })
}
