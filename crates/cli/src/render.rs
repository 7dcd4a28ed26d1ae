//! Plain-text rendering for terminal output

use chrono::NaiveDateTime;
use eventide_domain::{Attendee, ChatMessage, Countdown, EventSummary};

pub fn event_line(event: &EventSummary) -> String {
    let when = match (event.start_date.is_empty(), event.start_time.is_empty()) {
        (false, false) => format!("{} {}", event.start_date, event.start_time),
        (false, true) => event.start_date.clone(),
        _ => "date tbd".to_string(),
    };
    format!("{}  {}  ({when})", event.id, event.name)
}

/// Multi-line detail block, countdown relative to `now`.
pub fn event_detail(event: &EventSummary, now: NaiveDateTime, favorite: bool) -> String {
    let mut lines = vec![event_line(event)];
    if !event.summary.is_empty() {
        lines.push(format!("  {}", event.summary));
    }
    if !event.address.is_empty() {
        lines.push(format!("  at {}", event.address));
    }
    if event.has_location() {
        lines.push(format!("  map {:.4}, {:.4} [{}]", event.latitude, event.longitude, event.category()));
    }
    lines.push(match event.countdown(now) {
        remaining @ Countdown::Remaining { .. } => format!("  starts in {remaining}"),
        other => format!("  {other}"),
    });
    if let Some(url) = &event.tickets_url {
        lines.push(format!("  tickets {url}"));
    }
    if favorite {
        lines.push("  ★ favorite".to_string());
    }
    lines.join("\n")
}

pub fn attendee_line(attendee: &Attendee) -> String {
    let email = attendee.email.as_deref().unwrap_or("(no email)");
    match attendee.rsvped_at {
        Some(at) => format!("{email}  {}", at.format("%Y-%m-%d %H:%M")),
        None => email.to_string(),
    }
}

pub fn message_line(message: &ChatMessage, own: bool) -> String {
    let sender = if own { "you" } else { message.sender_name.as_str() };
    format!("[{sender}] {}", message.message)
}
