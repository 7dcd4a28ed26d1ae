//! Remote document layout
//!
//! Every collection path the services touch is built here so the layout is
//! defined in one place.

use eventide_domain::constants::{
    ATTENDEES_COLLECTION, CHAT_COLLECTION, EVENTS_COLLECTION, USERS_COLLECTION,
};
use eventide_domain::{DocumentPath, Result};

/// `events`
pub fn events() -> Result<DocumentPath> {
    DocumentPath::new([EVENTS_COLLECTION])
}

/// `events/{event_id}/attendees`
pub fn attendees(event_id: &str) -> Result<DocumentPath> {
    DocumentPath::new([EVENTS_COLLECTION, event_id, ATTENDEES_COLLECTION])
}

/// `events/{event_id}/attendees/{uid}`
pub fn attendee(event_id: &str, uid: &str) -> Result<DocumentPath> {
    attendees(event_id)?.child(uid)
}

/// `events/{event_id}/chat`
pub fn chat(event_id: &str) -> Result<DocumentPath> {
    DocumentPath::new([EVENTS_COLLECTION, event_id, CHAT_COLLECTION])
}

/// `users/{uid}`
pub fn user(uid: &str) -> Result<DocumentPath> {
    DocumentPath::new([USERS_COLLECTION, uid])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attendee_path_layout() {
        assert_eq!(attendee("evt-42", "abc123").unwrap().to_string(), "events/evt-42/attendees/abc123");
    }

    #[test]
    fn empty_ids_are_rejected() {
        assert!(attendee("", "abc123").is_err());
        assert!(user("").is_err());
    }
}
