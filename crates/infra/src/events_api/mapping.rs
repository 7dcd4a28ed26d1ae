//! Listing API schema and its mapping onto `EventSummary`

use eventide_domain::{parse_coordinate, EventSummary};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawVenue {
    latitude: Value,
    longitude: Value,
    localized_address_display: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawEvent {
    eid: Option<String>,
    event_name: Option<String>,
    summary: Option<String>,
    start_date: Option<String>,
    start_time: Option<String>,
    end_time: Option<String>,
    event_url: Option<String>,
    tickets_url: Option<String>,
    primary_venue: Option<RawVenue>,
}

impl RawEvent {
    pub(crate) fn into_summary(self) -> Option<EventSummary> {
        let id = self.eid.filter(|id| !id.is_empty())?;
        let venue = self.primary_venue.unwrap_or_default();
        Some(EventSummary {
            id,
            name: self.event_name.unwrap_or_default(),
            summary: self.summary.unwrap_or_default(),
            start_date: self.start_date.unwrap_or_default(),
            start_time: self.start_time.unwrap_or_default(),
            end_time: self.end_time.unwrap_or_default(),
            latitude: coordinate(&venue.latitude),
            longitude: coordinate(&venue.longitude),
            address: venue.localized_address_display.unwrap_or_default(),
            event_url: self.event_url,
            tickets_url: self.tickets_url,
            category: None,
        })
    }
}

/// Coordinates arrive as strings, occasionally as numbers.
fn coordinate(value: &Value) -> f64 {
    match value {
        Value::String(raw) => parse_coordinate(raw),
        Value::Number(number) => number.as_f64().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

/// Map a listing response body. A missing or non-array `events` field is an
/// empty batch; records without an id or with an unreadable shape are
/// skipped.
pub(crate) fn map_listing(body: &Value) -> Vec<EventSummary> {
    let Some(records) = body.get("events").and_then(Value::as_array) else {
        return Vec::new();
    };

    records
        .iter()
        .filter_map(|record| match RawEvent::deserialize(record) {
            Ok(raw) => raw.into_summary(),
            Err(err) => {
                debug!(error = %err, "Skipping unreadable event record");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn maps_record_field_by_field() {
        let body = json!({"events": [{
            "eid": "evt-1",
            "event_name": "Jazz Night",
            "summary": "Live jazz",
            "start_date": "2025-06-01",
            "start_time": "19:30",
            "end_time": "22:00",
            "event_url": "https://example.com/e/1",
            "tickets_url": "https://example.com/t/1",
            "primary_venue": {
                "latitude": "33.7490",
                "longitude": "-84.3880",
                "localized_address_display": "Atlanta, GA"
            }
        }]});

        let events = map_listing(&body);

        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.id, "evt-1");
        assert_eq!(event.name, "Jazz Night");
        assert_eq!(event.start_time, "19:30");
        assert_eq!(event.latitude, 33.749);
        assert_eq!(event.longitude, -84.388);
        assert_eq!(event.address, "Atlanta, GA");
        assert_eq!(event.tickets_url.as_deref(), Some("https://example.com/t/1"));
    }

    #[test]
    fn malformed_coordinates_become_nan() {
        let body = json!({"events": [{
            "eid": "evt-2",
            "primary_venue": {"latitude": "n/a", "longitude": 12.5}
        }]});

        let event = &map_listing(&body)[0];
        assert!(event.latitude.is_nan());
        assert_eq!(event.longitude, 12.5);
        assert!(!event.has_location());
    }

    #[test]
    fn missing_venue_is_tolerated() {
        let event = &map_listing(&json!({"events": [{"eid": "evt-3"}]}))[0];
        assert!(event.latitude.is_nan());
        assert_eq!(event.address, "");
    }

    #[test]
    fn non_array_events_is_empty() {
        assert!(map_listing(&json!({})).is_empty());
        assert!(map_listing(&json!({"events": null})).is_empty());
        assert!(map_listing(&json!({"events": {"eid": "x"}})).is_empty());
    }

    #[test]
    fn records_without_id_are_skipped() {
        let body = json!({"events": [{"event_name": "No id"}, {"eid": "ok"}, 42]});
        let ids: Vec<_> = map_listing(&body).into_iter().map(|e| e.id).collect();
        assert_eq!(ids, ["ok"]);
    }
}
