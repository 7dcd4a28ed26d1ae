//! Event listing types
//!
//! `EventSummary` is the immutable value fetched from the listing source and
//! the unit stored in a user's favorites. Its serialized form (camelCase) is
//! the blob persisted in the on-device cache.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_domain_enum_conversions;

/// Display data for a single fetched event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(with = "nan_as_null", default = "nan")]
    pub latitude: f64,
    #[serde(with = "nan_as_null", default = "nan")]
    pub longitude: f64,
    #[serde(default)]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tickets_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl EventSummary {
    /// Icon category derived from the free-text tag.
    pub fn category(&self) -> EventCategory {
        EventCategory::from_tag(self.category.as_deref())
    }

    /// Whether both coordinates parsed to real numbers.
    pub fn has_location(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// Local wall-clock start, if `start_date`/`start_time` parse.
    pub fn starts_at(&self) -> Option<NaiveDateTime> {
        let date = NaiveDate::parse_from_str(self.start_date.trim(), "%Y-%m-%d").ok()?;
        let raw_time = self.start_time.trim();
        let time = NaiveTime::parse_from_str(raw_time, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(raw_time, "%H:%M"))
            .ok()?;
        Some(date.and_time(time))
    }

    /// Time remaining until the event starts, relative to `now`.
    pub fn countdown(&self, now: NaiveDateTime) -> Countdown {
        let Some(start) = self.starts_at() else {
            return Countdown::Unknown;
        };

        let remaining = (start - now).num_seconds();
        if remaining <= 0 {
            return Countdown::Started;
        }

        let hours = remaining / 3600;
        let minutes = (remaining % 3600) / 60;
        let seconds = remaining % 60;
        Countdown::Remaining { hours, minutes, seconds }
    }
}

/// Countdown shown on the event detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    Remaining { hours: i64, minutes: i64, seconds: i64 },
    Started,
    /// Start date or time could not be parsed.
    Unknown,
}

impl std::fmt::Display for Countdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remaining { hours, minutes, seconds } => {
                write!(f, "{hours}h {minutes}m {seconds}s")
            }
            Self::Started => f.write_str("Event started"),
            Self::Unknown => f.write_str("Start time unavailable"),
        }
    }
}

/// Map-marker category inferred from an event's tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Music,
    Art,
    Party,
    Food,
    Other,
}

impl EventCategory {
    /// Case-insensitive substring match; first hit wins. Any tag containing
    /// "party" also contains "art", so `Party` is never produced here.
    pub fn from_tag(tag: Option<&str>) -> Self {
        let tag = tag.map(str::to_lowercase).unwrap_or_default();
        if tag.contains("music") {
            Self::Music
        } else if tag.contains("art") {
            Self::Art
        } else if tag.contains("party") {
            Self::Party
        } else if tag.contains("food") {
            Self::Food
        } else {
            Self::Other
        }
    }
}

impl_domain_enum_conversions!(EventCategory {
    Music => "music",
    Art => "art",
    Party => "party",
    Food => "food",
    Other => "other",
});

/// RSVP state of one (user, event) pair. Both transitions are allowed from
/// either state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsvpState {
    #[default]
    NotRsvped,
    Rsvped,
}

impl RsvpState {
    pub fn from_flag(rsvped: bool) -> Self {
        if rsvped {
            Self::Rsvped
        } else {
            Self::NotRsvped
        }
    }

    pub fn is_rsvped(self) -> bool {
        matches!(self, Self::Rsvped)
    }
}

impl_domain_enum_conversions!(RsvpState {
    NotRsvped => "not_rsvped",
    Rsvped => "rsvped",
});

/// Attendee record as listed for event administrators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendee {
    pub uid: String,
    pub email: Option<String>,
    pub rsvped_at: Option<DateTime<Utc>>,
}

/// Parse a coordinate the way the listing source is parsed: leading numeric
/// prefix (or a signed `Infinity`), `NaN` when nothing numeric is present.
pub fn parse_coordinate(raw: &str) -> f64 {
    let trimmed = raw.trim_start();
    let (sign, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1.0, &trimmed[1..]),
        Some(b'+') => (1.0, &trimmed[1..]),
        _ => (1.0, trimmed),
    };
    if unsigned.starts_with("Infinity") {
        return sign * f64::INFINITY;
    }
    let end = numeric_prefix_len(trimmed);
    trimmed[..end].parse().unwrap_or(f64::NAN)
}

fn numeric_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut idx = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        idx += 1;
    }
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut seen_exp = false;
    let mut last_valid = 0;
    while idx < bytes.len() {
        match bytes[idx] {
            b'0'..=b'9' => {
                seen_digit = true;
                last_valid = idx + 1;
            }
            b'.' if !seen_dot && !seen_exp => seen_dot = true,
            b'e' | b'E' if seen_digit && !seen_exp => {
                seen_exp = true;
                if matches!(bytes.get(idx + 1), Some(b'+' | b'-')) {
                    idx += 1;
                }
            }
            _ => break,
        }
        idx += 1;
    }
    last_valid
}

fn nan() -> f64 {
    f64::NAN
}

/// JSON has no NaN; malformed coordinates travel as `null`.
mod nan_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(date: &str, time: &str) -> EventSummary {
        EventSummary {
            id: "evt-1".into(),
            name: "Jazz Night".into(),
            summary: String::new(),
            start_date: date.into(),
            start_time: time.into(),
            end_time: "23:00".into(),
            latitude: 33.749,
            longitude: -84.388,
            address: "Atlanta, GA".into(),
            event_url: None,
            tickets_url: None,
            category: Some("Live Music".into()),
        }
    }

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn countdown_splits_hours_minutes_seconds() {
        let countdown = event("2025-06-01", "20:00").countdown(at("2025-05-31 18:58:30"));
        assert_eq!(countdown, Countdown::Remaining { hours: 25, minutes: 1, seconds: 30 });
        assert_eq!(countdown.to_string(), "25h 1m 30s");
    }

    #[test]
    fn countdown_reports_started_at_and_after_start() {
        let evt = event("2025-06-01", "20:00:00");
        assert_eq!(evt.countdown(at("2025-06-01 20:00:00")), Countdown::Started);
        assert_eq!(evt.countdown(at("2025-06-02 08:00:00")).to_string(), "Event started");
    }

    #[test]
    fn countdown_unknown_for_unparseable_start() {
        assert_eq!(event("next friday", "8pm").countdown(at("2025-06-01 00:00:00")), Countdown::Unknown);
    }

    #[test]
    fn category_matches_in_priority_order() {
        assert_eq!(EventCategory::from_tag(Some("Music & Arts")), EventCategory::Music);
        assert_eq!(EventCategory::from_tag(Some("Street ART")), EventCategory::Art);
        // "party" contains "art", and art is checked first.
        assert_eq!(EventCategory::from_tag(Some("Rooftop party")), EventCategory::Art);
        assert_eq!(EventCategory::from_tag(Some("Food trucks")), EventCategory::Food);
        assert_eq!(EventCategory::from_tag(Some("Tech meetup")), EventCategory::Other);
        assert_eq!(EventCategory::from_tag(None), EventCategory::Other);
    }

    #[test]
    fn nan_coordinates_survive_json_as_null() {
        let mut evt = event("2025-06-01", "20:00");
        evt.latitude = f64::NAN;

        let json = serde_json::to_value(&evt).unwrap();
        assert!(json["latitude"].is_null());
        assert_eq!(json["startDate"], "2025-06-01");

        let back: EventSummary = serde_json::from_value(json).unwrap();
        assert!(back.latitude.is_nan());
        assert!(!back.has_location());
        assert_eq!(back.longitude, -84.388);
    }

    #[test]
    fn coordinate_parsing_takes_numeric_prefix() {
        assert_eq!(parse_coordinate("33.7490"), 33.749);
        assert_eq!(parse_coordinate(" -84.388abc"), -84.388);
        assert_eq!(parse_coordinate("1e2"), 100.0);
        assert_eq!(parse_coordinate("12e"), 12.0);
        assert!(parse_coordinate("north").is_nan());
        assert!(parse_coordinate("").is_nan());
        assert!(parse_coordinate("-").is_nan());
    }

    #[test]
    fn coordinate_parsing_accepts_signed_infinity() {
        assert_eq!(parse_coordinate("-Infinity"), f64::NEG_INFINITY);
        assert_eq!(parse_coordinate(" +Infinityx"), f64::INFINITY);
        assert!(parse_coordinate("infinity").is_nan());

        let mut evt = event("2025-06-01", "20:00");
        evt.latitude = parse_coordinate("Infinity");
        assert!(!evt.has_location());
    }

    #[test]
    fn rsvp_state_round_trips_flag() {
        assert_eq!(RsvpState::from_flag(true), RsvpState::Rsvped);
        assert!(!RsvpState::default().is_rsvped());
    }
}
