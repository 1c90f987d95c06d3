//! Data models for the Meetling application.
//!
//! Entities are serialized to the JSON shape the web client expects: every object carries
//! `__type__` and `id`, editable objects carry the ids of their authors.

mod agenda_item;
mod meeting;
mod settings;
mod user;

pub use agenda_item::*;
pub use meeting::*;
pub use settings::*;
pub use user::*;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::errors::{ErrorReason, InputError};

/// Object that records which users created or edited it.
pub trait Editable {
    fn authors(&self) -> &[String];

    /// JSON fields of the object, without any user data.
    fn json_fields(&self) -> Map<String, Value>;
}

/// Fields of a JSON object literal.
fn object_fields(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Record `user_id` as author of an editable object, keeping first-edit order.
pub fn add_author(authors: &mut Vec<String>, user_id: Option<&str>) {
    if let Some(id) = user_id {
        if !authors.iter().any(|a| a == id) {
            authors.push(id.to_string());
        }
    }
}

/// Trimmed string, `None` if it is blank.
pub fn str_or_none(s: Option<&str>) -> Option<String> {
    s.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Required text field: trimmed, blank is an `empty` input error.
pub fn required_text(name: &str, value: &str) -> Result<String, InputError> {
    str_or_none(Some(value)).ok_or_else(|| InputError::field(name, ErrorReason::Empty))
}

/// Parse an ISO-8601 (RFC 3339) timestamp, normalised to UTC.
pub fn parse_isotime(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s.trim()).map(|t| t.with_timezone(&Utc))
}

/// Render a timestamp as ISO-8601 with millisecond precision, e.g. `2015-08-27T00:42:00.000Z`.
pub fn format_isotime(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_str_or_none() {
        assert_eq!(str_or_none(Some("  Purring ")), Some("Purring".to_string()));
        assert_eq!(str_or_none(Some("   ")), None);
        assert_eq!(str_or_none(Some("")), None);
        assert_eq!(str_or_none(None), None);
    }

    #[test]
    fn test_required_text() {
        assert_eq!(required_text("title", " Cat Hangout").unwrap(), "Cat Hangout");
        let err = required_text("title", " \n").unwrap_err();
        assert_eq!(err.errors.get("title"), Some(&ErrorReason::Empty));
    }

    #[test]
    fn test_isotime() {
        let t = parse_isotime("2015-08-27T00:42:00.000Z").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2015, 8, 27, 0, 42, 0).unwrap());
        assert_eq!(format_isotime(&t), "2015-08-27T00:42:00.000Z");

        let t = parse_isotime("2015-08-27T02:42:00+02:00").unwrap();
        assert_eq!(format_isotime(&t), "2015-08-27T00:42:00.000Z");

        assert!(parse_isotime("next tuesday").is_err());
    }

    #[test]
    fn test_add_author() {
        let mut authors = vec!["a".to_string()];
        add_author(&mut authors, Some("b"));
        add_author(&mut authors, Some("a"));
        add_author(&mut authors, None);
        assert_eq!(authors, vec!["a", "b"]);
    }
}
