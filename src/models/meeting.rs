//! Meeting model.

use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};

use super::{format_isotime, object_fields, required_text, str_or_none, Editable};
use crate::errors::InputError;

/// A meeting with its agenda stored separately as [`super::AgendaItem`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct Meeting {
    pub id: String,
    pub title: String,
    pub time: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub authors: Vec<String>,
}

impl Editable for Meeting {
    fn authors(&self) -> &[String] {
        &self.authors
    }

    fn json_fields(&self) -> Map<String, Value> {
        object_fields(json!({
            "__type__": "Meeting",
            "id": self.id,
            "title": self.title,
            "time": self.time.as_ref().map(format_isotime),
            "location": self.location,
            "description": self.description,
        }))
    }
}

/// Fields of a meeting to be created.
#[derive(Debug, Clone)]
pub struct NewMeeting {
    pub title: String,
    pub time: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub description: Option<String>,
}

impl NewMeeting {
    /// Normalise the fields. A blank title is an input error.
    pub fn new(
        title: &str,
        time: Option<DateTime<Utc>>,
        location: Option<&str>,
        description: Option<&str>,
    ) -> Result<Self, InputError> {
        Ok(Self {
            title: required_text("title", title)?,
            time,
            location: str_or_none(location),
            description: str_or_none(description),
        })
    }
}

/// Partial update of a meeting. `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default)]
pub struct MeetingEdit {
    pub title: Option<String>,
    pub time: Option<Option<DateTime<Utc>>>,
    pub location: Option<Option<String>>,
    pub description: Option<Option<String>>,
}

impl MeetingEdit {
    pub fn apply(self, meeting: &mut Meeting) -> Result<(), InputError> {
        if let Some(title) = self.title {
            meeting.title = required_text("title", &title)?;
        }
        if let Some(time) = self.time {
            meeting.time = time;
        }
        if let Some(location) = self.location {
            meeting.location = str_or_none(location.as_deref());
        }
        if let Some(description) = self.description {
            meeting.description = str_or_none(description.as_deref());
        }
        Ok(())
    }
}
