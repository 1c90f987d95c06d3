//! Agenda item model.

use serde_json::{json, Map, Value};

use super::{object_fields, required_text, str_or_none, Editable};
use crate::errors::InputError;

/// An entry on the agenda of a meeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgendaItem {
    pub id: String,
    pub meeting_id: String,
    pub title: String,
    /// Duration in minutes
    pub duration: Option<i64>,
    pub description: Option<String>,
    pub authors: Vec<String>,
}

impl Editable for AgendaItem {
    fn authors(&self) -> &[String] {
        &self.authors
    }

    fn json_fields(&self) -> Map<String, Value> {
        object_fields(json!({
            "__type__": "AgendaItem",
            "id": self.id,
            "title": self.title,
            "duration": self.duration,
            "description": self.description,
        }))
    }
}

/// Fields of an agenda item to be created.
#[derive(Debug, Clone)]
pub struct NewAgendaItem {
    pub title: String,
    pub duration: Option<i64>,
    pub description: Option<String>,
}

impl NewAgendaItem {
    pub fn new(
        title: &str,
        duration: Option<i64>,
        description: Option<&str>,
    ) -> Result<Self, InputError> {
        Ok(Self {
            title: required_text("title", title)?,
            duration,
            description: str_or_none(description),
        })
    }
}

/// Partial update of an agenda item.
#[derive(Debug, Clone, Default)]
pub struct AgendaItemEdit {
    pub title: Option<String>,
    pub duration: Option<Option<i64>>,
    pub description: Option<Option<String>>,
}

impl AgendaItemEdit {
    pub fn apply(self, item: &mut AgendaItem) -> Result<(), InputError> {
        if let Some(title) = self.title {
            item.title = required_text("title", &title)?;
        }
        if let Some(duration) = self.duration {
            item.duration = duration;
        }
        if let Some(description) = self.description {
            item.description = str_or_none(description.as_deref());
        }
        Ok(())
    }
}
