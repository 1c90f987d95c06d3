//! Site-wide settings singleton.

use serde_json::{json, Map, Value};

use super::{object_fields, required_text, str_or_none, Editable};
use crate::errors::InputError;

/// Identifier of the settings singleton.
pub const SETTINGS_ID: &str = "Settings";

/// Title of a freshly created site.
pub const DEFAULT_SETTINGS_TITLE: &str = "My Meetling";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub title: String,
    pub icon: Option<String>,
    pub favicon: Option<String>,
    pub authors: Vec<String>,
}

impl Editable for Settings {
    fn authors(&self) -> &[String] {
        &self.authors
    }

    fn json_fields(&self) -> Map<String, Value> {
        object_fields(json!({
            "__type__": "Settings",
            "id": SETTINGS_ID,
            "title": self.title,
            "icon": self.icon,
            "favicon": self.favicon,
        }))
    }
}

/// Partial update of the settings.
#[derive(Debug, Clone, Default)]
pub struct SettingsEdit {
    pub title: Option<String>,
    pub icon: Option<Option<String>>,
    pub favicon: Option<Option<String>>,
}

impl SettingsEdit {
    pub fn apply(self, settings: &mut Settings) -> Result<(), InputError> {
        if let Some(title) = self.title {
            settings.title = required_text("title", &title)?;
        }
        if let Some(icon) = self.icon {
            settings.icon = str_or_none(icon.as_deref());
        }
        if let Some(favicon) = self.favicon {
            settings.favicon = str_or_none(favicon.as_deref());
        }
        Ok(())
    }
}
