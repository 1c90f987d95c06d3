//! User model.

use serde_json::{json, Value};

use super::required_text;
use crate::errors::InputError;

/// Display name given to users created by an implicit login.
pub const DEFAULT_USER_NAME: &str = "Guest";

/// A Meetling user, identified by the secret stored in the `auth_secret` cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub auth_secret: String,
}

impl User {
    /// JSON representation. `exclude_private` omits the authentication secret.
    pub fn json(&self, exclude_private: bool) -> Value {
        let mut value = json!({
            "__type__": "User",
            "id": self.id,
            "name": self.name,
        });
        if !exclude_private {
            value["auth_secret"] = Value::String(self.auth_secret.clone());
        }
        value
    }
}

/// Partial update of a user.
#[derive(Debug, Clone, Default)]
pub struct UserEdit {
    pub name: Option<String>,
}

impl UserEdit {
    pub fn apply(self, user: &mut User) -> Result<(), InputError> {
        if let Some(name) = self.name {
            user.name = required_text("name", &name)?;
        }
        Ok(())
    }
}
