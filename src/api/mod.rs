//! JSON REST API module.
//!
//! Every endpoint decodes its (optional) JSON object body into [`JsonArgs`], checks it
//! against one of the [`Schemas`] and delegates to the repository.

mod client_errors;
mod items;
mod login;
mod meetings;
mod settings;
mod users;

pub use client_errors::*;
pub use items::*;
pub use login::*;
pub use meetings::*;
pub use settings::*;
pub use users::*;

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    Json,
};
use serde_json::{Map, Value};

use crate::errors::AppError;
use crate::validation::{Kind, Schema, SchemaError};

/// Response type of JSON endpoints.
pub type ApiResult = Result<Json<Value>, AppError>;

/// Arguments passed by the client as a JSON object body.
///
/// An empty body yields no arguments. Malformed JSON or a body that is not an object is
/// a bad request.
#[derive(Debug, Default)]
pub struct JsonArgs(pub Map<String, Value>);

impl<S> FromRequest<S> for JsonArgs
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        if body.is_empty() {
            return Ok(JsonArgs::default());
        }

        match serde_json::from_slice::<Value>(&body)? {
            Value::Object(args) => Ok(JsonArgs(args)),
            _ => Err(AppError::BadRequest(
                "arguments must be a JSON object".to_string(),
            )),
        }
    }
}

/// Argument schemas of all endpoints, built once at startup.
#[derive(Debug, Clone)]
pub struct Schemas {
    pub log_client_error: Schema,
    pub create_meeting: Schema,
    pub edit_meeting: Schema,
    pub edit_user: Schema,
    pub edit_settings: Schema,
    pub create_agenda_item: Schema,
    pub edit_agenda_item: Schema,
}

impl Schemas {
    pub fn new() -> Result<Self, SchemaError> {
        use Kind::{Int, Null, Str};

        Ok(Self {
            log_client_error: Schema::builder()
                .required("type", &[Str])
                .required("stack", &[Str])
                .required("url", &[Str])
                .optional("message", &[Str, Null])
                .build()?,
            create_meeting: Schema::builder()
                .required("title", &[Str])
                .optional("time", &[Str, Null])
                .optional("location", &[Str, Null])
                .optional("description", &[Str, Null])
                .build()?,
            edit_meeting: Schema::builder()
                .optional("title", &[Str])
                .optional("time", &[Str, Null])
                .optional("location", &[Str, Null])
                .optional("description", &[Str, Null])
                .build()?,
            edit_user: Schema::builder().optional("name", &[Str]).build()?,
            edit_settings: Schema::builder()
                .optional("title", &[Str])
                .optional("icon", &[Str, Null])
                .optional("favicon", &[Str, Null])
                .build()?,
            create_agenda_item: Schema::builder()
                .required("title", &[Str])
                .optional("duration", &[Int, Null])
                .optional("description", &[Str, Null])
                .build()?,
            edit_agenda_item: Schema::builder()
                .optional("title", &[Str])
                .optional("duration", &[Int, Null])
                .optional("description", &[Str, Null])
                .build()?,
        })
    }
}

/// Owned copy of a nullable string argument.
fn nullable_string(value: Option<Option<&str>>) -> Option<Option<String>> {
    value.map(|v| v.map(str::to_string))
}
