//! Client error reporting endpoint.

use axum::{
    extract::{Extension, State},
    http::{header, HeaderMap},
};

use super::JsonArgs;
use crate::auth::Session;
use crate::errors::{AppError, ErrorReason, InputError};
use crate::models::{str_or_none, User};
use crate::AppState;

/// Error report sent by the web client. `type` and `url` are kept as sent.
struct ClientError<'a> {
    error_type: &'a str,
    message: Option<&'a str>,
    stack: &'a str,
    url: &'a str,
}

impl ClientError<'_> {
    fn log_message(&self, user: &User, device_info: &str) -> String {
        let message_part = self.message.map(|m| format!(": {m}")).unwrap_or_default();
        format!(
            "Client error occurred\n{}{}\nStack:\n{}\nURL: {}\nUser: {} ({})\nDevice info: {}",
            self.error_type, message_part, self.stack, self.url, user.name, user.id, device_info,
        )
    }
}

/// POST /log-client-error - Log an error that occurred in the web client.
///
/// Only available to authenticated users.
pub async fn log_client_error(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    headers: HeaderMap,
    JsonArgs(args): JsonArgs,
) -> Result<(), AppError> {
    let user = session.user.ok_or(AppError::Permission)?;

    let args = state.schemas.log_client_error.check(&args)?;
    let error_type = args.str("type").unwrap_or_default();
    let url = args.str("url").unwrap_or_default();
    let stack = args.str("stack").unwrap_or_default().trim();

    let mut e = InputError::new();
    for (name, value) in [("type", error_type), ("stack", stack), ("url", url)] {
        if value.trim().is_empty() {
            e.insert(name, ErrorReason::Empty);
        }
    }
    e.into_result()?;

    let message = str_or_none(args.nullable_str("message").flatten());
    let device_info = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    let report = ClientError {
        error_type,
        message: message.as_deref(),
        stack,
        url,
    };
    tracing::error!(
        target: "meetling::client",
        error_type = %error_type,
        url = %url,
        user_id = %user.id,
        user_name = %user.name,
        device_info = %device_info,
        "{}",
        report.log_message(&user, device_info),
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_message() {
        let user = User {
            id: "u1".to_string(),
            name: "Happy".to_string(),
            auth_secret: "s".to_string(),
        };
        let report = ClientError {
            error_type: " TypeError ",
            message: Some("Oops"),
            stack: "meetling.Page.prototype.foo",
            url: "/meetings/abc ",
        };

        assert_eq!(
            report.log_message(&user, "FooBrowser/1.0"),
            "Client error occurred\n TypeError : Oops\nStack:\nmeetling.Page.prototype.foo\nURL: /meetings/abc \nUser: Happy (u1)\nDevice info: FooBrowser/1.0"
        );
    }

    #[test]
    fn test_log_message_without_message() {
        let user = User {
            id: "u1".to_string(),
            name: "Happy".to_string(),
            auth_secret: "s".to_string(),
        };
        let report = ClientError {
            error_type: "Error",
            message: None,
            stack: "foo",
            url: "/",
        };

        assert!(report
            .log_message(&user, "-")
            .starts_with("Client error occurred\nError\nStack:\nfoo\n"));
    }
}
