//! Meeting API endpoints.

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use chrono::{DateTime, Utc};

use super::{nullable_string, ApiResult, JsonArgs};
use crate::auth::Session;
use crate::errors::{AppError, ErrorReason, InputError};
use crate::models::{parse_isotime, MeetingEdit, NewMeeting};
use crate::validation::Args;
use crate::AppState;

/// POST /api/meetings - Create a meeting.
pub async fn create_meeting(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    JsonArgs(args): JsonArgs,
) -> ApiResult {
    let args = state.schemas.create_meeting.check(&args)?;
    let time = time_arg(&args)?.flatten();

    let new = NewMeeting::new(
        args.str("title").unwrap_or_default(),
        time,
        args.nullable_str("location").flatten(),
        args.nullable_str("description").flatten(),
    )?;
    let meeting = state.repo.create_meeting(new, session.user.as_ref()).await?;
    Ok(Json(state.repo.json(&meeting, true).await?))
}

/// POST /api/create-example-meeting - Create a meeting with sample data.
pub async fn create_example_meeting(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    JsonArgs(_args): JsonArgs,
) -> ApiResult {
    let meeting = state
        .repo
        .create_example_meeting(session.user.as_ref())
        .await?;
    Ok(Json(state.repo.json(&meeting, true).await?))
}

/// GET /api/meetings/:id - Get a meeting.
pub async fn get_meeting(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let meeting = state.repo.get_meeting(&id).await?;
    Ok(Json(state.repo.json(&meeting, true).await?))
}

/// POST /api/meetings/:id - Edit a meeting.
pub async fn edit_meeting(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    JsonArgs(args): JsonArgs,
) -> ApiResult {
    let args = state.schemas.edit_meeting.check(&args)?;
    let edit = MeetingEdit {
        title: args.str("title").map(str::to_string),
        time: time_arg(&args)?,
        location: nullable_string(args.nullable_str("location")),
        description: nullable_string(args.nullable_str("description")),
    };

    let meeting = state
        .repo
        .edit_meeting(&id, edit, session.user.as_ref())
        .await?;
    Ok(Json(state.repo.json(&meeting, true).await?))
}

/// The `time` argument: absent, cleared (null or empty) or an ISO-8601 timestamp.
///
/// Text that is not a valid timestamp is a `bad_type` input error.
fn time_arg(args: &Args) -> Result<Option<Option<DateTime<Utc>>>, AppError> {
    match args.nullable_str("time") {
        None => Ok(None),
        Some(None) => Ok(Some(None)),
        Some(Some(s)) if s.trim().is_empty() => Ok(Some(None)),
        Some(Some(s)) => match parse_isotime(s) {
            Ok(time) => Ok(Some(Some(time))),
            Err(_) => Err(InputError::field("time", ErrorReason::BadType).into()),
        },
    }
}
