//! Agenda item API endpoints.

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::Value;

use super::{nullable_string, ApiResult, JsonArgs};
use crate::auth::Session;
use crate::models::{AgendaItemEdit, NewAgendaItem};
use crate::AppState;

/// GET /api/meetings/:id/items - List the agenda of a meeting.
pub async fn list_items(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let items = state.repo.list_agenda_items(&id).await?;

    let mut json = Vec::with_capacity(items.len());
    for item in &items {
        json.push(state.repo.json(item, true).await?);
    }
    Ok(Json(Value::Array(json)))
}

/// POST /api/meetings/:id/items - Add an agenda item to a meeting.
pub async fn create_item(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    JsonArgs(args): JsonArgs,
) -> ApiResult {
    let args = state.schemas.create_agenda_item.check(&args)?;
    let new = NewAgendaItem::new(
        args.str("title").unwrap_or_default(),
        args.nullable_i64("duration").flatten(),
        args.nullable_str("description").flatten(),
    )?;

    let item = state
        .repo
        .create_agenda_item(&id, new, session.user.as_ref())
        .await?;
    Ok(Json(state.repo.json(&item, true).await?))
}

/// GET /api/meetings/:id/items/:item_id - Get an agenda item.
pub async fn get_item(
    State(state): State<AppState>,
    Path((meeting_id, item_id)): Path<(String, String)>,
) -> ApiResult {
    let item = state.repo.get_agenda_item(&meeting_id, &item_id).await?;
    Ok(Json(state.repo.json(&item, true).await?))
}

/// POST /api/meetings/:id/items/:item_id - Edit an agenda item.
pub async fn edit_item(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path((meeting_id, item_id)): Path<(String, String)>,
    JsonArgs(args): JsonArgs,
) -> ApiResult {
    let args = state.schemas.edit_agenda_item.check(&args)?;
    let edit = AgendaItemEdit {
        title: args.str("title").map(str::to_string),
        duration: args.nullable_i64("duration"),
        description: nullable_string(args.nullable_str("description")),
    };

    let item = state
        .repo
        .edit_agenda_item(&meeting_id, &item_id, edit, session.user.as_ref())
        .await?;
    Ok(Json(state.repo.json(&item, true).await?))
}
