//! Settings API endpoints.

use axum::{
    extract::{Extension, State},
    Json,
};

use super::{nullable_string, ApiResult, JsonArgs};
use crate::auth::Session;
use crate::models::SettingsEdit;
use crate::AppState;

/// GET /api/settings - Get the site settings.
pub async fn get_settings(State(state): State<AppState>) -> ApiResult {
    let settings = state.repo.get_settings().await?;
    Ok(Json(state.repo.json(&settings, true).await?))
}

/// POST /api/settings - Edit the site settings.
pub async fn edit_settings(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    JsonArgs(args): JsonArgs,
) -> ApiResult {
    let args = state.schemas.edit_settings.check(&args)?;
    let edit = SettingsEdit {
        title: args.str("title").map(str::to_string),
        icon: nullable_string(args.nullable_str("icon")),
        favicon: nullable_string(args.nullable_str("favicon")),
    };

    let settings = state
        .repo
        .edit_settings(edit, session.user.as_ref())
        .await?;
    Ok(Json(state.repo.json(&settings, true).await?))
}
