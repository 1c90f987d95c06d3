//! User API endpoints.

use axum::{
    extract::{Extension, Path, State},
    Json,
};

use super::{ApiResult, JsonArgs};
use crate::auth::Session;
use crate::models::UserEdit;
use crate::AppState;

/// GET /api/users/:id - Get the public data of a user.
pub async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let user = state.repo.get_user(&id).await?;
    Ok(Json(user.json(true)))
}

/// POST /api/users/:id - Edit a user.
pub async fn edit_user(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    JsonArgs(args): JsonArgs,
) -> ApiResult {
    let args = state.schemas.edit_user.check(&args)?;
    let edit = UserEdit {
        name: args.str("name").map(str::to_string),
    };

    let user = state
        .repo
        .edit_user(&id, edit, session.user.as_ref())
        .await?;
    Ok(Json(user.json(true)))
}
