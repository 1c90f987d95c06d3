//! Login API endpoint.

use axum::{extract::State, Json};

use super::{ApiResult, JsonArgs};
use crate::AppState;

/// POST /api/login - Log in a new user.
///
/// The response is the only place the client gets to see the new user's secret.
pub async fn login(State(state): State<AppState>, JsonArgs(_args): JsonArgs) -> ApiResult {
    let user = state.repo.login().await?;
    tracing::info!(user_id = %user.id, "New user logged in");
    Ok(Json(user.json(false)))
}
