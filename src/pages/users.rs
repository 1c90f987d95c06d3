//! User pages.

use askama::Template;
use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
};

use super::{page_context, render, PageContext, PageError, PageResult};
use crate::auth::PageSession;
use crate::AppState;

#[derive(Template)]
#[template(path = "edit-user.html")]
pub struct EditUserTemplate {
    page: PageContext,
    user_id: String,
    name: String,
}

/// GET /users/:id/edit - User form. Users may only edit themselves.
pub async fn edit_user_page(
    State(state): State<AppState>,
    Extension(session): Extension<PageSession>,
    Path(id): Path<String>,
) -> PageResult {
    let user = state.repo.get_user(&id).await?;
    if user.id != session.user.id {
        return Err(PageError(StatusCode::FORBIDDEN));
    }

    let page = page_context(&state, &session).await?;
    render(&EditUserTemplate {
        page,
        user_id: user.id,
        name: user.name,
    })
}
