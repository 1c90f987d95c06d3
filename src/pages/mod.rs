//! Server-side rendered UI pages.
//!
//! Page routes run behind [`crate::auth::page_session_layer`], so every handler gets a
//! [`PageSession`] with a resolved user.

mod meetings;
mod users;

pub use meetings::*;
pub use users::*;

use askama::Template;
use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::auth::PageSession;
use crate::errors::{status_response, AppError};
use crate::models::{Settings, User};
use crate::AppState;

/// Response type of page handlers.
pub type PageResult = Result<Html<String>, PageError>;

/// Failed page request, answered with the bare status.
#[derive(Debug)]
pub struct PageError(pub StatusCode);

impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        if !err.is_expected() {
            tracing::error!(error = %err, "Failed to render page");
        }
        Self(err.status_code())
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        status_response(self.0)
    }
}

/// Data every page template receives: the current user and the site settings.
#[derive(Debug, Clone)]
pub struct PageContext {
    pub title: String,
    pub icon: String,
    pub favicon: String,
    pub user_id: String,
    pub user_name: String,
}

impl PageContext {
    pub fn new(user: &User, settings: &Settings) -> Self {
        Self {
            title: settings.title.clone(),
            icon: settings.icon.clone().unwrap_or_default(),
            favicon: settings.favicon.clone().unwrap_or_default(),
            user_id: user.id.clone(),
            user_name: user.name.clone(),
        }
    }
}

async fn page_context(state: &AppState, session: &PageSession) -> Result<PageContext, PageError> {
    let settings = state.repo.get_settings().await?;
    Ok(PageContext::new(&session.user, &settings))
}

fn render<T: Template>(template: &T) -> PageResult {
    template.render().map(Html).map_err(|e| {
        tracing::error!(error = %e, "Template error");
        PageError(StatusCode::INTERNAL_SERVER_ERROR)
    })
}

#[derive(Template)]
#[template(path = "start.html")]
pub struct StartTemplate {
    page: PageContext,
}

#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    page: PageContext,
}

#[derive(Template)]
#[template(path = "edit-settings.html")]
pub struct EditSettingsTemplate {
    page: PageContext,
}

/// GET / - Start page.
pub async fn start_page(
    State(state): State<AppState>,
    Extension(session): Extension<PageSession>,
) -> PageResult {
    let page = page_context(&state, &session).await?;
    render(&StartTemplate { page })
}

/// GET /about - About page.
pub async fn about_page(
    State(state): State<AppState>,
    Extension(session): Extension<PageSession>,
) -> PageResult {
    let page = page_context(&state, &session).await?;
    render(&AboutTemplate { page })
}

/// GET /settings/edit - Site settings form.
pub async fn edit_settings_page(
    State(state): State<AppState>,
    Extension(session): Extension<PageSession>,
) -> PageResult {
    let page = page_context(&state, &session).await?;
    render(&EditSettingsTemplate { page })
}
