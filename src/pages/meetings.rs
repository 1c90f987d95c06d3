//! Meeting pages.

use askama::Template;
use axum::extract::{Extension, Path, State};

use super::{page_context, render, PageContext, PageResult};
use crate::auth::PageSession;
use crate::models::{format_isotime, AgendaItem, Meeting};
use crate::AppState;

/// Meeting fields as shown in the UI. Missing values are empty strings.
#[derive(Debug, Clone, Default)]
pub struct MeetingView {
    pub id: String,
    pub title: String,
    pub time: String,
    pub location: String,
    pub description: String,
}

impl From<&Meeting> for MeetingView {
    fn from(meeting: &Meeting) -> Self {
        Self {
            id: meeting.id.clone(),
            title: meeting.title.clone(),
            time: meeting.time.as_ref().map(format_isotime).unwrap_or_default(),
            location: meeting.location.clone().unwrap_or_default(),
            description: meeting.description.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AgendaItemView {
    pub id: String,
    pub title: String,
    pub duration: String,
    pub description: String,
}

impl From<&AgendaItem> for AgendaItemView {
    fn from(item: &AgendaItem) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            duration: item.duration.map(|d| d.to_string()).unwrap_or_default(),
            description: item.description.clone().unwrap_or_default(),
        }
    }
}

#[derive(Template)]
#[template(path = "meeting.html")]
pub struct MeetingTemplate {
    page: PageContext,
    meeting: MeetingView,
    items: Vec<AgendaItemView>,
}

#[derive(Template)]
#[template(path = "edit-meeting.html")]
pub struct EditMeetingTemplate {
    page: PageContext,
    /// Whether an existing meeting is edited
    editing: bool,
    meeting: MeetingView,
}

/// GET /meetings/:id - Meeting with its agenda.
pub async fn meeting_page(
    State(state): State<AppState>,
    Extension(session): Extension<PageSession>,
    Path(id): Path<String>,
) -> PageResult {
    let meeting = state.repo.get_meeting(&id).await?;
    let items = state.repo.list_agenda_items(&meeting.id).await?;
    let page = page_context(&state, &session).await?;

    render(&MeetingTemplate {
        page,
        meeting: MeetingView::from(&meeting),
        items: items.iter().map(AgendaItemView::from).collect(),
    })
}

/// GET /create-meeting - Empty meeting form.
pub async fn create_meeting_page(
    State(state): State<AppState>,
    Extension(session): Extension<PageSession>,
) -> PageResult {
    let page = page_context(&state, &session).await?;
    render(&EditMeetingTemplate {
        page,
        editing: false,
        meeting: MeetingView::default(),
    })
}

/// GET /meetings/:id/edit - Meeting form filled with the meeting.
pub async fn edit_meeting_page(
    State(state): State<AppState>,
    Extension(session): Extension<PageSession>,
    Path(id): Path<String>,
) -> PageResult {
    let meeting = state.repo.get_meeting(&id).await?;
    let page = page_context(&state, &session).await?;
    render(&EditMeetingTemplate {
        page,
        editing: true,
        meeting: MeetingView::from(&meeting),
    })
}
