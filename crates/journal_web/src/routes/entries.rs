//! Entry authoring, listing and detail pages.

use crate::context::Authenticated;
use crate::error::{RedirectOnError, WebError};
use crate::flash::{self, redirect_with, Notice};
use crate::state::AppState;
use crate::views::Page;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use journal_core::{EntryDraft, EntryId, ServiceError};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;

#[derive(Debug, Deserialize)]
pub struct EntryForm {
    #[serde(default)]
    pub content: String,
    pub journal: Option<String>,
    pub is_public: Option<String>,
}

impl From<EntryForm> for EntryDraft {
    fn from(form: EntryForm) -> Self {
        Self {
            content: form.content,
            journal: form.journal,
            // Unchecked boxes are omitted from the form body.
            is_public: form.is_public.is_some_and(|value| !value.is_empty()),
        }
    }
}

pub async fn new_page(
    State(state): State<AppState>,
    session: Session,
    Authenticated { ctx, user }: Authenticated,
) -> Result<Html<String>, WebError> {
    let notices = flash::take(&session).await?;
    let journals = ctx.journal_service()?.list_accessible_journals(&user)?;
    state.views.render(
        Page::new("entry_new", "New entry")
            .user(Some(&user))
            .notices(notices)
            .data(json!({ "journals": journals })),
    )
}

pub async fn create(
    Authenticated { ctx, user }: Authenticated,
    Form(form): Form<EntryForm>,
) -> Result<Response, WebError> {
    ctx.entry_service()?
        .create_entry(&user, &form.into())
        .or_redirect("/entry/new")?;
    Ok(redirect_with(Notice::success("Entry saved."), "/dashboard"))
}

pub async fn list(
    State(state): State<AppState>,
    session: Session,
    Authenticated { ctx, user }: Authenticated,
) -> Result<Html<String>, WebError> {
    let notices = flash::take(&session).await?;
    let entries = ctx.entry_service()?.list_visible_entries(&user)?;
    state.views.render(
        Page::new("entries", "Entries")
            .user(Some(&user))
            .notices(notices)
            .data(json!({ "entries": entries })),
    )
}

/// `GET /entry/{id}`; ids that are not integers are reported as missing.
pub async fn detail(
    State(state): State<AppState>,
    session: Session,
    Path(raw_id): Path<String>,
    Authenticated { ctx, user }: Authenticated,
) -> Result<Response, WebError> {
    let entry_id = raw_id
        .parse::<EntryId>()
        .map_err(|_| ServiceError::NotFound {
            resource: "entry",
            id: 0,
        })
        .or_redirect("/entries")?;
    let entry = ctx
        .entry_service()?
        .view_entry(&user, entry_id)
        .or_redirect("/entries")?;
    // Drained after the access check so a redirect keeps pending notices.
    let notices = flash::take(&session).await?;
    Ok(state
        .views
        .render(
            Page::new("entry_detail", "Entry")
                .user(Some(&user))
                .notices(notices)
                .data(json!({ "entry": entry })),
        )?
        .into_response())
}

pub async fn calendar(
    State(state): State<AppState>,
    session: Session,
    Authenticated { ctx, user }: Authenticated,
) -> Result<Html<String>, WebError> {
    let notices = flash::take(&session).await?;
    let days = ctx.entry_service()?.calendar(&user)?;
    state.views.render(
        Page::new("calendar", "Calendar")
            .user(Some(&user))
            .notices(notices)
            .data(json!({ "days": days })),
    )
}
