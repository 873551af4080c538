//! Journal creation and joining.

use crate::context::Authenticated;
use crate::error::{RedirectOnError, WebError};
use crate::flash::{self, redirect_with, Notice};
use crate::state::AppState;
use crate::views::Page;
use axum::extract::State;
use axum::response::{Html, Response};
use axum::Form;
use journal_core::{JoinOutcome, JournalId};
use serde::Deserialize;
use tower_sessions::Session;

#[derive(Debug, Deserialize)]
pub struct CreateJournalForm {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct JoinJournalForm {
    #[serde(default)]
    pub journal_id: String,
}

pub async fn create_page(
    State(state): State<AppState>,
    session: Session,
    Authenticated { ctx: _ctx, user }: Authenticated,
) -> Result<Html<String>, WebError> {
    let notices = flash::take(&session).await?;
    state.views.render(
        Page::new("journal_create", "Create journal")
            .user(Some(&user))
            .notices(notices),
    )
}

pub async fn create(
    Authenticated { ctx, user }: Authenticated,
    Form(form): Form<CreateJournalForm>,
) -> Result<Response, WebError> {
    let journal_id = ctx
        .journal_service()?
        .create_journal(&user, &form.name)
        .or_redirect("/journal/create")?;
    Ok(redirect_with(
        Notice::success(format!("Journal created. Share id {journal_id} to invite others.")),
        "/dashboard",
    ))
}

pub async fn join_page(
    State(state): State<AppState>,
    session: Session,
    Authenticated { ctx: _ctx, user }: Authenticated,
) -> Result<Html<String>, WebError> {
    let notices = flash::take(&session).await?;
    state.views.render(
        Page::new("journal_join", "Join journal")
            .user(Some(&user))
            .notices(notices),
    )
}

pub async fn join(
    Authenticated { ctx, user }: Authenticated,
    Form(form): Form<JoinJournalForm>,
) -> Result<Response, WebError> {
    let Ok(journal_id) = form.journal_id.trim().parse::<JournalId>() else {
        return Ok(redirect_with(
            Notice::danger("Journal not found."),
            "/journal/join",
        ));
    };

    let outcome = ctx
        .journal_service()?
        .join_journal(&user, journal_id)
        .or_redirect("/journal/join")?;
    let notice = match outcome {
        JoinOutcome::Joined => Notice::success("Joined journal."),
        JoinOutcome::AlreadyMember => Notice::info("You are already a member of this journal."),
    };
    Ok(redirect_with(notice, "/dashboard"))
}
