use crate::context::Authenticated;
use crate::error::WebError;
use crate::flash;
use crate::state::AppState;
use crate::views::Page;
use axum::extract::State;
use axum::response::Html;
use serde_json::json;
use tower_sessions::Session;

/// `GET /dashboard`: personal entries and accessible journals.
pub async fn dashboard(
    State(state): State<AppState>,
    session: Session,
    Authenticated { ctx, user }: Authenticated,
) -> Result<Html<String>, WebError> {
    let notices = flash::take(&session).await?;
    let entries = ctx.entry_service()?.list_personal_entries(&user)?;
    let journals = ctx.journal_service()?.list_accessible_journals(&user)?;
    state.views.render(
        Page::new("dashboard", "Dashboard")
            .user(Some(&user))
            .notices(notices)
            .data(json!({ "entries": entries, "journals": journals })),
    )
}
