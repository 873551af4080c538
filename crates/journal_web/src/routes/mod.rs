//! HTTP handlers, grouped by area.

pub mod auth;
pub mod dashboard;
pub mod entries;
pub mod journals;

use crate::context::RequestContext;
use crate::error::WebError;
use crate::flash;
use crate::state::AppState;
use crate::views::Page;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tower_sessions::Session;

/// Fallback for unknown paths.
pub async fn not_found(
    State(state): State<AppState>,
    session: Session,
    ctx: RequestContext,
) -> Result<Response, WebError> {
    let notices = flash::take(&session).await?;
    let page = state.views.render(
        Page::new("not_found", "Not found")
            .user(ctx.current_user()?)
            .notices(notices),
    )?;
    Ok((StatusCode::NOT_FOUND, page).into_response())
}
