//! One-shot notices carried across a redirect in the session.
//!
//! Handlers attach a [`Notice`] to their response; [`persist_notices`] moves
//! it into the session, and the next rendered page drains it with [`take`].

use crate::error::WebError;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use log::error;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

const NOTICES_KEY: &str = "notices";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Danger, message)
    }
}

/// `303 See Other` to `to`, carrying `notice` for the next page.
pub fn redirect_with(notice: Notice, to: &str) -> Response {
    let mut response = Redirect::to(to).into_response();
    response.extensions_mut().insert(notice);
    response
}

/// Middleware storing a response's notice in the session.
pub async fn persist_notices(session: Session, request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let Some(notice) = response.extensions_mut().remove::<Notice>() else {
        return response;
    };

    let mut notices = match session.get::<Vec<Notice>>(NOTICES_KEY).await {
        Ok(existing) => existing.unwrap_or_default(),
        Err(err) => {
            error!("event=flash_persist module=web status=error error={err}");
            Vec::new()
        }
    };
    notices.push(notice);
    if let Err(err) = session.insert(NOTICES_KEY, notices).await {
        error!("event=flash_persist module=web status=error error={err}");
    }
    response
}

/// Drains pending notices for rendering.
pub async fn take(session: &Session) -> Result<Vec<Notice>, WebError> {
    Ok(session
        .remove::<Vec<Notice>>(NOTICES_KEY)
        .await?
        .unwrap_or_default())
}
