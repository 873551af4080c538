//! Per-request context and the authentication guard.
//!
//! # Invariants
//! - At most one store connection per request, opened on first use and
//!   closed when the context drops.
//! - The current user is resolved at most once per request.
//! - The context is `Send` but not `Sync`; handlers must not hold a borrow of
//!   it across an `.await`.

use crate::error::WebError;
use crate::flash::{redirect_with, Notice};
use crate::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use journal_core::{
    AuthService, Database, EntryService, JournalService, SqliteEntryRepository,
    SqliteJournalRepository, SqliteUserRepository, User, UserId,
};
use log::debug;
use once_cell::unsync::OnceCell;
use rusqlite::Connection;
use tower_sessions::Session;

/// Session key holding the authenticated user id.
pub const USER_ID_KEY: &str = "user_id";

pub type SqliteEntryService<'conn> =
    EntryService<SqliteEntryRepository<'conn>, SqliteJournalRepository<'conn>>;

pub struct RequestContext {
    db: Database,
    session_user_id: Option<UserId>,
    conn: OnceCell<Connection>,
    current_user: OnceCell<Option<User>>,
}

impl RequestContext {
    pub fn new(db: Database, session_user_id: Option<UserId>) -> Self {
        Self {
            db,
            session_user_id,
            conn: OnceCell::new(),
            current_user: OnceCell::new(),
        }
    }

    /// Store connection for this request, opened on first call.
    pub fn conn(&self) -> Result<&Connection, WebError> {
        let conn = self.conn.get_or_try_init(|| {
            debug!("event=db_acquire module=web status=ok");
            self.db.connect()
        })?;
        Ok(conn)
    }

    /// The user bound to the session, if it still exists.
    pub fn current_user(&self) -> Result<Option<&User>, WebError> {
        let user = self.current_user.get_or_try_init(|| {
            if self.session_user_id.is_none() {
                return Ok(None);
            }
            self.auth_service()?
                .resolve_user(self.session_user_id)
                .map_err(WebError::from)
        })?;
        Ok(user.as_ref())
    }

    pub fn auth_service(&self) -> Result<AuthService<SqliteUserRepository<'_>>, WebError> {
        Ok(AuthService::new(SqliteUserRepository::try_new(self.conn()?)?))
    }

    pub fn journal_service(&self) -> Result<JournalService<SqliteJournalRepository<'_>>, WebError> {
        Ok(JournalService::new(SqliteJournalRepository::try_new(
            self.conn()?,
        )?))
    }

    pub fn entry_service(&self) -> Result<SqliteEntryService<'_>, WebError> {
        let conn = self.conn()?;
        Ok(EntryService::new(
            SqliteEntryRepository::try_new(conn)?,
            SqliteJournalRepository::try_new(conn)?,
        ))
    }
}

impl Drop for RequestContext {
    fn drop(&mut self) {
        if self.conn.get().is_some() {
            debug!("event=db_release module=web status=ok");
        }
    }
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, message)| WebError::Internal(message.to_string()))?;
        let user_id = session.get::<UserId>(USER_ID_KEY).await?;
        Ok(Self::new(state.db.clone(), user_id))
    }
}

/// Guard for protected routes: a resolved user plus the request context.
pub struct Authenticated {
    pub ctx: RequestContext,
    pub user: User,
}

/// Rejection sending anonymous visitors to the login page.
pub struct AuthRedirect;

impl IntoResponse for AuthRedirect {
    fn into_response(self) -> Response {
        redirect_with(Notice::warning("Please log in to access this page."), "/login")
    }
}

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let ctx = RequestContext::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;
        let user = ctx
            .current_user()
            .map_err(IntoResponse::into_response)?
            .cloned();
        match user {
            Some(user) => Ok(Self { ctx, user }),
            None => Err(AuthRedirect.into_response()),
        }
    }
}
