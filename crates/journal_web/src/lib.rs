//! HTTP front end for the shared journal.
//!
//! Routes render server-side HTML; all storage and access rules live in
//! `journal_core`.

pub mod context;
pub mod error;
pub mod flash;
pub mod request_log;
pub mod routes;
pub mod settings;
pub mod state;
pub mod views;

use axum::middleware;
use axum::routing::get;
use axum::Router;
use settings::SessionSettings;
use std::path::Path;
use time::Duration;
use tower_http::services::ServeDir;
use tower_sessions::cookie::Key;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

pub use context::{Authenticated, RequestContext};
pub use error::WebError;
pub use settings::{Settings, SettingsError};
pub use state::AppState;

/// Builds the application router with sessions, notices and access logging.
pub fn build_router(
    state: AppState,
    session: &SessionSettings,
    key: Key,
    static_dir: &Path,
) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(session.secure)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(
            session.inactivity_minutes,
        )))
        .with_signed(key);

    Router::new()
        .route("/", get(routes::auth::index))
        .route(
            "/signup",
            get(routes::auth::signup_page).post(routes::auth::signup),
        )
        .route(
            "/login",
            get(routes::auth::login_page).post(routes::auth::login),
        )
        .route("/logout", get(routes::auth::logout))
        .route("/dashboard", get(routes::dashboard::dashboard))
        .route(
            "/entry/new",
            get(routes::entries::new_page).post(routes::entries::create),
        )
        .route("/entry/{id}", get(routes::entries::detail))
        .route("/entries", get(routes::entries::list))
        .route("/calendar", get(routes::entries::calendar))
        .route(
            "/journal/create",
            get(routes::journals::create_page).post(routes::journals::create),
        )
        .route(
            "/journal/join",
            get(routes::journals::join_page).post(routes::journals::join),
        )
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(routes::not_found)
        .layer(middleware::from_fn(flash::persist_notices))
        .layer(middleware::from_fn(request_log::log_requests))
        .layer(session_layer)
        .with_state(state)
}
