//! Core domain logic for the shared journal application.
//! This crate is the single source of truth for storage and access rules.

pub mod db;
pub mod logging;
pub mod model;
pub mod policy;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, Database, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::entry::{CalendarDay, Entry, EntryId, EntryView, NewEntry};
pub use model::journal::{JoinOutcome, Journal, JournalId};
pub use model::user::{NewUser, User, UserId};
pub use model::ValidationError;
pub use policy::visibility::can_view;
pub use repo::entry_repo::{EntryRepository, SqliteEntryRepository};
pub use repo::journal_repo::{JournalRepository, SqliteJournalRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::auth_service::AuthService;
pub use service::entry_service::{EntryDraft, EntryService};
pub use service::journal_service::JournalService;
pub use service::{ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
