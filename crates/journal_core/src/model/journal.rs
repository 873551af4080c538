//! Shared journal and membership records.

use super::user::UserId;
use serde::Serialize;

pub type JournalId = i64;

/// A named collection of entries shared by its members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Journal {
    pub id: JournalId,
    pub name: String,
    pub owner_id: UserId,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

/// Result of a join request. Joining twice is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    Joined,
    AlreadyMember,
}
