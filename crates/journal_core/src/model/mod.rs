//! Domain records for users, journals and entries.
//!
//! # Invariants
//! - Ids are SQLite row ids and are never reused.
//! - Entries are append-only: nothing in core updates or deletes them.

pub mod entry;
pub mod journal;
pub mod user;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Input rejected before it reaches storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    EmptyEmail,
    EmptyPassword,
    EmptyJournalName,
    EmptyContent,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email is required"),
            Self::EmptyPassword => write!(f, "password is required"),
            Self::EmptyJournalName => write!(f, "journal name is required"),
            Self::EmptyContent => write!(f, "entry content cannot be empty"),
        }
    }
}

impl Error for ValidationError {}
