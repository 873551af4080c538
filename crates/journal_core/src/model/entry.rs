//! Dated journal entry records.

use super::journal::JournalId;
use super::user::UserId;
use chrono::NaiveDate;
use serde::Serialize;

pub type EntryId = i64;

/// A dated text entry. `journal_id == None` marks a personal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub id: EntryId,
    pub owner_id: UserId,
    pub journal_id: Option<JournalId>,
    pub entry_date: NaiveDate,
    pub content: String,
    pub is_public: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

/// Entry annotated for display with its owner's email and journal name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryView {
    #[serde(flatten)]
    pub entry: Entry,
    pub owner_email: String,
    pub journal_name: Option<String>,
}

/// Insert shape for a new entry. Content must already be trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub owner_id: UserId,
    pub journal_id: Option<JournalId>,
    pub entry_date: NaiveDate,
    pub content: String,
    pub is_public: bool,
}

/// Visible entries sharing one `entry_date`, for calendar rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub entries: Vec<EntryView>,
}

/// Parses a raw journal selector from a form.
///
/// Blank, absent and non-integer values all mean "personal entry".
pub fn parse_journal_selector(raw: Option<&str>) -> Option<JournalId> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| value.parse::<JournalId>().ok())
}
