//! Entry repository contract and SQLite implementation.
//!
//! # Invariants
//! - Visible-entry listing applies the shared visibility clause and sorts by
//!   `entry_date DESC, id DESC`.
//! - Personal-entry listing sorts by `id DESC`.
//! - Entries are never updated or deleted through this repository.

use crate::model::entry::{Entry, EntryId, EntryView, NewEntry};
use crate::model::user::UserId;
use crate::policy::visibility::VISIBLE_TO_VIEWER_SQL;
use crate::repo::{bool_to_int, ensure_connection_ready, int_to_bool, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const ENTRY_COLUMNS_SQL: &str = "
    e.id AS id,
    e.owner_id AS owner_id,
    e.journal_id AS journal_id,
    e.entry_date AS entry_date,
    e.content AS content,
    e.is_public AS is_public,
    e.created_at AS created_at";

/// Repository interface for entry persistence and visibility queries.
pub trait EntryRepository {
    fn create_entry(&self, entry: &NewEntry) -> RepoResult<EntryId>;
    fn get_entry(&self, id: EntryId) -> RepoResult<Option<Entry>>;
    /// Fetches one entry with owner/journal annotations, without access checks.
    fn get_entry_view(&self, id: EntryId) -> RepoResult<Option<EntryView>>;
    /// Entries owned by `owner_id` that belong to no journal.
    fn list_personal(&self, owner_id: UserId) -> RepoResult<Vec<Entry>>;
    /// Entries `viewer` may read under the visibility policy.
    fn list_visible(&self, viewer: UserId) -> RepoResult<Vec<EntryView>>;
}

/// SQLite-backed entry repository.
pub struct SqliteEntryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEntryRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl EntryRepository for SqliteEntryRepository<'_> {
    fn create_entry(&self, entry: &NewEntry) -> RepoResult<EntryId> {
        self.conn.execute(
            "INSERT INTO entries (
                owner_id,
                journal_id,
                entry_date,
                content,
                is_public
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                entry.owner_id,
                entry.journal_id,
                entry.entry_date,
                entry.content.as_str(),
                bool_to_int(entry.is_public),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_entry(&self, id: EntryId) -> RepoResult<Option<Entry>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ENTRY_COLUMNS_SQL} FROM entries e WHERE e.id = ?1;"
        ))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_entry_row(row)?)),
            None => Ok(None),
        }
    }

    fn get_entry_view(&self, id: EntryId) -> RepoResult<Option<EntryView>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ENTRY_COLUMNS_SQL},
                u.email AS owner_email,
                j.name AS journal_name
             FROM entries e
             INNER JOIN users u ON u.id = e.owner_id
             LEFT JOIN journals j ON j.id = e.journal_id
             WHERE e.id = ?1;"
        ))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_entry_view_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_personal(&self, owner_id: UserId) -> RepoResult<Vec<Entry>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ENTRY_COLUMNS_SQL}
             FROM entries e
             WHERE e.owner_id = ?1 AND e.journal_id IS NULL
             ORDER BY e.id DESC;"
        ))?;
        let mut rows = stmt.query([owner_id])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }
        Ok(entries)
    }

    fn list_visible(&self, viewer: UserId) -> RepoResult<Vec<EntryView>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ENTRY_COLUMNS_SQL},
                u.email AS owner_email,
                j.name AS journal_name
             FROM entries e
             INNER JOIN users u ON u.id = e.owner_id
             LEFT JOIN journals j ON j.id = e.journal_id
             WHERE {VISIBLE_TO_VIEWER_SQL}
             ORDER BY e.entry_date DESC, e.id DESC;"
        ))?;
        let mut rows = stmt.query(params![viewer])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_entry_view_row(row)?);
        }
        Ok(entries)
    }
}

fn parse_entry_row(row: &Row<'_>) -> RepoResult<Entry> {
    let content: String = row.get("content")?;
    if content.trim().is_empty() {
        let id: i64 = row.get("id")?;
        return Err(RepoError::InvalidData(format!(
            "empty content in entries.content for id {id}"
        )));
    }

    Ok(Entry {
        id: row.get("id")?,
        owner_id: row.get("owner_id")?,
        journal_id: row.get("journal_id")?,
        entry_date: row.get("entry_date")?,
        content,
        is_public: int_to_bool(row.get("is_public")?, "entries.is_public")?,
        created_at: row.get("created_at")?,
    })
}

fn parse_entry_view_row(row: &Row<'_>) -> RepoResult<EntryView> {
    Ok(EntryView {
        entry: parse_entry_row(row)?,
        owner_email: row.get("owner_email")?,
        journal_name: row.get("journal_name")?,
    })
}
