//! Journal and membership repository contract and SQLite implementation.
//!
//! # Invariants
//! - A journal row and its owner's membership row are written in one
//!   transaction.
//! - `(journal_id, user_id)` is unique; inserting an existing pair is a no-op.

use crate::model::journal::{Journal, JournalId};
use crate::model::user::UserId;
use crate::repo::{ensure_connection_ready, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::BTreeSet;

const JOURNAL_SELECT_SQL: &str = "SELECT
    j.id AS id,
    j.name AS name,
    j.owner_id AS owner_id,
    j.created_at AS created_at
FROM journals j";

/// Repository interface for journals and memberships.
pub trait JournalRepository {
    /// Creates a journal owned by `owner_id` and enrolls the owner as member.
    fn create_journal(&self, owner_id: UserId, name: &str) -> RepoResult<JournalId>;
    fn get_journal(&self, id: JournalId) -> RepoResult<Option<Journal>>;
    /// Returns `true` when a new membership row was written.
    fn add_member(&self, journal_id: JournalId, user_id: UserId) -> RepoResult<bool>;
    fn is_member(&self, journal_id: JournalId, user_id: UserId) -> RepoResult<bool>;
    fn memberships_of(&self, user_id: UserId) -> RepoResult<BTreeSet<JournalId>>;
    /// Journals owned by or shared with `user_id`, each once.
    fn list_accessible(&self, user_id: UserId) -> RepoResult<Vec<Journal>>;
}

/// SQLite-backed journal repository.
pub struct SqliteJournalRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteJournalRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl JournalRepository for SqliteJournalRepository<'_> {
    fn create_journal(&self, owner_id: UserId, name: &str) -> RepoResult<JournalId> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO journals (name, owner_id) VALUES (?1, ?2);",
            params![name, owner_id],
        )?;
        let journal_id = tx.last_insert_rowid();
        tx.execute(
            "INSERT INTO journal_members (journal_id, user_id) VALUES (?1, ?2);",
            params![journal_id, owner_id],
        )?;
        tx.commit()?;
        Ok(journal_id)
    }

    fn get_journal(&self, id: JournalId) -> RepoResult<Option<Journal>> {
        self.conn
            .query_row(
                &format!("{JOURNAL_SELECT_SQL} WHERE j.id = ?1;"),
                [id],
                parse_journal_row,
            )
            .optional()
            .map_err(Into::into)
    }

    fn add_member(&self, journal_id: JournalId, user_id: UserId) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO journal_members (journal_id, user_id) VALUES (?1, ?2);",
            params![journal_id, user_id],
        )?;
        Ok(changed == 1)
    }

    fn is_member(&self, journal_id: JournalId, user_id: UserId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM journal_members
                WHERE journal_id = ?1 AND user_id = ?2
            );",
            params![journal_id, user_id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn memberships_of(&self, user_id: UserId) -> RepoResult<BTreeSet<JournalId>> {
        let mut stmt = self
            .conn
            .prepare("SELECT journal_id FROM journal_members WHERE user_id = ?1;")?;
        let ids = stmt
            .query_map([user_id], |row| row.get::<_, JournalId>(0))?
            .collect::<rusqlite::Result<BTreeSet<_>>>()?;
        Ok(ids)
    }

    fn list_accessible(&self, user_id: UserId) -> RepoResult<Vec<Journal>> {
        let mut stmt = self.conn.prepare(&format!(
            "{JOURNAL_SELECT_SQL}
             WHERE j.owner_id = ?1
                OR EXISTS (
                    SELECT 1
                    FROM journal_members m
                    WHERE m.journal_id = j.id AND m.user_id = ?1
                )
             ORDER BY j.name COLLATE NOCASE ASC, j.id ASC;"
        ))?;
        let journals = stmt
            .query_map([user_id], parse_journal_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(journals)
    }
}

fn parse_journal_row(row: &Row<'_>) -> rusqlite::Result<Journal> {
    Ok(Journal {
        id: row.get("id")?,
        name: row.get("name")?,
        owner_id: row.get("owner_id")?,
        created_at: row.get("created_at")?,
    })
}
