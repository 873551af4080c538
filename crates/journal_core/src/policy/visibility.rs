//! Entry visibility policy.
//!
//! A viewer may read an entry iff they own it, it is public, or it belongs to
//! a journal they are a member of. [`can_view`] is the in-memory form used to
//! gate detail views; [`VISIBLE_TO_VIEWER_SQL`] is the same rule as a `WHERE`
//! clause for list queries. Both must change together.

use crate::model::entry::Entry;
use crate::model::journal::JournalId;
use crate::model::user::UserId;
use std::collections::BTreeSet;

/// `WHERE` clause over an `entries e` alias; binds the viewer id as `?1`.
pub const VISIBLE_TO_VIEWER_SQL: &str = "(
    e.owner_id = ?1
    OR e.is_public = 1
    OR (
        e.journal_id IS NOT NULL
        AND EXISTS (
            SELECT 1
            FROM journal_members m
            WHERE m.journal_id = e.journal_id AND m.user_id = ?1
        )
    )
)";

/// Returns whether `viewer` may read `entry` given the viewer's memberships.
pub fn can_view(viewer: UserId, entry: &Entry, memberships: &BTreeSet<JournalId>) -> bool {
    entry.owner_id == viewer
        || entry.is_public
        || entry
            .journal_id
            .is_some_and(|journal_id| memberships.contains(&journal_id))
}
