//! Entry creation and visibility-aware reads.
//!
//! # Invariants
//! - Content is trimmed; empty content never reaches storage.
//! - Writing into a journal requires membership in it.
//! - Single-entry views apply [`can_view`] after loading.

use super::{ServiceError, ServiceResult};
use crate::model::entry::{parse_journal_selector, CalendarDay, Entry, EntryId, EntryView, NewEntry};
use crate::model::user::User;
use crate::model::ValidationError;
use crate::policy::visibility::can_view;
use crate::repo::entry_repo::EntryRepository;
use crate::repo::journal_repo::JournalRepository;
use chrono::{Local, NaiveDate};
use log::{info, warn};

/// Form-level input for a new entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDraft {
    pub content: String,
    /// Raw journal selector as submitted; unparsable values mean personal.
    pub journal: Option<String>,
    pub is_public: bool,
}

/// Use-case service for entries.
pub struct EntryService<E: EntryRepository, J: JournalRepository> {
    entries: E,
    journals: J,
}

impl<E: EntryRepository, J: JournalRepository> EntryService<E, J> {
    pub fn new(entries: E, journals: J) -> Self {
        Self { entries, journals }
    }

    /// Creates an entry stamped with today's local date.
    pub fn create_entry(&self, user: &User, draft: &EntryDraft) -> ServiceResult<EntryId> {
        self.create_entry_on(user, draft, Local::now().date_naive())
    }

    /// Creates an entry stamped with `entry_date`.
    ///
    /// # Errors
    /// - `InvalidInput` when content is blank.
    /// - `NotFound` when the selected journal does not exist.
    /// - `AccessDenied` when `user` is not a member of the selected journal.
    pub fn create_entry_on(
        &self,
        user: &User,
        draft: &EntryDraft,
        entry_date: NaiveDate,
    ) -> ServiceResult<EntryId> {
        let content = draft.content.trim();
        if content.is_empty() {
            return Err(ValidationError::EmptyContent.into());
        }

        let journal_id = parse_journal_selector(draft.journal.as_deref());
        if let Some(journal_id) = journal_id {
            if self.journals.get_journal(journal_id)?.is_none() {
                return Err(ServiceError::NotFound {
                    resource: "journal",
                    id: journal_id,
                });
            }
            if !self.journals.is_member(journal_id, user.id)? {
                warn!(
                    "event=entry_create module=entry status=error error_code=not_a_member journal_id={} user_id={}",
                    journal_id, user.id
                );
                return Err(ServiceError::AccessDenied {
                    resource: "journal",
                    id: journal_id,
                });
            }
        }

        let entry_id = self.entries.create_entry(&NewEntry {
            owner_id: user.id,
            journal_id,
            entry_date,
            content: content.to_string(),
            is_public: draft.is_public,
        })?;
        info!(
            "event=entry_create module=entry status=ok entry_id={} user_id={} journal_id={:?} is_public={}",
            entry_id, user.id, journal_id, draft.is_public
        );
        Ok(entry_id)
    }

    /// Personal entries of `user`, newest first.
    pub fn list_personal_entries(&self, user: &User) -> ServiceResult<Vec<Entry>> {
        Ok(self.entries.list_personal(user.id)?)
    }

    /// Every entry `user` may read, by date then id, newest first.
    pub fn list_visible_entries(&self, user: &User) -> ServiceResult<Vec<EntryView>> {
        Ok(self.entries.list_visible(user.id)?)
    }

    /// Fetches one annotated entry without checking access.
    pub fn get_entry(&self, entry_id: EntryId) -> ServiceResult<EntryView> {
        self.entries
            .get_entry_view(entry_id)?
            .ok_or(ServiceError::NotFound {
                resource: "entry",
                id: entry_id,
            })
    }

    /// Fetches one annotated entry if `user` may read it.
    pub fn view_entry(&self, user: &User, entry_id: EntryId) -> ServiceResult<EntryView> {
        let view = self.get_entry(entry_id)?;
        let memberships = self.journals.memberships_of(user.id)?;
        if !can_view(user.id, &view.entry, &memberships) {
            warn!(
                "event=entry_view module=entry status=error error_code=access_denied entry_id={} user_id={}",
                entry_id, user.id
            );
            return Err(ServiceError::AccessDenied {
                resource: "entry",
                id: entry_id,
            });
        }
        Ok(view)
    }

    /// Visible entries grouped by day, newest day first.
    pub fn calendar(&self, user: &User) -> ServiceResult<Vec<CalendarDay>> {
        Ok(group_by_day(self.list_visible_entries(user)?))
    }
}

/// Groups entries already sorted by `entry_date DESC` into per-day buckets.
pub fn group_by_day(entries: Vec<EntryView>) -> Vec<CalendarDay> {
    let mut days: Vec<CalendarDay> = Vec::new();
    for view in entries {
        match days.last_mut() {
            Some(day) if day.date == view.entry.entry_date => day.entries.push(view),
            _ => days.push(CalendarDay {
                date: view.entry.entry_date,
                entries: vec![view],
            }),
        }
    }
    days
}
