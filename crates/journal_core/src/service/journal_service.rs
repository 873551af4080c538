//! Journal creation, membership and listing use-cases.

use super::{ServiceError, ServiceResult};
use crate::model::journal::{JoinOutcome, Journal, JournalId};
use crate::model::user::User;
use crate::model::ValidationError;
use crate::repo::journal_repo::JournalRepository;
use log::info;

/// Use-case service for shared journals.
pub struct JournalService<R: JournalRepository> {
    repo: R,
}

impl<R: JournalRepository> JournalService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a journal owned by `user`, who becomes its first member.
    pub fn create_journal(&self, user: &User, name: &str) -> ServiceResult<JournalId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyJournalName.into());
        }

        let journal_id = self.repo.create_journal(user.id, name)?;
        info!(
            "event=journal_create module=journal status=ok journal_id={} user_id={}",
            journal_id, user.id
        );
        Ok(journal_id)
    }

    /// Adds `user` to a journal. Joining a journal twice is reported, not
    /// rejected.
    pub fn join_journal(&self, user: &User, journal_id: JournalId) -> ServiceResult<JoinOutcome> {
        if self.repo.get_journal(journal_id)?.is_none() {
            return Err(ServiceError::NotFound {
                resource: "journal",
                id: journal_id,
            });
        }

        if self.repo.is_member(journal_id, user.id)? {
            return Ok(JoinOutcome::AlreadyMember);
        }

        // A concurrent join of the same pair is absorbed by the primary key.
        let outcome = if self.repo.add_member(journal_id, user.id)? {
            JoinOutcome::Joined
        } else {
            JoinOutcome::AlreadyMember
        };
        info!(
            "event=journal_join module=journal status=ok journal_id={} user_id={} outcome={:?}",
            journal_id, user.id, outcome
        );
        Ok(outcome)
    }

    /// Journals owned by or shared with `user`, deduplicated.
    pub fn list_accessible_journals(&self, user: &User) -> ServiceResult<Vec<Journal>> {
        Ok(self.repo.list_accessible(user.id)?)
    }

    pub fn is_member(&self, user: &User, journal_id: JournalId) -> ServiceResult<bool> {
        Ok(self.repo.is_member(journal_id, user.id)?)
    }
}
