//! Account registration, credential checks and session identity resolution.
//!
//! # Invariants
//! - Emails are normalized before every lookup and insert.
//! - Raw passwords are never stored or logged.
//! - Unknown email and wrong password produce the same error.

use super::password::{hash_password, verify_password};
use super::{ServiceError, ServiceResult};
use crate::model::user::{normalize_email, normalize_name, NewUser, User, UserId};
use crate::model::ValidationError;
use crate::repo::user_repo::UserRepository;
use log::{info, warn};

/// Use-case service for authentication.
pub struct AuthService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers an account and returns its id.
    ///
    /// # Errors
    /// - `InvalidInput` when email (after trimming) or password is empty.
    /// - `DuplicateEmail` when the normalized email is already registered.
    pub fn signup(&self, email: &str, password: &str, name: Option<&str>) -> ServiceResult<UserId> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(ValidationError::EmptyEmail.into());
        }
        if password.is_empty() {
            return Err(ValidationError::EmptyPassword.into());
        }

        if self.repo.find_by_email(&email)?.is_some() {
            warn!("event=signup module=auth status=error error_code=duplicate_email");
            return Err(ServiceError::DuplicateEmail(email));
        }

        let new_user = NewUser {
            email,
            password_hash: hash_password(password)?,
            name: normalize_name(name),
        };
        let user_id = self.repo.create_user(&new_user)?;
        info!("event=signup module=auth status=ok user_id={user_id}");
        Ok(user_id)
    }

    /// Checks credentials and returns the matching account.
    pub fn login(&self, email: &str, password: &str) -> ServiceResult<User> {
        let email = normalize_email(email);
        let Some(user) = self.repo.find_by_email(&email)? else {
            warn!("event=login module=auth status=error error_code=unknown_email");
            return Err(ServiceError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash)? {
            warn!(
                "event=login module=auth status=error error_code=password_mismatch user_id={}",
                user.id
            );
            return Err(ServiceError::InvalidCredentials);
        }

        info!("event=login module=auth status=ok user_id={}", user.id);
        Ok(user)
    }

    /// Resolves a session-bound user id; stale ids resolve to `None`.
    pub fn resolve_user(&self, user_id: Option<UserId>) -> ServiceResult<Option<User>> {
        match user_id {
            Some(id) => Ok(self.repo.get_user(id)?),
            None => Ok(None),
        }
    }
}
