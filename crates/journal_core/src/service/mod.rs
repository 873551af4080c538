//! Use-case services and the error taxonomy seen by callers.
//!
//! # Invariants
//! - Services never bypass repository contracts.
//! - Services remain transport-agnostic: no HTTP or session types here.

pub mod auth_service;
pub mod entry_service;
pub mod journal_service;
pub mod password;

use crate::model::ValidationError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Error taxonomy for all use-cases.
///
/// Every variant except `Repo` and `PasswordHash` is a user-facing outcome
/// that the request boundary turns into a notice.
#[derive(Debug)]
pub enum ServiceError {
    InvalidInput(ValidationError),
    DuplicateEmail(String),
    InvalidCredentials,
    NotFound { resource: &'static str, id: i64 },
    AccessDenied { resource: &'static str, id: i64 },
    PasswordHash(String),
    Repo(RepoError),
}

impl ServiceError {
    /// Returns whether the error is a store or hashing fault rather than a
    /// user-facing outcome.
    pub fn is_fault(&self) -> bool {
        matches!(self, Self::Repo(_) | Self::PasswordHash(_))
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(err) => write!(f, "invalid input: {err}"),
            Self::DuplicateEmail(email) => write!(f, "email already registered: {email}"),
            Self::InvalidCredentials => write!(f, "invalid email or password"),
            Self::NotFound { resource, id } => write!(f, "{resource} not found: {id}"),
            Self::AccessDenied { resource, id } => write!(f, "access denied to {resource} {id}"),
            Self::PasswordHash(message) => write!(f, "password hashing failed: {message}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidInput(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::InvalidInput(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::DuplicateEmail(email) => Self::DuplicateEmail(email),
            other => Self::Repo(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
