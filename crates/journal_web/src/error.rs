//! Request boundary error type.
//!
//! User-facing service outcomes become a notice plus a redirect. Store,
//! template and session faults are logged and answered with a generic 500
//! page that never echoes the underlying error.

use crate::flash::{redirect_with, Notice};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use journal_core::{DbError, RepoError, ServiceError, ServiceResult, ValidationError};
use log::error;
use std::error::Error;
use std::fmt::{Display, Formatter};

const ERROR_PAGE: &str = include_str!("../templates/error.html");

/// Fallback page when a handler returns a service error without a target.
const DEFAULT_REDIRECT: &str = "/dashboard";

#[derive(Debug)]
pub enum WebError {
    Service {
        error: ServiceError,
        redirect_to: &'static str,
    },
    Template(handlebars::RenderError),
    Session(tower_sessions::session::Error),
    Internal(String),
}

impl WebError {
    /// Whether the error is answered with the 500 page.
    pub fn is_fault(&self) -> bool {
        match self {
            Self::Service { error, .. } => error.is_fault(),
            _ => true,
        }
    }
}

impl Display for WebError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Service { error, .. } => write!(f, "{error}"),
            Self::Template(err) => write!(f, "template error: {err}"),
            Self::Session(err) => write!(f, "session error: {err}"),
            Self::Internal(message) => write!(f, "internal error: {message}"),
        }
    }
}

impl Error for WebError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Service { error, .. } => Some(error),
            Self::Template(err) => Some(err),
            Self::Session(err) => Some(err),
            Self::Internal(_) => None,
        }
    }
}

impl From<ServiceError> for WebError {
    fn from(value: ServiceError) -> Self {
        Self::Service {
            error: value,
            redirect_to: DEFAULT_REDIRECT,
        }
    }
}

impl From<RepoError> for WebError {
    fn from(value: RepoError) -> Self {
        ServiceError::from(value).into()
    }
}

impl From<DbError> for WebError {
    fn from(value: DbError) -> Self {
        RepoError::from(value).into()
    }
}

impl From<handlebars::RenderError> for WebError {
    fn from(value: handlebars::RenderError) -> Self {
        Self::Template(value)
    }
}

impl From<tower_sessions::session::Error> for WebError {
    fn from(value: tower_sessions::session::Error) -> Self {
        Self::Session(value)
    }
}

/// Attaches the page a user-facing service error should redirect to.
pub trait RedirectOnError<T> {
    fn or_redirect(self, to: &'static str) -> Result<T, WebError>;
}

impl<T> RedirectOnError<T> for ServiceResult<T> {
    fn or_redirect(self, to: &'static str) -> Result<T, WebError> {
        self.map_err(|error| WebError::Service {
            error,
            redirect_to: to,
        })
    }
}

/// Notice shown for a user-facing service error.
pub fn notice_for(error: &ServiceError) -> Notice {
    match error {
        ServiceError::InvalidInput(ValidationError::EmptyEmail)
        | ServiceError::InvalidInput(ValidationError::EmptyPassword) => {
            Notice::warning("Email and password are required.")
        }
        ServiceError::InvalidInput(ValidationError::EmptyJournalName) => {
            Notice::warning("Journal name cannot be empty.")
        }
        ServiceError::InvalidInput(ValidationError::EmptyContent) => {
            Notice::warning("Entry content cannot be empty.")
        }
        ServiceError::DuplicateEmail(_) => Notice::danger("Email already registered."),
        ServiceError::InvalidCredentials => Notice::danger("Invalid email or password."),
        ServiceError::NotFound { resource, .. } => {
            Notice::danger(format!("{} not found.", capitalize(resource)))
        }
        ServiceError::AccessDenied { resource, .. } => {
            Notice::danger(format!("You do not have access to this {resource}."))
        }
        ServiceError::PasswordHash(_) | ServiceError::Repo(_) => {
            Notice::danger("Something went wrong.")
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Generic 500 response.
pub fn internal_error_page() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Html(ERROR_PAGE)).into_response()
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            Self::Service { error, redirect_to } if !error.is_fault() => {
                redirect_with(notice_for(&error), redirect_to)
            }
            fault => {
                error!("event=request_fault module=web status=error error={fault}");
                internal_error_page()
            }
        }
    }
}
