//! Shared error types for the services crate.

use thiserror::Error;

use reflect_core::model::{IdError, TextError};

/// Errors emitted by a `QuestionsApi` implementation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("backend request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("backend returned an unreadable body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("backend unavailable: {0}")]
    Backend(String),
}

/// Locally detected problems with a user action. No request is made for these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Answer cannot be empty.")]
    EmptyAnswer,
    #[error("No unanswered question to associate with this answer.")]
    NoUnansweredQuestion,
    #[error("User is not authenticated.")]
    MissingUserId,
}

impl From<TextError> for ValidationError {
    fn from(err: TextError) -> Self {
        match err {
            TextError::Empty => Self::EmptyAnswer,
        }
    }
}

impl From<IdError> for ValidationError {
    fn from(_: IdError) -> Self {
        Self::MissingUserId
    }
}

/// Errors emitted by `ViewStateSynchronizer` and `SessionController`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SyncError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Network(#[from] ApiError),
    #[error("a new question is already being generated")]
    ConcurrencyRejected,
}

impl SyncError {
    #[must_use]
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// Errors emitted by `AuthGate` implementations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("email is required")]
    MissingEmail,
    #[error("password is required")]
    MissingPassword,
    #[error("{message}")]
    Provider { message: String },
    #[error("identity provider request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("identity provider returned an invalid user: {0}")]
    InvalidUser(#[from] IdError),
    #[error("saved session could not be accessed: {0}")]
    SessionIo(#[from] std::io::Error),
    #[error("saved session is unreadable: {0}")]
    SessionDecode(#[from] serde_json::Error),
}

/// Errors raised while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("Missing Firebase configuration. Please set FIREBASE_API_KEY.")]
    MissingFirebaseApiKey,
    #[error("invalid backend url: {raw}")]
    InvalidApiUrl { raw: String },
}
