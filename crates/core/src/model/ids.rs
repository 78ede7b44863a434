use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Identifier of a question as issued by the backend.
///
/// The backend is free to use integer row ids or string ids. The id is kept in
/// whatever JSON shape it arrived in so it can be echoed back unchanged.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(RawQuestionId);

#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
enum RawQuestionId {
    Number(i64),
    Text(String),
}

impl QuestionId {
    /// Creates a `QuestionId` that serializes as a JSON number.
    #[must_use]
    pub fn from_number(id: i64) -> Self {
        Self(RawQuestionId::Number(id))
    }

    /// Creates a `QuestionId` that serializes as a JSON string.
    #[must_use]
    pub fn from_text(id: impl Into<String>) -> Self {
        Self(RawQuestionId::Text(id.into()))
    }
}

/// Identity-provider uid of the signed-in user, forwarded as the `User-ID` header.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    /// Parses a uid, rejecting blank values.
    ///
    /// # Errors
    ///
    /// Returns `IdError::EmptyUserId` if the value is empty or whitespace.
    pub fn parse(raw: impl Into<String>) -> Result<Self, IdError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(IdError::EmptyUserId);
        }
        Ok(Self(raw))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("user id must not be empty")]
    EmptyUserId,
}

// ─── Formatting ────────────────────────────────────────────────────────────────

impl fmt::Debug for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionId({self})")
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            RawQuestionId::Number(n) => write!(f, "{n}"),
            RawQuestionId::Text(s) => f.write_str(s),
        }
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({})", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
