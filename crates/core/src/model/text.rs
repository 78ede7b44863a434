use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextError {
    #[error("Answer cannot be empty.")]
    Empty,
}

/// A user answer that has been trimmed and checked for content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnswerText(String);

impl AnswerText {
    /// # Errors
    ///
    /// Returns `TextError::Empty` for empty or whitespace-only input.
    pub fn parse(s: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = s.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
