use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::model::ids::QuestionId;
use crate::time::deserialize_server_timestamp;

/// A question the user has already answered, as listed by the backend.
///
/// Every field is optional on the wire; `/latest-answer` only carries the three
/// text fields while `/answers` also carries the id and creation date.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct AnsweredRecord {
    #[serde(default)]
    pub id: Option<QuestionId>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub llm_answer: Option<String>,
    #[serde(default)]
    pub user_answer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_server_timestamp")]
    pub date_question_created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub latest: bool,
}

impl AnsweredRecord {
    #[must_use]
    pub fn question(&self) -> Option<&str> {
        non_blank(self.question.as_deref())
    }

    #[must_use]
    pub fn llm_answer(&self) -> Option<&str> {
        non_blank(self.llm_answer.as_deref())
    }

    #[must_use]
    pub fn user_answer(&self) -> Option<&str> {
        non_blank(self.user_answer.as_deref())
    }

    /// True when both the question and the user's answer carry text.
    ///
    /// `/latest-answer` answers with all-null fields when nothing was answered yet.
    #[must_use]
    pub fn is_answered(&self) -> bool {
        self.question().is_some() && self.user_answer().is_some()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
