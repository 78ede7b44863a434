use serde::{Deserialize, Serialize};

use crate::model::ids::QuestionId;

/// A generated question that still awaits the user's answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnansweredQuestion {
    pub id: QuestionId,
    pub question: String,
}

impl UnansweredQuestion {
    #[must_use]
    pub fn new(id: QuestionId, question: impl Into<String>) -> Self {
        Self {
            id,
            question: question.into(),
        }
    }

    /// Builds a question from nullable wire fields.
    ///
    /// The backend reports "nothing pending" either with an empty body or with
    /// `{"id": null, "question": null}`; a blank question text counts as absent too.
    #[must_use]
    pub fn from_parts(id: Option<QuestionId>, question: Option<String>) -> Option<Self> {
        let question = question.filter(|q| !q.trim().is_empty())?;
        Some(Self::new(id?, question))
    }
}

/// Payload returned by `/generate-new`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeneratedQuestion {
    pub id: QuestionId,
    pub question: String,
    #[serde(default)]
    pub llm_answer: Option<String>,
}

impl GeneratedQuestion {
    #[must_use]
    pub fn into_unanswered(self) -> UnansweredQuestion {
        UnansweredQuestion::new(self.id, self.question)
    }
}
