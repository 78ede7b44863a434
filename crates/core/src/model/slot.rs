use crate::model::ids::QuestionId;

/// What the unanswered-question widget is currently showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnansweredSlot {
    Empty,
    Loading,
    Present(QuestionId),
    Generating,
}

impl UnansweredSlot {
    /// The id an answer would be attached to; only a present question has one.
    #[must_use]
    pub fn question_id(&self) -> Option<&QuestionId> {
        match self {
            Self::Present(id) => Some(id),
            _ => None,
        }
    }
}
