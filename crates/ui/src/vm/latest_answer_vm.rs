use reflect_core::model::AnsweredRecord;

pub const NO_QUESTION_YET: &str = "No question yet";
pub const NO_ANSWER_YET: &str = "No answer yet";
const NO_AI_GUESS: &str = "No AI guess available";

/// The latest-answer panel: question, the model's guess and the user's answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LatestAnswerVm {
    pub question: String,
    pub llm_answer: String,
    pub user_answer: String,
}

impl Default for LatestAnswerVm {
    fn default() -> Self {
        Self {
            question: NO_QUESTION_YET.to_string(),
            llm_answer: NO_ANSWER_YET.to_string(),
            user_answer: NO_ANSWER_YET.to_string(),
        }
    }
}

impl LatestAnswerVm {
    /// Records without both a question and an answer render as placeholders.
    #[must_use]
    pub fn from_record(record: Option<&AnsweredRecord>) -> Self {
        match record {
            Some(record) if record.is_answered() => Self {
                question: record.question().unwrap_or_default().to_string(),
                llm_answer: record.llm_answer().unwrap_or(NO_AI_GUESS).to_string(),
                user_answer: record.user_answer().unwrap_or_default().to_string(),
            },
            _ => Self::default(),
        }
    }
}
