use reflect_core::model::AnsweredRecord;

use crate::vm::time_fmt::format_datetime;

pub const MISSING_TEXT: &str = "Undefined";
pub const MISSING_USER_ANSWER: &str = "No Answer";

/// One row of the answered-questions table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerRowVm {
    pub key: String,
    pub date_str: String,
    pub question: String,
    pub llm_answer: String,
    pub user_answer: String,
}

impl AnswerRowVm {
    fn from_record(index: usize, record: &AnsweredRecord) -> Self {
        Self {
            key: record
                .id
                .as_ref()
                .map_or_else(|| format!("row-{index}"), ToString::to_string),
            date_str: format_datetime(record.date_question_created),
            question: record.question().unwrap_or(MISSING_TEXT).to_string(),
            llm_answer: record.llm_answer().unwrap_or(MISSING_TEXT).to_string(),
            user_answer: record
                .user_answer()
                .unwrap_or(MISSING_USER_ANSWER)
                .to_string(),
        }
    }
}

#[must_use]
pub fn map_answer_rows(records: &[AnsweredRecord]) -> Vec<AnswerRowVm> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| AnswerRowVm::from_record(index, record))
        .collect()
}
