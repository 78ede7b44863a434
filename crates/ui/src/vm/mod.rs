mod answer_row_vm;
mod latest_answer_vm;
mod time_fmt;

pub use answer_row_vm::{AnswerRowVm, MISSING_TEXT, MISSING_USER_ANSWER, map_answer_rows};
pub use latest_answer_vm::{LatestAnswerVm, NO_ANSWER_YET, NO_QUESTION_YET};
pub use time_fmt::{UNKNOWN_DATE, format_datetime};
