mod answer;
mod ids;
mod question;
mod slot;
mod text;

pub use answer::AnsweredRecord;
pub use ids::{IdError, QuestionId, UserId};
pub use question::{GeneratedQuestion, UnansweredQuestion};
pub use slot::UnansweredSlot;
pub use text::{AnswerText, TextError};
