use reflect_core::model::AnsweredRecord;

pub const NO_UNANSWERED_TEXT: &str = "No unanswered questions available.";
pub const UNANSWERED_FAILED_TEXT: &str = "Failed to fetch unanswered questions.";
pub const GENERATING_TEXT: &str = "New question being generated...";
pub const GENERATE_FAILED_TEXT: &str = "Failed to generate a new question.";
pub const SUBMIT_FAILED_TEXT: &str = "Failed to submit your answer. Please try again.";

/// Everything the synchronizer needs from the page.
///
/// Implementations decide how things look; they must not call back into the
/// synchronizer.
pub trait UiAdapter: Send + Sync {
    /// Text of the unanswered-question widget (a question or a placeholder).
    fn show_unanswered(&self, text: &str);

    /// Latest answered question, or `None` for the placeholder.
    fn show_latest(&self, record: Option<&AnsweredRecord>);

    /// Replaces every row of the answered-questions table.
    fn show_answered(&self, records: &[AnsweredRecord]);

    fn set_form_enabled(&self, enabled: bool);

    fn clear_answer_input(&self);

    /// Blocking message for the user.
    fn alert(&self, message: &str);

    /// Shows the signed-in views for `email`, or the sign-in form for `None`.
    fn show_session(&self, email: Option<&str>);
}
