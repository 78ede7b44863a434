use dioxus::prelude::*;

use reflect_core::model::AnsweredRecord;
use services::UiAdapter;

use crate::vm::{AnswerRowVm, LatestAnswerVm, map_answer_rows};

pub const LOADING_TEXT: &str = "Loading...";

/// Everything the signed-in page renders, written only through `UiAdapter`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageModel {
    pub signed_in_as: Option<String>,
    pub unanswered_text: String,
    pub latest: LatestAnswerVm,
    pub rows: Vec<AnswerRowVm>,
    pub form_enabled: bool,
    pub answer_input: String,
    pub alert: Option<String>,
}

impl Default for PageModel {
    fn default() -> Self {
        Self {
            signed_in_as: None,
            unanswered_text: LOADING_TEXT.to_string(),
            latest: LatestAnswerVm::default(),
            rows: Vec::new(),
            form_enabled: true,
            answer_input: String::new(),
            alert: None,
        }
    }
}

impl PageModel {
    /// Signing in or out resets every session view.
    pub fn show_session(&mut self, email: Option<&str>) {
        let alert = self.alert.take();
        *self = Self {
            signed_in_as: email.map(str::to_string),
            alert,
            ..Self::default()
        };
    }

    pub fn show_answered(&mut self, records: &[AnsweredRecord]) {
        self.rows = map_answer_rows(records);
    }

    pub fn show_latest(&mut self, record: Option<&AnsweredRecord>) {
        self.latest = LatestAnswerVm::from_record(record);
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }
}

/// `UiAdapter` that writes into the page signal.
#[derive(Clone, Copy)]
pub struct PageUi {
    page: SyncSignal<PageModel>,
}

impl PageUi {
    #[must_use]
    pub fn new(page: SyncSignal<PageModel>) -> Self {
        Self { page }
    }

    fn update(&self, f: impl FnOnce(&mut PageModel)) {
        let mut page = self.page;
        f(&mut page.write());
    }
}

impl UiAdapter for PageUi {
    fn show_unanswered(&self, text: &str) {
        self.update(|page| page.unanswered_text = text.to_string());
    }

    fn show_latest(&self, record: Option<&AnsweredRecord>) {
        self.update(|page| page.show_latest(record));
    }

    fn show_answered(&self, records: &[AnsweredRecord]) {
        self.update(|page| page.show_answered(records));
    }

    fn set_form_enabled(&self, enabled: bool) {
        self.update(|page| page.form_enabled = enabled);
    }

    fn clear_answer_input(&self) {
        self.update(|page| page.answer_input.clear());
    }

    fn alert(&self, message: &str) {
        self.update(|page| page.alert = Some(message.to_string()));
    }

    fn show_session(&self, email: Option<&str>) {
        self.update(|page| page.show_session(email));
    }
}
