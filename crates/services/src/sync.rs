use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use reflect_core::model::{
    AnswerText, AnsweredRecord, QuestionId, UnansweredQuestion, UnansweredSlot, UserId,
};

use crate::api::{NewAnswer, QuestionsApi};
use crate::error::{SyncError, ValidationError};
use crate::ui::{
    GENERATE_FAILED_TEXT, GENERATING_TEXT, NO_UNANSWERED_TEXT, SUBMIT_FAILED_TEXT, UiAdapter,
    UNANSWERED_FAILED_TEXT,
};

//
// ─── GUARDS ────────────────────────────────────────────────────────────────────
//

/// Holds the generate-new flag; dropping it releases the flag and re-enables the form.
struct GeneratingGuard<'a> {
    flag: &'a AtomicBool,
    ui: &'a dyn UiAdapter,
}

impl<'a> GeneratingGuard<'a> {
    fn acquire(flag: &'a AtomicBool, ui: &'a dyn UiAdapter) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        ui.set_form_enabled(false);
        Some(Self { flag, ui })
    }
}

impl Drop for GeneratingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
        self.ui.set_form_enabled(true);
    }
}

/// Forwards to the page until the session ends, then drops every write.
struct SessionUi {
    inner: Arc<dyn UiAdapter>,
    closed: AtomicBool,
}

impl SessionUi {
    fn page(&self) -> Option<&dyn UiAdapter> {
        (!self.closed.load(Ordering::Acquire)).then_some(self.inner.as_ref())
    }
}

impl UiAdapter for SessionUi {
    fn show_unanswered(&self, text: &str) {
        if let Some(page) = self.page() {
            page.show_unanswered(text);
        }
    }

    fn show_latest(&self, record: Option<&AnsweredRecord>) {
        if let Some(page) = self.page() {
            page.show_latest(record);
        }
    }

    fn show_answered(&self, records: &[AnsweredRecord]) {
        if let Some(page) = self.page() {
            page.show_answered(records);
        }
    }

    fn set_form_enabled(&self, enabled: bool) {
        if let Some(page) = self.page() {
            page.set_form_enabled(enabled);
        }
    }

    fn clear_answer_input(&self) {
        if let Some(page) = self.page() {
            page.clear_answer_input();
        }
    }

    fn alert(&self, message: &str) {
        if let Some(page) = self.page() {
            page.alert(message);
        }
    }

    fn show_session(&self, email: Option<&str>) {
        if let Some(page) = self.page() {
            page.show_session(email);
        }
    }
}

/// Counts in-flight unanswered-question fetches for `UnansweredSlot::Loading`.
struct PendingFetch<'a>(&'a AtomicUsize);

impl<'a> PendingFetch<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::AcqRel);
        Self(counter)
    }
}

impl Drop for PendingFetch<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

//
// ─── SYNCHRONIZER ──────────────────────────────────────────────────────────────
//

/// Keeps the unanswered-question widget, the answer form and the answered list
/// in line with the backend for one signed-in session.
///
/// A new instance is built on every sign-in and dropped on sign-out, so no state
/// outlives the session. Once `close` is called, responses that are still in
/// flight no longer reach the page. Refresh failures are rendered as placeholders before
/// being returned; callers may ignore the `Err` without leaving the page stale.
pub struct ViewStateSynchronizer {
    api: Arc<dyn QuestionsApi>,
    ui: SessionUi,
    current: Mutex<Option<QuestionId>>,
    generating: AtomicBool,
    pending_fetches: AtomicUsize,
}

impl ViewStateSynchronizer {
    #[must_use]
    pub fn new(api: Arc<dyn QuestionsApi>, ui: Arc<dyn UiAdapter>) -> Self {
        Self {
            api,
            ui: SessionUi {
                inner: ui,
                closed: AtomicBool::new(false),
            },
            current: Mutex::new(None),
            generating: AtomicBool::new(false),
            pending_fetches: AtomicUsize::new(0),
        }
    }

    fn current(&self) -> MutexGuard<'_, Option<QuestionId>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_current(&self, id: Option<QuestionId>) {
        *self.current() = id;
    }

    #[must_use]
    pub fn current_unanswered_id(&self) -> Option<QuestionId> {
        self.current().clone()
    }

    /// End the session: later page writes from this synchronizer are dropped.
    pub fn close(&self) {
        self.ui.closed.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.ui.closed.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn is_generating(&self) -> bool {
        self.generating.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn slot(&self) -> UnansweredSlot {
        if self.is_generating() {
            return UnansweredSlot::Generating;
        }
        match self.current_unanswered_id() {
            Some(id) => UnansweredSlot::Present(id),
            None if self.pending_fetches.load(Ordering::Acquire) > 0 => UnansweredSlot::Loading,
            None => UnansweredSlot::Empty,
        }
    }

    /// Fetch the user's current unanswered question and render it.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Network` when the fetch fails; the id is cleared and a
    /// placeholder is shown first.
    pub async fn refresh_unanswered(
        &self,
        user: &UserId,
    ) -> Result<Option<UnansweredQuestion>, SyncError> {
        let fetched = {
            let _pending = PendingFetch::enter(&self.pending_fetches);
            self.api.latest_unanswered(user).await
        };

        match fetched {
            Ok(Some(question)) => {
                debug!(question = %question.id, "unanswered question loaded");
                self.set_current(Some(question.id.clone()));
                self.ui.show_unanswered(&question.question);
                Ok(Some(question))
            }
            Ok(None) => {
                self.set_current(None);
                self.ui.show_unanswered(NO_UNANSWERED_TEXT);
                Ok(None)
            }
            Err(err) => {
                warn!(error = %err, "failed to fetch the latest unanswered question");
                self.set_current(None);
                self.ui.show_unanswered(UNANSWERED_FAILED_TEXT);
                Err(err.into())
            }
        }
    }

    /// Fetch and render the most recently answered question.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Network` when the fetch fails; the placeholder is shown first.
    pub async fn refresh_latest_answer(
        &self,
        user: &UserId,
    ) -> Result<Option<AnsweredRecord>, SyncError> {
        match self.api.latest_answer(user).await {
            Ok(record) => {
                let record = record.filter(AnsweredRecord::is_answered);
                self.ui.show_latest(record.as_ref());
                Ok(record)
            }
            Err(err) => {
                warn!(error = %err, "failed to fetch the latest answer");
                self.ui.show_latest(None);
                Err(err.into())
            }
        }
    }

    /// Fetch every answered question except the one flagged `latest` and
    /// replace the rendered table with them, in server order.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Network` when the fetch fails; previously rendered rows stay.
    pub async fn refresh_answered_list(
        &self,
        user: &UserId,
    ) -> Result<Vec<AnsweredRecord>, SyncError> {
        let records = self.api.answers(user).await.map_err(|err| {
            warn!(error = %err, "failed to fetch answers");
            SyncError::from(err)
        })?;

        let visible: Vec<AnsweredRecord> = records.into_iter().filter(|r| !r.latest).collect();
        self.ui.show_answered(&visible);
        Ok(visible)
    }

    /// Answer the current unanswered question, then refresh all three views in order.
    ///
    /// Failures of the follow-up refreshes are rendered by the refreshes themselves
    /// and do not turn a stored answer into an error.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Validation` (after alerting) for a blank answer or when no
    /// question is present (none loaded, or a new one is being generated), and `SyncError::Network` when the answer was not stored.
    pub async fn submit_answer(&self, user: &UserId, answer: &str) -> Result<(), SyncError> {
        let user_answer = match AnswerText::parse(answer) {
            Ok(text) => text,
            Err(err) => return Err(self.reject(err.into())),
        };
        let Some(id) = self.slot().question_id().cloned() else {
            return Err(self.reject(ValidationError::NoUnansweredQuestion));
        };

        debug!(question = %id, "submitting answer");
        self.ui.set_form_enabled(false);
        let posted = self
            .api
            .add_answer(user, &NewAnswer { id, user_answer })
            .await;
        self.ui.set_form_enabled(true);

        if let Err(err) = posted {
            warn!(error = %err, "failed to submit answer");
            self.ui.alert(SUBMIT_FAILED_TEXT);
            return Err(err.into());
        }

        self.ui.clear_answer_input();
        self.set_current(None);
        let _ = self.refresh_unanswered(user).await;
        let _ = self.refresh_latest_answer(user).await;
        let _ = self.refresh_answered_list(user).await;
        Ok(())
    }

    /// Ask the backend for a fresh question. Only one request runs at a time.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::ConcurrencyRejected` without side effects while another
    /// generation is running, and `SyncError::Network` when generation fails (the
    /// pending question is cleared).
    pub async fn generate_new(&self, user: &UserId) -> Result<UnansweredQuestion, SyncError> {
        let Some(_guard) = GeneratingGuard::acquire(&self.generating, &self.ui) else {
            debug!("already generating a new question, ignoring request");
            return Err(SyncError::ConcurrencyRejected);
        };

        self.ui.show_unanswered(GENERATING_TEXT);
        match self.api.generate_new(user).await {
            Ok(generated) => {
                let question = generated.into_unanswered();
                debug!(question = %question.id, "generated new question");
                self.set_current(Some(question.id.clone()));
                self.ui.show_unanswered(&question.question);
                let _ = self.refresh_answered_list(user).await;
                Ok(question)
            }
            Err(err) => {
                warn!(error = %err, "failed to generate a new question");
                self.set_current(None);
                self.ui.show_unanswered(GENERATE_FAILED_TEXT);
                Err(err.into())
            }
        }
    }

    fn reject(&self, err: ValidationError) -> SyncError {
        self.ui.alert(&err.to_string());
        err.into()
    }
}
