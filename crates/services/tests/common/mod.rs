#![allow(dead_code)]

pub mod stub;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reflect_core::model::{AnsweredRecord, GeneratedQuestion, UnansweredQuestion, UserId};
use services::{ApiError, NewAnswer, QuestionsApi, UiAdapter};
use tokio::sync::Notify;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Unanswered(String),
    Latest(Option<String>),
    Answered(usize),
    FormEnabled(bool),
    ClearedInput,
    Alert(String),
    Session(Option<String>),
}

/// `UiAdapter` that remembers everything it was asked to show.
#[derive(Default)]
pub struct RecordingUi {
    events: Mutex<Vec<UiEvent>>,
    rows: Mutex<Vec<AnsweredRecord>>,
}

impl RecordingUi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn push(&self, event: UiEvent) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<UiEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn unanswered_text(&self) -> Option<String> {
        self.events().into_iter().rev().find_map(|e| match e {
            UiEvent::Unanswered(text) => Some(text),
            _ => None,
        })
    }

    pub fn latest_question(&self) -> Option<Option<String>> {
        self.events().into_iter().rev().find_map(|e| match e {
            UiEvent::Latest(question) => Some(question),
            _ => None,
        })
    }

    pub fn alerts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                UiEvent::Alert(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn session(&self) -> Option<Option<String>> {
        self.events().into_iter().rev().find_map(|e| match e {
            UiEvent::Session(email) => Some(email),
            _ => None,
        })
    }

    pub fn rows(&self) -> Vec<AnsweredRecord> {
        self.rows.lock().unwrap().clone()
    }

    pub fn count(&self, event: &UiEvent) -> usize {
        self.events().iter().filter(|e| *e == event).count()
    }
}

impl UiAdapter for RecordingUi {
    fn show_unanswered(&self, text: &str) {
        self.push(UiEvent::Unanswered(text.to_string()));
    }

    fn show_latest(&self, record: Option<&AnsweredRecord>) {
        let question = record.and_then(|r| r.question().map(str::to_string));
        self.push(UiEvent::Latest(question));
    }

    fn show_answered(&self, records: &[AnsweredRecord]) {
        *self.rows.lock().unwrap() = records.to_vec();
        self.push(UiEvent::Answered(records.len()));
    }

    fn set_form_enabled(&self, enabled: bool) {
        self.push(UiEvent::FormEnabled(enabled));
    }

    fn clear_answer_input(&self) {
        self.push(UiEvent::ClearedInput);
    }

    fn alert(&self, message: &str) {
        self.push(UiEvent::Alert(message.to_string()));
    }

    fn show_session(&self, email: Option<&str>) {
        self.push(UiEvent::Session(email.map(str::to_string)));
    }
}

/// Wraps another backend and holds `/generate-new` until `release` is notified.
pub struct GatedApi<A> {
    pub inner: A,
    pub release: Arc<Notify>,
}

#[async_trait]
impl<A: QuestionsApi> QuestionsApi for GatedApi<A> {
    async fn latest_unanswered(
        &self,
        user: &UserId,
    ) -> Result<Option<UnansweredQuestion>, ApiError> {
        self.inner.latest_unanswered(user).await
    }

    async fn latest_answer(&self, user: &UserId) -> Result<Option<AnsweredRecord>, ApiError> {
        self.inner.latest_answer(user).await
    }

    async fn answers(&self, user: &UserId) -> Result<Vec<AnsweredRecord>, ApiError> {
        self.inner.answers(user).await
    }

    async fn add_answer(&self, user: &UserId, answer: &NewAnswer) -> Result<(), ApiError> {
        self.inner.add_answer(user, answer).await
    }

    async fn generate_new(&self, user: &UserId) -> Result<GeneratedQuestion, ApiError> {
        self.release.notified().await;
        self.inner.generate_new(user).await
    }
}

/// Wraps another backend and holds `/latest-unanswered` until `release` is notified.
pub struct HeldUnansweredApi<A> {
    pub inner: A,
    pub release: Arc<Notify>,
}

#[async_trait]
impl<A: QuestionsApi> QuestionsApi for HeldUnansweredApi<A> {
    async fn latest_unanswered(
        &self,
        user: &UserId,
    ) -> Result<Option<UnansweredQuestion>, ApiError> {
        self.release.notified().await;
        self.inner.latest_unanswered(user).await
    }

    async fn latest_answer(&self, user: &UserId) -> Result<Option<AnsweredRecord>, ApiError> {
        self.inner.latest_answer(user).await
    }

    async fn answers(&self, user: &UserId) -> Result<Vec<AnsweredRecord>, ApiError> {
        self.inner.answers(user).await
    }

    async fn add_answer(&self, user: &UserId, answer: &NewAnswer) -> Result<(), ApiError> {
        self.inner.add_answer(user, answer).await
    }

    async fn generate_new(&self, user: &UserId) -> Result<GeneratedQuestion, ApiError> {
        self.inner.generate_new(user).await
    }
}

pub fn user(uid: &str) -> UserId {
    UserId::parse(uid).unwrap()
}
