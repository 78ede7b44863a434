mod http;
mod memory;

use async_trait::async_trait;
use serde::Serialize;

use reflect_core::model::{
    AnswerText, AnsweredRecord, GeneratedQuestion, QuestionId, UnansweredQuestion, UserId,
};

use crate::error::ApiError;

pub use http::{ApiConfig, HttpQuestionsApi, USER_ID_HEADER};
pub use memory::{Endpoint, InMemoryQuestionsApi};

/// Body of `POST /add-answer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAnswer {
    pub id: QuestionId,
    pub user_answer: AnswerText,
}

/// Backend contract. Every call is scoped to one user via the `User-ID` header.
#[async_trait]
pub trait QuestionsApi: Send + Sync {
    /// `GET /latest-unanswered`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failures, non-success statuses or bad bodies.
    async fn latest_unanswered(&self, user: &UserId)
    -> Result<Option<UnansweredQuestion>, ApiError>;

    /// `GET /latest-answer`. The record may be all-empty when nothing was answered yet.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failures, non-success statuses or bad bodies.
    async fn latest_answer(&self, user: &UserId) -> Result<Option<AnsweredRecord>, ApiError>;

    /// `GET /answers`, in server order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failures, non-success statuses or bad bodies.
    async fn answers(&self, user: &UserId) -> Result<Vec<AnsweredRecord>, ApiError>;

    /// `POST /add-answer`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failures or non-success statuses.
    async fn add_answer(&self, user: &UserId, answer: &NewAnswer) -> Result<(), ApiError>;

    /// `POST /generate-new`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failures, non-success statuses or bad bodies.
    async fn generate_new(&self, user: &UserId) -> Result<GeneratedQuestion, ApiError>;
}
