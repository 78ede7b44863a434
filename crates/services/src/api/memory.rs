use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::StatusCode;

use reflect_core::Clock;
use reflect_core::model::{
    AnsweredRecord, GeneratedQuestion, QuestionId, UnansweredQuestion, UserId,
};

use super::{NewAnswer, QuestionsApi};
use crate::error::ApiError;

/// Backend endpoints, used for failure injection and call counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    LatestUnanswered,
    LatestAnswer,
    Answers,
    AddAnswer,
    GenerateNew,
}

impl Endpoint {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::LatestUnanswered => "/latest-unanswered",
            Self::LatestAnswer => "/latest-answer",
            Self::Answers => "/answers",
            Self::AddAnswer => "/add-answer",
            Self::GenerateNew => "/generate-new",
        }
    }
}

#[derive(Debug, Clone)]
struct StoredQuestion {
    id: QuestionId,
    question: String,
    llm_answer: Option<String>,
    user_answer: Option<String>,
    created_at: DateTime<Utc>,
    created_seq: u64,
    answered_seq: Option<u64>,
}

impl StoredQuestion {
    fn to_record(&self, latest: bool) -> AnsweredRecord {
        AnsweredRecord {
            id: Some(self.id.clone()),
            question: Some(self.question.clone()),
            llm_answer: self.llm_answer.clone(),
            user_answer: self.user_answer.clone(),
            date_question_created: Some(self.created_at),
            latest,
        }
    }
}

#[derive(Default)]
struct MemoryState {
    clock: Clock,
    seq: u64,
    next_generated_id: i64,
    questions: HashMap<UserId, Vec<StoredQuestion>>,
    scripted: VecDeque<GeneratedQuestion>,
    failing: HashSet<Endpoint>,
    calls: HashMap<Endpoint, usize>,
    posted: Vec<(UserId, NewAnswer)>,
}

impl MemoryState {
    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    fn insert(&mut self, user: &UserId, mut question: StoredQuestion) {
        question.created_seq = self.next_seq();
        question.created_at = self.clock.now() + Duration::seconds(seq_offset(question.created_seq));
        self.questions.entry(user.clone()).or_default().push(question);
    }

    fn user_questions(&self, user: &UserId) -> &[StoredQuestion] {
        self.questions.get(user).map_or(&[], Vec::as_slice)
    }

    fn latest_answered_seq(&self, user: &UserId) -> Option<u64> {
        self.user_questions(user)
            .iter()
            .filter_map(|q| q.answered_seq)
            .max()
    }
}

fn seq_offset(seq: u64) -> i64 {
    i64::try_from(seq).unwrap_or(i64::MAX)
}

/// In-process backend with the same observable behaviour as the real server.
///
/// Used by tests and by the offline demo mode. `/answers` lists every answered
/// question (newest first) and flags the most recently answered one as `latest`.
#[derive(Clone, Default)]
pub struct InMemoryQuestionsApi {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryQuestionsApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed clock for creation timestamps.
    #[must_use]
    pub fn with_clock(self, clock: Clock) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.clock = clock;
        }
        self
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, ApiError> {
        self.state
            .lock()
            .map_err(|e| ApiError::Backend(e.to_string()))
    }

    /// Records a call and fails it if the endpoint was marked as failing.
    fn enter(&self, endpoint: Endpoint) -> Result<MutexGuard<'_, MemoryState>, ApiError> {
        let mut state = self.lock()?;
        *state.calls.entry(endpoint).or_default() += 1;
        if state.failing.contains(&endpoint) {
            return Err(ApiError::HttpStatus(StatusCode::INTERNAL_SERVER_ERROR));
        }
        Ok(state)
    }

    /// Store an unanswered question for `user`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Backend` if the state lock is poisoned.
    pub fn seed_unanswered(
        &self,
        user: &UserId,
        id: QuestionId,
        question: &str,
    ) -> Result<(), ApiError> {
        let mut state = self.lock()?;
        state.insert(
            user,
            StoredQuestion {
                id,
                question: question.to_string(),
                llm_answer: None,
                user_answer: None,
                created_at: DateTime::<Utc>::MIN_UTC,
                created_seq: 0,
                answered_seq: None,
            },
        );
        Ok(())
    }

    /// Store an already answered question for `user`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Backend` if the state lock is poisoned.
    pub fn seed_answered(
        &self,
        user: &UserId,
        id: QuestionId,
        question: &str,
        llm_answer: Option<&str>,
        user_answer: &str,
    ) -> Result<(), ApiError> {
        let mut state = self.lock()?;
        let answered_seq = Some(state.next_seq());
        state.insert(
            user,
            StoredQuestion {
                id,
                question: question.to_string(),
                llm_answer: llm_answer.map(str::to_string),
                user_answer: Some(user_answer.to_string()),
                created_at: DateTime::<Utc>::MIN_UTC,
                created_seq: 0,
                answered_seq,
            },
        );
        Ok(())
    }

    /// Queue the question the next `/generate-new` call will return.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Backend` if the state lock is poisoned.
    pub fn script_generated(&self, generated: GeneratedQuestion) -> Result<(), ApiError> {
        self.lock()?.scripted.push_back(generated);
        Ok(())
    }

    /// Make every call to `endpoint` fail with a 500 until `recover` is called.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Backend` if the state lock is poisoned.
    pub fn fail(&self, endpoint: Endpoint) -> Result<(), ApiError> {
        self.lock()?.failing.insert(endpoint);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ApiError::Backend` if the state lock is poisoned.
    pub fn recover(&self, endpoint: Endpoint) -> Result<(), ApiError> {
        self.lock()?.failing.remove(&endpoint);
        Ok(())
    }

    /// Number of calls made to `endpoint`, failed ones included.
    #[must_use]
    pub fn calls(&self, endpoint: Endpoint) -> usize {
        self.lock()
            .map(|state| state.calls.get(&endpoint).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Bodies accepted by `/add-answer`, oldest first.
    #[must_use]
    pub fn posted_answers(&self) -> Vec<(UserId, NewAnswer)> {
        self.lock().map(|state| state.posted.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl QuestionsApi for InMemoryQuestionsApi {
    async fn latest_unanswered(
        &self,
        user: &UserId,
    ) -> Result<Option<UnansweredQuestion>, ApiError> {
        let state = self.enter(Endpoint::LatestUnanswered)?;
        Ok(state
            .user_questions(user)
            .iter()
            .filter(|q| q.user_answer.is_none())
            .max_by_key(|q| q.created_seq)
            .map(|q| UnansweredQuestion::new(q.id.clone(), q.question.clone())))
    }

    async fn latest_answer(&self, user: &UserId) -> Result<Option<AnsweredRecord>, ApiError> {
        let state = self.enter(Endpoint::LatestAnswer)?;
        let latest = state
            .user_questions(user)
            .iter()
            .filter(|q| q.answered_seq.is_some())
            .max_by_key(|q| q.answered_seq)
            .map(|q| AnsweredRecord {
                question: Some(q.question.clone()),
                llm_answer: q.llm_answer.clone(),
                user_answer: q.user_answer.clone(),
                ..AnsweredRecord::default()
            });
        // The real server answers with all-null fields rather than an empty body.
        Ok(Some(latest.unwrap_or_default()))
    }

    async fn answers(&self, user: &UserId) -> Result<Vec<AnsweredRecord>, ApiError> {
        let state = self.enter(Endpoint::Answers)?;
        let latest_seq = state.latest_answered_seq(user);
        let mut answered: Vec<&StoredQuestion> = state
            .user_questions(user)
            .iter()
            .filter(|q| q.answered_seq.is_some())
            .collect();
        answered.sort_by(|a, b| b.created_seq.cmp(&a.created_seq));
        Ok(answered
            .into_iter()
            .map(|q| q.to_record(q.answered_seq == latest_seq))
            .collect())
    }

    async fn add_answer(&self, user: &UserId, answer: &NewAnswer) -> Result<(), ApiError> {
        let mut state = self.enter(Endpoint::AddAnswer)?;
        let answered_seq = state.next_seq();
        let stored = state
            .questions
            .get_mut(user)
            .and_then(|questions| questions.iter_mut().find(|q| q.id == answer.id))
            .ok_or(ApiError::HttpStatus(StatusCode::NOT_FOUND))?;
        stored.user_answer = Some(answer.user_answer.as_str().to_string());
        stored.answered_seq = Some(answered_seq);
        state.posted.push((user.clone(), answer.clone()));
        Ok(())
    }

    async fn generate_new(&self, user: &UserId) -> Result<GeneratedQuestion, ApiError> {
        let mut state = self.enter(Endpoint::GenerateNew)?;
        let generated = match state.scripted.pop_front() {
            Some(generated) => generated,
            None => {
                state.next_generated_id += 1;
                let n = state.next_generated_id;
                GeneratedQuestion {
                    id: QuestionId::from_number(1000 + n),
                    question: format!("Reflection #{n}: what surprised you about yourself lately?"),
                    llm_answer: None,
                }
            }
        };
        state.insert(
            user,
            StoredQuestion {
                id: generated.id.clone(),
                question: generated.question.clone(),
                llm_answer: generated.llm_answer.clone(),
                user_answer: None,
                created_at: DateTime::<Utc>::MIN_UTC,
                created_seq: 0,
                answered_seq: None,
            },
        );
        Ok(generated)
    }
}
