use std::env;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use reflect_core::model::{
    AnsweredRecord, GeneratedQuestion, QuestionId, UnansweredQuestion, UserId,
};

use super::{NewAnswer, QuestionsApi};
use crate::error::{ApiError, ConfigError};

/// Header carrying the signed-in user's uid on every backend request.
pub const USER_ID_HEADER: &str = "User-ID";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8000";

    /// # Errors
    ///
    /// Returns `ConfigError::InvalidApiUrl` unless the url is an http(s) url.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = base_url.into();
        let trimmed = raw.trim().trim_end_matches('/');
        let has_host = ["http://", "https://"]
            .iter()
            .any(|scheme| trimmed.strip_prefix(scheme).is_some_and(|rest| !rest.is_empty()));
        if !has_host {
            return Err(ConfigError::InvalidApiUrl { raw });
        }
        Ok(Self {
            base_url: trimmed.to_string(),
        })
    }

    /// Reads `REFLECT_API_URL`, falling back to the local development server.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidApiUrl` if the variable is set to a non-http url.
    pub fn from_env() -> Result<Self, ConfigError> {
        match env::var("REFLECT_API_URL") {
            Ok(url) if !url.trim().is_empty() => Self::new(url),
            _ => Self::new(Self::DEFAULT_BASE_URL),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// `QuestionsApi` over HTTP.
#[derive(Clone)]
pub struct HttpQuestionsApi {
    client: Client,
    config: ApiConfig,
}

impl HttpQuestionsApi {
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Use a preconfigured client (timeouts, proxies).
    #[must_use]
    pub fn with_client(client: Client, config: ApiConfig) -> Self {
        Self { client, config }
    }

    async fn get_text(&self, user: &UserId, path: &str) -> Result<String, ApiError> {
        debug!(path, "GET");
        let response = self
            .client
            .get(self.config.endpoint(path))
            .header(USER_ID_HEADER, user.as_str())
            .send()
            .await?;
        read_success_body(response).await
    }
}

#[async_trait]
impl QuestionsApi for HttpQuestionsApi {
    async fn latest_unanswered(
        &self,
        user: &UserId,
    ) -> Result<Option<UnansweredQuestion>, ApiError> {
        let body = self.get_text(user, "/latest-unanswered").await?;
        let payload = decode_optional::<UnansweredPayload>(&body)?;
        Ok(payload.and_then(|p| UnansweredQuestion::from_parts(p.id, p.question)))
    }

    async fn latest_answer(&self, user: &UserId) -> Result<Option<AnsweredRecord>, ApiError> {
        let body = self.get_text(user, "/latest-answer").await?;
        decode_optional(&body)
    }

    async fn answers(&self, user: &UserId) -> Result<Vec<AnsweredRecord>, ApiError> {
        let body = self.get_text(user, "/answers").await?;
        Ok(decode_optional::<Vec<AnsweredRecord>>(&body)?.unwrap_or_default())
    }

    async fn add_answer(&self, user: &UserId, answer: &NewAnswer) -> Result<(), ApiError> {
        debug!(question = %answer.id, "POST /add-answer");
        let response = self
            .client
            .post(self.config.endpoint("/add-answer"))
            .header(USER_ID_HEADER, user.as_str())
            .json(answer)
            .send()
            .await?;
        read_success_body(response).await.map(|_| ())
    }

    async fn generate_new(&self, user: &UserId) -> Result<GeneratedQuestion, ApiError> {
        debug!("POST /generate-new");
        let response = self
            .client
            .post(self.config.endpoint("/generate-new"))
            .header(USER_ID_HEADER, user.as_str())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;
        let body = read_success_body(response).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[derive(Debug, Deserialize)]
struct UnansweredPayload {
    #[serde(default)]
    id: Option<QuestionId>,
    #[serde(default)]
    question: Option<String>,
}

async fn read_success_body(response: Response) -> Result<String, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::HttpStatus(status));
    }
    Ok(response.text().await?)
}

/// Empty bodies and a literal `null` both mean "nothing to report".
fn decode_optional<T: DeserializeOwned>(body: &str) -> Result<Option<T>, ApiError> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    Ok(serde_json::from_str::<Option<T>>(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_strips_trailing_slash() {
        let config = ApiConfig::new("http://localhost:8000/").unwrap();
        assert_eq!(config.endpoint("/answers"), "http://localhost:8000/answers");
    }

    #[test]
    fn config_rejects_non_http_urls() {
        assert!(ApiConfig::new("localhost:8000").is_err());
        assert!(ApiConfig::new("https://").is_err());
        assert!(ApiConfig::new("ftp://example.com").is_err());
    }

    #[test]
    fn null_fields_decode_to_no_question() {
        let payload = decode_optional::<UnansweredPayload>(r#"{"id": null, "question": null}"#)
            .unwrap()
            .unwrap();
        assert!(UnansweredQuestion::from_parts(payload.id, payload.question).is_none());
    }

    #[test]
    fn empty_and_null_bodies_decode_to_none() {
        assert!(decode_optional::<AnsweredRecord>("").unwrap().is_none());
        assert!(decode_optional::<AnsweredRecord>("null").unwrap().is_none());
        assert!(decode_optional::<Vec<AnsweredRecord>>("  \n").unwrap().is_none());
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let err = decode_optional::<AnsweredRecord>("{not json").unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
