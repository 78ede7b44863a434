use std::env;
use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use reflect_core::model::UserId;

use super::session_file::{SessionFile, StoredSession};
use super::{AuthGate, AuthState, AuthUser, require_credentials};
use crate::error::{AuthError, ConfigError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FirebaseConfig {
    pub api_key: String,
    pub auth_domain: Option<String>,
    pub project_id: Option<String>,
    pub identity_url: String,
    pub token_url: String,
    /// Where the sign-in is kept between runs. `None` keeps it in memory only.
    pub session_file: Option<PathBuf>,
}

impl FirebaseConfig {
    pub const DEFAULT_IDENTITY_URL: &'static str = "https://identitytoolkit.googleapis.com/v1";
    pub const DEFAULT_TOKEN_URL: &'static str = "https://securetoken.googleapis.com/v1";

    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            auth_domain: None,
            project_id: None,
            identity_url: Self::DEFAULT_IDENTITY_URL.to_string(),
            token_url: Self::DEFAULT_TOKEN_URL.to_string(),
            session_file: None,
        }
    }

    #[must_use]
    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = Some(path.into());
        self
    }

    /// Reads the web app configuration from `FIREBASE_*` variables.
    ///
    /// The sign-in is saved to `FIREBASE_SESSION_FILE`, or to
    /// `reflect/session.json` under the platform config directory when that
    /// is unset. An empty `FIREBASE_SESSION_FILE` turns saving off.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingFirebaseApiKey` when `FIREBASE_API_KEY` is unset or blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var("FIREBASE_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingFirebaseApiKey)?;
        let identity_url = env::var("FIREBASE_IDENTITY_URL")
            .unwrap_or_else(|_| Self::DEFAULT_IDENTITY_URL.into());
        let token_url =
            env::var("FIREBASE_TOKEN_URL").unwrap_or_else(|_| Self::DEFAULT_TOKEN_URL.into());
        Ok(Self {
            api_key,
            auth_domain: env::var("FIREBASE_AUTH_DOMAIN").ok(),
            project_id: env::var("FIREBASE_PROJECT_ID").ok(),
            identity_url,
            token_url,
            session_file: session_file_from(
                env::var_os("FIREBASE_SESSION_FILE"),
                dirs::config_dir(),
            ),
        })
    }

    fn endpoint(&self, method: &str) -> String {
        format!(
            "{}/accounts:{method}",
            self.identity_url.trim_end_matches('/')
        )
    }

    fn token_endpoint(&self) -> String {
        format!("{}/token", self.token_url.trim_end_matches('/'))
    }
}

fn session_file_from(
    explicit: Option<std::ffi::OsString>,
    config_dir: Option<PathBuf>,
) -> Option<PathBuf> {
    match explicit {
        Some(path) if path.is_empty() => None,
        Some(path) => Some(PathBuf::from(path)),
        None => config_dir.map(|dir| dir.join("reflect").join("session.json")),
    }
}

/// `AuthGate` backed by the Firebase Authentication REST API (email + password).
///
/// With a session file configured, the refresh token of the last sign-in is
/// saved so that `restore` can bring the user back on the next run.
pub struct FirebaseAuthGate {
    client: Client,
    config: FirebaseConfig,
    state: AuthState,
    session: Option<SessionFile>,
}

impl FirebaseAuthGate {
    #[must_use]
    pub fn new(config: FirebaseConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    #[must_use]
    pub fn with_client(client: Client, config: FirebaseConfig) -> Self {
        let session = config.session_file.clone().map(SessionFile::new);
        Self {
            client,
            config,
            state: AuthState::new(None),
            session,
        }
    }

    async fn call<B, R>(&self, method: &str, body: &B) -> Result<R, AuthError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned + Send,
    {
        debug!(method, "identity toolkit request");
        let request = self.client.post(self.config.endpoint(method)).json(body);
        self.send(request).await
    }

    /// Exchanges a refresh token for a fresh one.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenReply, AuthError> {
        debug!("secure token request");
        let request = self.client.post(self.config.token_endpoint()).form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ]);
        self.send(request).await
    }

    async fn send<R>(&self, request: RequestBuilder) -> Result<R, AuthError>
    where
        R: DeserializeOwned + Send,
    {
        let response = request
            .query(&[("key", self.config.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(provider_error(&text).unwrap_or(AuthError::HttpStatus(status)));
        }
        Ok(response.json().await?)
    }

    async fn authenticate(
        &self,
        method: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthUser, AuthError> {
        let (email, password) = require_credentials(email, password)?;
        let body = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };
        let reply: AccountReply = self.call(method, &body).await?;
        let user = AuthUser {
            uid: UserId::parse(reply.local_id)?,
            email: reply.email.unwrap_or_else(|| email.to_string()),
        };
        info!(uid = %user.uid, "signed in");
        if let Some(token) = reply.refresh_token {
            self.remember(&user, token).await;
        }
        self.state.publish(Some(user.clone()));
        Ok(user)
    }

    /// Failing to save only costs the next run its sign-in.
    async fn remember(&self, user: &AuthUser, refresh_token: String) {
        let Some(file) = &self.session else {
            return;
        };
        let stored = StoredSession {
            uid: user.uid.to_string(),
            email: user.email.clone(),
            refresh_token,
        };
        if let Err(err) = file.save(&stored).await {
            warn!(error = %err, path = %file.path().display(), "could not save session");
        }
    }

    async fn forget(&self) -> Result<(), AuthError> {
        match &self.session {
            Some(file) => file.clear().await,
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AuthGate for FirebaseAuthGate {
    fn current_user(&self) -> Option<AuthUser> {
        self.state.current()
    }

    fn subscribe(&self) -> watch::Receiver<Option<AuthUser>> {
        self.state.subscribe()
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        self.authenticate("signInWithPassword", email, password).await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        self.authenticate("signUp", email, password).await
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        info!("signed out");
        self.state.publish(None);
        self.forget().await
    }

    async fn restore(&self) -> Result<Option<AuthUser>, AuthError> {
        let Some(file) = &self.session else {
            return Ok(None);
        };
        let stored = match file.load().await {
            Ok(Some(stored)) => stored,
            Ok(None) => return Ok(None),
            Err(err @ AuthError::SessionDecode(_)) => {
                file.clear().await?;
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        let reply = match self.refresh(&stored.refresh_token).await {
            Ok(reply) => reply,
            Err(err @ AuthError::Provider { .. }) => {
                info!(error = %err, "saved session was rejected");
                file.clear().await?;
                return Err(err);
            }
            Err(err) => return Err(err),
        };
        if reply.user_id != stored.uid {
            file.clear().await?;
            return Err(AuthError::Provider {
                message: "USER_MISMATCH".to_string(),
            });
        }

        let user = AuthUser {
            uid: UserId::parse(reply.user_id)?,
            email: stored.email,
        };
        info!(uid = %user.uid, "session restored");
        self.remember(&user, reply.refresh_token).await;
        self.state.publish(Some(user.clone()));
        Ok(Some(user))
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AuthError::MissingEmail);
        }
        let body = OobCodeRequest {
            request_type: "PASSWORD_RESET",
            email,
        };
        let _: serde_json::Value = self.call("sendOobCode", &body).await?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OobCodeRequest<'a> {
    request_type: &'static str,
    email: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountReply {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Secure Token API reply; unlike the accounts API it uses snake_case.
#[derive(Debug, Deserialize)]
struct TokenReply {
    user_id: String,
    refresh_token: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Extracts the provider's error code, e.g. `EMAIL_NOT_FOUND`.
fn provider_error(body: &str) -> Option<AuthError> {
    let envelope: ErrorEnvelope = serde_json::from_str(body).ok()?;
    Some(AuthError::Provider {
        message: envelope.error.message,
    })
}
