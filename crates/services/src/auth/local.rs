use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::info;

use reflect_core::model::UserId;

use super::{AuthGate, AuthState, AuthUser, require_credentials};
use crate::error::AuthError;

struct Account {
    password: String,
    uid: UserId,
}

/// In-process identity provider for offline runs and tests.
///
/// Error messages use the same codes as Firebase (`EMAIL_EXISTS`, `INVALID_PASSWORD`, ...).
pub struct LocalAuthGate {
    accounts: Mutex<HashMap<String, Account>>,
    state: AuthState,
    resets: Mutex<Vec<String>>,
}

impl Default for LocalAuthGate {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalAuthGate {
    #[must_use]
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            state: AuthState::new(None),
            resets: Mutex::new(Vec::new()),
        }
    }

    /// Register an account up front.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the email is blank, the password empty, the uid blank,
    /// or the email already registered.
    pub fn with_account(self, email: &str, password: &str, uid: &str) -> Result<Self, AuthError> {
        self.register(email, password, Some(UserId::parse(uid)?))?;
        Ok(self)
    }

    /// Emails that a password reset was requested for, oldest first.
    #[must_use]
    pub fn reset_requests(&self) -> Vec<String> {
        self.resets
            .lock()
            .map(|resets| resets.clone())
            .unwrap_or_default()
    }

    /// Without an explicit uid the account gets the first free `local-<n>`.
    fn register(
        &self,
        email: &str,
        password: &str,
        uid: Option<UserId>,
    ) -> Result<AuthUser, AuthError> {
        let (email, password) = require_credentials(email, password)?;
        let mut accounts = self.accounts.lock().map_err(poisoned)?;
        let key = email.to_lowercase();
        if accounts.contains_key(&key) {
            return Err(provider("EMAIL_EXISTS"));
        }
        let uid = match uid {
            Some(uid) => uid,
            None => next_free_uid(&accounts)?,
        };
        accounts.insert(
            key,
            Account {
                password: password.to_string(),
                uid: uid.clone(),
            },
        );
        Ok(AuthUser {
            uid,
            email: email.to_string(),
        })
    }
}

#[async_trait]
impl AuthGate for LocalAuthGate {
    fn current_user(&self) -> Option<AuthUser> {
        self.state.current()
    }

    fn subscribe(&self) -> watch::Receiver<Option<AuthUser>> {
        self.state.subscribe()
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let (email, password) = require_credentials(email, password)?;
        let user = {
            let accounts = self.accounts.lock().map_err(poisoned)?;
            let account = accounts
                .get(&email.to_lowercase())
                .ok_or_else(|| provider("EMAIL_NOT_FOUND"))?;
            if account.password != password {
                return Err(provider("INVALID_PASSWORD"));
            }
            AuthUser {
                uid: account.uid.clone(),
                email: email.to_string(),
            }
        };
        info!(uid = %user.uid, "signed in locally");
        self.state.publish(Some(user.clone()));
        Ok(user)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let user = self.register(email, password, None)?;
        info!(uid = %user.uid, "signed up locally");
        self.state.publish(Some(user.clone()));
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.state.publish(None);
        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AuthError::MissingEmail);
        }
        let known = self
            .accounts
            .lock()
            .map_err(poisoned)?
            .contains_key(&email.to_lowercase());
        if !known {
            return Err(provider("EMAIL_NOT_FOUND"));
        }
        self.resets.lock().map_err(poisoned)?.push(email.to_string());
        Ok(())
    }
}

fn next_free_uid(accounts: &HashMap<String, Account>) -> Result<UserId, AuthError> {
    let taken = |candidate: &str| accounts.values().any(|a| a.uid.as_str() == candidate);
    let n = (accounts.len() + 1..)
        .find(|n| !taken(&format!("local-{n}")))
        .unwrap_or(accounts.len() + 1);
    Ok(UserId::parse(format!("local-{n}"))?)
}

fn provider(code: &str) -> AuthError {
    AuthError::Provider {
        message: code.to_string(),
    }
}

fn poisoned<T>(err: std::sync::PoisonError<T>) -> AuthError {
    AuthError::Provider {
        message: err.to_string(),
    }
}
