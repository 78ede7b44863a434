mod firebase;
mod local;
mod session_file;

use async_trait::async_trait;
use tokio::sync::watch;

use reflect_core::model::UserId;

use crate::error::AuthError;

pub use firebase::{FirebaseAuthGate, FirebaseConfig};
pub use local::LocalAuthGate;

/// The signed-in identity as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub uid: UserId,
    pub email: String,
}

/// Identity collaborator: account actions plus a sign-in/sign-out feed.
#[async_trait]
pub trait AuthGate: Send + Sync {
    fn current_user(&self) -> Option<AuthUser>;

    /// Receiver that observes every sign-in/sign-out transition.
    fn subscribe(&self) -> watch::Receiver<Option<AuthUser>>;

    /// # Errors
    ///
    /// Returns `AuthError` when the credentials are rejected or the provider is unreachable.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError>;

    /// # Errors
    ///
    /// Returns `AuthError` when the account cannot be created.
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AuthError>;

    /// # Errors
    ///
    /// Returns `AuthError` if the provider refuses the sign-out.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// # Errors
    ///
    /// Returns `AuthError` when the reset email cannot be sent.
    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError>;

    /// Bring back a sign-in saved by an earlier run and publish it.
    ///
    /// Gates that keep nothing between runs report `None`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` when a saved sign-in exists but cannot be renewed.
    async fn restore(&self) -> Result<Option<AuthUser>, AuthError> {
        Ok(None)
    }
}

/// Shared sign-in state that both gates publish through.
struct AuthState {
    tx: watch::Sender<Option<AuthUser>>,
}

impl AuthState {
    fn new(initial: Option<AuthUser>) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    fn current(&self) -> Option<AuthUser> {
        self.tx.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<AuthUser>> {
        self.tx.subscribe()
    }

    fn publish(&self, user: Option<AuthUser>) {
        self.tx.send_replace(user);
    }
}

fn require_credentials<'a>(
    email: &'a str,
    password: &'a str,
) -> Result<(&'a str, &'a str), AuthError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(AuthError::MissingEmail);
    }
    if password.is_empty() {
        return Err(AuthError::MissingPassword);
    }
    Ok((email, password))
}
