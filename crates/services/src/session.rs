use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{info, warn};

use reflect_core::model::UnansweredQuestion;

use crate::api::QuestionsApi;
use crate::auth::{AuthGate, AuthUser};
use crate::error::{AuthError, SyncError, ValidationError};
use crate::sync::ViewStateSynchronizer;
use crate::ui::UiAdapter;

#[derive(Clone)]
struct ActiveSession {
    user: AuthUser,
    sync: Arc<ViewStateSynchronizer>,
}

/// Owns the synchronizer for whoever is signed in and forwards page actions to it.
pub struct SessionController {
    auth: Arc<dyn AuthGate>,
    api: Arc<dyn QuestionsApi>,
    ui: Arc<dyn UiAdapter>,
    active: Mutex<Option<ActiveSession>>,
}

impl SessionController {
    #[must_use]
    pub fn new(
        auth: Arc<dyn AuthGate>,
        api: Arc<dyn QuestionsApi>,
        ui: Arc<dyn UiAdapter>,
    ) -> Self {
        Self {
            auth,
            api,
            ui,
            active: Mutex::new(None),
        }
    }

    fn active(&self) -> MutexGuard<'_, Option<ActiveSession>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn end_session(&self) -> Option<ActiveSession> {
        let previous = self.active().take();
        if let Some(previous) = &previous {
            previous.sync.close();
        }
        previous
    }

    fn session(&self) -> Option<ActiveSession> {
        self.active().clone()
    }

    #[must_use]
    pub fn current_user(&self) -> Option<AuthUser> {
        self.session().map(|session| session.user)
    }

    /// The synchronizer of the signed-in session, if any.
    #[must_use]
    pub fn synchronizer(&self) -> Option<Arc<ViewStateSynchronizer>> {
        self.session().map(|session| session.sync)
    }

    /// React to a sign-in or sign-out.
    ///
    /// Sign-in builds a fresh synchronizer and loads all three views once.
    /// Sign-out drops every piece of session state and hides the views.
    /// Requests still in flight for the previous session are cut off from the page.
    pub async fn handle_auth_change(&self, user: Option<AuthUser>) {
        let Some(user) = user else {
            if let Some(previous) = self.end_session() {
                info!(uid = %previous.user.uid, "user signed out");
            }
            self.ui.show_session(None);
            return;
        };

        info!(uid = %user.uid, "user signed in");
        let sync = Arc::new(ViewStateSynchronizer::new(
            Arc::clone(&self.api),
            Arc::clone(&self.ui),
        ));
        let previous = self.active().replace(ActiveSession {
            user: user.clone(),
            sync: Arc::clone(&sync),
        });
        if let Some(previous) = previous {
            previous.sync.close();
        }
        self.ui.show_session(Some(&user.email));

        let _ = sync.refresh_unanswered(&user.uid).await;
        let _ = sync.refresh_answered_list(&user.uid).await;
        let _ = sync.refresh_latest_answer(&user.uid).await;
    }

    /// Follow the auth gate until its sender goes away, starting from any
    /// sign-in the gate saved on an earlier run.
    pub async fn watch_auth(&self) {
        match self.auth.restore().await {
            Ok(Some(user)) => info!(uid = %user.uid, "previous sign-in restored"),
            Ok(None) => {}
            Err(err) => warn!(error = %err, "could not restore the previous sign-in"),
        }
        let mut changes = self.auth.subscribe();
        let initial = changes.borrow_and_update().clone();
        self.handle_auth_change(initial).await;

        while changes.changed().await.is_ok() {
            let user = changes.borrow_and_update().clone();
            self.handle_auth_change(user).await;
        }
    }

    fn require_session(&self) -> Result<ActiveSession, SyncError> {
        self.session().ok_or_else(|| {
            let err = ValidationError::MissingUserId;
            self.ui.alert(&err.to_string());
            SyncError::from(err)
        })
    }

    /// # Errors
    ///
    /// Returns `ValidationError::MissingUserId` when nobody is signed in, otherwise
    /// whatever `ViewStateSynchronizer::submit_answer` returns.
    pub async fn submit_answer(&self, answer: &str) -> Result<(), SyncError> {
        let session = self.require_session()?;
        session.sync.submit_answer(&session.user.uid, answer).await
    }

    /// # Errors
    ///
    /// Returns `ValidationError::MissingUserId` when nobody is signed in, otherwise
    /// whatever `ViewStateSynchronizer::generate_new` returns.
    pub async fn generate_new(&self) -> Result<UnansweredQuestion, SyncError> {
        let session = self.require_session()?;
        session.sync.generate_new(&session.user.uid).await
    }

    /// # Errors
    ///
    /// Returns the gate's `AuthError` after alerting the user.
    pub async fn log_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        self.auth.sign_in(email, password).await.map_err(|err| {
            warn!(error = %err, "login failed");
            self.ui.alert(&format!("Login failed: {err}"));
            err
        })
    }

    /// # Errors
    ///
    /// Returns the gate's `AuthError` after alerting the user.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        self.auth.sign_up(email, password).await.map_err(|err| {
            warn!(error = %err, "signup failed");
            self.ui.alert(&format!("Signup failed: {err}"));
            err
        })
    }

    /// # Errors
    ///
    /// Returns the gate's `AuthError`; sign-out failures are only logged.
    pub async fn log_out(&self) -> Result<(), AuthError> {
        self.auth.sign_out().await.inspect_err(|err| {
            warn!(error = %err, "error logging out");
        })
    }

    /// # Errors
    ///
    /// Returns `AuthError::MissingEmail` for a blank email, or the gate's error.
    /// Every outcome is alerted.
    pub async fn reset_password(&self, email: &str) -> Result<(), AuthError> {
        if email.trim().is_empty() {
            self.ui
                .alert("Please enter your email to reset the password.");
            return Err(AuthError::MissingEmail);
        }
        match self.auth.send_password_reset(email).await {
            Ok(()) => {
                self.ui.alert("Password reset email sent!");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "password reset failed");
                self.ui.alert(&format!("Password reset failed: {err}"));
                Err(err)
            }
        }
    }
}
