use std::sync::Arc;

use services::{AuthGate, QuestionsApi, SessionController};

/// What the composition root hands to the UI.
pub trait UiApp: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthGate>;
    fn questions(&self) -> Arc<dyn QuestionsApi>;

    /// Shown in the footer, e.g. the backend url or "offline demo".
    fn backend_label(&self) -> String;
}

#[derive(Clone)]
pub struct AppContext {
    auth: Arc<dyn AuthGate>,
    questions: Arc<dyn QuestionsApi>,
    backend_label: String,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            auth: app.auth(),
            questions: app.questions(),
            backend_label: app.backend_label(),
        }
    }

    #[must_use]
    pub fn auth(&self) -> Arc<dyn AuthGate> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn questions(&self) -> Arc<dyn QuestionsApi> {
        Arc::clone(&self.questions)
    }

    #[must_use]
    pub fn backend_label(&self) -> &str {
        &self.backend_label
    }
}

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}

/// The page's session controller, provided to every view as context.
#[derive(Clone)]
pub struct SessionHandle(Arc<SessionController>);

impl SessionHandle {
    #[must_use]
    pub fn new(controller: Arc<SessionController>) -> Self {
        Self(controller)
    }

    #[must_use]
    pub fn controller(&self) -> Arc<SessionController> {
        Arc::clone(&self.0)
    }
}
