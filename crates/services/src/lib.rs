#![forbid(unsafe_code)]

pub mod api;
pub mod auth;
pub mod error;
pub mod session;
pub mod sync;
pub mod ui;

pub use api::{ApiConfig, HttpQuestionsApi, InMemoryQuestionsApi, NewAnswer, QuestionsApi};
pub use auth::{AuthGate, AuthUser, FirebaseAuthGate, FirebaseConfig, LocalAuthGate};
pub use error::{ApiError, AuthError, ConfigError, SyncError, ValidationError};
pub use session::SessionController;
pub use sync::ViewStateSynchronizer;
pub use ui::UiAdapter;
