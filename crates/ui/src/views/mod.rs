mod answers;
mod auth;
mod chrome;
mod latest;
mod main_page;
mod question;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use answers::AnswersTable;
pub use auth::AuthPanel;
pub use chrome::{AlertBanner, UserBar};
pub use latest::LatestAnswerPanel;
pub use main_page::MainPage;
pub use question::QuestionPanel;
