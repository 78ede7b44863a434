use std::sync::Arc;

use reflect_core::model::{AnsweredRecord, QuestionId, UserId};
use reflect_core::time::fixed_now;
use services::{AuthGate, InMemoryQuestionsApi, LocalAuthGate};

use super::test_harness::{TestApp, page_harness, shell_harness};
use crate::page::PageModel;

fn signed_in_model() -> PageModel {
    let mut model = PageModel::default();
    model.show_session(Some("me@example.com"));
    model
}

#[test]
fn signed_out_page_renders_login_form() {
    let mut harness = page_harness(PageModel::default());
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Login"), "missing login in {html}");
    assert!(html.contains("Forgot password?"), "missing reset link in {html}");
    assert!(html.contains("Sign up"), "missing signup toggle in {html}");
    assert!(!html.contains("Generate New"), "question panel leaked in {html}");
}

#[test]
fn signed_in_page_renders_every_panel() {
    let mut model = signed_in_model();
    model.unanswered_text = "2+2?".to_string();
    model.show_answered(&[AnsweredRecord {
        id: Some(QuestionId::from_number(1)),
        question: Some("What made you smile today?".to_string()),
        llm_answer: None,
        user_answer: None,
        date_question_created: Some(fixed_now()),
        latest: false,
    }]);
    model.show_latest(None);

    let mut harness = page_harness(model);
    harness.rebuild();
    let html = harness.render();

    for expected in [
        "me@example.com",
        "Logout",
        "2+2?",
        "Generate New",
        "No question yet",
        "What made you smile today?",
        "Undefined",
        "No Answer",
    ] {
        assert!(html.contains(expected), "missing {expected} in {html}");
    }
    assert!(!html.contains("Forgot password?"), "auth form leaked in {html}");
}

#[test]
fn disabled_form_renders_disabled_controls() {
    let mut model = signed_in_model();
    model.form_enabled = false;
    model.unanswered_text = "New question being generated...".to_string();

    let mut harness = page_harness(model);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("disabled"), "missing disabled in {html}");
    assert!(html.contains("New question being generated..."));
}

#[test]
fn alert_banner_shows_message() {
    let mut model = PageModel::default();
    model.alert = Some("Answer cannot be empty.".to_string());

    let mut harness = page_harness(model);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Answer cannot be empty."), "missing alert in {html}");
    assert!(html.contains("Dismiss"), "missing dismiss in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn shell_loads_views_for_signed_in_user() {
    let auth = Arc::new(
        LocalAuthGate::new()
            .with_account("me@example.com", "secret", "u1")
            .unwrap(),
    );
    auth.sign_in("me@example.com", "secret").await.unwrap();
    let questions = InMemoryQuestionsApi::new();
    let uid = UserId::parse("u1").unwrap();
    questions
        .seed_unanswered(&uid, QuestionId::from_text("q1"), "2+2?")
        .unwrap();

    let mut harness = shell_harness(TestApp { auth, questions });
    harness.rebuild();
    harness.drive_async().await;
    harness.drive_async().await;
    let html = harness.render();

    assert!(html.contains("me@example.com"), "missing email in {html}");
    assert!(html.contains("2+2?"), "missing question in {html}");
    assert!(html.contains("Backend: test backend"), "missing footer in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn shell_without_user_shows_login() {
    let app = TestApp {
        auth: Arc::new(LocalAuthGate::new()),
        questions: InMemoryQuestionsApi::new(),
    };
    let mut harness = shell_harness(app);
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Forgot password?"), "missing login in {html}");
}
