use dioxus::prelude::*;
use tracing::debug;

use crate::context::SessionHandle;
use crate::page::PageModel;
use crate::views::{AlertBanner, AnswersTable, AuthPanel, LatestAnswerPanel, QuestionPanel, UserBar};

/// Renders the page model and turns user actions into controller calls.
///
/// Controller results are ignored here; every outcome reaches the page
/// through `UiAdapter`.
#[component]
pub fn MainPage() -> Element {
    let mut page = use_context::<SyncSignal<PageModel>>();
    let session = use_context::<SessionHandle>();

    let on_login = {
        let session = session.clone();
        use_callback(move |(email, password): (String, String)| {
            let controller = session.controller();
            spawn(async move {
                let _ = controller.log_in(&email, &password).await;
            });
        })
    };
    let on_signup = {
        let session = session.clone();
        use_callback(move |(email, password): (String, String)| {
            let controller = session.controller();
            spawn(async move {
                let _ = controller.sign_up(&email, &password).await;
            });
        })
    };
    let on_reset = {
        let session = session.clone();
        use_callback(move |email: String| {
            let controller = session.controller();
            spawn(async move {
                let _ = controller.reset_password(&email).await;
            });
        })
    };
    let on_logout = {
        let session = session.clone();
        use_callback(move |()| {
            let controller = session.controller();
            spawn(async move {
                let _ = controller.log_out().await;
            });
        })
    };
    let on_submit = {
        let session = session.clone();
        use_callback(move |()| {
            let controller = session.controller();
            let answer = page.read().answer_input.clone();
            spawn(async move {
                if let Err(err) = controller.submit_answer(&answer).await {
                    debug!(error = %err, "answer not submitted");
                }
            });
        })
    };
    let on_generate = {
        let session = session.clone();
        use_callback(move |()| {
            let controller = session.controller();
            spawn(async move {
                if let Err(err) = controller.generate_new().await {
                    debug!(error = %err, "no new question");
                }
            });
        })
    };
    let on_answer_input = use_callback(move |value: String| {
        page.write().answer_input = value;
    });
    let on_dismiss = use_callback(move |()| page.write().dismiss_alert());

    let model = page.read().clone();

    rsx! {
        main { class: "page",
            if let Some(message) = model.alert.clone() {
                AlertBanner { message, on_dismiss }
            }
            match model.signed_in_as.clone() {
                None => rsx! {
                    AuthPanel { on_login, on_signup, on_reset }
                },
                Some(email) => rsx! {
                    h1 { class: "app-title", id: "appTitle", "Reflect" }
                    UserBar { email, on_logout }
                    QuestionPanel {
                        question_text: model.unanswered_text.clone(),
                        answer: model.answer_input.clone(),
                        form_enabled: model.form_enabled,
                        on_answer_input,
                        on_submit,
                        on_generate,
                    }
                    LatestAnswerPanel { latest: model.latest.clone() }
                    AnswersTable { rows: model.rows.clone() }
                },
            }
        }
    }
}
