use dioxus::prelude::*;

/// The pending question, the answer form and the "Generate New" button.
#[component]
pub fn QuestionPanel(
    question_text: String,
    answer: String,
    form_enabled: bool,
    on_answer_input: Callback<String>,
    on_submit: Callback<()>,
    on_generate: Callback<()>,
) -> Element {
    rsx! {
        section { class: "question-panel", id: "latestUnansweredContainer",
            h2 { "Latest unanswered question" }
            p { class: "question-text", id: "latestUnanswered", "{question_text}" }
            form {
                class: "answer-form",
                id: "answerForm",
                onsubmit: move |evt: FormEvent| {
                    evt.prevent_default();
                    on_submit.call(());
                },
                textarea {
                    id: "userAnswer",
                    placeholder: "Your answer",
                    disabled: !form_enabled,
                    value: "{answer}",
                    oninput: move |evt| on_answer_input.call(evt.value()),
                }
                div { class: "answer-actions",
                    button { r#type: "submit", disabled: !form_enabled, "Submit" }
                    button {
                        r#type: "button",
                        id: "generateNewButton",
                        disabled: !form_enabled,
                        onclick: move |_| on_generate.call(()),
                        "Generate New"
                    }
                }
            }
        }
    }
}
