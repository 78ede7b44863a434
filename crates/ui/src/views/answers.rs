use dioxus::prelude::*;

use crate::vm::AnswerRowVm;

#[component]
pub fn AnswersTable(rows: Vec<AnswerRowVm>) -> Element {
    rsx! {
        table { class: "answers-table", id: "answersTable",
            thead {
                tr {
                    th { "Date" }
                    th { "Question" }
                    th { "AI guess" }
                    th { "Your answer" }
                }
            }
            tbody {
                for row in rows {
                    tr { key: "{row.key}",
                        td { "{row.date_str}" }
                        td { "{row.question}" }
                        td { "{row.llm_answer}" }
                        td { "{row.user_answer}" }
                    }
                }
            }
        }
    }
}
