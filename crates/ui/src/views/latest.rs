use dioxus::prelude::*;

use crate::vm::LatestAnswerVm;

#[component]
pub fn LatestAnswerPanel(latest: LatestAnswerVm) -> Element {
    rsx! {
        section { class: "latest-panel", id: "latestAnswerSection",
            h2 { "Latest answer" }
            dl {
                dt { "Question" }
                dd { id: "latestQuestion", "{latest.question}" }
                dt { "AI guess" }
                dd { id: "latestLlmAnswer", "{latest.llm_answer}" }
                dt { "Your answer" }
                dd { id: "latestUserAnswer", "{latest.user_answer}" }
            }
        }
    }
}
