use dioxus::prelude::*;

#[component]
pub fn UserBar(email: String, on_logout: Callback<()>) -> Element {
    rsx! {
        div { class: "user-bar", id: "userInfo",
            span { "Signed in as " }
            span { class: "user-email", id: "userEmail", "{email}" }
            button {
                r#type: "button",
                id: "logoutButton",
                onclick: move |_| on_logout.call(()),
                "Logout"
            }
        }
    }
}

#[component]
pub fn AlertBanner(message: String, on_dismiss: Callback<()>) -> Element {
    rsx! {
        div { class: "alert", role: "alert",
            span { "{message}" }
            button {
                r#type: "button",
                aria_label: "Dismiss",
                onclick: move |_| on_dismiss.call(()),
                "Dismiss"
            }
        }
    }
}
