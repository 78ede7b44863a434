use dioxus::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AuthMode {
    Login,
    Signup,
}

/// Login and signup forms with a toggle between them.
///
/// Password resets use the email typed into the login form.
#[component]
pub fn AuthPanel(
    on_login: Callback<(String, String)>,
    on_signup: Callback<(String, String)>,
    on_reset: Callback<String>,
) -> Element {
    let mut mode = use_signal(|| AuthMode::Login);
    let mut login_email = use_signal(String::new);
    let mut login_password = use_signal(String::new);
    let mut signup_email = use_signal(String::new);
    let mut signup_password = use_signal(String::new);

    rsx! {
        section { class: "auth-panel", id: "authSection",
            match mode() {
                AuthMode::Login => rsx! {
                    form {
                        class: "auth-form",
                        id: "loginForm",
                        onsubmit: move |evt: FormEvent| {
                            evt.prevent_default();
                            on_login.call((login_email(), login_password()));
                        },
                        h2 { "Login" }
                        input {
                            r#type: "email",
                            placeholder: "Email",
                            value: "{login_email}",
                            oninput: move |evt| login_email.set(evt.value()),
                        }
                        input {
                            r#type: "password",
                            placeholder: "Password",
                            value: "{login_password}",
                            oninput: move |evt| login_password.set(evt.value()),
                        }
                        button { r#type: "submit", id: "loginButton", "Login" }
                        button {
                            class: "link-button",
                            r#type: "button",
                            id: "resetPassword",
                            onclick: move |_| on_reset.call(login_email()),
                            "Forgot password?"
                        }
                        p { class: "auth-toggle",
                            "Don't have an account? "
                            button {
                                class: "link-button",
                                r#type: "button",
                                id: "showSignup",
                                onclick: move |_| mode.set(AuthMode::Signup),
                                "Sign up"
                            }
                        }
                    }
                },
                AuthMode::Signup => rsx! {
                    form {
                        class: "auth-form",
                        id: "signupForm",
                        onsubmit: move |evt: FormEvent| {
                            evt.prevent_default();
                            on_signup.call((signup_email(), signup_password()));
                        },
                        h2 { "Sign up" }
                        input {
                            r#type: "email",
                            placeholder: "Email",
                            value: "{signup_email}",
                            oninput: move |evt| signup_email.set(evt.value()),
                        }
                        input {
                            r#type: "password",
                            placeholder: "Password",
                            value: "{signup_password}",
                            oninput: move |evt| signup_password.set(evt.value()),
                        }
                        button { r#type: "submit", id: "signupButton", "Sign up" }
                        p { class: "auth-toggle",
                            "Already have an account? "
                            button {
                                class: "link-button",
                                r#type: "button",
                                id: "showLogin",
                                onclick: move |_| mode.set(AuthMode::Login),
                                "Login"
                            }
                        }
                    }
                },
            }
        }
    }
}
