use std::sync::Arc;

use dioxus::prelude::*;
use services::{SessionController, UiAdapter};

use crate::context::{AppContext, SessionHandle};
use crate::page::{PageModel, PageUi};
use crate::views::MainPage;

#[component]
pub fn App() -> Element {
    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }
        document::Title { "Reflect" }

        div { class: "app-root",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "Something went wrong" }
                        pre { "{errors:?}" }
                    }
                },
                Shell {}
            }
        }
    }
}

/// Owns the page signal and the session controller, and follows auth changes.
#[component]
pub fn Shell() -> Element {
    let ctx = use_context::<AppContext>();
    let page = use_signal_sync(PageModel::default);

    let controller = use_hook(|| {
        let ui: Arc<dyn UiAdapter> = Arc::new(PageUi::new(page));
        Arc::new(SessionController::new(ctx.auth(), ctx.questions(), ui))
    });
    use_context_provider(|| page);
    use_context_provider(|| SessionHandle::new(Arc::clone(&controller)));

    use_future(move || {
        let controller = Arc::clone(&controller);
        async move { controller.watch_auth().await }
    });

    rsx! {
        MainPage {}
        footer { class: "backend", "Backend: {ctx.backend_label()}" }
    }
}
