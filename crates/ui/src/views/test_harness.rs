use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use reflect_core::model::AnsweredRecord;
use services::{
    AuthGate, InMemoryQuestionsApi, LocalAuthGate, QuestionsApi, SessionController, UiAdapter,
};

use crate::app::Shell;
use crate::context::{SessionHandle, UiApp, build_app_context};
use crate::page::PageModel;
use crate::views::MainPage;

pub struct TestApp {
    pub auth: Arc<LocalAuthGate>,
    pub questions: InMemoryQuestionsApi,
}

impl UiApp for TestApp {
    fn auth(&self) -> Arc<dyn AuthGate> {
        self.auth.clone()
    }

    fn questions(&self) -> Arc<dyn QuestionsApi> {
        Arc::new(self.questions.clone())
    }

    fn backend_label(&self) -> String {
        "test backend".to_string()
    }
}

struct NoopUi;

impl UiAdapter for NoopUi {
    fn show_unanswered(&self, _text: &str) {}
    fn show_latest(&self, _record: Option<&AnsweredRecord>) {}
    fn show_answered(&self, _records: &[AnsweredRecord]) {}
    fn set_form_enabled(&self, _enabled: bool) {}
    fn clear_answer_input(&self) {}
    fn alert(&self, _message: &str) {}
    fn show_session(&self, _email: Option<&str>) {}
}

#[derive(Props, Clone)]
struct PageHarnessProps {
    model: PageModel,
}

impl PartialEq for PageHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn PageHarness(props: PageHarnessProps) -> Element {
    let page = use_signal_sync(|| props.model.clone());
    use_context_provider(|| page);
    use_context_provider(|| {
        SessionHandle::new(Arc::new(SessionController::new(
            Arc::new(LocalAuthGate::new()),
            Arc::new(InMemoryQuestionsApi::new()),
            Arc::new(NoopUi),
        )))
    });
    rsx! { MainPage {} }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// Renders `MainPage` over a fixed page model.
pub fn page_harness(model: PageModel) -> ViewHarness {
    ViewHarness {
        dom: VirtualDom::new_with_props(PageHarness, PageHarnessProps { model }),
    }
}

/// Renders the full shell against in-memory collaborators.
pub fn shell_harness(app: TestApp) -> ViewHarness {
    let app: Arc<dyn UiApp> = Arc::new(app);
    ViewHarness {
        dom: VirtualDom::new(Shell).with_root_context(build_app_context(&app)),
    }
}
