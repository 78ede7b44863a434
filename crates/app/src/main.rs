use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use reflect_core::model::{QuestionId, UserId};
use services::{
    ApiConfig, AuthGate, FirebaseAuthGate, FirebaseConfig, HttpQuestionsApi, InMemoryQuestionsApi,
    LocalAuthGate, QuestionsApi,
};
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

const DEMO_EMAIL: &str = "demo@example.com";
const DEMO_PASSWORD: &str = "demo-password";

#[derive(Debug, PartialEq, Eq)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidApiUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidApiUrl { raw } => write!(f, "invalid --api value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    auth: Arc<dyn AuthGate>,
    questions: Arc<dyn QuestionsApi>,
    backend_label: String,
}

impl UiApp for DesktopApp {
    fn auth(&self) -> Arc<dyn AuthGate> {
        Arc::clone(&self.auth)
    }

    fn questions(&self) -> Arc<dyn QuestionsApi> {
        Arc::clone(&self.questions)
    }

    fn backend_label(&self) -> String {
        self.backend_label.clone()
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    api: Option<ApiConfig>,
    offline: bool,
    help: bool,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--api <url>] [--offline]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --api {}", ApiConfig::DEFAULT_BASE_URL);
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  REFLECT_API_URL, RUST_LOG");
    eprintln!("  FIREBASE_API_KEY (required unless --offline)");
    eprintln!("  FIREBASE_AUTH_DOMAIN, FIREBASE_PROJECT_ID, FIREBASE_IDENTITY_URL, FIREBASE_TOKEN_URL");
    eprintln!("  FIREBASE_SESSION_FILE (default <config dir>/reflect/session.json, empty disables)");
    eprintln!();
    eprintln!("Offline demo account: {DEMO_EMAIL} / {DEMO_PASSWORD}");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api" => {
                    let value = require_value(args, "--api")?;
                    let config = ApiConfig::new(value.as_str())
                        .map_err(|_| ArgsError::InvalidApiUrl { raw: value })?;
                    parsed.api = Some(config);
                }
                "--offline" => parsed.offline = true,
                "--help" | "-h" => parsed.help = true,
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }
        Ok(parsed)
    }
}

fn offline_app() -> Result<DesktopApp, Box<dyn std::error::Error>> {
    let auth = LocalAuthGate::new().with_account(DEMO_EMAIL, DEMO_PASSWORD, "demo")?;
    let questions = InMemoryQuestionsApi::new();
    questions.seed_unanswered(
        &UserId::parse("demo")?,
        QuestionId::from_number(1),
        "What is one thing you learned about yourself this week?",
    )?;
    info!(email = DEMO_EMAIL, "offline demo mode");
    Ok(DesktopApp {
        auth: Arc::new(auth),
        questions: Arc::new(questions),
        backend_label: "offline demo".to_string(),
    })
}

fn online_app(api: Option<ApiConfig>) -> Result<DesktopApp, Box<dyn std::error::Error>> {
    let api = match api {
        Some(api) => api,
        None => ApiConfig::from_env()?,
    };
    let firebase = FirebaseConfig::from_env()?;
    info!(
        api = api.base_url(),
        auth_domain = firebase.auth_domain.as_deref().unwrap_or("-"),
        project_id = firebase.project_id.as_deref().unwrap_or("-"),
        session_file = ?firebase.session_file,
        "using remote backend"
    );
    Ok(DesktopApp {
        backend_label: api.base_url().to_string(),
        auth: Arc::new(FirebaseAuthGate::new(firebase)),
        questions: Arc::new(HttpQuestionsApi::new(api)),
    })
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    if args.help {
        print_usage();
        return Ok(());
    }

    let app = if args.offline {
        offline_app()?
    } else {
        online_app(args.api)?
    };
    let app: Arc<dyn UiApp> = Arc::new(app);
    let context = build_app_context(&app);

    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Reflect")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
