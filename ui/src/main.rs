#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use anyhow::Context as _;
use moderation_business::{ConsoleConfig, ModerationConsole, OperatorIdentity, Role};
use moderation_ui::ModerationApp;

mod alloc {
    #[global_allocator]
    static MALLOC: mimalloc::MiMalloc = mimalloc::MiMalloc;
}

const OPERATOR_EMAIL_ENV: &str = "MODERATION_OPERATOR_EMAIL";
const OPERATOR_ROLE_ENV: &str = "MODERATION_OPERATOR_ROLE";

fn operator_from_env() -> Option<OperatorIdentity> {
    let email = std::env::var(OPERATOR_EMAIL_ENV).ok()?;
    let role = std::env::var(OPERATOR_ROLE_ENV)
        .ok()
        .and_then(|role| Role::parse(&role))
        .unwrap_or(Role::Moderator);
    Some(OperatorIdentity::new(email, role))
}

fn main() -> anyhow::Result<()> {
    // Log to stderr (if you run with `RUST_LOG=debug`).
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_module("egui_winit::clipboard", log::LevelFilter::Off)
        .init();

    let config = ConsoleConfig::from_env().context("Failed to load console configuration")?;

    // Requests are spawned from the UI thread, so it has to be inside the runtime.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let _guard = runtime.enter();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([720.0, 480.0])
            .with_min_inner_size([400.0, 300.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Moderation",
        native_options,
        Box::new(move |_cc| {
            let mut console = ModerationConsole::with_http(&config);
            if let Some(operator) = operator_from_env() {
                console = console.with_operator(operator);
            }
            Ok(Box::new(ModerationApp::new(console)))
        }),
    )
    .map_err(|err| anyhow::anyhow!("Failed to run the moderation app: {err}"))
}
