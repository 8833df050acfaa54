use std::sync::Arc;

use egui_kittest::Harness;
use moderation_business::testing::{ScriptedCommands, ScriptedLoader, sample_users};
use moderation_business::{Credential, ModerationConsole, moderation_store};
use moderation_ui::widgets::moderation_panel;

pub const TOKEN: &str = "csrf-token";

pub struct TestCtx<'a> {
    harness: Harness<'a, ModerationConsole>,
    pub commands: Arc<ScriptedCommands>,
}

impl<'a> TestCtx<'a> {
    /// A mounted panel whose loader answers with [`sample_users`].
    pub fn loaded() -> Self {
        Self::build(true)
    }

    /// A mounted panel whose loader never answers.
    #[allow(unused)]
    pub fn loading() -> Self {
        Self::build(false)
    }

    fn build(serve: bool) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let ctx = moderation_store();
        let loader = if serve {
            ScriptedLoader::serving(ctx.updater(), sample_users())
        } else {
            ScriptedLoader::silent()
        };
        let commands = Arc::new(ScriptedCommands::reporting_to(ctx.updater()));
        let mut console = ModerationConsole::new(
            ctx,
            Arc::new(loader),
            commands.clone(),
            Credential::new(TOKEN),
        );
        console.mount();

        let harness = Harness::new_ui_state(
            |ui, console: &mut ModerationConsole| {
                console.sync();
                moderation_panel(console, ui);
            },
            console,
        );

        Self { harness, commands }
    }

    pub fn harness_mut(&mut self) -> &mut Harness<'a, ModerationConsole> {
        &mut self.harness
    }

    #[allow(unused)]
    pub fn harness(&self) -> &Harness<'a, ModerationConsole> {
        &self.harness
    }
}
