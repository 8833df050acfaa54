use std::time::Duration;

use moderation_business::ModerationConsole;

use crate::widgets;

/// How often to poll for background results while requests are in flight.
const PENDING_REPAINT: Duration = Duration::from_millis(100);

pub struct ModerationApp {
    console: ModerationConsole,
}

impl ModerationApp {
    /// Called once before the first frame. Mounting starts the user load.
    pub fn new(mut console: ModerationConsole) -> Self {
        console.mount();
        Self { console }
    }

    pub fn console(&self) -> &ModerationConsole {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut ModerationConsole {
        &mut self.console
    }
}

impl eframe::App for ModerationApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply what background requests reported since the last frame
        self.console.sync();

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong("Moderation");
                if let Some(operator) = self.console.operator() {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(format!("{} ({})", operator.email, operator.role));
                    });
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            widgets::moderation_panel(&mut self.console, ui);
        });

        if self.console.has_pending_work() {
            ctx.request_repaint_after(PENDING_REPAINT);
        }
    }
}
