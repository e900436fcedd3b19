use crate::application::chart_engine::EngineState;
use crate::application::desk::Desk;
use crate::domain::chart_assets::Theme;
use crate::interfaces::design_system::DesignSystem;
use crate::interfaces::{chart_panel, prediction_panel};
use chrono::Utc;
use eframe::egui;

impl eframe::App for Desk {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // --- 1. Drain worker events, then derive visuals from the theme ---
        self.pump_events();
        ctx.set_visuals(DesignSystem::visuals(self.theme));
        // Events arrive without input; keep polling at a gentle cadence.
        ctx.request_repaint_after(std::time::Duration::from_millis(250));

        // --- 2. Top status bar ---
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(self.i18n.t("app_title"));
                ui.separator();
                ui.label(format!("UTC {}", Utc::now().format("%H:%M:%S")));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    engine_light(self, ui);
                    theme_toggle(self, ui);
                    language_picker(self, ui);
                });
            });
        });

        // --- 3. Left sidebar: prediction parameters ---
        egui::SidePanel::left("prediction_panel")
            .default_width(280.0)
            .min_width(230.0)
            .resizable(true)
            .show(ctx, |ui| {
                prediction_panel::render(self, ui);
            });

        // --- 4. Bottom: log feed ---
        egui::TopBottomPanel::bottom("log_panel")
            .default_height(140.0)
            .resizable(true)
            .show(ctx, |ui| {
                ui.label(
                    egui::RichText::new(self.i18n.t("logs_title"))
                        .strong()
                        .color(DesignSystem::text_secondary(self.theme)),
                );
                egui::ScrollArea::vertical()
                    .auto_shrink([false, true])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for (sender, message) in &self.feed {
                            ui.horizontal_wrapped(|ui| {
                                let (label, color) = match sender.as_str() {
                                    "Desk" => ("Desk >", DesignSystem::ACCENT_SECONDARY),
                                    _ => {
                                        if message.contains("ERROR") {
                                            ("System !", DesignSystem::DANGER)
                                        } else if message.contains("WARN") {
                                            ("System ?", DesignSystem::WARNING)
                                        } else {
                                            ("System :", DesignSystem::text_secondary(self.theme))
                                        }
                                    }
                                };
                                ui.label(egui::RichText::new(label).strong().color(color));
                                ui.label(
                                    egui::RichText::new(message)
                                        .color(DesignSystem::text_primary(self.theme)),
                                );
                            });
                        }
                    });
            });

        // --- 5. Central panel: chart and comparison ---
        egui::CentralPanel::default().show(ctx, |ui| {
            chart_panel::render(self, ui);
        });
    }
}

fn theme_toggle(desk: &mut Desk, ui: &mut egui::Ui) {
    let icon = match desk.theme {
        Theme::Dark => "☀",
        Theme::Light => "🌙",
    };
    if ui
        .button(icon)
        .on_hover_text(desk.i18n.t("theme_toggle"))
        .clicked()
    {
        desk.toggle_theme();
    }
}

fn language_picker(desk: &mut Desk, ui: &mut egui::Ui) {
    let mut selected = desk.i18n.current_language_code().to_string();
    let languages: Vec<_> = desk.i18n.available_languages().to_vec();
    egui::ComboBox::from_id_salt("language_picker")
        .selected_text(selected.clone())
        .width(60.0)
        .show_ui(ui, |ui| {
            for language in &languages {
                ui.selectable_value(
                    &mut selected,
                    language.code.clone(),
                    format!("{} {}", language.flag, language.native_name),
                );
            }
        })
        .response
        .on_hover_text(desk.i18n.t("language_label"));
    if selected != desk.i18n.current_language_code() {
        desk.i18n.set_language(&selected);
    }
}

fn engine_light(desk: &Desk, ui: &mut egui::Ui) {
    let (dot, color) = match desk.client.engine().state() {
        EngineState::Ready => ("● CHARTS", DesignSystem::SUCCESS),
        EngineState::Loading => ("● CHARTS", DesignSystem::WARNING),
        EngineState::Unloaded => ("● CHARTS", DesignSystem::DANGER),
    };
    ui.label(egui::RichText::new(dot).color(color).small());
}

/// Slightly larger defaults; the comparison grid is dense.
pub fn configure_fonts(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();
    if let Some(body) = style.text_styles.get_mut(&egui::TextStyle::Body) {
        body.size = 14.0;
    }
    if let Some(small) = style.text_styles.get_mut(&egui::TextStyle::Small) {
        small.size = 11.0;
    }
    ctx.set_style(style);
}
