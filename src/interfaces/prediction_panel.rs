use crate::application::desk::Desk;
use crate::application::params::{
    HORIZON_CHOICES, LOOKBACK_CHOICES, SAMPLE_COUNT_CHOICES, TEMPERATURE_CHOICES, TOP_P_CHOICES,
};
use crate::interfaces::design_system::DesignSystem;
use eframe::egui;

/// Left sidebar: the parameter controls and the explicit Run trigger.
///
/// Every control writes straight into the parameter store with no side
/// effects; only the Run button issues a fetch.
pub fn render(desk: &mut Desk, ui: &mut egui::Ui) {
    ui.heading(desk.i18n.t("prediction_settings"));
    ui.add_space(DesignSystem::SPACING_SMALL);

    ui.label(desk.i18n.t("ticker_label"));
    ui.add(
        egui::TextEdit::singleline(&mut desk.params.ticker)
            .hint_text(desk.i18n.t("ticker_hint"))
            .desired_width(f32::INFINITY),
    );
    ui.add_space(DesignSystem::SPACING_SMALL);

    model_picker(desk, ui);
    ui.add_space(DesignSystem::SPACING_SMALL);

    egui::ComboBox::from_label(desk.i18n.t("lookback_label"))
        .selected_text(desk.params.lookback.to_string())
        .show_ui(ui, |ui| {
            for choice in LOOKBACK_CHOICES {
                ui.selectable_value(&mut desk.params.lookback, choice, choice.to_string());
            }
        });

    egui::ComboBox::from_label(desk.i18n.t("horizon_label"))
        .selected_text(desk.params.horizon.to_string())
        .show_ui(ui, |ui| {
            for choice in HORIZON_CHOICES {
                ui.selectable_value(&mut desk.params.horizon, choice, choice.to_string());
            }
        });

    egui::ComboBox::from_label(desk.i18n.t("temperature_label"))
        .selected_text(format!("{:.1}", desk.params.temperature))
        .show_ui(ui, |ui| {
            for choice in TEMPERATURE_CHOICES {
                ui.selectable_value(&mut desk.params.temperature, choice, format!("{choice:.1}"));
            }
        });

    egui::ComboBox::from_label(desk.i18n.t("top_p_label"))
        .selected_text(format!("{:.1}", desk.params.top_p))
        .show_ui(ui, |ui| {
            for choice in TOP_P_CHOICES {
                ui.selectable_value(&mut desk.params.top_p, choice, format!("{choice:.1}"));
            }
        });

    egui::ComboBox::from_label(desk.i18n.t("sample_count_label"))
        .selected_text(desk.params.sample_count.to_string())
        .show_ui(ui, |ui| {
            for choice in SAMPLE_COUNT_CHOICES {
                ui.selectable_value(&mut desk.params.sample_count, choice, choice.to_string());
            }
        });

    ui.add_space(DesignSystem::SPACING_MEDIUM);

    let run_label = if desk.view.in_flight() {
        desk.i18n.t("predicting")
    } else {
        desk.i18n.t("run_prediction")
    };
    let run = ui.add_enabled(
        !desk.view.in_flight(),
        egui::Button::new(egui::RichText::new(run_label).strong())
            .fill(DesignSystem::ACCENT_PRIMARY)
            .min_size(egui::vec2(ui.available_width(), 32.0)),
    );
    if run.clicked() {
        desk.run_prediction();
    }
    if desk.view.in_flight() {
        ui.add_space(4.0);
        ui.spinner();
    }

    ui.add_space(DesignSystem::SPACING_MEDIUM);
    ui.separator();
    model_status_line(desk, ui);
}

fn model_picker(desk: &mut Desk, ui: &mut egui::Ui) {
    let display = desk
        .catalog
        .as_ref()
        .and_then(|catalog| catalog.models.get(&desk.params.model_key))
        .map(|info| info.name.clone())
        .unwrap_or_else(|| desk.params.model_key.clone());

    egui::ComboBox::from_label(desk.i18n.t("model_label"))
        .selected_text(display)
        .show_ui(ui, |ui| {
            if let Some(catalog) = &desk.catalog {
                for (key, info) in &catalog.models {
                    let label = format!("{} ({})", info.name, info.params);
                    ui.selectable_value(&mut desk.params.model_key, key.clone(), label)
                        .on_hover_text(&info.description);
                }
            }
        });

    if ui
        .small_button(desk.i18n.t("load_model"))
        .clicked()
        && let Err(err) = desk.client.load_model(desk.params.model_key.clone())
    {
        desk.feed.push(("Desk".to_string(), err.to_string()));
    }
}

fn model_status_line(desk: &mut Desk, ui: &mut egui::Ui) {
    let (text, color) = match &desk.model_status {
        None => (
            desk.i18n.t("model_status_unknown").to_string(),
            DesignSystem::text_secondary(desk.theme),
        ),
        Some(status) if !status.available => (
            desk.i18n.t("model_status_missing").to_string(),
            DesignSystem::DANGER,
        ),
        Some(status) if !status.loaded => (
            desk.i18n.t("model_status_available").to_string(),
            DesignSystem::WARNING,
        ),
        Some(status) => {
            let name = status
                .current_model
                .as_ref()
                .map(|m| m.name.as_str())
                .unwrap_or("?");
            (
                desk.i18n.tf("model_status_loaded", &[("name", name)]),
                DesignSystem::SUCCESS,
            )
        }
    };

    ui.horizontal(|ui| {
        ui.label(
            egui::RichText::new(desk.i18n.t("model_status_label"))
                .strong()
                .color(DesignSystem::text_secondary(desk.theme)),
        );
        ui.label(egui::RichText::new(text).color(color).small());
        if ui
            .small_button("⟳")
            .on_hover_text(desk.i18n.t("refresh_status"))
            .clicked()
        {
            for result in [
                desk.client.refresh_model_status(),
                desk.client.refresh_model_catalog(),
            ] {
                if let Err(err) = result {
                    desk.feed.push(("Desk".to_string(), err.to_string()));
                }
            }
        }
    });
}
