use crate::application::comparison::{CloseError, ComparisonRow};
use crate::application::plot::parse_timestamp;
use crate::domain::chart_assets::Theme;
use crate::infrastructure::i18n::I18nService;
use crate::interfaces::design_system::DesignSystem;
use chrono::{TimeZone, Utc};
use eframe::egui;

/// Predicted-versus-actual table. Renders whether or not the graphical
/// chart did.
pub fn render(ui: &mut egui::Ui, i18n: &I18nService, theme: Theme, rows: &[ComparisonRow]) {
    if rows.is_empty() {
        return;
    }
    let with_actual = rows.iter().any(|row| row.actual_close.is_some());

    ui.label(
        egui::RichText::new(i18n.tf(
            "comparison_title",
            &[("count", &rows.len().to_string())],
        ))
        .strong()
        .color(DesignSystem::text_secondary(theme)),
    );
    ui.add_space(4.0);

    egui::ScrollArea::vertical()
        .max_height(280.0)
        .auto_shrink([false, true])
        .show(ui, |ui| {
            egui::Grid::new("comparison_grid")
                .striped(true)
                .min_col_width(70.0)
                .spacing([18.0, 6.0])
                .show(ui, |ui| {
                    header(ui, i18n.t("col_timestamp"));
                    header(ui, i18n.t("col_open"));
                    header(ui, i18n.t("col_high"));
                    header(ui, i18n.t("col_low"));
                    header(ui, i18n.t("col_close"));
                    if with_actual {
                        header(ui, i18n.t("col_actual_close"));
                        header(ui, i18n.t("col_error"));
                    }
                    ui.end_row();

                    for row in rows {
                        ui.label(format_date(&row.timestamp, i18n.date_format()));
                        ui.label(format!("{:.2}", row.open));
                        ui.label(format!("{:.2}", row.high));
                        ui.label(format!("{:.2}", row.low));
                        ui.label(format!("{:.2}", row.close));
                        if with_actual {
                            match row.actual_close {
                                Some(actual) => ui.label(format!("{actual:.2}")),
                                None => ui.label(
                                    egui::RichText::new("-")
                                        .color(DesignSystem::text_secondary(theme)),
                                ),
                            };
                            error_cell(ui, theme, row.close_error);
                        }
                        ui.end_row();
                    }
                });
        });
}

fn header(ui: &mut egui::Ui, text: &str) {
    ui.label(egui::RichText::new(text).strong().small());
}

fn error_cell(ui: &mut egui::Ui, theme: Theme, error: Option<CloseError>) {
    match error {
        Some(CloseError::Pct(value)) => {
            let color = if value >= 0.0 {
                DesignSystem::SUCCESS
            } else {
                DesignSystem::DANGER
            };
            ui.label(egui::RichText::new(CloseError::Pct(value).label()).color(color));
        }
        Some(CloseError::NotApplicable) => {
            ui.label(
                egui::RichText::new(CloseError::NotApplicable.label())
                    .color(DesignSystem::text_secondary(theme)),
            );
        }
        None => {
            ui.label(
                egui::RichText::new("-").color(DesignSystem::text_secondary(theme)),
            );
        }
    }
}

fn format_date(raw: &str, format: &str) -> String {
    parse_timestamp(raw)
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
        .map(|dt| dt.format(format).to_string())
        .unwrap_or_else(|| raw.to_string())
}
