use crate::application::chart_engine::EngineState;
use crate::application::desk::Desk;
use crate::application::outcome::RenderPlan;
use crate::application::plot::{PlotInstance, XAxis};
use crate::domain::chart_assets::Theme;
use crate::interfaces::comparison_table;
use crate::interfaces::design_system::{color32, DesignSystem};
use chrono::{TimeZone, Utc};
use eframe::egui;
use egui_plot::{BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot};

/// Central panel: the prediction chart with every fallback path.
pub fn render(desk: &mut Desk, ui: &mut egui::Ui) {
    let Desk {
        ref view,
        ref mut chart,
        ref client,
        theme,
        ref i18n,
        ref mut feed,
        ..
    } = *desk;

    if let Some(error) = &view.transport_error {
        banner(ui, theme, DesignSystem::DANGER, i18n.t("transport_error"), error);
        ui.add_space(DesignSystem::SPACING_SMALL);
    }

    let Some(current) = &view.current else {
        ui.centered_and_justified(|ui| {
            let hint = if view.in_flight() {
                i18n.t("predicting")
            } else {
                i18n.t("no_prediction_yet")
            };
            ui.label(
                egui::RichText::new(hint).color(DesignSystem::text_secondary(theme)),
            );
        });
        return;
    };

    match &current.plan {
        RenderPlan::Failure { message } => {
            banner(
                ui,
                theme,
                DesignSystem::WARNING,
                i18n.t("prediction_failed"),
                message,
            );
        }
        RenderPlan::MessageOnly { message } => {
            ui.centered_and_justified(|ui| {
                ui.label(
                    egui::RichText::new(message).color(DesignSystem::text_secondary(theme)),
                );
            });
        }
        RenderPlan::TableOnly { rows, notice } => {
            if notice.is_some() {
                banner(
                    ui,
                    theme,
                    DesignSystem::WARNING,
                    "",
                    i18n.t("chart_fallback_notice"),
                );
                ui.add_space(DesignSystem::SPACING_SMALL);
            }
            DesignSystem::card_frame(theme).show(ui, |ui| {
                comparison_table::render(ui, i18n, theme, rows);
            });
        }
        RenderPlan::Chart { spec, rows } => {
            let engine = client.engine();
            match engine.state() {
                EngineState::Ready => {
                    match chart.sync(current.seq, spec, theme, &engine) {
                        Ok(()) => {
                            if let Some(instance) = chart.instance() {
                                draw_plot(ui, instance, i18n.date_format());
                            }
                        }
                        Err(err) => {
                            // Lost a race with a bootstrap retry; fall back.
                            banner(ui, theme, DesignSystem::WARNING, "", &err.to_string());
                        }
                    }
                }
                EngineState::Loading => {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(
                            egui::RichText::new(i18n.t("engine_loading"))
                                .color(DesignSystem::text_secondary(theme)),
                        );
                    });
                }
                EngineState::Unloaded => {
                    ui.horizontal(|ui| {
                        ui.label(
                            egui::RichText::new(i18n.t("engine_unavailable"))
                                .color(DesignSystem::WARNING),
                        );
                        if ui.button(i18n.t("engine_retry")).clicked()
                            && let Err(err) = client.retry_chart_engine()
                        {
                            feed.push(("Desk".to_string(), err.to_string()));
                        }
                    });
                }
            }
            ui.add_space(DesignSystem::SPACING_SMALL);
            DesignSystem::card_frame(theme).show(ui, |ui| {
                comparison_table::render(ui, i18n, theme, rows);
            });
        }
    }
}

fn draw_plot(ui: &mut egui::Ui, instance: &PlotInstance, date_format: &str) {
    if let Some(title) = &instance.title {
        ui.label(
            egui::RichText::new(title)
                .strong()
                .size(16.0)
                .color(color32(instance.palette.text)),
        );
        ui.add_space(6.0);
    }

    let height = instance.height.unwrap_or(420.0).max(300.0);

    let mut plot = Plot::new("prediction_chart")
        .height(height.min(ui.available_height() - 20.0).max(300.0))
        .show_grid([true, true])
        .legend(Legend::default());

    plot = match &instance.x_axis {
        XAxis::Time => {
            let format = date_format.to_string();
            plot.x_axis_formatter(move |mark, _range| {
                match Utc.timestamp_opt(mark.value as i64, 0).single() {
                    Some(dt) => dt.format(&format).to_string(),
                    None => String::new(),
                }
            })
        }
        XAxis::Index(labels) => {
            let labels = labels.clone();
            plot.x_axis_formatter(move |mark, _range| {
                labels
                    .get(mark.value.round().max(0.0) as usize)
                    .cloned()
                    .unwrap_or_default()
            })
        }
    };

    plot.show(ui, |plot_ui| {
        for group in &instance.candles {
            let (up, down) = group.role.candle_colors(&instance.palette);
            let elems: Vec<BoxElem> = group
                .points
                .iter()
                .map(|p| {
                    let color = if p.close >= p.open {
                        color32(up)
                    } else {
                        color32(down)
                    };
                    let min_oc = p.open.min(p.close);
                    let max_oc = p.open.max(p.close);
                    let mid = (p.open + p.close) / 2.0;
                    BoxElem::new(p.x, BoxSpread::new(p.low, min_oc, mid, max_oc, p.high))
                        .fill(color)
                        .stroke(egui::Stroke::new(1.0, color))
                        .box_width(instance.candle_width)
                })
                .collect();
            plot_ui.box_plot(BoxPlot::new(group.name.clone(), elems));
        }

        for line in &instance.lines {
            plot_ui.line(
                Line::new(line.name.clone(), line.points.clone())
                    .color(color32(instance.palette.accent)),
            );
        }
    });
}

fn banner(
    ui: &mut egui::Ui,
    theme: Theme,
    color: egui::Color32,
    title: &str,
    body: &str,
) {
    egui::Frame::NONE
        .fill(color.linear_multiply(0.12))
        .corner_radius(6)
        .stroke(egui::Stroke::new(1.0, color))
        .inner_margin(egui::Margin::symmetric(10, 8))
        .show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                if !title.is_empty() {
                    ui.label(egui::RichText::new(title).strong().color(color));
                }
                ui.label(
                    egui::RichText::new(body).color(DesignSystem::text_primary(theme)),
                );
            });
        });
}
