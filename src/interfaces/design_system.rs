use crate::domain::chart_assets::Theme;
use eframe::egui;

/// Desk design system, light and dark.
pub struct DesignSystem;

impl DesignSystem {
    // --- Dark ---
    pub const DARK_BG_WINDOW: egui::Color32 = egui::Color32::from_rgb(10, 12, 16);
    pub const DARK_BG_CARD: egui::Color32 = egui::Color32::from_rgb(22, 27, 34);
    pub const DARK_BG_CARD_HOVER: egui::Color32 = egui::Color32::from_rgb(28, 33, 40);
    pub const DARK_BG_INPUT: egui::Color32 = egui::Color32::from_rgb(15, 18, 24);
    pub const DARK_TEXT_PRIMARY: egui::Color32 = egui::Color32::from_rgb(240, 246, 252);
    pub const DARK_TEXT_SECONDARY: egui::Color32 = egui::Color32::from_gray(160);
    pub const DARK_BORDER_SUBTLE: egui::Color32 = egui::Color32::from_rgb(48, 54, 61);

    // --- Light ---
    pub const LIGHT_BG_WINDOW: egui::Color32 = egui::Color32::from_rgb(250, 250, 252);
    pub const LIGHT_BG_CARD: egui::Color32 = egui::Color32::from_rgb(255, 255, 255);
    pub const LIGHT_BG_CARD_HOVER: egui::Color32 = egui::Color32::from_rgb(240, 242, 246);
    pub const LIGHT_BG_INPUT: egui::Color32 = egui::Color32::from_rgb(244, 246, 249);
    pub const LIGHT_TEXT_PRIMARY: egui::Color32 = egui::Color32::from_rgb(28, 32, 38);
    pub const LIGHT_TEXT_SECONDARY: egui::Color32 = egui::Color32::from_gray(95);
    pub const LIGHT_BORDER_SUBTLE: egui::Color32 = egui::Color32::from_rgb(210, 214, 220);

    // --- Accents / status, shared across themes ---
    pub const ACCENT_PRIMARY: egui::Color32 = egui::Color32::from_rgb(41, 121, 255);
    pub const ACCENT_SECONDARY: egui::Color32 = egui::Color32::from_rgb(66, 165, 245);
    pub const SUCCESS: egui::Color32 = egui::Color32::from_rgb(0, 200, 110);
    pub const DANGER: egui::Color32 = egui::Color32::from_rgb(255, 23, 68);
    pub const WARNING: egui::Color32 = egui::Color32::from_rgb(255, 145, 0);

    // --- Metrics ---
    pub const ROUNDING_MEDIUM: f32 = 8.0;
    pub const SPACING_SMALL: f32 = 8.0;
    pub const SPACING_MEDIUM: f32 = 16.0;
    pub const SPACING_LARGE: f32 = 24.0;

    pub fn bg_window(theme: Theme) -> egui::Color32 {
        pick(theme, Self::DARK_BG_WINDOW, Self::LIGHT_BG_WINDOW)
    }

    pub fn bg_card(theme: Theme) -> egui::Color32 {
        pick(theme, Self::DARK_BG_CARD, Self::LIGHT_BG_CARD)
    }

    pub fn text_primary(theme: Theme) -> egui::Color32 {
        pick(theme, Self::DARK_TEXT_PRIMARY, Self::LIGHT_TEXT_PRIMARY)
    }

    pub fn text_secondary(theme: Theme) -> egui::Color32 {
        pick(theme, Self::DARK_TEXT_SECONDARY, Self::LIGHT_TEXT_SECONDARY)
    }

    pub fn border_subtle(theme: Theme) -> egui::Color32 {
        pick(theme, Self::DARK_BORDER_SUBTLE, Self::LIGHT_BORDER_SUBTLE)
    }

    /// Visual style for the whole application, rebuilt whenever the theme
    /// flag changes.
    pub fn visuals(theme: Theme) -> egui::Visuals {
        let mut visuals = match theme {
            Theme::Dark => egui::Visuals::dark(),
            Theme::Light => egui::Visuals::light(),
        };

        visuals.window_fill = Self::bg_window(theme);
        visuals.panel_fill = Self::bg_window(theme);
        visuals.extreme_bg_color = pick(theme, Self::DARK_BG_INPUT, Self::LIGHT_BG_INPUT);

        visuals.widgets.noninteractive.bg_stroke =
            egui::Stroke::new(1.0, Self::border_subtle(theme));
        visuals.widgets.noninteractive.fg_stroke =
            egui::Stroke::new(1.0, Self::text_primary(theme));

        visuals.widgets.inactive.fg_stroke = egui::Stroke::new(1.0, Self::text_secondary(theme));
        visuals.widgets.inactive.weak_bg_fill = Self::bg_card(theme);
        visuals.widgets.inactive.bg_fill = Self::bg_card(theme);

        visuals.widgets.hovered.bg_fill =
            pick(theme, Self::DARK_BG_CARD_HOVER, Self::LIGHT_BG_CARD_HOVER);
        visuals.widgets.active.bg_fill = Self::ACCENT_SECONDARY;

        visuals.selection.bg_fill = Self::ACCENT_PRIMARY.linear_multiply(0.3);
        visuals.selection.stroke = egui::Stroke::new(1.0, Self::ACCENT_PRIMARY);

        visuals
    }

    /// Standard card styling
    pub fn card_frame(theme: Theme) -> egui::Frame {
        egui::Frame::NONE
            .fill(Self::bg_card(theme))
            .corner_radius(Self::ROUNDING_MEDIUM)
            .stroke(egui::Stroke::new(1.0, Self::border_subtle(theme)))
            .inner_margin(Self::SPACING_MEDIUM as i8)
    }
}

/// Converts a palette RGB triple to an egui color.
pub fn color32(rgb: [u8; 3]) -> egui::Color32 {
    egui::Color32::from_rgb(rgb[0], rgb[1], rgb[2])
}

fn pick(theme: Theme, dark: egui::Color32, light: egui::Color32) -> egui::Color32 {
    match theme {
        Theme::Dark => dark,
        Theme::Light => light,
    }
}
