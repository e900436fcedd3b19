use serde::Deserialize;
use std::str::FromStr;

/// Light/dark flag the renderer derives plot colors from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            _ => anyhow::bail!("Invalid UI_THEME: {}. Must be 'dark' or 'light'", s),
        }
    }
}

/// Plot-level colors for one theme, as loaded from the palette catalog.
/// Colors are raw RGB triples so this stays independent of the UI toolkit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlotPalette {
    pub background: [u8; 3],
    pub grid: [u8; 3],
    pub text: [u8; 3],
    pub candle_up: [u8; 3],
    pub candle_down: [u8; 3],
    pub predicted_up: [u8; 3],
    pub predicted_down: [u8; 3],
    pub actual_up: [u8; 3],
    pub actual_down: [u8; 3],
    pub accent: [u8; 3],
}

/// Everything the chart engine needs before any plot may be drawn.
#[derive(Debug, Clone)]
pub struct ChartAssets {
    dark: PlotPalette,
    light: PlotPalette,
}

impl ChartAssets {
    pub fn new(dark: PlotPalette, light: PlotPalette) -> Self {
        Self { dark, light }
    }

    /// Palette for `theme`. Looked up fresh on every plot rebuild so a theme
    /// change always yields newly derived colors.
    pub fn palette(&self, theme: Theme) -> &PlotPalette {
        match theme {
            Theme::Dark => &self.dark,
            Theme::Light => &self.light,
        }
    }
}
