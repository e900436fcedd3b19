use crate::domain::chart_assets::{ChartAssets, PlotPalette};
use crate::domain::ports::ChartAssetLoader;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Deserialize)]
struct PaletteCatalog {
    #[serde(flatten)]
    themes: HashMap<String, PlotPalette>,
}

/// Loads the plot palette catalog from disk. Both themes must be present;
/// a partial catalog fails the bootstrap rather than half-theming the app.
pub struct FsChartAssetLoader {
    path: PathBuf,
}

impl FsChartAssetLoader {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl ChartAssetLoader for FsChartAssetLoader {
    async fn load(&self) -> Result<ChartAssets> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read palette catalog {}", self.path.display()))?;

        let mut catalog: PaletteCatalog =
            serde_json::from_str(&raw).context("Failed to parse palette catalog")?;

        let dark = catalog
            .themes
            .remove("dark")
            .context("Palette catalog missing 'dark' theme")?;
        let light = catalog
            .themes
            .remove("light")
            .context("Palette catalog missing 'light' theme")?;

        info!("loaded plot palettes from {}", self.path.display());
        Ok(ChartAssets::new(dark, light))
    }
}
