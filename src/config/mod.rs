//! Configuration module for Kronoscope.
//!
//! Everything is loaded from environment variables (a `.env` file is honored
//! via dotenvy in `main`), with defaults that point at a local service.

use crate::domain::chart_assets::Theme;
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Which prediction service backs the desk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Kronos,
    Mock,
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kronos" => Ok(Mode::Kronos),
            "mock" => Ok(Mode::Mock),
            _ => anyhow::bail!("Invalid MODE: {}. Must be 'kronos' or 'mock'", s),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,
    pub kronos_base_url: Url,
    /// Bounds a hung prediction exchange; there is no retry behind it.
    pub request_timeout: Duration,
    pub chart_theme_path: PathBuf,
    pub translations_dir: PathBuf,
    pub locale: Option<String>,
    pub theme: Theme,
    pub mock_latency: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let mode: Mode = env_or("MODE", "kronos").parse()?;

        let mut base_url = env_or("KRONOS_BASE_URL", "http://127.0.0.1:8000/api/v1/");
        // Url::join treats a missing trailing slash as a file segment.
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let kronos_base_url = Url::parse(&base_url)
            .with_context(|| format!("Invalid KRONOS_BASE_URL: {base_url}"))?;

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", "120")
            .parse()
            .context("Invalid REQUEST_TIMEOUT_SECS")?;

        let mock_latency_ms: u64 = env_or("MOCK_LATENCY_MS", "600")
            .parse()
            .context("Invalid MOCK_LATENCY_MS")?;

        let theme: Theme = env_or("UI_THEME", "dark").parse()?;

        Ok(Self {
            mode,
            kronos_base_url,
            request_timeout: Duration::from_secs(request_timeout_secs),
            chart_theme_path: PathBuf::from(env_or("CHART_THEME_PATH", "assets/chart_themes.json")),
            translations_dir: PathBuf::from(env_or("TRANSLATIONS_DIR", "translations")),
            locale: env::var("LOCALE").ok(),
            theme,
            mock_latency: Duration::from_millis(mock_latency_ms),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
