use crate::application::chart_engine::{ChartEngine, EngineNotReady, RenderSurface};
use crate::domain::chart_assets::{PlotPalette, Theme};
use crate::domain::chart_spec::{ChartSpec, SeriesSpec};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// How a series should be colored, inferred from the service's series names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesRole {
    Historical,
    Predicted,
    Actual,
    Other,
}

impl SeriesRole {
    fn from_name(name: &str) -> Self {
        let name = name.to_lowercase();
        if name.contains("historical") {
            SeriesRole::Historical
        } else if name.contains("prediction") || name.contains("predicted") {
            SeriesRole::Predicted
        } else if name.contains("actual") {
            SeriesRole::Actual
        } else {
            SeriesRole::Other
        }
    }

    /// (up, down) candle colors for this role under the given palette.
    pub fn candle_colors(self, palette: &PlotPalette) -> ([u8; 3], [u8; 3]) {
        match self {
            SeriesRole::Historical => (palette.candle_up, palette.candle_down),
            SeriesRole::Predicted => (palette.predicted_up, palette.predicted_down),
            SeriesRole::Actual => (palette.actual_up, palette.actual_down),
            SeriesRole::Other => (palette.accent, palette.accent),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CandlePoint {
    pub x: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

#[derive(Debug, Clone)]
pub struct CandleGroup {
    pub name: String,
    pub role: SeriesRole,
    pub points: Vec<CandlePoint>,
}

#[derive(Debug, Clone)]
pub struct LineGroup {
    pub name: String,
    pub points: Vec<[f64; 2]>,
}

/// X coordinate scheme: epoch seconds when every timestamp parsed, otherwise
/// plain indices with the raw strings kept for tick labels.
#[derive(Debug, Clone)]
pub enum XAxis {
    Time,
    Index(Vec<String>),
}

/// One live plot, fully derived from (spec, palette) and holding its engine
/// surface for as long as it is on screen.
#[derive(Debug)]
pub struct PlotInstance {
    _surface: RenderSurface,
    pub palette: PlotPalette,
    pub candles: Vec<CandleGroup>,
    pub lines: Vec<LineGroup>,
    pub x_axis: XAxis,
    pub candle_width: f64,
    pub title: Option<String>,
    pub height: Option<f32>,
}

impl PlotInstance {
    fn build(surface: RenderSurface, spec: &ChartSpec, palette: PlotPalette) -> Self {
        let mut all_x: Vec<&str> = Vec::new();
        for series in &spec.series {
            match series {
                SeriesSpec::Candlestick(c) => all_x.extend(c.x.iter().map(String::as_str)),
                SeriesSpec::Line(l) => all_x.extend(l.x.iter().map(String::as_str)),
            }
        }
        let time_axis = !all_x.is_empty() && all_x.iter().all(|x| parse_timestamp(x).is_some());

        let coord = |raw: &str, index: usize| -> f64 {
            if time_axis {
                parse_timestamp(raw).unwrap_or(index as i64) as f64
            } else {
                index as f64
            }
        };

        let mut candles = Vec::new();
        let mut lines = Vec::new();
        let mut index_labels: Vec<String> = Vec::new();
        let mut xs: Vec<f64> = Vec::new();
        let mut offset = 0usize;

        for series in &spec.series {
            match series {
                SeriesSpec::Candlestick(c) => {
                    let points = c
                        .x
                        .iter()
                        .enumerate()
                        .map(|(i, raw)| {
                            let x = coord(raw, offset + i);
                            xs.push(x);
                            CandlePoint {
                                x,
                                open: c.open[i],
                                high: c.high[i],
                                low: c.low[i],
                                close: c.close[i],
                            }
                        })
                        .collect();
                    if !time_axis {
                        index_labels.extend(c.x.iter().cloned());
                    }
                    offset += c.x.len();
                    candles.push(CandleGroup {
                        name: c.name.clone(),
                        role: SeriesRole::from_name(&c.name),
                        points,
                    });
                }
                SeriesSpec::Line(l) => {
                    let points = l
                        .x
                        .iter()
                        .enumerate()
                        .map(|(i, raw)| {
                            let x = coord(raw, offset + i);
                            xs.push(x);
                            [x, l.y[i]]
                        })
                        .collect();
                    if !time_axis {
                        index_labels.extend(l.x.iter().cloned());
                    }
                    offset += l.x.len();
                    lines.push(LineGroup {
                        name: l.name.clone(),
                        points,
                    });
                }
            }
        }

        Self {
            _surface: surface,
            palette,
            candles,
            lines,
            x_axis: if time_axis {
                XAxis::Time
            } else {
                XAxis::Index(index_labels)
            },
            candle_width: candle_width(&mut xs),
            title: spec.layout.title.clone(),
            height: spec.layout.height,
        }
    }
}

/// Owns the plot-instance lifecycle: the old instance is dropped (surface
/// released) before a replacement is acquired, on every rebuild path, and
/// dropping the view itself releases the last surface.
#[derive(Debug, Default)]
pub struct ChartView {
    instance: Option<PlotInstance>,
    fingerprint: Option<(u64, Theme)>,
}

impl ChartView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensures the instance matches (`seq`, `theme`). A change of either
    /// tears the old plot down and builds a fresh one with colors re-derived
    /// from the current theme.
    pub fn sync(
        &mut self,
        seq: u64,
        spec: &ChartSpec,
        theme: Theme,
        engine: &ChartEngine,
    ) -> Result<(), EngineNotReady> {
        if self.fingerprint == Some((seq, theme)) && self.instance.is_some() {
            return Ok(());
        }

        // Release before acquire: never two live surfaces for one view.
        self.instance = None;
        self.fingerprint = None;

        let assets = engine.assets().ok_or(EngineNotReady)?;
        let palette = assets.palette(theme).clone();
        let surface = engine.acquire_surface()?;
        self.instance = Some(PlotInstance::build(surface, spec, palette));
        self.fingerprint = Some((seq, theme));
        Ok(())
    }

    pub fn clear(&mut self) {
        self.instance = None;
        self.fingerprint = None;
    }

    pub fn instance(&self) -> Option<&PlotInstance> {
        self.instance.as_ref()
    }
}

/// Accepts the timestamp shapes the service is known to emit.
pub(crate) fn parse_timestamp(raw: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc().timestamp());
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d.and_hms_opt(0, 0, 0)?.and_utc().timestamp());
    }
    None
}

/// A box width a bit narrower than the tightest spacing between points.
fn candle_width(xs: &mut [f64]) -> f64 {
    xs.sort_by(|a, b| a.total_cmp(b));
    let min_gap = xs
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|gap| *gap > 0.0)
        .fold(f64::INFINITY, f64::min);
    if min_gap.is_finite() {
        min_gap * 0.6
    } else {
        0.6
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_follow_service_series_names() {
        assert_eq!(SeriesRole::from_name("Historical"), SeriesRole::Historical);
        assert_eq!(SeriesRole::from_name("Prediction"), SeriesRole::Predicted);
        assert_eq!(SeriesRole::from_name("Actual"), SeriesRole::Actual);
        assert_eq!(SeriesRole::from_name("SMA 20"), SeriesRole::Other);
    }

    #[test]
    fn timestamps_parse_in_known_shapes() {
        assert!(parse_timestamp("2026-01-05").is_some());
        assert!(parse_timestamp("2026-01-05 14:30:00").is_some());
        assert!(parse_timestamp("2026-01-05T14:30:00+00:00").is_some());
        assert!(parse_timestamp("first of never").is_none());
    }

    #[test]
    fn candle_width_tracks_tightest_gap() {
        let mut daily = vec![0.0, 86_400.0, 172_800.0];
        assert_eq!(candle_width(&mut daily), 86_400.0 * 0.6);

        let mut empty: Vec<f64> = Vec::new();
        assert_eq!(candle_width(&mut empty), 0.6);
    }
}
