use crate::domain::errors::ChartSpecError;
use serde_json::Value;
use tracing::warn;

/// Deserialized form of the opaque chart string the service produces.
///
/// The schema is owned by the remote service; parsing is strictly
/// tolerant. Series the parser cannot understand are skipped with a
/// warning, never an error, and mismatched column lengths truncate to the
/// shortest column.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub series: Vec<SeriesSpec>,
    pub layout: LayoutSpec,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SeriesSpec {
    Candlestick(CandleSeries),
    Line(LineSeries),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CandleSeries {
    pub name: String,
    pub x: Vec<String>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    pub name: String,
    pub x: Vec<String>,
    pub y: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutSpec {
    pub title: Option<String>,
    pub height: Option<f32>,
}

/// Parses the serialized chart spec. A failure here must degrade to the
/// tabular presentation upstream; it never propagates a panic.
pub fn parse_chart_spec(raw: &str) -> Result<ChartSpec, ChartSpecError> {
    let root: Value = serde_json::from_str(raw).map_err(|e| ChartSpecError::InvalidJson {
        reason: e.to_string(),
    })?;

    let data = root
        .get("data")
        .and_then(Value::as_array)
        .ok_or(ChartSpecError::MissingData)?;

    let mut series = Vec::with_capacity(data.len());
    for (index, entry) in data.iter().enumerate() {
        match parse_series(entry) {
            Some(parsed) => series.push(parsed),
            None => {
                let kind = entry
                    .get("type")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown");
                warn!("skipping undrawable chart series #{index} (type: {kind})");
            }
        }
    }

    Ok(ChartSpec {
        series,
        layout: parse_layout(root.get("layout")),
    })
}

fn parse_series(entry: &Value) -> Option<SeriesSpec> {
    let name = entry
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();

    match entry.get("type").and_then(Value::as_str) {
        Some("candlestick") => {
            let x = string_column(entry.get("x")?);
            let open = number_column(entry.get("open")?);
            let high = number_column(entry.get("high")?);
            let low = number_column(entry.get("low")?);
            let close = number_column(entry.get("close")?);

            let len = x
                .len()
                .min(open.len())
                .min(high.len())
                .min(low.len())
                .min(close.len());
            if len == 0 {
                return None;
            }

            Some(SeriesSpec::Candlestick(CandleSeries {
                name,
                x: truncated(x, len),
                open: truncated(open, len),
                high: truncated(high, len),
                low: truncated(low, len),
                close: truncated(close, len),
            }))
        }
        Some("scatter") | Some("line") => {
            let x = string_column(entry.get("x")?);
            let y = number_column(entry.get("y")?);
            let len = x.len().min(y.len());
            if len == 0 {
                return None;
            }
            Some(SeriesSpec::Line(LineSeries {
                name,
                x: truncated(x, len),
                y: truncated(y, len),
            }))
        }
        _ => None,
    }
}

fn parse_layout(layout: Option<&Value>) -> LayoutSpec {
    let Some(layout) = layout else {
        return LayoutSpec::default();
    };

    // Plotly emits titles either as a plain string or as {"text": ...}.
    let title = match layout.get("title") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => other
            .get("text")
            .and_then(Value::as_str)
            .map(str::to_string),
        None => None,
    };

    LayoutSpec {
        title,
        height: layout
            .get("height")
            .and_then(Value::as_f64)
            .map(|h| h as f32),
    }
}

fn string_column(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn number_column(value: &Value) -> Vec<f64> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(Value::as_f64).collect())
        .unwrap_or_default()
}

fn truncated<T>(mut column: Vec<T>, len: usize) -> Vec<T> {
    column.truncate(len);
    column
}
