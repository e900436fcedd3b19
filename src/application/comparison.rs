use crate::domain::prediction::OhlcvPoint;

/// Rows shown in the predicted-versus-actual table.
pub const COMPARISON_ROW_LIMIT: usize = 20;

/// Signed percentage error of a predicted close against the actual close.
///
/// `NotApplicable` covers a zero or non-finite denominator; a non-numeric
/// artifact must never reach the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CloseError {
    Pct(f64),
    NotApplicable,
}

impl CloseError {
    /// Display form, rounded to two decimals: `+5.00%`, `-5.00%`, or `n/a`.
    pub fn label(&self) -> String {
        match self {
            CloseError::Pct(value) => format!("{value:+.2}%"),
            CloseError::NotApplicable => "n/a".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ComparisonRow {
    pub timestamp: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub actual_close: Option<f64>,
    pub close_error: Option<CloseError>,
}

pub fn close_error_pct(predicted_close: f64, actual_close: f64) -> CloseError {
    if actual_close == 0.0 || !actual_close.is_finite() || !predicted_close.is_finite() {
        return CloseError::NotApplicable;
    }
    CloseError::Pct((predicted_close - actual_close) / actual_close * 100.0)
}

/// Derives the comparison table from the raw series. Always available, even
/// when the graphical chart cannot render. Actual values are paired by
/// position only when the response claims a comparison window.
pub fn comparison_rows(
    predicted: &[OhlcvPoint],
    actual: &[OhlcvPoint],
    has_comparison: bool,
) -> Vec<ComparisonRow> {
    predicted
        .iter()
        .take(COMPARISON_ROW_LIMIT)
        .enumerate()
        .map(|(i, point)| {
            let actual_close = if has_comparison {
                actual.get(i).map(|a| a.close)
            } else {
                None
            };
            ComparisonRow {
                timestamp: point.timestamp.clone(),
                open: point.open,
                high: point.high,
                low: point.low,
                close: point.close,
                actual_close,
                close_error: actual_close.map(|a| close_error_pct(point.close, a)),
            }
        })
        .collect()
}
