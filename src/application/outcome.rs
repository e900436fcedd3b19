use crate::application::comparison::{comparison_rows, ComparisonRow};
use crate::domain::chart_spec::{parse_chart_spec, ChartSpec};
use crate::domain::prediction::PredictionResponse;
use tracing::warn;

/// What the renderer should do with a completed response.
#[derive(Debug, Clone)]
pub enum RenderPlan {
    /// Business failure: show the service message, never touch the chart.
    Failure { message: String },
    /// Chart plus the comparison table.
    Chart {
        spec: ChartSpec,
        rows: Vec<ComparisonRow>,
    },
    /// No drawable chart; the table still renders.
    TableOnly {
        rows: Vec<ComparisonRow>,
        notice: Option<String>,
    },
    /// Nothing to draw at all.
    MessageOnly { message: String },
}

/// Classifies a response. `success: false` short-circuits before the chart
/// string is ever parsed; a malformed chart degrades to the table with a
/// logged warning.
pub fn plan_render(response: &PredictionResponse) -> RenderPlan {
    if !response.success {
        let message = if response.message.is_empty() {
            "prediction failed".to_string()
        } else {
            response.message.clone()
        };
        return RenderPlan::Failure { message };
    }

    let rows = comparison_rows(
        &response.prediction_results,
        &response.actual_data,
        response.has_comparison,
    );

    let spec = match response.chart.as_deref() {
        Some(raw) => match parse_chart_spec(raw) {
            Ok(spec) if !spec.series.is_empty() => Some(spec),
            Ok(_) => {
                warn!("chart spec parsed but carried no drawable series");
                None
            }
            Err(err) => {
                warn!("discarding undrawable chart spec: {err}");
                None
            }
        },
        None => None,
    };

    match spec {
        Some(spec) => RenderPlan::Chart { spec, rows },
        None if rows.is_empty() => RenderPlan::MessageOnly {
            message: response.message.clone(),
        },
        None => RenderPlan::TableOnly {
            rows,
            notice: response
                .chart
                .is_some()
                .then(|| "chart unavailable, showing data only".to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::prediction::OhlcvPoint;

    fn point(close: f64) -> OhlcvPoint {
        OhlcvPoint {
            timestamp: "2026-01-05".to_string(),
            open: close,
            high: close,
            low: close,
            close,
            volume: None,
            amount: None,
        }
    }

    fn success_response() -> PredictionResponse {
        PredictionResponse {
            success: true,
            prediction_type: "Kronos prediction for AAPL".to_string(),
            chart: None,
            prediction_results: vec![point(105.0)],
            actual_data: vec![],
            has_comparison: false,
            time_range: None,
            message: "Prediction completed with 1 points".to_string(),
        }
    }

    #[test]
    fn business_failure_routes_to_failure_presentation() {
        let response = PredictionResponse {
            success: false,
            message: "model unavailable".to_string(),
            // A chart string on a failed response must never be parsed.
            chart: Some("not-json".to_string()),
            ..success_response()
        };

        match plan_render(&response) {
            RenderPlan::Failure { message } => assert_eq!(message, "model unavailable"),
            other => panic!("expected failure plan, got {other:?}"),
        }
    }

    #[test]
    fn malformed_chart_degrades_to_table() {
        let response = PredictionResponse {
            chart: Some("not-json".to_string()),
            ..success_response()
        };

        match plan_render(&response) {
            RenderPlan::TableOnly { rows, notice } => {
                assert_eq!(rows.len(), 1);
                assert!(notice.is_some());
            }
            other => panic!("expected table-only plan, got {other:?}"),
        }
    }

    #[test]
    fn missing_chart_with_no_rows_is_message_only() {
        let response = PredictionResponse {
            prediction_results: vec![],
            ..success_response()
        };

        assert!(matches!(
            plan_render(&response),
            RenderPlan::MessageOnly { .. }
        ));
    }

    #[test]
    fn parseable_chart_renders_with_rows() {
        let raw = serde_json::json!({
            "data": [{
                "type": "candlestick",
                "name": "Prediction",
                "x": ["2026-01-05"],
                "open": [10.0], "high": [11.0], "low": [9.0], "close": [10.5]
            }]
        })
        .to_string();
        let response = PredictionResponse {
            chart: Some(raw),
            ..success_response()
        };

        match plan_render(&response) {
            RenderPlan::Chart { spec, rows } => {
                assert_eq!(spec.series.len(), 1);
                assert_eq!(rows.len(), 1);
            }
            other => panic!("expected chart plan, got {other:?}"),
        }
    }
}
