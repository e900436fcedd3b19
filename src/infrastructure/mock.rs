use crate::domain::errors::PredictionError;
use crate::domain::models::{CurrentModel, LoadModelRequest, ModelCatalog, ModelInfo, ModelStatus};
use crate::domain::ports::PredictionService;
use crate::domain::prediction::{OhlcvPoint, PredictionRequest, PredictionResponse, TimeRange};
use async_trait::async_trait;
use chrono::{Days, Utc};
use rand::Rng;
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::time::Duration;
use tracing::info;

/// Offline stand-in for the Kronos service: synthesizes a random-walk
/// prediction with a comparison window and a well-formed chart spec after a
/// configurable artificial delay. Lets the whole pipeline run (and the demo
/// mode feel honest) without a live model server.
pub struct MockPredictionService {
    latency: Duration,
}

impl MockPredictionService {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    fn base_price(ticker: &str) -> f64 {
        let mut hasher = DefaultHasher::new();
        ticker.hash(&mut hasher);
        40.0 + (hasher.finish() % 400) as f64
    }

    fn walk(start: f64, steps: usize, first_day: chrono::DateTime<Utc>) -> Vec<OhlcvPoint> {
        let mut rng = rand::rng();
        let mut close = start;
        (0..steps)
            .map(|i| {
                let open = close;
                close = (open * (1.0 + rng.random_range(-0.02..0.02))).max(0.01);
                let high = open.max(close) * (1.0 + rng.random_range(0.0..0.01));
                let low = open.min(close) * (1.0 - rng.random_range(0.0..0.01));
                let day = first_day + Days::new(i as u64);
                OhlcvPoint {
                    timestamp: day.format("%Y-%m-%d").to_string(),
                    open,
                    high,
                    low,
                    close,
                    volume: Some(rng.random_range(1.0e5..5.0e6)),
                    amount: None,
                }
            })
            .collect()
    }

    fn chart_spec(history: &[OhlcvPoint], predicted: &[OhlcvPoint], ticker: &str) -> String {
        let candlestick = |name: &str, points: &[OhlcvPoint]| {
            serde_json::json!({
                "type": "candlestick",
                "name": name,
                "x": points.iter().map(|p| p.timestamp.clone()).collect::<Vec<_>>(),
                "open": points.iter().map(|p| p.open).collect::<Vec<_>>(),
                "high": points.iter().map(|p| p.high).collect::<Vec<_>>(),
                "low": points.iter().map(|p| p.low).collect::<Vec<_>>(),
                "close": points.iter().map(|p| p.close).collect::<Vec<_>>(),
            })
        };
        serde_json::json!({
            "data": [candlestick("Historical", history), candlestick("Prediction", predicted)],
            "layout": {
                "title": {"text": format!("Kronos Prediction Results: {ticker}")},
                "height": 420
            }
        })
        .to_string()
    }

    fn catalog() -> BTreeMap<String, ModelInfo> {
        BTreeMap::from([
            (
                "kronos-mini".to_string(),
                ModelInfo {
                    name: "Kronos-mini".to_string(),
                    context_length: 2048,
                    params: "4.1M".to_string(),
                    description: "Lightweight model, suitable for fast prediction".to_string(),
                },
            ),
            (
                "kronos-small".to_string(),
                ModelInfo {
                    name: "Kronos-small".to_string(),
                    context_length: 512,
                    params: "24.7M".to_string(),
                    description: "Small model, balanced performance and speed".to_string(),
                },
            ),
            (
                "kronos-base".to_string(),
                ModelInfo {
                    name: "Kronos-base".to_string(),
                    context_length: 512,
                    params: "102.3M".to_string(),
                    description: "Base model, provides better prediction quality".to_string(),
                },
            ),
        ])
    }
}

#[async_trait]
impl PredictionService for MockPredictionService {
    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, PredictionError> {
        tokio::time::sleep(self.latency).await;
        info!("mock prediction for {}", request.ticker);

        let steps = request.horizon as usize;
        let lookback = (request.lookback as usize).min(120);
        let today = Utc::now();
        let history_start = today - Days::new((lookback + steps) as u64);
        let pred_start = today - Days::new(steps as u64);

        let history = Self::walk(Self::base_price(&request.ticker), lookback, history_start);
        let anchor = history.last().map(|p| p.close).unwrap_or(100.0);
        let predicted = Self::walk(anchor, steps, pred_start);
        let actual = Self::walk(anchor, steps, pred_start);

        let chart = Self::chart_spec(&history, &predicted, &request.ticker);
        Ok(PredictionResponse {
            success: true,
            prediction_type: format!("Kronos prediction for {}", request.ticker),
            chart: Some(chart),
            has_comparison: !actual.is_empty(),
            time_range: Some(TimeRange {
                input_start: history.first().map(|p| p.timestamp.clone()).unwrap_or_default(),
                input_end: history.last().map(|p| p.timestamp.clone()).unwrap_or_default(),
                pred_start: predicted.first().map(|p| p.timestamp.clone()).unwrap_or_default(),
                pred_end: predicted.last().map(|p| p.timestamp.clone()).unwrap_or_default(),
            }),
            message: format!("Prediction completed with {} points", predicted.len()),
            prediction_results: predicted,
            actual_data: actual,
        })
    }

    async fn model_status(&self) -> Result<ModelStatus, PredictionError> {
        Ok(ModelStatus {
            available: true,
            loaded: true,
            message: "Mock model loaded and available".to_string(),
            current_model: Some(CurrentModel {
                name: "Kronos-base".to_string(),
                device: Some("cpu".to_string()),
                model_key: Some("kronos-base".to_string()),
            }),
        })
    }

    async fn available_models(&self) -> Result<ModelCatalog, PredictionError> {
        Ok(ModelCatalog {
            models: Self::catalog(),
            model_available: true,
        })
    }

    async fn load_model(&self, request: &LoadModelRequest) -> Result<String, PredictionError> {
        Ok(format!(
            "Model loaded: {} on {}",
            request.model_key, request.device
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::outcome::{plan_render, RenderPlan};

    #[tokio::test]
    async fn mock_prediction_flows_through_the_pipeline() {
        let service = MockPredictionService::new(Duration::ZERO);
        let request = PredictionRequest::for_ticker("AAPL");
        let response = service.predict(&request).await.unwrap();

        assert!(response.success);
        assert_eq!(response.prediction_results.len(), 120);
        assert!(response.has_comparison);

        match plan_render(&response) {
            RenderPlan::Chart { spec, rows } => {
                assert_eq!(spec.series.len(), 2);
                assert!(!rows.is_empty());
            }
            other => panic!("expected chart plan, got {other:?}"),
        }
    }
}
