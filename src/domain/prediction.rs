use serde::{Deserialize, Serialize};

/// Default lookback window fed to the model.
pub const DEFAULT_LOOKBACK: u32 = 400;
/// Default number of future steps requested from the model.
pub const DEFAULT_HORIZON: u32 = 120;
pub const DEFAULT_TEMPERATURE: f64 = 1.0;
pub const DEFAULT_TOP_P: f64 = 0.9;
pub const DEFAULT_SAMPLE_COUNT: u32 = 1;
pub const DEFAULT_MODEL_KEY: &str = "kronos-base";

/// A fully-populated prediction request, captured once per trigger.
///
/// Field names follow the service wire format (`pred_len`, `top_p`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRequest {
    pub ticker: String,
    pub model_key: String,
    pub lookback: u32,
    #[serde(rename = "pred_len")]
    pub horizon: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub sample_count: u32,
}

impl PredictionRequest {
    /// Request for `ticker` with every other field at its default.
    pub fn for_ticker(ticker: impl Into<String>) -> Self {
        Self {
            ticker: normalize_ticker(&ticker.into()).to_string(),
            model_key: DEFAULT_MODEL_KEY.to_string(),
            lookback: DEFAULT_LOOKBACK,
            horizon: DEFAULT_HORIZON,
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            sample_count: DEFAULT_SAMPLE_COUNT,
        }
    }

    /// Cache key over the full request tuple. Floats are compared by bit
    /// pattern; two requests with the same visible values share a key.
    pub fn cache_key(&self) -> CacheKey {
        CacheKey {
            ticker: self.ticker.clone(),
            model_key: self.model_key.clone(),
            lookback: self.lookback,
            horizon: self.horizon,
            temperature_bits: self.temperature.to_bits(),
            top_p_bits: self.top_p.to_bits(),
            sample_count: self.sample_count,
        }
    }
}

/// Identity of a prediction exchange in the one-slot response cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    ticker: String,
    model_key: String,
    lookback: u32,
    horizon: u32,
    temperature_bits: u64,
    top_p_bits: u64,
    sample_count: u32,
}

/// Strips an exchange prefix: `"NASDAQ:AAPL"` becomes `"AAPL"`.
pub fn normalize_ticker(raw: &str) -> &str {
    let trimmed = raw.trim();
    match trimmed.split_once(':') {
        Some((_, symbol)) => symbol,
        None => trimmed,
    }
}

/// One time step of open/high/low/close data as the service reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcvPoint {
    pub timestamp: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub input_start: String,
    pub input_end: String,
    pub pred_start: String,
    pub pred_end: String,
}

/// The service's prediction payload.
///
/// `success: false` is a business failure: the exchange itself worked, but
/// the model declined or failed, and `message` carries the reason. Every
/// field other than `success` is defaulted so a sparse failure payload still
/// deserializes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub success: bool,
    #[serde(default)]
    pub prediction_type: String,
    #[serde(default)]
    pub chart: Option<String>,
    #[serde(default)]
    pub prediction_results: Vec<OhlcvPoint>,
    #[serde(default)]
    pub actual_data: Vec<OhlcvPoint>,
    #[serde(default)]
    pub has_comparison: bool,
    #[serde(default)]
    pub time_range: Option<TimeRange>,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_only_request_gets_documented_defaults() {
        let request = PredictionRequest::for_ticker("AAPL");
        assert_eq!(request.lookback, 400);
        assert_eq!(request.horizon, 120);
        assert_eq!(request.temperature, 1.0);
        assert_eq!(request.top_p, 0.9);
        assert_eq!(request.sample_count, 1);
        assert_eq!(request.model_key, "kronos-base");
    }

    #[test]
    fn exchange_prefix_is_stripped() {
        assert_eq!(normalize_ticker("NASDAQ:AAPL"), "AAPL");
        assert_eq!(normalize_ticker("  BTC-USD "), "BTC-USD");
    }

    #[test]
    fn cache_key_covers_sampling_parameters() {
        let a = PredictionRequest::for_ticker("AAPL");
        let mut b = a.clone();
        b.temperature = 1.2;
        assert_ne!(a.cache_key(), b.cache_key());

        let mut c = a.clone();
        c.sample_count = 3;
        assert_ne!(a.cache_key(), c.cache_key());
        assert_eq!(a.cache_key(), a.clone().cache_key());
    }

    #[test]
    fn sparse_failure_payload_deserializes() {
        let raw = r#"{"success": false, "message": "model unavailable"}"#;
        let response: PredictionResponse = serde_json::from_str(raw).unwrap();
        assert!(!response.success);
        assert_eq!(response.message, "model unavailable");
        assert!(response.prediction_results.is_empty());
        assert!(response.chart.is_none());
    }

    #[test]
    fn request_serializes_with_wire_names() {
        let request = PredictionRequest::for_ticker("AAPL");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["pred_len"], 120);
        assert_eq!(value["top_p"], 0.9);
        assert!(value.get("horizon").is_none());
    }
}
