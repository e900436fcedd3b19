use crate::domain::errors::ParameterError;
use crate::domain::prediction::{
    self, normalize_ticker, PredictionRequest, DEFAULT_HORIZON, DEFAULT_LOOKBACK,
    DEFAULT_MODEL_KEY, DEFAULT_SAMPLE_COUNT, DEFAULT_TEMPERATURE, DEFAULT_TOP_P,
};

// Option sets offered by the UI controls. They mirror the bounds the service
// declares for each field; the store itself does not clamp, so a value
// outside these sets still goes through and the service gets to reject it.
pub const LOOKBACK_CHOICES: [u32; 5] = [100, 200, 300, 400, 512];
pub const HORIZON_CHOICES: [u32; 4] = [30, 60, 120, 180];
pub const TEMPERATURE_CHOICES: [f64; 5] = [0.6, 0.8, 1.0, 1.2, 1.5];
pub const TOP_P_CHOICES: [f64; 4] = [0.7, 0.8, 0.9, 1.0];
pub const SAMPLE_COUNT_CHOICES: [u32; 4] = [1, 2, 3, 5];

/// User-adjustable prediction inputs.
///
/// Editing a field has no side effects; a request only leaves this store
/// through an explicit `snapshot()` at trigger time.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterStore {
    pub ticker: String,
    pub model_key: String,
    pub lookback: u32,
    pub horizon: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub sample_count: u32,
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self {
            ticker: String::new(),
            model_key: DEFAULT_MODEL_KEY.to_string(),
            lookback: DEFAULT_LOOKBACK,
            horizon: DEFAULT_HORIZON,
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            sample_count: DEFAULT_SAMPLE_COUNT,
        }
    }
}

impl ParameterStore {
    /// Captures the current values as an immutable request.
    ///
    /// Rejects an empty ticker and non-positive numerics; anything else is
    /// passed through untouched for the service to judge.
    pub fn snapshot(&self) -> Result<PredictionRequest, ParameterError> {
        let ticker = normalize_ticker(&self.ticker);
        if ticker.is_empty() {
            return Err(ParameterError::EmptyTicker);
        }
        if self.lookback == 0 {
            return Err(ParameterError::NonPositive { field: "lookback" });
        }
        if self.horizon == 0 {
            return Err(ParameterError::NonPositive { field: "horizon" });
        }
        if !(self.temperature > 0.0) {
            return Err(ParameterError::NonPositive {
                field: "temperature",
            });
        }
        if !(self.top_p > 0.0) {
            return Err(ParameterError::NonPositive { field: "top_p" });
        }
        if self.sample_count == 0 {
            return Err(ParameterError::NonPositive {
                field: "sample_count",
            });
        }

        let model_key = if self.model_key.is_empty() {
            prediction::DEFAULT_MODEL_KEY.to_string()
        } else {
            self.model_key.clone()
        };

        Ok(PredictionRequest {
            ticker: ticker.to_string(),
            model_key,
            lookback: self.lookback,
            horizon: self.horizon,
            temperature: self.temperature,
            top_p: self.top_p,
            sample_count: self.sample_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_with_only_ticker_set_uses_defaults() {
        let store = ParameterStore {
            ticker: "AAPL".to_string(),
            ..ParameterStore::default()
        };
        let request = store.snapshot().unwrap();
        assert_eq!(request, PredictionRequest::for_ticker("AAPL"));
    }

    #[test]
    fn empty_ticker_is_rejected() {
        let store = ParameterStore::default();
        assert_eq!(store.snapshot(), Err(ParameterError::EmptyTicker));

        let store = ParameterStore {
            ticker: "   ".to_string(),
            ..ParameterStore::default()
        };
        assert_eq!(store.snapshot(), Err(ParameterError::EmptyTicker));
    }

    #[test]
    fn non_positive_numerics_are_rejected() {
        let store = ParameterStore {
            ticker: "AAPL".to_string(),
            temperature: 0.0,
            ..ParameterStore::default()
        };
        assert_eq!(
            store.snapshot(),
            Err(ParameterError::NonPositive {
                field: "temperature"
            })
        );
    }

    #[test]
    fn out_of_range_values_pass_through() {
        // The store does not clamp; the service owns range enforcement.
        let store = ParameterStore {
            ticker: "AAPL".to_string(),
            lookback: 9999,
            temperature: 15.0,
            ..ParameterStore::default()
        };
        let request = store.snapshot().unwrap();
        assert_eq!(request.lookback, 9999);
        assert_eq!(request.temperature, 15.0);
    }

    #[test]
    fn snapshot_normalizes_exchange_prefix() {
        let store = ParameterStore {
            ticker: "NASDAQ:AAPL".to_string(),
            ..ParameterStore::default()
        };
        assert_eq!(store.snapshot().unwrap().ticker, "AAPL");
    }
}
