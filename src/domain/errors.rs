use thiserror::Error;

/// Transport-class failures of a prediction exchange.
///
/// A well-formed response with `success: false` is NOT one of these; that is
/// a business failure carried inside `PredictionResponse` and routed to its
/// own presentation.
#[derive(Debug, Clone, Error)]
pub enum PredictionError {
    #[error("prediction service unreachable: {reason}")]
    Transport { reason: String },

    #[error("prediction service returned HTTP {status}")]
    Status { status: u16 },

    #[error("malformed prediction payload: {reason}")]
    MalformedPayload { reason: String },
}

/// Failures while deserializing the service-produced chart spec.
#[derive(Debug, Clone, Error)]
pub enum ChartSpecError {
    #[error("chart spec is not valid JSON: {reason}")]
    InvalidJson { reason: String },

    #[error("chart spec has no data array")]
    MissingData,
}

/// Rejections when capturing a request snapshot from the parameter store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    #[error("ticker must not be empty")]
    EmptyTicker,

    #[error("{field} must be positive")]
    NonPositive { field: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_carry_context() {
        let err = PredictionError::Status { status: 503 };
        assert!(err.to_string().contains("503"));

        let err = PredictionError::MalformedPayload {
            reason: "envelope missing data".to_string(),
        };
        assert!(err.to_string().contains("envelope missing data"));
    }

    #[test]
    fn parameter_error_names_the_field() {
        let err = ParameterError::NonPositive { field: "lookback" };
        assert_eq!(err.to_string(), "lookback must be positive");
    }
}
