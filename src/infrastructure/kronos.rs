//! Kronos Prediction Service Client
//!
//! HTTP client for the Kronos model-serving endpoints:
//! - prediction exchange (single shot, no retry)
//! - model status and catalog discovery
//! - explicit model loading

use crate::domain::errors::PredictionError;
use crate::domain::models::{LoadModelRequest, ModelCatalog, ModelStatus};
use crate::domain::ports::PredictionService;
use crate::domain::prediction::{PredictionRequest, PredictionResponse};
use crate::infrastructure::http_client_factory::HttpClientFactory;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// The service's response envelope. Payload-bearing endpoints must populate
/// `data`; an empty envelope is a malformed payload, not a business failure.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    data: Option<T>,
}

pub struct KronosPredictionService {
    client: Client,
    base_url: Url,
}

impl KronosPredictionService {
    pub fn new(base_url: Url, request_timeout: Duration) -> Self {
        Self {
            client: HttpClientFactory::create_client(request_timeout),
            base_url,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, PredictionError> {
        self.base_url
            .join(path)
            .map_err(|e| PredictionError::Transport {
                reason: format!("invalid endpoint {path}: {e}"),
            })
    }

    async fn read_envelope<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<ApiEnvelope<T>, PredictionError> {
        let status = response.status();
        if !status.is_success() {
            return Err(PredictionError::Status {
                status: status.as_u16(),
            });
        }
        response
            .json::<ApiEnvelope<T>>()
            .await
            .map_err(|e| PredictionError::MalformedPayload {
                reason: e.to_string(),
            })
    }

    fn unwrap_data<T>(envelope: ApiEnvelope<T>) -> Result<T, PredictionError> {
        envelope.data.ok_or_else(|| PredictionError::MalformedPayload {
            reason: "envelope missing data".to_string(),
        })
    }

    async fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<T, PredictionError> {
        let url = self.endpoint(path)?;
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PredictionError::Transport {
                reason: e.to_string(),
            })?;
        Self::unwrap_data(Self::read_envelope(response).await?)
    }

    async fn post<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiEnvelope<T>, PredictionError> {
        let url = self.endpoint(path)?;
        debug!("POST {url}");
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| PredictionError::Transport {
                reason: e.to_string(),
            })?;
        Self::read_envelope(response).await
    }
}

#[async_trait]
impl PredictionService for KronosPredictionService {
    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, PredictionError> {
        let envelope: ApiEnvelope<PredictionResponse> =
            self.post("kronos/predict", request).await?;
        Self::unwrap_data(envelope)
    }

    async fn model_status(&self) -> Result<ModelStatus, PredictionError> {
        self.get_data("kronos/model-status").await
    }

    async fn available_models(&self) -> Result<ModelCatalog, PredictionError> {
        self.get_data("kronos/available-models").await
    }

    async fn load_model(&self, request: &LoadModelRequest) -> Result<String, PredictionError> {
        let envelope: ApiEnvelope<serde_json::Value> =
            self.post("kronos/load-model", request).await?;
        Ok(envelope.msg.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_without_data_is_malformed() {
        let envelope: ApiEnvelope<PredictionResponse> =
            serde_json::from_str(r#"{"code": 0, "msg": "ok"}"#).unwrap();
        assert!(matches!(
            KronosPredictionService::unwrap_data(envelope),
            Err(PredictionError::MalformedPayload { .. })
        ));
    }

    #[test]
    fn envelope_with_payload_unwraps() {
        let raw = r#"{"code": 0, "msg": "ok", "data": {"success": true, "message": "done"}}"#;
        let envelope: ApiEnvelope<PredictionResponse> = serde_json::from_str(raw).unwrap();
        let response = KronosPredictionService::unwrap_data(envelope).unwrap();
        assert!(response.success);
        assert_eq!(response.message, "done");
    }
}
