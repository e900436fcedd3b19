use crate::domain::chart_assets::ChartAssets;
use crate::domain::errors::PredictionError;
use crate::domain::models::{LoadModelRequest, ModelCatalog, ModelStatus};
use crate::domain::prediction::{PredictionRequest, PredictionResponse};
use anyhow::Result;
use async_trait::async_trait;

/// The remote forecasting service, as the application sees it.
///
/// `predict` performs exactly one network exchange per call; retry policy, if
/// any, belongs to the caller and is deliberately absent for predictions.
#[async_trait]
pub trait PredictionService: Send + Sync {
    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, PredictionError>;

    async fn model_status(&self) -> Result<ModelStatus, PredictionError>;

    async fn available_models(&self) -> Result<ModelCatalog, PredictionError>;

    /// Returns the service's human-readable confirmation message.
    async fn load_model(&self, request: &LoadModelRequest) -> Result<String, PredictionError>;
}

/// One-shot source of chart-engine assets, loaded at most once per process
/// by the engine gate.
#[async_trait]
pub trait ChartAssetLoader: Send + Sync {
    async fn load(&self) -> Result<ChartAssets>;
}
