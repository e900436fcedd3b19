use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata for one model the service can run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub context_length: u32,
    #[serde(default)]
    pub params: String,
    #[serde(default)]
    pub description: String,
}

/// Catalog of available models. A `BTreeMap` keeps the picker order stable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelCatalog {
    #[serde(default)]
    pub models: BTreeMap<String, ModelInfo>,
    #[serde(default)]
    pub model_available: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurrentModel {
    pub name: String,
    #[serde(default)]
    pub device: Option<String>,
    #[serde(default)]
    pub model_key: Option<String>,
}

/// Whether the remote model library is importable and a model is loaded.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelStatus {
    pub available: bool,
    pub loaded: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub current_model: Option<CurrentModel>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadModelRequest {
    pub model_key: String,
    pub device: String,
}

impl LoadModelRequest {
    pub fn cpu(model_key: impl Into<String>) -> Self {
        Self {
            model_key: model_key.into(),
            device: "cpu".to_string(),
        }
    }
}
