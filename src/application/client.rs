use crate::application::chart_engine::ChartEngine;
use crate::application::worker::{DeskCommand, DeskEvent};
use crate::domain::prediction::PredictionRequest;
use anyhow::Result;
use crossbeam_channel::Receiver;
use tokio::sync::mpsc;

/// A client interface for the background worker. Abstracts away channel
/// management and provides a clean API for the desk/UI.
pub struct DeskClient {
    command_tx: mpsc::Sender<DeskCommand>,
    engine: ChartEngine,
    event_rx: Receiver<DeskEvent>,
    log_rx: Receiver<String>,
}

impl DeskClient {
    pub fn new(
        command_tx: mpsc::Sender<DeskCommand>,
        engine: ChartEngine,
        event_rx: Receiver<DeskEvent>,
        log_rx: Receiver<String>,
    ) -> Self {
        Self {
            command_tx,
            engine,
            event_rx,
            log_rx,
        }
    }

    /// Poll for the next available event from any channel. Non-blocking;
    /// logs drain first since they are the highest-volume stream.
    pub fn poll_next(&mut self) -> Option<DeskEvent> {
        if let Ok(line) = self.log_rx.try_recv() {
            return Some(DeskEvent::Log(line));
        }
        self.event_rx.try_recv().ok()
    }

    // --- Command methods ---

    pub fn request_prediction(&self, request: PredictionRequest) -> Result<()> {
        self.send(DeskCommand::Predict(request))
    }

    pub fn refresh_model_status(&self) -> Result<()> {
        self.send(DeskCommand::RefreshModelStatus)
    }

    pub fn refresh_model_catalog(&self) -> Result<()> {
        self.send(DeskCommand::RefreshModelCatalog)
    }

    pub fn load_model(&self, model_key: impl Into<String>) -> Result<()> {
        self.send(DeskCommand::LoadModel {
            model_key: model_key.into(),
        })
    }

    pub fn retry_chart_engine(&self) -> Result<()> {
        self.send(DeskCommand::BootstrapChartEngine)
    }

    pub fn engine(&self) -> ChartEngine {
        self.engine.clone()
    }

    fn send(&self, command: DeskCommand) -> Result<()> {
        self.command_tx
            .try_send(command)
            .map_err(|e| anyhow::anyhow!("Failed to send desk command: {}", e))
    }
}
