use crate::application::chart_engine::ChartEngine;
use crate::application::fetcher::{FetchOutcome, PredictionFetcher};
use crate::config::{Config, Mode};
use crate::domain::errors::PredictionError;
use crate::domain::models::{LoadModelRequest, ModelCatalog, ModelStatus};
use crate::domain::ports::{ChartAssetLoader, PredictionService};
use crate::domain::prediction::{PredictionRequest, PredictionResponse};
use crate::infrastructure::assets::FsChartAssetLoader;
use crate::infrastructure::kronos::KronosPredictionService;
use crate::infrastructure::mock::MockPredictionService;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Commands the UI sends to the background worker.
#[derive(Debug)]
pub enum DeskCommand {
    Predict(PredictionRequest),
    RefreshModelStatus,
    RefreshModelCatalog,
    LoadModel { model_key: String },
    BootstrapChartEngine,
}

/// Events the worker pushes back to the UI. Drained non-blockingly once per
/// frame.
#[derive(Debug, Clone)]
pub enum DeskEvent {
    Log(String),
    PredictionStarted {
        seq: u64,
        ticker: String,
    },
    PredictionCompleted {
        seq: u64,
        response: Arc<PredictionResponse>,
    },
    PredictionFailed {
        seq: u64,
        error: PredictionError,
    },
    PredictionCoalesced {
        ticker: String,
    },
    ModelStatus(ModelStatus),
    ModelCatalog(ModelCatalog),
    ModelLoaded {
        message: String,
    },
}

/// Async half of the desk. Owns the fetcher and the service; every command
/// handler runs as its own task so a slow prediction never blocks discovery
/// commands.
pub struct DeskWorker {
    fetcher: Arc<PredictionFetcher>,
    service: Arc<dyn PredictionService>,
    engine: ChartEngine,
    asset_loader: Arc<dyn ChartAssetLoader>,
    event_tx: crossbeam_channel::Sender<DeskEvent>,
    command_rx: mpsc::Receiver<DeskCommand>,
}

impl DeskWorker {
    pub fn new(
        service: Arc<dyn PredictionService>,
        asset_loader: Arc<dyn ChartAssetLoader>,
        engine: ChartEngine,
        event_tx: crossbeam_channel::Sender<DeskEvent>,
        command_rx: mpsc::Receiver<DeskCommand>,
    ) -> Self {
        Self {
            fetcher: Arc::new(PredictionFetcher::new(Arc::clone(&service))),
            service,
            engine,
            asset_loader,
            event_tx,
            command_rx,
        }
    }

    /// Wires the service and asset loader the configuration asks for.
    pub fn from_config(
        config: &Config,
        engine: ChartEngine,
        event_tx: crossbeam_channel::Sender<DeskEvent>,
        command_rx: mpsc::Receiver<DeskCommand>,
    ) -> Result<Self> {
        let service: Arc<dyn PredictionService> = match config.mode {
            Mode::Kronos => Arc::new(KronosPredictionService::new(
                config.kronos_base_url.clone(),
                config.request_timeout,
            )),
            Mode::Mock => Arc::new(MockPredictionService::new(config.mock_latency)),
        };
        let asset_loader = Arc::new(FsChartAssetLoader::new(config.chart_theme_path.clone()));
        Ok(Self::new(
            service,
            asset_loader,
            engine,
            event_tx,
            command_rx,
        ))
    }

    /// Runs until the command channel closes. Startup performs read-only
    /// discovery and the engine bootstrap; it never issues a prediction.
    pub async fn run(mut self) {
        info!("desk worker started");
        self.engine.bootstrap(Arc::clone(&self.asset_loader));
        self.refresh_model_status();
        self.refresh_model_catalog();

        while let Some(command) = self.command_rx.recv().await {
            self.handle(command);
        }
        info!("desk worker stopped");
    }

    fn handle(&self, command: DeskCommand) {
        match command {
            DeskCommand::Predict(request) => self.predict(request),
            DeskCommand::RefreshModelStatus => self.refresh_model_status(),
            DeskCommand::RefreshModelCatalog => self.refresh_model_catalog(),
            DeskCommand::LoadModel { model_key } => self.load_model(model_key),
            DeskCommand::BootstrapChartEngine => {
                if !self.engine.bootstrap(Arc::clone(&self.asset_loader)) {
                    warn!("chart engine bootstrap requested but already started");
                }
            }
        }
    }

    fn predict(&self, request: PredictionRequest) {
        let Some(ticket) = self.fetcher.try_begin(&request) else {
            self.emit(DeskEvent::PredictionCoalesced {
                ticker: request.ticker.clone(),
            });
            return;
        };

        self.emit(DeskEvent::PredictionStarted {
            seq: ticket.seq,
            ticker: request.ticker.clone(),
        });

        let fetcher = Arc::clone(&self.fetcher);
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            let event = match fetcher.run(ticket, &request).await {
                FetchOutcome::Completed { seq, response } => {
                    DeskEvent::PredictionCompleted { seq, response }
                }
                FetchOutcome::Failed { seq, error } => DeskEvent::PredictionFailed { seq, error },
                // try_begin already handed out the ticket, run never coalesces
                FetchOutcome::Coalesced => return,
            };
            let _ = event_tx.send(event);
        });
    }

    fn refresh_model_status(&self) {
        let service = Arc::clone(&self.service);
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            match service.model_status().await {
                Ok(status) => {
                    let _ = event_tx.send(DeskEvent::ModelStatus(status));
                }
                Err(err) => warn!("model status refresh failed: {err}"),
            }
        });
    }

    fn refresh_model_catalog(&self) {
        let service = Arc::clone(&self.service);
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            match service.available_models().await {
                Ok(catalog) => {
                    let _ = event_tx.send(DeskEvent::ModelCatalog(catalog));
                }
                Err(err) => warn!("model catalog refresh failed: {err}"),
            }
        });
    }

    fn load_model(&self, model_key: String) {
        let service = Arc::clone(&self.service);
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            match service.load_model(&LoadModelRequest::cpu(model_key)).await {
                Ok(message) => {
                    let _ = event_tx.send(DeskEvent::ModelLoaded { message });
                    // The loaded model changes the status line; refresh it.
                    match service.model_status().await {
                        Ok(status) => {
                            let _ = event_tx.send(DeskEvent::ModelStatus(status));
                        }
                        Err(err) => warn!("model status refresh failed: {err}"),
                    }
                }
                Err(err) => {
                    let _ = event_tx.send(DeskEvent::Log(format!("model load failed: {err}")));
                }
            }
        });
    }

    fn emit(&self, event: DeskEvent) {
        let _ = self.event_tx.send(event);
    }
}
