use async_trait::async_trait;
use kronoscope::application::chart_engine::{ChartEngine, EngineState};
use kronoscope::application::worker::{DeskCommand, DeskEvent, DeskWorker};
use kronoscope::domain::chart_assets::{ChartAssets, PlotPalette};
use kronoscope::domain::errors::PredictionError;
use kronoscope::domain::models::{LoadModelRequest, ModelCatalog, ModelStatus};
use kronoscope::domain::ports::{ChartAssetLoader, PredictionService};
use kronoscope::domain::prediction::{PredictionRequest, PredictionResponse};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Default)]
struct CountingService {
    predictions: AtomicUsize,
}

impl CountingService {
    fn predictions(&self) -> usize {
        self.predictions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PredictionService for CountingService {
    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, PredictionError> {
        self.predictions.fetch_add(1, Ordering::SeqCst);
        Ok(PredictionResponse {
            success: true,
            prediction_type: format!("Kronos prediction for {}", request.ticker),
            chart: None,
            prediction_results: vec![],
            actual_data: vec![],
            has_comparison: false,
            time_range: None,
            message: "done".to_string(),
        })
    }

    async fn model_status(&self) -> Result<ModelStatus, PredictionError> {
        Ok(ModelStatus {
            available: true,
            loaded: false,
            message: "available".to_string(),
            current_model: None,
        })
    }

    async fn available_models(&self) -> Result<ModelCatalog, PredictionError> {
        Ok(ModelCatalog::default())
    }

    async fn load_model(&self, _request: &LoadModelRequest) -> Result<String, PredictionError> {
        Ok("loaded".to_string())
    }
}

fn test_palette() -> PlotPalette {
    PlotPalette {
        background: [10, 12, 16],
        grid: [48, 54, 61],
        text: [240, 246, 252],
        candle_up: [38, 166, 154],
        candle_down: [239, 83, 80],
        predicted_up: [102, 187, 106],
        predicted_down: [255, 112, 67],
        actual_up: [255, 152, 0],
        actual_down: [244, 67, 54],
        accent: [41, 121, 255],
    }
}

struct StaticAssetLoader;

#[async_trait]
impl ChartAssetLoader for StaticAssetLoader {
    async fn load(&self) -> anyhow::Result<ChartAssets> {
        Ok(ChartAssets::new(test_palette(), test_palette()))
    }
}

async fn wait_event(
    rx: &crossbeam_channel::Receiver<DeskEvent>,
    what: &str,
    predicate: impl Fn(&DeskEvent) -> bool,
) -> DeskEvent {
    for _ in 0..400 {
        if let Ok(event) = rx.try_recv() {
            if predicate(&event) {
                return event;
            }
            continue;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("timed out waiting for {what}");
}

#[tokio::test]
async fn worker_startup_never_issues_a_prediction() {
    let service = Arc::new(CountingService::default());
    let engine = ChartEngine::new();
    let (command_tx, command_rx) = tokio::sync::mpsc::channel(8);
    let (event_tx, event_rx) = crossbeam_channel::unbounded();

    let worker = DeskWorker::new(
        Arc::clone(&service) as Arc<dyn PredictionService>,
        Arc::new(StaticAssetLoader),
        engine.clone(),
        event_tx,
        command_rx,
    );
    tokio::spawn(worker.run());

    // Startup performs discovery and the engine bootstrap only.
    wait_event(&event_rx, "model status", |e| {
        matches!(e, DeskEvent::ModelStatus(_))
    })
    .await;
    for _ in 0..400 {
        if engine.state() == EngineState::Ready {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(engine.state(), EngineState::Ready);
    assert_eq!(service.predictions(), 0, "mounting must not fetch");

    // Only the explicit trigger fetches, exactly once.
    let request = PredictionRequest::for_ticker("AAPL");
    command_tx
        .send(DeskCommand::Predict(request))
        .await
        .unwrap();

    let started = wait_event(&event_rx, "prediction start", |e| {
        matches!(e, DeskEvent::PredictionStarted { .. })
    })
    .await;
    match started {
        DeskEvent::PredictionStarted { seq, ticker } => {
            assert_eq!(seq, 1);
            assert_eq!(ticker, "AAPL");
        }
        _ => unreachable!(),
    }

    let completed = wait_event(&event_rx, "prediction completion", |e| {
        matches!(e, DeskEvent::PredictionCompleted { .. })
    })
    .await;
    match completed {
        DeskEvent::PredictionCompleted { seq, response } => {
            assert_eq!(seq, 1);
            assert!(response.success);
        }
        _ => unreachable!(),
    }
    assert_eq!(service.predictions(), 1);
}

#[tokio::test]
async fn load_model_reports_and_refreshes_status() {
    let service = Arc::new(CountingService::default());
    let engine = ChartEngine::new();
    let (command_tx, command_rx) = tokio::sync::mpsc::channel(8);
    let (event_tx, event_rx) = crossbeam_channel::unbounded();

    let worker = DeskWorker::new(
        Arc::clone(&service) as Arc<dyn PredictionService>,
        Arc::new(StaticAssetLoader),
        engine,
        event_tx,
        command_rx,
    );
    tokio::spawn(worker.run());

    command_tx
        .send(DeskCommand::LoadModel {
            model_key: "kronos-mini".to_string(),
        })
        .await
        .unwrap();

    let loaded = wait_event(&event_rx, "model load confirmation", |e| {
        matches!(e, DeskEvent::ModelLoaded { .. })
    })
    .await;
    match loaded {
        DeskEvent::ModelLoaded { message } => assert_eq!(message, "loaded"),
        _ => unreachable!(),
    }
    wait_event(&event_rx, "status refresh after load", |e| {
        matches!(e, DeskEvent::ModelStatus(_))
    })
    .await;

    assert_eq!(service.predictions(), 0);
}
