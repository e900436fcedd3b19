use async_trait::async_trait;
use kronoscope::application::chart_engine::{ChartEngine, EngineSignal, EngineState};
use kronoscope::application::plot::ChartView;
use kronoscope::domain::chart_assets::{ChartAssets, PlotPalette, Theme};
use kronoscope::domain::chart_spec::parse_chart_spec;
use kronoscope::domain::ports::ChartAssetLoader;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

fn palette(gray: u8) -> PlotPalette {
    PlotPalette {
        background: [gray; 3],
        grid: [gray; 3],
        text: [gray; 3],
        candle_up: [gray; 3],
        candle_down: [gray; 3],
        predicted_up: [gray; 3],
        predicted_down: [gray; 3],
        actual_up: [gray; 3],
        actual_down: [gray; 3],
        accent: [gray; 3],
    }
}

fn assets() -> ChartAssets {
    ChartAssets::new(palette(10), palette(240))
}

/// Loader that blocks until the test releases its gate, optionally failing.
struct GatedLoader {
    gate: Mutex<Option<oneshot::Receiver<Result<(), String>>>>,
}

impl GatedLoader {
    fn new() -> (Arc<Self>, oneshot::Sender<Result<(), String>>) {
        let (tx, rx) = oneshot::channel();
        (
            Arc::new(Self {
                gate: Mutex::new(Some(rx)),
            }),
            tx,
        )
    }
}

#[async_trait]
impl ChartAssetLoader for GatedLoader {
    async fn load(&self) -> anyhow::Result<ChartAssets> {
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate
            && let Ok(Err(reason)) = gate.await
        {
            anyhow::bail!(reason);
        }
        Ok(assets())
    }
}

struct InstantLoader;

#[async_trait]
impl ChartAssetLoader for InstantLoader {
    async fn load(&self) -> anyhow::Result<ChartAssets> {
        Ok(assets())
    }
}

async fn wait_ready(engine: &ChartEngine) {
    for _ in 0..400 {
        if engine.state() == EngineState::Ready {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    panic!("engine never became ready");
}

#[tokio::test]
async fn waiters_registered_while_loading_each_get_one_ready_signal() {
    let engine = ChartEngine::new();
    let (loader, gate) = GatedLoader::new();

    // No drawing before readiness.
    assert!(engine.acquire_surface().is_err());

    let first = engine.subscribe();
    let second = engine.subscribe();

    assert!(engine.bootstrap(loader.clone()));
    assert_eq!(engine.state(), EngineState::Loading);
    // A second bootstrap while loading must not start another load.
    assert!(!engine.bootstrap(loader.clone()));
    assert!(engine.acquire_surface().is_err());

    gate.send(Ok(())).unwrap();

    let first = tokio_test::assert_ok!(first.await);
    assert!(matches!(first, EngineSignal::Ready(_)));
    let second = tokio_test::assert_ok!(second.await);
    assert!(matches!(second, EngineSignal::Ready(_)));

    assert_eq!(engine.state(), EngineState::Ready);
    // Ready is terminal: no further load ever starts.
    assert!(!engine.bootstrap(loader));

    // Late subscribers resolve immediately.
    assert!(matches!(
        engine.subscribe().await.unwrap(),
        EngineSignal::Ready(_)
    ));
    assert!(engine.acquire_surface().is_ok());
}

#[tokio::test]
async fn failed_bootstrap_notifies_waiters_and_allows_explicit_retry() {
    let engine = ChartEngine::new();
    let (loader, gate) = GatedLoader::new();

    let waiter = engine.subscribe();
    assert!(engine.bootstrap(loader));
    gate.send(Err("palette catalog unreadable".to_string()))
        .unwrap();

    match waiter.await.unwrap() {
        EngineSignal::Failed(reason) => assert!(reason.contains("palette catalog")),
        EngineSignal::Ready(_) => panic!("load should have failed"),
    }

    // Failure leaves the gate unloaded; nothing retries on its own.
    for _ in 0..400 {
        if engine.state() == EngineState::Unloaded {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    assert_eq!(engine.state(), EngineState::Unloaded);
    assert!(engine.acquire_surface().is_err());

    // An explicit retry may bootstrap again.
    assert!(engine.bootstrap(Arc::new(InstantLoader)));
    wait_ready(&engine).await;
    assert!(engine.acquire_surface().is_ok());
}

#[tokio::test]
async fn chart_view_rebuilds_never_hold_two_surfaces() {
    let engine = ChartEngine::new();
    assert!(engine.bootstrap(Arc::new(InstantLoader)));
    wait_ready(&engine).await;

    let raw = serde_json::json!({
        "data": [{
            "type": "candlestick",
            "name": "Prediction",
            "x": ["2026-01-05", "2026-01-06"],
            "open": [10.0, 11.0],
            "high": [11.0, 12.0],
            "low": [9.0, 10.0],
            "close": [10.5, 11.5]
        }],
        "layout": {"height": 420}
    })
    .to_string();
    let spec = parse_chart_spec(&raw).unwrap();

    let mut view = ChartView::new();
    view.sync(1, &spec, Theme::Dark, &engine).unwrap();
    assert_eq!(engine.live_surfaces(), 1);

    // Same data, same theme: no rebuild.
    view.sync(1, &spec, Theme::Dark, &engine).unwrap();
    assert_eq!(engine.surface_watermark(), 1);

    // New data: old instance torn down before the replacement exists.
    view.sync(2, &spec, Theme::Dark, &engine).unwrap();
    assert_eq!(engine.live_surfaces(), 1);
    assert_eq!(engine.surface_watermark(), 1);

    // Theme change: full rebuild with freshly derived colors.
    view.sync(2, &spec, Theme::Light, &engine).unwrap();
    assert_eq!(engine.surface_watermark(), 1);
    assert_eq!(
        view.instance().unwrap().palette.background,
        [240, 240, 240]
    );

    drop(view);
    assert_eq!(engine.live_surfaces(), 0);
}

#[tokio::test]
async fn chart_view_cannot_build_before_readiness() {
    let engine = ChartEngine::new();
    let raw = serde_json::json!({
        "data": [{
            "type": "scatter", "name": "SMA",
            "x": ["2026-01-05"], "y": [10.0]
        }]
    })
    .to_string();
    let spec = parse_chart_spec(&raw).unwrap();

    let mut view = ChartView::new();
    assert!(view.sync(1, &spec, Theme::Dark, &engine).is_err());
    assert!(view.instance().is_none());
    assert_eq!(engine.live_surfaces(), 0);
}
