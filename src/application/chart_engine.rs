use crate::domain::chart_assets::ChartAssets;
use crate::domain::ports::ChartAssetLoader;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{error, info};

/// Readiness of the shared chart engine. Never transitions backward except
/// `Loading -> Unloaded` on a failed bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Unloaded,
    Loading,
    Ready,
}

/// Delivered exactly once to each waiter registered before readiness.
#[derive(Debug, Clone)]
pub enum EngineSignal {
    Ready(Arc<ChartAssets>),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("chart engine is not ready")]
pub struct EngineNotReady;

struct EngineInner {
    state: EngineState,
    assets: Option<Arc<ChartAssets>>,
    waiters: Vec<oneshot::Sender<EngineSignal>>,
}

struct EngineShared {
    inner: Mutex<EngineInner>,
    live_surfaces: AtomicUsize,
    surface_watermark: AtomicUsize,
}

impl EngineShared {
    fn finish(&self, result: Result<Arc<ChartAssets>, String>) {
        let (signal, waiters) = {
            let mut inner = self.inner.lock().expect("engine state poisoned");
            let signal = match result {
                Ok(assets) => {
                    inner.state = EngineState::Ready;
                    inner.assets = Some(Arc::clone(&assets));
                    EngineSignal::Ready(assets)
                }
                Err(reason) => {
                    inner.state = EngineState::Unloaded;
                    EngineSignal::Failed(reason)
                }
            };
            (signal, std::mem::take(&mut inner.waiters))
        };

        for waiter in waiters {
            let _ = waiter.send(signal.clone());
        }
    }
}

/// Handle to the one initialization gate every chart view goes through.
/// Clones share state; there is one gate per process.
///
/// Assets load at most once no matter how many views mount concurrently. A
/// failed load is logged, notifies waiters, and returns the gate to
/// `Unloaded`; nothing retries on its own, the host must explicitly
/// bootstrap again. Plot surfaces can only be acquired once `Ready`.
#[derive(Clone)]
pub struct ChartEngine {
    shared: Arc<EngineShared>,
}

impl ChartEngine {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(EngineShared {
                inner: Mutex::new(EngineInner {
                    state: EngineState::Unloaded,
                    assets: None,
                    waiters: Vec::new(),
                }),
                live_surfaces: AtomicUsize::new(0),
                surface_watermark: AtomicUsize::new(0),
            }),
        }
    }

    pub fn state(&self) -> EngineState {
        self.shared
            .inner
            .lock()
            .expect("engine state poisoned")
            .state
    }

    pub fn assets(&self) -> Option<Arc<ChartAssets>> {
        self.shared
            .inner
            .lock()
            .expect("engine state poisoned")
            .assets
            .clone()
    }

    /// Registers for the readiness signal. If the engine is already ready the
    /// receiver resolves immediately; otherwise it resolves exactly once when
    /// the in-flight (or a future) bootstrap settles.
    pub fn subscribe(&self) -> oneshot::Receiver<EngineSignal> {
        let (tx, rx) = oneshot::channel();
        let mut inner = self.shared.inner.lock().expect("engine state poisoned");
        match (&inner.state, &inner.assets) {
            (EngineState::Ready, Some(assets)) => {
                let _ = tx.send(EngineSignal::Ready(Arc::clone(assets)));
            }
            _ => inner.waiters.push(tx),
        }
        rx
    }

    /// Starts loading unless a load already ran or is running. Returns
    /// whether this call started one.
    pub fn bootstrap(&self, loader: Arc<dyn ChartAssetLoader>) -> bool {
        {
            let mut inner = self.shared.inner.lock().expect("engine state poisoned");
            if inner.state != EngineState::Unloaded {
                return false;
            }
            inner.state = EngineState::Loading;
        }

        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            match loader.load().await {
                Ok(assets) => {
                    info!("chart engine ready");
                    shared.finish(Ok(Arc::new(assets)));
                }
                Err(err) => {
                    error!("chart engine bootstrap failed: {err:#}");
                    shared.finish(Err(err.to_string()));
                }
            }
        });
        true
    }

    /// Leases a plot surface. Only a ready engine hands them out, which is
    /// what stops any view from drawing before the assets exist.
    pub fn acquire_surface(&self) -> Result<RenderSurface, EngineNotReady> {
        if self.state() != EngineState::Ready {
            return Err(EngineNotReady);
        }
        let live = self.shared.live_surfaces.fetch_add(1, Ordering::SeqCst) + 1;
        self.shared
            .surface_watermark
            .fetch_max(live, Ordering::SeqCst);
        Ok(RenderSurface {
            shared: Arc::clone(&self.shared),
        })
    }

    /// Surfaces currently alive. Zero once every chart view is torn down.
    pub fn live_surfaces(&self) -> usize {
        self.shared.live_surfaces.load(Ordering::SeqCst)
    }

    /// Most surfaces ever alive at once. Stays at one when views release
    /// their old surface before acquiring a replacement.
    pub fn surface_watermark(&self) -> usize {
        self.shared.surface_watermark.load(Ordering::SeqCst)
    }
}

impl Default for ChartEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ChartEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartEngine")
            .field("state", &self.state())
            .finish()
    }
}

/// Lease on the engine for one live plot instance. Dropping it releases the
/// surface.
pub struct RenderSurface {
    shared: Arc<EngineShared>,
}

impl Drop for RenderSurface {
    fn drop(&mut self) {
        self.shared.live_surfaces.fetch_sub(1, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for RenderSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderSurface").finish()
    }
}
