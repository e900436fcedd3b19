use crate::domain::errors::PredictionError;
use crate::domain::ports::PredictionService;
use crate::domain::prediction::{CacheKey, PredictionRequest, PredictionResponse};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// Result of one fetch attempt.
#[derive(Debug)]
pub enum FetchOutcome {
    Completed {
        seq: u64,
        response: Arc<PredictionResponse>,
    },
    Failed {
        seq: u64,
        error: PredictionError,
    },
    /// An exchange with the same cache key was already in flight; no second
    /// exchange was issued.
    Coalesced,
}

/// Token for an accepted trigger. The sequence number is monotonic in
/// trigger order and is what the cache and the UI use to discard stale
/// completions.
#[derive(Debug)]
pub struct FetchTicket {
    pub seq: u64,
    key: CacheKey,
}

#[derive(Debug, Clone)]
pub struct CachedPrediction {
    pub key: CacheKey,
    pub seq: u64,
    pub response: Arc<PredictionResponse>,
}

#[derive(Default)]
struct FetchState {
    next_seq: u64,
    in_flight: HashMap<CacheKey, u64>,
    cache: Option<CachedPrediction>,
}

/// Issues prediction exchanges and owns the one-slot response cache.
///
/// Guarantees:
/// - exactly one network exchange per accepted trigger, no automatic retry;
/// - at most one in-flight exchange per cache key (identical triggers
///   coalesce);
/// - a completed response enters the cache only if no newer trigger's
///   response is already there, so a slow stale exchange never clobbers a
///   newer result.
pub struct PredictionFetcher {
    service: Arc<dyn PredictionService>,
    state: Mutex<FetchState>,
}

impl PredictionFetcher {
    pub fn new(service: Arc<dyn PredictionService>) -> Self {
        Self {
            service,
            state: Mutex::new(FetchState::default()),
        }
    }

    /// Accepts a trigger unless an identical exchange is already in flight.
    pub fn try_begin(&self, request: &PredictionRequest) -> Option<FetchTicket> {
        let key = request.cache_key();
        let mut state = self.state.lock().expect("fetch state poisoned");
        if state.in_flight.contains_key(&key) {
            debug!("coalescing prediction trigger for {}", request.ticker);
            return None;
        }
        state.next_seq += 1;
        let seq = state.next_seq;
        state.in_flight.insert(key.clone(), seq);
        Some(FetchTicket { seq, key })
    }

    /// Runs the exchange for an accepted trigger.
    pub async fn run(&self, ticket: FetchTicket, request: &PredictionRequest) -> FetchOutcome {
        info!(
            "predicting {} (lookback {}, horizon {})",
            request.ticker, request.lookback, request.horizon
        );
        let result = self.service.predict(request).await;

        let mut state = self.state.lock().expect("fetch state poisoned");
        if state.in_flight.get(&ticket.key) == Some(&ticket.seq) {
            state.in_flight.remove(&ticket.key);
        }

        match result {
            Ok(response) => {
                let response = Arc::new(response);
                let superseded = state
                    .cache
                    .as_ref()
                    .is_some_and(|cached| cached.seq > ticket.seq);
                if superseded {
                    debug!(
                        "discarding prediction result for {}: superseded in flight",
                        request.ticker
                    );
                } else {
                    state.cache = Some(CachedPrediction {
                        key: ticket.key,
                        seq: ticket.seq,
                        response: Arc::clone(&response),
                    });
                }
                FetchOutcome::Completed {
                    seq: ticket.seq,
                    response,
                }
            }
            Err(error) => FetchOutcome::Failed {
                seq: ticket.seq,
                error,
            },
        }
    }

    /// Convenience wrapper: trigger and run in one call.
    pub async fn fetch(&self, request: &PredictionRequest) -> FetchOutcome {
        match self.try_begin(request) {
            Some(ticket) => self.run(ticket, request).await,
            None => FetchOutcome::Coalesced,
        }
    }

    /// Cached response for `key`, if it is the one the slot currently holds.
    pub fn cached(&self, key: &CacheKey) -> Option<Arc<PredictionResponse>> {
        let state = self.state.lock().expect("fetch state poisoned");
        state
            .cache
            .as_ref()
            .filter(|cached| &cached.key == key)
            .map(|cached| Arc::clone(&cached.response))
    }

    /// Whatever the slot holds, regardless of key.
    pub fn latest(&self) -> Option<CachedPrediction> {
        self.state
            .lock()
            .expect("fetch state poisoned")
            .cache
            .clone()
    }
}
