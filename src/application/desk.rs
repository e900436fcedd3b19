use crate::application::client::DeskClient;
use crate::application::outcome::{plan_render, RenderPlan};
use crate::application::params::ParameterStore;
use crate::application::plot::ChartView;
use crate::application::worker::DeskEvent;
use crate::domain::chart_assets::Theme;
use crate::domain::errors::PredictionError;
use crate::domain::models::{ModelCatalog, ModelStatus};
use crate::domain::prediction::PredictionResponse;
use crate::infrastructure::i18n::I18nService;
use std::sync::Arc;

/// The prediction the desk currently shows.
#[derive(Debug, Clone)]
pub struct CurrentPrediction {
    pub seq: u64,
    pub response: Arc<PredictionResponse>,
    pub plan: RenderPlan,
}

/// Applies fetch events in trigger order: completions older than the newest
/// accepted trigger are discarded silently, so a superseded exchange can
/// never repaint the view.
#[derive(Debug, Default)]
pub struct PredictionViewState {
    latest_trigger: Option<u64>,
    in_flight: bool,
    pub current: Option<CurrentPrediction>,
    pub transport_error: Option<String>,
}

impl PredictionViewState {
    pub fn on_started(&mut self, seq: u64) {
        self.latest_trigger = Some(seq);
        self.in_flight = true;
        self.transport_error = None;
    }

    /// Returns whether the completion was applied (false when stale).
    pub fn on_completed(&mut self, seq: u64, response: Arc<PredictionResponse>) -> bool {
        if self.is_stale(seq) {
            return false;
        }
        self.in_flight = false;
        self.transport_error = None;
        self.current = Some(CurrentPrediction {
            seq,
            plan: plan_render(&response),
            response,
        });
        true
    }

    pub fn on_failed(&mut self, seq: u64, error: &PredictionError) -> bool {
        if self.is_stale(seq) {
            return false;
        }
        self.in_flight = false;
        self.transport_error = Some(error.to_string());
        true
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    fn is_stale(&self, seq: u64) -> bool {
        self.latest_trigger.is_some_and(|latest| seq < latest)
    }
}

/// UI-side state of the application: parameters, the event-driven view
/// state, and everything the panels render from.
pub struct Desk {
    pub client: DeskClient,
    pub params: ParameterStore,
    pub i18n: I18nService,
    pub theme: Theme,
    pub view: PredictionViewState,
    pub chart: ChartView,
    pub model_status: Option<ModelStatus>,
    pub catalog: Option<ModelCatalog>,
    pub feed: Vec<(String, String)>,
}

impl Desk {
    pub fn new(client: DeskClient, i18n: I18nService, theme: Theme) -> Self {
        Self {
            client,
            params: ParameterStore::default(),
            i18n,
            theme,
            view: PredictionViewState::default(),
            chart: ChartView::new(),
            model_status: None,
            catalog: None,
            feed: Vec::new(),
        }
    }

    /// Drains worker events. Called once per frame before rendering.
    pub fn pump_events(&mut self) {
        while let Some(event) = self.client.poll_next() {
            match event {
                DeskEvent::Log(line) => self.push_feed("System", line),
                DeskEvent::PredictionStarted { seq, ticker } => {
                    self.view.on_started(seq);
                    self.push_feed("Desk", format!("predicting {ticker}..."));
                }
                DeskEvent::PredictionCompleted { seq, response } => {
                    if self.view.on_completed(seq, response) {
                        // New data invalidates the plot; it rebuilds on the
                        // next frame once the engine hands out a surface.
                        self.chart.clear();
                    }
                }
                DeskEvent::PredictionFailed { seq, error } => {
                    if self.view.on_failed(seq, &error) {
                        self.push_feed("Desk", error.to_string());
                    }
                }
                DeskEvent::PredictionCoalesced { ticker } => {
                    self.push_feed("Desk", format!("{ticker}: identical request in flight"));
                }
                DeskEvent::ModelStatus(status) => self.model_status = Some(status),
                DeskEvent::ModelCatalog(catalog) => self.catalog = Some(catalog),
                DeskEvent::ModelLoaded { message } => self.push_feed("Desk", message),
            }
        }

        if self.feed.len() > 1000 {
            self.feed.drain(0..100);
        }
    }

    /// The explicit trigger. Parameter edits never call this; only the Run
    /// control does.
    pub fn run_prediction(&mut self) {
        match self.params.snapshot() {
            Ok(request) => {
                if let Err(err) = self.client.request_prediction(request) {
                    self.push_feed("Desk", err.to_string());
                }
            }
            Err(err) => self.push_feed("Desk", err.to_string()),
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        // The chart rebuilds with freshly derived colors on the next frame.
        self.chart.clear();
    }

    fn push_feed(&mut self, sender: &str, line: String) {
        self.feed.push((sender.to_string(), line));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::prediction::PredictionResponse;

    fn response(message: &str) -> Arc<PredictionResponse> {
        Arc::new(PredictionResponse {
            success: true,
            prediction_type: String::new(),
            chart: None,
            prediction_results: vec![],
            actual_data: vec![],
            has_comparison: false,
            time_range: None,
            message: message.to_string(),
        })
    }

    #[test]
    fn stale_completion_is_discarded() {
        let mut view = PredictionViewState::default();
        view.on_started(1);
        view.on_started(2);

        assert!(view.on_completed(2, response("newer")));
        assert!(!view.on_completed(1, response("stale")));

        let current = view.current.expect("current prediction");
        assert_eq!(current.seq, 2);
        assert_eq!(current.response.message, "newer");
    }

    #[test]
    fn stale_failure_does_not_clear_newer_result() {
        let mut view = PredictionViewState::default();
        view.on_started(1);
        view.on_started(2);
        assert!(view.on_completed(2, response("newer")));

        assert!(!view.on_failed(
            1,
            &PredictionError::Transport {
                reason: "timeout".to_string()
            }
        ));
        assert!(view.transport_error.is_none());
        assert!(view.current.is_some());
    }

    #[test]
    fn transport_failure_sets_error_state() {
        let mut view = PredictionViewState::default();
        view.on_started(1);
        assert!(view.on_failed(
            1,
            &PredictionError::Status { status: 502 }
        ));
        assert!(!view.in_flight());
        assert!(view.transport_error.as_deref().unwrap().contains("502"));
    }
}
