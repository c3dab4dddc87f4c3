use std::sync::{Arc, Mutex};

use symptom_core::{CheckerError, NormalizedHistoryEntry, SymptomBackendRef, normalize_history};
use tracing::{debug, info, instrument};

use crate::in_flight::InFlightGuard;
use crate::output::{HistoryView, render_history};
use crate::surface::HistorySurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryState {
    Idle,
    Loading,
    Populated(usize),
    Empty,
    Error,
}

/// How one `load_history` ended
#[derive(Debug)]
pub enum HistoryOutcome {
    Populated(Vec<NormalizedHistoryEntry>),
    Empty,
    /// The failure was logged; the region shows the fixed error placeholder
    Error(CheckerError),
    /// A newer load (or a close) happened first; the result was dropped
    Superseded,
}

/// Owns the fetch-history lifecycle and the history region
pub struct HistoryController {
    backend: SymptomBackendRef,
    surface: Arc<dyn HistorySurface>,
    in_flight: InFlightGuard,
    state: Mutex<HistoryState>,
}

impl HistoryController {
    pub fn new(backend: SymptomBackendRef, surface: Arc<dyn HistorySurface>) -> Self {
        Self {
            backend,
            surface,
            in_flight: InFlightGuard::new(),
            state: Mutex::new(HistoryState::Idle),
        }
    }

    pub fn state(&self) -> HistoryState {
        self.state
            .lock()
            .map(|state| *state)
            .unwrap_or(HistoryState::Idle)
    }

    fn set_state(&self, next: HistoryState) {
        if let Ok(mut state) = self.state.lock() {
            *state = next;
        }
    }

    /// Fetches history and renders it, one normalized entry per record.
    ///
    /// Always restarts at `Loading`. Only the most recent call renders its result.
    #[instrument(skip(self))]
    pub async fn load_history(&self) -> HistoryOutcome {
        let ticket = self.in_flight.begin();
        self.set_state(HistoryState::Loading);
        self.surface.show(&HistoryView::Loading);

        let result = self.backend.fetch_history().await;

        if !self.in_flight.is_current(ticket) {
            debug!("Dropping result of superseded history fetch");
            return HistoryOutcome::Superseded;
        }

        match result {
            Ok(response) => {
                let records = response.history.unwrap_or_default();
                if records.is_empty() {
                    info!("No history recorded");
                    self.set_state(HistoryState::Empty);
                    self.surface.show(&HistoryView::Empty);
                    return HistoryOutcome::Empty;
                }

                let entries = normalize_history(&records);
                info!(records = entries.len(), "Loaded history");
                self.set_state(HistoryState::Populated(entries.len()));
                self.surface.show(&render_history(&entries));
                HistoryOutcome::Populated(entries)
            }
            Err(err) => {
                match &err {
                    CheckerError::Backend { status_code, .. } => {
                        info!(status_code, error = %err, "History rejected by backend")
                    }
                    _ => debug!(error = %err, "Failed to load history"),
                }
                self.set_state(HistoryState::Error);
                self.surface.show(&HistoryView::Error);
                HistoryOutcome::Error(err)
            }
        }
    }

    /// Drops any pending fetch result and returns to `Idle`
    pub fn cancel(&self) {
        self.in_flight.invalidate();
        self.set_state(HistoryState::Idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{HISTORY_EMPTY_MESSAGE, HISTORY_ERROR_MESSAGE, HistoryBlock};
    use crate::surface::testing::RecordingHistorySurface;
    use crate::testing::{ScriptedBackend, history, settle};
    use serde_json::json;
    use symptom_core::{CONDITIONS_PLACEHOLDER, HistoryResponse};

    fn controller() -> (
        Arc<HistoryController>,
        Arc<ScriptedBackend>,
        Arc<RecordingHistorySurface>,
    ) {
        let backend = Arc::new(ScriptedBackend::new());
        let surface = Arc::new(RecordingHistorySurface::new());
        let controller = Arc::new(HistoryController::new(backend.clone(), surface.clone()));
        (controller, backend, surface)
    }

    fn blocks(view: Option<HistoryView>) -> Vec<HistoryBlock> {
        match view {
            Some(HistoryView::Entries(blocks)) => blocks,
            other => panic!("expected entries, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_mixed_payload_shapes() {
        let (controller, backend, surface) = controller();
        backend.push_history(Ok(history(vec![
            json!({
                "id": 3,
                "query_timestamp": "2025-10-04 10:00:00",
                "symptoms_input": "fever, chills",
                "llm_response_json": {"possible_conditions": ["flu", "cold"]}
            }),
            json!({
                "id": 2,
                "symptoms_input": "sneezing",
                "llm_response_json": "{\"possible_conditions\":[\"flu\"]}"
            }),
            json!({
                "id": 1,
                "query_timestamp": "2025-09-30 21:15:00",
                "symptoms_input": "tired",
                "llm_response_json": "not json"
            }),
            json!({"id": 0, "symptoms_input": "old", "llm_response_json": null}),
        ])));

        let outcome = controller.load_history().await;
        assert!(matches!(outcome, HistoryOutcome::Populated(ref entries) if entries.len() == 4));
        assert_eq!(controller.state(), HistoryState::Populated(4));

        let views = surface.views();
        assert_eq!(views[0], HistoryView::Loading);
        let shown = blocks(surface.current());
        let summaries: Vec<&str> = shown.iter().map(|b| b.conditions.as_str()).collect();
        assert_eq!(
            summaries,
            vec!["flu, cold", "flu", CONDITIONS_PLACEHOLDER, CONDITIONS_PLACEHOLDER]
        );
        assert_eq!(shown[1].timestamp, "Time unavailable");
        let ids: Vec<&str> = shown.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "2", "1", "0"]);
    }

    #[tokio::test]
    async fn test_empty_and_missing_history() {
        let (controller, backend, surface) = controller();
        backend.push_history(Ok(history(vec![])));
        backend.push_history(Ok(HistoryResponse { history: None }));

        for _ in 0..2 {
            let outcome = controller.load_history().await;
            assert!(matches!(outcome, HistoryOutcome::Empty));
            assert_eq!(controller.state(), HistoryState::Empty);
            let current = surface.current().unwrap();
            assert_eq!(current, HistoryView::Empty);
            assert_eq!(current.placeholder(), Some(HISTORY_EMPTY_MESSAGE));
        }
    }

    #[tokio::test]
    async fn test_transport_failure_shows_error_placeholder() {
        let (controller, backend, surface) = controller();
        backend.push_history(Err(CheckerError::Transport(
            "Failed to send request: connection refused".to_string(),
        )));

        let outcome = controller.load_history().await;

        assert!(matches!(outcome, HistoryOutcome::Error(CheckerError::Transport(_))));
        assert_eq!(controller.state(), HistoryState::Error);
        let current = surface.current().unwrap();
        assert_eq!(current, HistoryView::Error);
        assert_eq!(current.placeholder(), Some(HISTORY_ERROR_MESSAGE));
    }

    #[tokio::test]
    async fn test_backend_failure_is_error_not_empty() {
        let (controller, backend, surface) = controller();
        backend.push_history(Err(CheckerError::Backend {
            status_code: 500,
            detail: Some("database unavailable".to_string()),
        }));

        controller.load_history().await;
        assert_eq!(surface.current(), Some(HistoryView::Error));
    }

    #[tokio::test]
    async fn test_reopen_restarts_at_loading() {
        let (controller, backend, surface) = controller();
        backend.push_history(Err(CheckerError::Transport("down".to_string())));
        let reply = backend.gate_history();

        controller.load_history().await;
        assert_eq!(controller.state(), HistoryState::Error);

        let task = tokio::spawn({
            let controller = controller.clone();
            async move { controller.load_history().await }
        });
        settle(|| backend.history_calls() == 2).await;
        assert_eq!(controller.state(), HistoryState::Loading);
        assert_eq!(surface.current(), Some(HistoryView::Loading));

        reply.send(Ok(history(vec![]))).unwrap();
        task.await.unwrap();
        assert_eq!(controller.state(), HistoryState::Empty);
    }

    #[tokio::test]
    async fn test_only_latest_load_is_rendered() {
        let (controller, backend, surface) = controller();
        let first_reply = backend.gate_history();
        let second_reply = backend.gate_history();

        let first = tokio::spawn({
            let controller = controller.clone();
            async move { controller.load_history().await }
        });
        settle(|| backend.history_calls() == 1).await;
        let second = tokio::spawn({
            let controller = controller.clone();
            async move { controller.load_history().await }
        });
        settle(|| backend.history_calls() == 2).await;

        second_reply
            .send(Ok(history(vec![json!({
                "id": "new",
                "symptoms_input": "latest",
                "llm_response_json": {"possible_conditions": ["Sinusitis"]}
            })])))
            .unwrap();
        assert!(matches!(second.await.unwrap(), HistoryOutcome::Populated(_)));

        first_reply
            .send(Ok(history(vec![json!({
                "id": "stale",
                "symptoms_input": "earlier",
                "llm_response_json": {"possible_conditions": ["Cold"]}
            })])))
            .unwrap();
        assert!(matches!(first.await.unwrap(), HistoryOutcome::Superseded));

        let rendered: Vec<HistoryView> = surface
            .views()
            .into_iter()
            .filter(|view| matches!(view, HistoryView::Entries(_)))
            .collect();
        assert_eq!(rendered.len(), 1);
        let shown = blocks(surface.current());
        assert_eq!(shown[0].id, "new");
        assert_eq!(shown[0].conditions, "Sinusitis");
        assert_eq!(controller.state(), HistoryState::Populated(1));
    }

    #[tokio::test]
    async fn test_cancel_drops_pending_result() {
        let (controller, backend, surface) = controller();
        let reply = backend.gate_history();

        let task = tokio::spawn({
            let controller = controller.clone();
            async move { controller.load_history().await }
        });
        settle(|| backend.history_calls() == 1).await;
        controller.cancel();

        reply.send(Ok(history(vec![json!({"id": 1})]))).unwrap();
        assert!(matches!(task.await.unwrap(), HistoryOutcome::Superseded));
        assert_eq!(controller.state(), HistoryState::Idle);
        assert_eq!(surface.views(), vec![HistoryView::Loading]);
    }
}
