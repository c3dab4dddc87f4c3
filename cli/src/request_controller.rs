use std::sync::{Arc, Mutex};

use symptom_core::{
    CheckerError, EMPTY_SYMPTOMS_PROMPT, SymptomAnalysis, SymptomBackendRef,
};
use tracing::{debug, info, instrument};

use crate::in_flight::{InFlightGuard, Ticket};
use crate::output::render_analysis;
use crate::surface::ResultSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    Submitting,
}

/// How one `submit` ended
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The result was rendered
    Success(SymptomAnalysis),
    /// Nothing was rendered; the user was told why
    Failure(CheckerError),
    /// A newer submit started before this one resolved; its result was dropped
    Superseded,
}

/// Owns the submit-symptom-check lifecycle and the result region
pub struct RequestController {
    backend: SymptomBackendRef,
    surface: Arc<dyn ResultSurface>,
    in_flight: InFlightGuard,
    state: Mutex<RequestState>,
}

/// Restores the region on every exit path of the request holding `ticket`,
/// unless a newer request has taken it over.
struct BusyReset<'a> {
    controller: &'a RequestController,
    ticket: Ticket,
}

impl Drop for BusyReset<'_> {
    fn drop(&mut self) {
        if self.controller.in_flight.is_current(self.ticket) {
            self.controller.surface.clear_loading();
            self.controller.surface.set_submit_enabled(true);
            self.controller.set_state(RequestState::Idle);
        }
    }
}

impl RequestController {
    pub fn new(backend: SymptomBackendRef, surface: Arc<dyn ResultSurface>) -> Self {
        Self {
            backend,
            surface,
            in_flight: InFlightGuard::new(),
            state: Mutex::new(RequestState::Idle),
        }
    }

    pub fn state(&self) -> RequestState {
        self.state
            .lock()
            .map(|state| *state)
            .unwrap_or(RequestState::Idle)
    }

    fn set_state(&self, next: RequestState) {
        if let Ok(mut state) = self.state.lock() {
            *state = next;
        }
    }

    /// Validates `raw_text`, sends it and renders the triage result.
    ///
    /// Empty input is rejected before any network call. Once a request is
    /// issued, the loading indicator is cleared and the submit control is
    /// re-enabled however the request ends.
    #[instrument(skip(self, raw_text))]
    pub async fn submit(&self, raw_text: &str) -> SubmitOutcome {
        let symptoms = raw_text.trim();
        if symptoms.is_empty() {
            let err = CheckerError::Validation(EMPTY_SYMPTOMS_PROMPT.to_string());
            self.surface.notify(&err.user_message());
            return SubmitOutcome::Failure(err);
        }

        let ticket = self.in_flight.begin();
        self.set_state(RequestState::Submitting);
        self.surface.hide_analysis();
        self.surface.show_loading();
        self.surface.set_submit_enabled(false);
        let _reset = BusyReset {
            controller: self,
            ticket,
        };

        info!(symptoms_len = symptoms.len(), "Submitting symptom check");
        let result = self.backend.check_symptoms(symptoms).await;

        if !self.in_flight.is_current(ticket) {
            debug!("Dropping result of superseded symptom check");
            return SubmitOutcome::Superseded;
        }

        match result {
            Ok(analysis) => {
                self.surface.show_analysis(&render_analysis(&analysis));
                SubmitOutcome::Success(analysis)
            }
            Err(err) => {
                // Causes stay below the default terminal level
                match &err {
                    CheckerError::Backend { status_code, .. } => {
                        info!(status_code, error = %err, "Symptom check rejected by backend")
                    }
                    _ => debug!(error = %err, "Symptom check failed"),
                }
                self.surface.notify(&err.user_message());
                SubmitOutcome::Failure(err)
            }
        }
    }
}
