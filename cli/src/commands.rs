use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use crate::history_controller::{HistoryController, HistoryOutcome};
use crate::request_controller::{RequestController, SubmitOutcome};
use crate::surface::HistorySurface;

/// Where a click landed while the history view may be open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The backdrop around the history list
    HistoryBackdrop,
    /// Inside the history list itself
    HistoryContent,
}

/// Named user actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Submit(String),
    OpenHistory,
    CloseHistory,
    OutsideClick(ClickTarget),
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Submit(_) => "submit",
            Action::OpenHistory => "open-history",
            Action::CloseHistory => "close-history",
            Action::OutsideClick(_) => "dismiss-on-outside-click",
        }
    }
}

/// What handling an action did
#[derive(Debug)]
pub enum ActionOutcome {
    Submitted(SubmitOutcome),
    History(HistoryOutcome),
    HistoryClosed,
    Ignored,
}

/// Visibility of the history view
pub struct HistoryModal {
    surface: Arc<dyn HistorySurface>,
    open: AtomicBool,
}

impl HistoryModal {
    pub fn new(surface: Arc<dyn HistorySurface>) -> Self {
        Self {
            surface,
            open: AtomicBool::new(false),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    fn show(&self) {
        self.open.store(true, Ordering::SeqCst);
        self.surface.set_visible(true);
    }

    /// Returns false when it was already closed
    fn hide(&self) -> bool {
        let was_open = self.open.swap(false, Ordering::SeqCst);
        self.surface.set_visible(false);
        was_open
    }
}

/// Routes each user action to the one component that handles it
pub struct CommandHandlers {
    request: Arc<RequestController>,
    history: Arc<HistoryController>,
    modal: HistoryModal,
}

impl CommandHandlers {
    pub fn new(
        request: Arc<RequestController>,
        history: Arc<HistoryController>,
        modal: HistoryModal,
    ) -> Self {
        Self {
            request,
            history,
            modal,
        }
    }

    pub fn history_open(&self) -> bool {
        self.modal.is_open()
    }

    pub async fn dispatch(&self, action: Action) -> ActionOutcome {
        debug!(
            action = action.name(),
            request_state = ?self.request.state(),
            history_state = ?self.history.state(),
            "Dispatching action"
        );
        match action {
            Action::Submit(text) => ActionOutcome::Submitted(self.request.submit(&text).await),
            Action::OpenHistory => {
                self.modal.show();
                ActionOutcome::History(self.history.load_history().await)
            }
            Action::CloseHistory => self.close_history(),
            Action::OutsideClick(ClickTarget::HistoryBackdrop) if self.modal.is_open() => {
                self.close_history()
            }
            Action::OutsideClick(_) => ActionOutcome::Ignored,
        }
    }

    fn close_history(&self) -> ActionOutcome {
        self.history.cancel();
        if self.modal.hide() {
            ActionOutcome::HistoryClosed
        } else {
            ActionOutcome::Ignored
        }
    }
}
