use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one request issued by a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// At most one request per controller may affect the display.
///
/// Every new request takes a fresh ticket, which supersedes all earlier ones.
/// A request whose ticket is no longer current drops its result on arrival.
#[derive(Debug, Default)]
pub struct InFlightGuard {
    latest: AtomicU64,
}

impl InFlightGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a request, superseding any pending one
    pub fn begin(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Supersedes every pending request without starting a new one
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}
