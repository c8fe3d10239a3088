//! Change detection with debounce
//!
//! The host reports natural-height observations as they happen. A burst of
//! observations collapses into a single [`ChangeSignal`] carrying the most
//! recent height, delivered by [`ChangeDetector::poll`] once the debounce
//! window has passed without a newer observation.

use std::cell::Cell;
use std::rc::Rc;
use tracing::trace;

/// Heights closer than this are treated as equal
const HEIGHT_EPSILON: f64 = 0.5;

/// Debounced trigger for one repagination cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChangeSignal {
    pub height: f64,
}

/// Cloneable handle for reporting heights without borrowing the engine
///
/// Only the latest report is kept.
#[derive(Debug, Clone, Default)]
pub struct ChangeNotifier {
    slot: Rc<Cell<Option<f64>>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&self, height: f64) {
        self.slot.set(Some(height));
    }

    /// Take the latest report, leaving the slot empty
    pub fn take(&self) -> Option<f64> {
        self.slot.take()
    }
}

/// Debounces height observations into recompute triggers
#[derive(Debug)]
pub struct ChangeDetector {
    /// Debounce window in milliseconds
    window_ms: f64,
    /// Deadline of the scheduled trigger, if any
    deadline: Option<f64>,
    /// Most recent observed height
    latest: Option<f64>,
    /// Height of the last successful cycle
    committed: Option<f64>,
    /// A cycle is in flight
    held: bool,
    /// An observation arrived while held
    pending_retrigger: bool,
    /// Next trigger re-measures even an unchanged height
    confirming: bool,
}

impl ChangeDetector {
    pub fn new(window_ms: f64) -> Self {
        Self {
            window_ms: window_ms.max(0.0),
            deadline: None,
            latest: None,
            committed: None,
            held: false,
            pending_retrigger: false,
            confirming: false,
        }
    }

    pub fn window_ms(&self) -> f64 {
        self.window_ms
    }

    /// Record an observation, cancelling any scheduled trigger
    pub fn observe(&mut self, height: f64, now: f64) {
        self.latest = Some(height);

        if self.held {
            self.pending_retrigger = true;
            trace!(height, "observation parked while cycle in flight");
            return;
        }

        if self.deadline.is_some() {
            trace!(height, "debounce timer reset");
        }
        self.deadline = Some(now + self.window_ms);
    }

    /// Deliver the trigger if its deadline has passed
    ///
    /// Heights equal to the last committed one are dropped here, so the
    /// controller's own chrome updates cannot trigger a new cycle.
    pub fn poll(&mut self, now: f64) -> Option<ChangeSignal> {
        if self.held {
            return None;
        }

        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        self.deadline = None;

        let height = self.latest?;
        if std::mem::take(&mut self.confirming) {
            return Some(ChangeSignal { height });
        }
        if self.is_committed(height) {
            trace!(height, "height unchanged, trigger suppressed");
            return None;
        }

        Some(ChangeSignal { height })
    }

    /// Whether a trigger is scheduled
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<f64> {
        self.deadline
    }

    /// Park further observations until [`release`](Self::release)
    pub fn hold(&mut self) {
        self.held = true;
    }

    /// End the in-flight cycle, scheduling any parked observation
    pub fn release(&mut self, now: f64) {
        self.held = false;
        if std::mem::take(&mut self.pending_retrigger) {
            self.deadline = Some(now + self.window_ms);
        }
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Schedule a re-measurement that is delivered even if nothing changed
    ///
    /// Keeps any earlier deadline already armed.
    pub fn request_confirmation(&mut self, now: f64) {
        self.confirming = true;
        if self.deadline.is_none() {
            self.deadline = Some(now + self.window_ms);
        }
    }

    /// Record the height a cycle successfully laid out
    pub fn commit(&mut self, height: f64) {
        self.committed = Some(height);
    }

    pub fn committed(&self) -> Option<f64> {
        self.committed
    }

    fn is_committed(&self, height: f64) -> bool {
        self.committed
            .map(|c| (c - height).abs() < HEIGHT_EPSILON)
            .unwrap_or(false)
    }
}
