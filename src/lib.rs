//! Page-flow: repagination engine for a flowing rich-text editing surface
//!
//! This crate turns a continuously flowing document into a stack of fixed
//! size visual pages:
//! - Height arithmetic mapping natural content height to a page count and a
//!   container height
//! - Debounced change detection so bursts of edits trigger one recompute
//! - A serialized repagination state machine owning the page chrome
//! - Cursor/scroll preservation across each pass

pub mod config;
pub mod controller;
pub mod detect;
pub mod error;
pub mod host;
pub mod layout;
pub mod logging;
pub mod render;
pub mod viewport;
pub mod wasm;

#[cfg(test)]
mod tests;

// Re-export WASM types for direct use
pub use wasm::WasmPaginator;

// Re-export primary types
pub use config::{LayoutConfig, PaginationOptions};
pub use controller::{ControllerState, CycleOutcome, PaginationStatus, RepaginationController};
pub use detect::{ChangeDetector, ChangeNotifier, ChangeSignal};
pub use error::{ApplyFailure, ConfigurationError, MeasurementUnavailable, PaginationError};
pub use host::{ChromeSurface, ContentSurface, HostSurface, ViewportSurface};
pub use layout::{HeightArithmetic, PageRecord};
pub use render::{ChromeDiff, ChromeElement, ChromeElementId, ChromeKind, ChromePatch};
pub use viewport::{CursorAnchor, RestoreOutcome, ScrollAnchor, ViewportPreserver};

use tracing::debug;

/// Surface rectangle in document coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Whether the rectangle's top edge lies in the vertical band
    pub fn top_within(&self, top: f64, height: f64) -> bool {
        self.y >= top && self.y <= top + height
    }
}

/// The engine instance combining detector, controller and host surface
///
/// The host drives it with two calls: [`observe`](Self::observe) whenever the
/// content reports a new natural height, and [`tick`](Self::tick) from its
/// timer loop. All work happens synchronously inside `tick`.
pub struct Paginator<S> {
    detector: ChangeDetector,
    controller: RepaginationController,
    notifier: ChangeNotifier,
    surface: S,
}

impl<S: HostSurface> Paginator<S> {
    /// Attach the engine to a host surface
    pub fn attach(config: LayoutConfig, surface: S) -> Result<Self, ConfigurationError> {
        let detector = ChangeDetector::new(config.debounce_ms);
        let controller = RepaginationController::new(config)?;

        Ok(Self {
            detector,
            controller,
            notifier: ChangeNotifier::new(),
            surface,
        })
    }

    /// Schedule the first pass from the surface's current height
    pub fn start(&mut self, now: f64) {
        let height = self.surface.natural_height();
        self.detector.observe(height, now);
    }

    pub fn on_ready(&mut self, callback: impl FnOnce(PaginationStatus) + 'static) {
        self.controller.on_ready(callback);
    }

    pub fn on_stable(&mut self, callback: impl FnMut(PaginationStatus) + 'static) {
        self.controller.on_stable(callback);
    }

    /// Handle for host callbacks that cannot borrow the paginator
    pub fn notifier(&self) -> ChangeNotifier {
        self.notifier.clone()
    }

    /// Report a new natural height observed by the host
    pub fn observe(&mut self, height: f64, now: f64) {
        self.detector.observe(height, now);
    }

    /// Run a cycle if a debounced change is due
    pub fn tick(&mut self, now: f64) -> Option<CycleOutcome> {
        self.drain_notifier(now);

        let signal = self.detector.poll(now)?;
        debug!(height = signal.height, "change detected");

        self.detector.hold();
        let outcome = self.controller.run_cycle(&mut self.surface);
        if outcome.is_committed() {
            if let Some(height) = self.controller.committed_height() {
                self.detector.commit(height);
            }
        }
        // Reports made during the cycle become the pending re-trigger
        self.drain_notifier(now);
        self.detector.release(now);

        let settled = matches!(
            outcome,
            CycleOutcome::Committed { .. } | CycleOutcome::AlreadyCommitted { .. }
        );
        if settled && self.controller.awaiting_confirmation() {
            self.detector.request_confirmation(now);
        }

        Some(outcome)
    }

    /// When the host should call [`tick`](Self::tick) next
    pub fn next_deadline(&self) -> Option<f64> {
        self.detector.deadline()
    }

    pub fn state(&self) -> ControllerState {
        self.controller.state()
    }

    pub fn status(&self) -> Option<PaginationStatus> {
        self.controller.status()
    }

    pub fn page_count(&self) -> usize {
        self.controller.page_count().unwrap_or(1)
    }

    pub fn pages(&self) -> &[PageRecord] {
        self.controller.pages()
    }

    pub fn config(&self) -> &LayoutConfig {
        self.controller.config()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    fn drain_notifier(&mut self, now: f64) {
        if let Some(height) = self.notifier.take() {
            self.detector.observe(height, now);
        }
    }
}
