//! Repagination controller
//!
//! Runs one cycle per debounced change: measure the natural height, compute
//! the page count, swap in the new page records and chrome, and notify
//! readiness. The chrome sequence is owned here and nowhere else.

mod state;

pub use state::{ControllerState, CycleOutcome, PaginationStatus};

use crate::config::LayoutConfig;
use crate::error::{ConfigurationError, MeasurementUnavailable, PaginationError};
use crate::host::HostSurface;
use crate::layout::{build_pages, page_count_for, paginated_height, PageRecord};
use crate::render::{chrome_for, ChromeDiff, ChromeElement};
use crate::viewport::ViewportPreserver;
use tracing::{debug, info, warn};

/// Heights closer than this are treated as the committed height
const HEIGHT_EPSILON: f64 = 0.5;

type ReadyCallback = Box<dyn FnOnce(PaginationStatus)>;
type StableCallback = Box<dyn FnMut(PaginationStatus)>;

pub struct RepaginationController {
    config: LayoutConfig,
    state: ControllerState,
    preserver: ViewportPreserver,
    /// Committed page records
    pages: Vec<PageRecord>,
    /// Chrome currently on the host surface
    chrome: Vec<ChromeElement>,
    container_height: Option<f64>,
    /// Natural height the committed layout was computed from
    committed_height: Option<f64>,
    /// Consecutive committed cycles with the same page count
    stable_cycles: u32,
    ready_fired: bool,
    on_ready: Option<ReadyCallback>,
    on_stable: Option<StableCallback>,
}

impl std::fmt::Debug for RepaginationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepaginationController")
            .field("state", &self.state)
            .field("page_count", &self.page_count())
            .field("container_height", &self.container_height)
            .field("committed_height", &self.committed_height)
            .field("ready_fired", &self.ready_fired)
            .finish_non_exhaustive()
    }
}

impl RepaginationController {
    /// Create a controller; invalid configuration is rejected here
    pub fn new(config: LayoutConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self {
            config,
            state: ControllerState::Idle,
            preserver: ViewportPreserver::new(),
            pages: Vec::new(),
            chrome: Vec::new(),
            container_height: None,
            committed_height: None,
            stable_cycles: 0,
            ready_fired: false,
            on_ready: None,
            on_stable: None,
        })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Register the callback fired when pagination first stabilizes
    pub fn on_ready(&mut self, callback: impl FnOnce(PaginationStatus) + 'static) {
        self.on_ready = Some(Box::new(callback));
    }

    /// Register the callback fired on every later stable cycle
    pub fn on_stable(&mut self, callback: impl FnMut(PaginationStatus) + 'static) {
        self.on_stable = Some(Box::new(callback));
    }

    pub fn pages(&self) -> &[PageRecord] {
        &self.pages
    }

    pub fn chrome(&self) -> &[ChromeElement] {
        &self.chrome
    }

    /// Committed page count, `None` before the first successful cycle
    pub fn page_count(&self) -> Option<usize> {
        (!self.pages.is_empty()).then_some(self.pages.len())
    }

    pub fn committed_height(&self) -> Option<f64> {
        self.committed_height
    }

    pub fn status(&self) -> Option<PaginationStatus> {
        Some(PaginationStatus {
            page_count: self.page_count()?,
            container_height: self.container_height?,
        })
    }

    pub fn is_ready(&self) -> bool {
        self.ready_fired
    }

    /// A layout is committed but has not yet held for the stability threshold
    pub fn awaiting_confirmation(&self) -> bool {
        self.committed_height.is_some() && self.stable_cycles < self.config.stability_threshold
    }

    /// Run one full repagination cycle against the host surface
    pub fn run_cycle<S: HostSurface + ?Sized>(&mut self, surface: &mut S) -> CycleOutcome {
        self.transition(ControllerState::Measuring);

        let natural_height = match measure(surface) {
            Ok(height) => height,
            Err(unavailable) => {
                debug!(measured = unavailable.measured, "surface not measurable, waiting for next change");
                self.transition(ControllerState::Idle);
                return CycleOutcome::Deferred(unavailable);
            }
        };

        if let (Some(committed), Some(page_count)) = (self.committed_height, self.page_count()) {
            if (committed - natural_height).abs() < HEIGHT_EPSILON {
                self.transition(ControllerState::Idle);
                self.confirm();
                return CycleOutcome::AlreadyCommitted { page_count };
            }
        }

        self.transition(ControllerState::Recomputing);

        let page_count = match page_count_for(&self.config, natural_height) {
            Ok(count) => count,
            Err(err) => return self.fail(err),
        };
        let previous = self.page_count();
        let pages = build_pages(&self.config, page_count);
        let chrome = chrome_for(&self.config, &pages);
        let container_height = paginated_height(&self.config, page_count);

        self.transition(ControllerState::Applying);

        let diff = ChromeDiff::between(&self.chrome, &chrome, self.container_height, container_height);
        let viewport = if diff.is_empty() {
            None
        } else {
            let capture = self.preserver.capture(&*surface);
            if let Err(err) = surface.apply_chrome(&diff) {
                return self.fail(err.into());
            }
            Some(self.preserver.restore(capture, surface))
        };

        self.pages = pages;
        self.chrome = chrome;
        self.container_height = Some(container_height);
        self.committed_height = Some(natural_height);

        if previous != Some(page_count) {
            info!(
                from = previous,
                to = page_count,
                natural_height,
                container_height,
                "page count changed"
            );
        }

        self.transition(ControllerState::Idle);
        self.notify(previous == Some(page_count));

        CycleOutcome::Committed {
            previous,
            page_count,
            chrome_changed: !diff.is_empty(),
            viewport,
        }
    }

    fn notify(&mut self, same_count: bool) {
        self.stable_cycles = if same_count { self.stable_cycles + 1 } else { 1 };
        self.fire_if_stable();
    }

    /// Count an unchanged re-measurement towards the stability threshold
    fn confirm(&mut self) {
        if !self.awaiting_confirmation() {
            return;
        }
        self.stable_cycles += 1;
        debug!(stable_cycles = self.stable_cycles, "committed layout confirmed");
        self.fire_if_stable();
    }

    fn fire_if_stable(&mut self) {
        if self.stable_cycles < self.config.stability_threshold {
            return;
        }

        let Some(status) = self.status() else {
            return;
        };

        if !self.ready_fired {
            self.ready_fired = true;
            if let Some(callback) = self.on_ready.take() {
                debug!(page_count = status.page_count, "pagination ready");
                callback(status);
            }
        } else if let Some(callback) = self.on_stable.as_mut() {
            callback(status);
        }
    }

    fn fail(&mut self, err: PaginationError) -> CycleOutcome {
        warn!(error = %err, state = ?self.state, "repagination failed, keeping last layout");
        self.transition(ControllerState::Idle);
        CycleOutcome::Failed(err)
    }

    fn transition(&mut self, next: ControllerState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {:?} -> {:?}",
            self.state,
            next
        );
        debug!(from = ?self.state, to = ?next, "controller transition");
        self.state = next;
    }
}

fn measure<S: HostSurface + ?Sized>(surface: &S) -> Result<f64, MeasurementUnavailable> {
    let measured = surface.natural_height();
    if measured.is_finite() && measured > 0.0 {
        Ok(measured)
    } else {
        Err(MeasurementUnavailable { measured })
    }
}
