//! Controller states and cycle results

use crate::error::{MeasurementUnavailable, PaginationError};
use crate::viewport::RestoreOutcome;

/// Repagination cycle state
///
/// A cycle always walks `Idle -> Measuring -> Recomputing -> Applying -> Idle`,
/// or drops back to `Idle` early on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerState {
    #[default]
    Idle,
    Measuring,
    Recomputing,
    Applying,
}

impl ControllerState {
    pub fn is_idle(self) -> bool {
        self == ControllerState::Idle
    }

    /// Whether `next` is a legal successor of this state
    pub fn can_transition_to(self, next: ControllerState) -> bool {
        use ControllerState::*;
        matches!(
            (self, next),
            (Idle, Measuring)
                | (Measuring, Recomputing)
                | (Recomputing, Applying)
                | (Applying, Idle)
                | (Measuring, Idle)
                | (Recomputing, Idle)
        )
    }
}

/// Committed pagination as seen by callbacks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaginationStatus {
    pub page_count: usize,
    pub container_height: f64,
}

/// What a single cycle did
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// New layout committed (possibly with the same page count)
    Committed {
        previous: Option<usize>,
        page_count: usize,
        /// Whether any chrome patch was applied
        chrome_changed: bool,
        viewport: Option<RestoreOutcome>,
    },
    /// Natural height equals the committed one; nothing to do
    AlreadyCommitted { page_count: usize },
    /// Surface not measurable yet; waiting for the next change
    Deferred(MeasurementUnavailable),
    /// Cycle abandoned; last good layout kept
    Failed(PaginationError),
}

impl CycleOutcome {
    pub fn page_count(&self) -> Option<usize> {
        match self {
            CycleOutcome::Committed { page_count, .. }
            | CycleOutcome::AlreadyCommitted { page_count } => Some(*page_count),
            _ => None,
        }
    }

    pub fn is_committed(&self) -> bool {
        matches!(self, CycleOutcome::Committed { .. })
    }
}
