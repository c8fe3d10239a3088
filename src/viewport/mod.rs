//! Cursor and scroll preservation across a repagination pass
//!
//! Before chrome changes, the cursor's offset within the viewport is
//! recorded. Afterwards scroll is adjusted so the cursor sits on the same
//! visual row, which absorbs any page break inserted or removed above it.

use crate::host::ViewportSurface;
use tracing::{debug, trace};

/// Scroll offset of the editing surface
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollAnchor {
    pub top: f64,
    pub left: f64,
}

impl ScrollAnchor {
    pub fn new(top: f64, left: f64) -> Self {
        Self { top, left }
    }
}

/// Cursor position at capture time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorAnchor {
    pub visual_top: f64,
    pub visual_left: f64,
    pub scroll_top_at_capture: f64,
}

impl CursorAnchor {
    /// Cursor offset from the top of the viewport
    pub fn delta_to_scroll_top(&self) -> f64 {
        self.visual_top - self.scroll_top_at_capture
    }
}

/// Anchors captured immediately before chrome mutation
///
/// Consumed by [`ViewportPreserver::restore`]; never outlives one cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportCapture {
    pub cursor: Option<CursorAnchor>,
    pub scroll: ScrollAnchor,
}

/// What restoration did to the scroll offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RestoreOutcome {
    /// Cursor kept its row without touching scroll
    Unchanged,
    /// Scroll moved so the cursor kept its row
    Adjusted { from: f64, to: f64 },
    /// No active cursor; scrolled to the content top
    ScrolledToTop,
    /// Cursor disappeared during mutation; captured scroll restored
    ScrollRestored,
}

#[derive(Debug, Default)]
pub struct ViewportPreserver;

impl ViewportPreserver {
    pub fn new() -> Self {
        Self
    }

    /// Record cursor and scroll anchors before chrome mutation
    pub fn capture<V: ViewportSurface + ?Sized>(&self, surface: &V) -> ViewportCapture {
        let scroll = surface.scroll_position();
        let cursor = surface.cursor_rect().map(|rect| CursorAnchor {
            visual_top: rect.y,
            visual_left: rect.x,
            scroll_top_at_capture: scroll.top,
        });

        trace!(?cursor, ?scroll, "captured viewport anchors");
        ViewportCapture { cursor, scroll }
    }

    /// Put the cursor back on the visual row it occupied at capture
    pub fn restore<V: ViewportSurface + ?Sized>(
        &self,
        capture: ViewportCapture,
        surface: &mut V,
    ) -> RestoreOutcome {
        let Some(anchor) = capture.cursor else {
            let top = surface.content_top();
            surface.set_scroll_position(ScrollAnchor::new(top, capture.scroll.left));
            debug!(top, "no active cursor, scrolled to content top");
            return RestoreOutcome::ScrolledToTop;
        };

        let Some(rect) = surface.cursor_rect() else {
            surface.set_scroll_position(capture.scroll);
            debug!("cursor lost during repagination, restored captured scroll");
            return RestoreOutcome::ScrollRestored;
        };

        let current = surface.scroll_position();
        let target = (rect.y - anchor.delta_to_scroll_top()).max(0.0);

        if target == current.top {
            return RestoreOutcome::Unchanged;
        }

        surface.set_scroll_position(ScrollAnchor::new(target, current.left));
        debug!(from = current.top, to = target, "scroll adjusted to keep cursor row");
        RestoreOutcome::Adjusted {
            from: current.top,
            to: target,
        }
    }
}
