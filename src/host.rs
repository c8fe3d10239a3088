//! Seams to the editing model and the host rendering surface
//!
//! All coordinates are document coordinates in CSS pixels: a cursor at
//! `top = 1200` is 1200px below the top of the scrollable document regardless
//! of the current scroll offset.

use crate::error::ApplyFailure;
use crate::render::ChromeDiff;
use crate::viewport::ScrollAnchor;
use crate::Rect;

/// Content measurement provided by the editing model
pub trait ContentSurface {
    /// Un-paginated rendered height of the content
    ///
    /// Zero or NaN when the surface is not mounted yet.
    fn natural_height(&self) -> f64;
}

/// Cursor and scroll access provided by the editing surface
pub trait ViewportSurface {
    /// Bounding box of the collapsed cursor, or `None` without an active
    /// selection
    fn cursor_rect(&self) -> Option<Rect>;

    fn scroll_position(&self) -> ScrollAnchor;

    fn set_scroll_position(&mut self, position: ScrollAnchor);

    fn viewport_height(&self) -> f64;

    /// Scroll offset at which the content region starts
    fn content_top(&self) -> f64 {
        0.0
    }
}

/// Chrome element insertion and removal on the rendering surface
pub trait ChromeSurface {
    /// Apply every patch of `diff`, or none of them
    ///
    /// On `Err` the rendered chrome must be exactly what it was before the
    /// call: the controller keeps diffing against its last committed chrome.
    fn apply_chrome(&mut self, diff: &ChromeDiff) -> Result<(), ApplyFailure>;
}

/// Everything one paginator instance needs from its host
pub trait HostSurface: ContentSurface + ViewportSurface + ChromeSurface {}

impl<T: ContentSurface + ViewportSurface + ChromeSurface> HostSurface for T {}
