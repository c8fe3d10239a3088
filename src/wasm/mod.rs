//! WASM bindings for the paginator
//!
//! The embedding page supplies a host object implementing the methods of
//! [`JsHost`]; chrome diffs cross the boundary as a [`ChromeBuffer`].

pub mod flat_buffer;

use crate::detect::ChangeNotifier;
use crate::error::ApplyFailure;
use crate::host::{ChromeSurface, ContentSurface, HostSurface, ViewportSurface};
use crate::layout::{page_count_for, paginated_height};
use crate::render::ChromeDiff;
use crate::viewport::ScrollAnchor;
use crate::{LayoutConfig, PaginationStatus, Paginator, Rect};
use flat_buffer::ChromeBuffer;
use js_sys::Function;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

#[wasm_bindgen]
extern "C" {
    /// Duck-typed host object supplied by the editor integration
    pub type JsHost;

    #[wasm_bindgen(method, js_name = naturalHeight)]
    fn natural_height(this: &JsHost) -> f64;

    #[wasm_bindgen(method, js_name = hasCursor)]
    fn has_cursor(this: &JsHost) -> bool;

    #[wasm_bindgen(method, js_name = cursorTop)]
    fn cursor_top(this: &JsHost) -> f64;

    #[wasm_bindgen(method, js_name = cursorLeft)]
    fn cursor_left(this: &JsHost) -> f64;

    #[wasm_bindgen(method, js_name = cursorHeight)]
    fn cursor_height(this: &JsHost) -> f64;

    #[wasm_bindgen(method, js_name = scrollTop)]
    fn scroll_top(this: &JsHost) -> f64;

    #[wasm_bindgen(method, js_name = scrollLeft)]
    fn scroll_left(this: &JsHost) -> f64;

    #[wasm_bindgen(method, js_name = setScroll)]
    fn set_scroll(this: &JsHost, top: f64, left: f64);

    #[wasm_bindgen(method, js_name = viewportHeight)]
    fn viewport_height(this: &JsHost) -> f64;

    /// Apply an encoded chrome diff; `false` when the page container is gone
    #[wasm_bindgen(method, js_name = applyChrome)]
    fn apply_chrome(this: &JsHost, u32_data: &[u32], f32_data: &[f32], text_data: &[u8]) -> bool;
}

/// Host surface backed by a JS object
pub struct JsSurface {
    host: JsHost,
    buffer: ChromeBuffer,
}

impl ContentSurface for JsSurface {
    fn natural_height(&self) -> f64 {
        self.host.natural_height()
    }
}

impl ViewportSurface for JsSurface {
    fn cursor_rect(&self) -> Option<Rect> {
        if !self.host.has_cursor() {
            return None;
        }
        Some(Rect::new(
            self.host.cursor_left(),
            self.host.cursor_top(),
            1.0,
            self.host.cursor_height(),
        ))
    }

    fn scroll_position(&self) -> ScrollAnchor {
        ScrollAnchor::new(self.host.scroll_top(), self.host.scroll_left())
    }

    fn set_scroll_position(&mut self, position: ScrollAnchor) {
        self.host.set_scroll(position.top, position.left);
    }

    fn viewport_height(&self) -> f64 {
        self.host.viewport_height()
    }
}

impl ChromeSurface for JsSurface {
    fn apply_chrome(&mut self, diff: &ChromeDiff) -> Result<(), ApplyFailure> {
        self.buffer.encode(diff);
        let applied = self.host.apply_chrome(
            &self.buffer.u32_data,
            &self.buffer.f32_data,
            &self.buffer.text_data,
        );
        if applied {
            Ok(())
        } else {
            Err(ApplyFailure::MissingContainer)
        }
    }
}

/// Height reporter usable from inside host callbacks
#[wasm_bindgen]
pub struct WasmNotifier {
    inner: ChangeNotifier,
}

#[wasm_bindgen]
impl WasmNotifier {
    pub fn notify(&self, height: f64) {
        self.inner.notify(height);
    }
}

/// Status notification queued during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
enum StatusEvent {
    Ready(PaginationStatus),
    Stable(PaginationStatus),
}

/// Collects controller notifications so JS callbacks run after the cycle
#[derive(Debug, Clone, Default)]
struct StatusEvents {
    queue: Rc<RefCell<Vec<StatusEvent>>>,
}

impl StatusEvents {
    fn subscribe<S: HostSurface>(&self, paginator: &mut Paginator<S>) {
        let ready = self.queue.clone();
        paginator.on_ready(move |status| ready.borrow_mut().push(StatusEvent::Ready(status)));
        let stable = self.queue.clone();
        paginator.on_stable(move |status| stable.borrow_mut().push(StatusEvent::Stable(status)));
    }

    fn drain(&self) -> Vec<StatusEvent> {
        std::mem::take(&mut *self.queue.borrow_mut())
    }
}

/// WASM-exposed paginator wrapper
///
/// Every method takes `&self`, so `onReady`/`onStable` callbacks may call
/// back into the paginator: they run after the cycle has released it.
#[wasm_bindgen]
pub struct WasmPaginator {
    paginator: RefCell<Paginator<JsSurface>>,
    events: StatusEvents,
    on_ready: RefCell<Option<Function>>,
    on_stable: RefCell<Option<Function>>,
}

#[wasm_bindgen]
impl WasmPaginator {
    /// Create a paginator from camelCase JSON options and a host object
    #[wasm_bindgen(constructor)]
    pub fn new(options_json: &str, host: JsHost) -> Result<WasmPaginator, JsError> {
        let config =
            LayoutConfig::from_json_str(options_json).map_err(|e| JsError::new(&e.to_string()))?;
        let surface = JsSurface {
            host,
            buffer: ChromeBuffer::new(),
        };
        let mut paginator =
            Paginator::attach(config, surface).map_err(|e| JsError::new(&e.to_string()))?;
        let events = StatusEvents::default();
        events.subscribe(&mut paginator);

        Ok(Self {
            paginator: RefCell::new(paginator),
            events,
            on_ready: RefCell::new(None),
            on_stable: RefCell::new(None),
        })
    }

    /// Schedule the first pass from the host's current height
    pub fn start(&self, now: f64) {
        self.paginator.borrow_mut().start(now);
    }

    /// Report a new natural height (from a resize or mutation observer)
    pub fn observe(&self, height: f64, now: f64) {
        self.paginator.borrow_mut().observe(height, now);
    }

    /// Run a due cycle; returns true when a layout was committed
    pub fn tick(&self, now: f64) -> bool {
        let outcome = self.paginator.borrow_mut().tick(now);
        self.dispatch();
        outcome.map(|outcome| outcome.is_committed()).unwrap_or(false)
    }

    /// Timestamp of the next scheduled cycle
    #[wasm_bindgen(js_name = nextDeadline)]
    pub fn next_deadline(&self) -> Option<f64> {
        self.paginator.borrow().next_deadline()
    }

    /// Reporter for callbacks that fire while a cycle is running
    pub fn notifier(&self) -> WasmNotifier {
        WasmNotifier {
            inner: self.paginator.borrow().notifier(),
        }
    }

    /// `callback(pageCount, containerHeight)` once pagination first settles
    #[wasm_bindgen(js_name = onReady)]
    pub fn on_ready(&self, callback: Function) {
        *self.on_ready.borrow_mut() = Some(callback);
    }

    /// `callback(pageCount, containerHeight)` on every later settled cycle
    #[wasm_bindgen(js_name = onStable)]
    pub fn on_stable(&self, callback: Function) {
        *self.on_stable.borrow_mut() = Some(callback);
    }

    #[wasm_bindgen(js_name = pageCount)]
    pub fn page_count(&self) -> usize {
        self.paginator.borrow().page_count()
    }

    #[wasm_bindgen(js_name = containerHeight)]
    pub fn container_height(&self) -> f64 {
        let paginator = self.paginator.borrow();
        paginator
            .status()
            .map(|status| status.container_height)
            .unwrap_or_else(|| paginated_height(paginator.config(), 1))
    }

    #[wasm_bindgen(js_name = paginatedHeight)]
    pub fn paginated_height(&self, page_count: usize) -> f64 {
        paginated_height(self.paginator.borrow().config(), page_count)
    }

    #[wasm_bindgen(js_name = pageCountFor)]
    pub fn page_count_for(&self, natural_height: f64) -> Result<usize, JsError> {
        page_count_for(self.paginator.borrow().config(), natural_height)
            .map_err(|e| JsError::new(&e.to_string()))
    }

    fn dispatch(&self) {
        for event in self.events.drain() {
            let (slot, status) = match event {
                StatusEvent::Ready(status) => (&self.on_ready, status),
                StatusEvent::Stable(status) => (&self.on_stable, status),
            };
            // Cloned so the callback may replace itself
            let callback = slot.borrow().clone();
            if let Some(callback) = callback {
                call_status(&callback, status);
            }
        }
    }
}

fn call_status(callback: &Function, status: PaginationStatus) {
    let result = callback.call2(
        &JsValue::NULL,
        &JsValue::from(status.page_count as u32),
        &JsValue::from_f64(status.container_height),
    );
    if result.is_err() {
        tracing::warn!("pagination callback threw");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FixedSurface {
        height: f64,
        scroll: ScrollAnchor,
    }

    impl ContentSurface for FixedSurface {
        fn natural_height(&self) -> f64 {
            self.height
        }
    }

    impl ViewportSurface for FixedSurface {
        fn cursor_rect(&self) -> Option<Rect> {
            None
        }

        fn scroll_position(&self) -> ScrollAnchor {
            self.scroll
        }

        fn set_scroll_position(&mut self, position: ScrollAnchor) {
            self.scroll = position;
        }

        fn viewport_height(&self) -> f64 {
            800.0
        }
    }

    impl ChromeSurface for FixedSurface {
        fn apply_chrome(&mut self, _diff: &ChromeDiff) -> Result<(), ApplyFailure> {
            Ok(())
        }
    }

    #[test]
    fn test_status_events_queue_until_drained() {
        let surface = FixedSurface {
            height: 1500.0,
            ..FixedSurface::default()
        };
        let paginator = RefCell::new(Paginator::attach(LayoutConfig::default(), surface).unwrap());
        let events = StatusEvents::default();
        events.subscribe(&mut *paginator.borrow_mut());

        paginator.borrow_mut().start(0.0);
        let outcome = paginator.borrow_mut().tick(150.0);
        assert!(outcome.is_some_and(|outcome| outcome.is_committed()));

        // The cycle has released the paginator by the time events are read
        let status = PaginationStatus {
            page_count: 2,
            container_height: 1803.0,
        };
        let drained = events.drain();
        assert_eq!(drained, vec![StatusEvent::Ready(status)]);
        assert_eq!(paginator.borrow().page_count(), 2);
        assert!(events.drain().is_empty());

        paginator.borrow_mut().observe(1600.0, 200.0);
        paginator.borrow_mut().tick(350.0);
        assert_eq!(events.drain(), vec![StatusEvent::Stable(status)]);
    }
}
