//! Render output: chrome elements and the diff protocol

mod diff;
mod display;

pub use diff::{ChromeDiff, ChromePatch};
pub use display::{chrome_for, ChromeElement, ChromeElementId, ChromeKind};
