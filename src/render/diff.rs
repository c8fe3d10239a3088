//! Chrome diff protocol for incremental host updates

use crate::render::{ChromeElement, ChromeElementId};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// A single patch operation for the host surface
#[derive(Debug, Clone, PartialEq)]
pub enum ChromePatch {
    /// Remove a chrome element
    Remove { id: ChromeElementId },
    /// Insert a new chrome element
    Insert { element: ChromeElement },
    /// Resize the page container
    SetContainerHeight { height: f64 },
}

/// Ordered patch list taking the host from one page sequence to the next
///
/// Removals come first, then insertions in document order, then the
/// container resize.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChromeDiff {
    pub patches: SmallVec<[ChromePatch; 8]>,
}

impl ChromeDiff {
    /// Compute the patches between two element sequences
    pub fn between(
        previous: &[ChromeElement],
        current: &[ChromeElement],
        previous_height: Option<f64>,
        current_height: f64,
    ) -> Self {
        let mut diff = Self::default();

        let prev_items: FxHashMap<ChromeElementId, &ChromeElement> =
            previous.iter().map(|e| (e.id(), e)).collect();
        let curr_items: FxHashMap<ChromeElementId, &ChromeElement> =
            current.iter().map(|e| (e.id(), e)).collect();

        // Removed or replaced, last first so the host can pop from the tail
        for element in previous.iter().rev() {
            let id = element.id();
            match curr_items.get(&id) {
                Some(curr) if *curr == element => {}
                _ => diff.add_patch(ChromePatch::Remove { id }),
            }
        }

        for element in current {
            match prev_items.get(&element.id()) {
                Some(prev) if *prev == element => {}
                _ => diff.add_patch(ChromePatch::Insert {
                    element: element.clone(),
                }),
            }
        }

        if previous_height != Some(current_height) {
            diff.add_patch(ChromePatch::SetContainerHeight {
                height: current_height,
            });
        }

        diff
    }

    pub fn add_patch(&mut self, patch: ChromePatch) {
        self.patches.push(patch);
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    pub fn patch_count(&self) -> usize {
        self.patches.len()
    }

    /// Container height this diff resizes to, if any
    pub fn container_height(&self) -> Option<f64> {
        self.patches.iter().find_map(|patch| match patch {
            ChromePatch::SetContainerHeight { height } => Some(*height),
            _ => None,
        })
    }

    pub fn inserted(&self) -> impl Iterator<Item = &ChromeElement> {
        self.patches.iter().filter_map(|patch| match patch {
            ChromePatch::Insert { element } => Some(element),
            _ => None,
        })
    }

    pub fn removed(&self) -> impl Iterator<Item = ChromeElementId> + '_ {
        self.patches.iter().filter_map(|patch| match patch {
            ChromePatch::Remove { id } => Some(*id),
            _ => None,
        })
    }
}
