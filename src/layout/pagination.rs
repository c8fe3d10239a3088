//! Page records for a paginated container

use crate::config::LayoutConfig;
use crate::layout::arithmetic::page_stride;

/// Geometry of one visual page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRecord {
    /// Page index (0-based)
    pub index: usize,
    /// Offset of the page's top edge from the container top
    pub top_offset: f64,
    pub has_header: bool,
    pub has_footer: bool,
}

impl PageRecord {
    /// Bottom edge of the page box, excluding the gap that follows it
    pub fn bottom_offset(&self, config: &LayoutConfig) -> f64 {
        self.top_offset + config.page_height
    }

    /// 1-based page number as shown in the footer
    pub fn number(&self) -> usize {
        self.index + 1
    }
}

/// Build the full record sequence for `page_count` pages
///
/// The sequence is always rebuilt from scratch; callers swap it in whole.
pub fn build_pages(config: &LayoutConfig, page_count: usize) -> Vec<PageRecord> {
    let stride = page_stride(config);
    let has_header = config.page_header_height > 0.0 || !config.header_text.is_empty();
    let has_footer = config.page_footer_height > 0.0 || !config.footer_text.is_empty();

    (0..page_count.max(1))
        .map(|index| PageRecord {
            index,
            top_offset: config.content_padding_top + stride * index as f64,
            has_header,
            has_footer,
        })
        .collect()
}

/// Index of the page containing a container-relative y coordinate
pub fn page_at(pages: &[PageRecord], y: f64) -> Option<usize> {
    let idx = pages.partition_point(|page| page.top_offset <= y);
    idx.checked_sub(1)
}
