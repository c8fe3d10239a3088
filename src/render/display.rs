//! Chrome elements: the non-content boxes drawn around and between pages

use crate::config::LayoutConfig;
use crate::layout::PageRecord;

/// Kind of chrome element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChromeKind {
    Header,
    Footer,
    PageBreak,
}

impl ChromeKind {
    /// Wire code used by the flat buffer protocol
    pub fn code(self) -> u32 {
        match self {
            ChromeKind::Header => 0,
            ChromeKind::Footer => 1,
            ChromeKind::PageBreak => 2,
        }
    }
}

/// Stable identity of a chrome element across repagination passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChromeElementId {
    pub kind: ChromeKind,
    /// Page the element belongs to (for breaks, the page above the break)
    pub page: usize,
}

/// A chrome element to render
#[derive(Debug, Clone, PartialEq)]
pub enum ChromeElement {
    /// Running header at the top of a page
    Header {
        page: usize,
        top: f64,
        height: f64,
        text: String,
    },
    /// Footer at the bottom of a page, with its page number
    Footer {
        page: usize,
        top: f64,
        height: f64,
        text: String,
        page_number: usize,
    },
    /// Separator filling the space between two pages
    PageBreak {
        after_page: usize,
        top: f64,
        height: f64,
        background: String,
    },
}

impl ChromeElement {
    pub fn id(&self) -> ChromeElementId {
        match self {
            ChromeElement::Header { page, .. } => ChromeElementId {
                kind: ChromeKind::Header,
                page: *page,
            },
            ChromeElement::Footer { page, .. } => ChromeElementId {
                kind: ChromeKind::Footer,
                page: *page,
            },
            ChromeElement::PageBreak { after_page, .. } => ChromeElementId {
                kind: ChromeKind::PageBreak,
                page: *after_page,
            },
        }
    }

    pub fn top(&self) -> f64 {
        match self {
            ChromeElement::Header { top, .. }
            | ChromeElement::Footer { top, .. }
            | ChromeElement::PageBreak { top, .. } => *top,
        }
    }

    pub fn height(&self) -> f64 {
        match self {
            ChromeElement::Header { height, .. }
            | ChromeElement::Footer { height, .. }
            | ChromeElement::PageBreak { height, .. } => *height,
        }
    }

    /// Display text (footers carry their number after the label)
    pub fn label(&self) -> String {
        match self {
            ChromeElement::Header { text, .. } => text.clone(),
            ChromeElement::Footer {
                text, page_number, ..
            } => {
                if text.is_empty() {
                    page_number.to_string()
                } else {
                    format!("{} {}", text, page_number)
                }
            }
            ChromeElement::PageBreak { background, .. } => background.clone(),
        }
    }
}

/// Chrome for a page sequence, in document order
pub fn chrome_for(config: &LayoutConfig, pages: &[PageRecord]) -> Vec<ChromeElement> {
    let mut elements = Vec::with_capacity(pages.len() * 3);
    let gap_height = config.overhead_per_extra_page();

    for (i, page) in pages.iter().enumerate() {
        if page.has_header {
            elements.push(ChromeElement::Header {
                page: page.index,
                top: page.top_offset,
                height: config.page_header_height,
                text: config.header_text.clone(),
            });
        }

        if page.has_footer {
            elements.push(ChromeElement::Footer {
                page: page.index,
                top: page.bottom_offset(config) - config.page_footer_height,
                height: config.page_footer_height,
                text: config.footer_text.clone(),
                page_number: page.number(),
            });
        }

        if i + 1 < pages.len() {
            elements.push(ChromeElement::PageBreak {
                after_page: page.index,
                top: page.bottom_offset(config),
                height: gap_height,
                background: config.page_break_background.clone(),
            });
        }
    }

    elements
}
