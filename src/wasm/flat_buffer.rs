//! Flat buffer protocol for passing chrome diffs to JS
//!
//! Binary format:
//!
//! ## u32 Buffer Layout:
//! ```text
//! Header:
//! [0]     MAGIC (0x50464C57 = "PFLW" for validation)
//! [1]     SCHEMA_VERSION (protocol version, currently 1)
//! [2]     patch_count
//! [3]     text_buffer_len
//! [4..]   patches...
//!
//! Per-patch: [opcode, kind, page, text_offset, text_len, page_number]
//!   opcode: 0 = remove, 1 = insert, 2 = set container height
//!   kind: chrome kind code (0 header, 1 footer, 2 page break), unused for opcode 2
//!   text: header/footer label or break background; only read when text_len > 0
//!   page_number: footers only
//! ```
//!
//! ## f32 Buffer Layout:
//! ```text
//! Per-patch: [top, height]
//!   remove: [0, 0]
//!   set container height: [0, container_height]
//! ```

use crate::render::{ChromeDiff, ChromeElement, ChromePatch};

/// Magic number for format validation: "PFLW" (Page FLoW)
pub const MAGIC: u32 = 0x50464C57;

/// Schema version for protocol compatibility checking
pub const SCHEMA_VERSION: u32 = 1;

/// Header size in u32 elements
pub const HEADER_SIZE: usize = 4;

pub const OP_REMOVE: u32 = 0;
pub const OP_INSERT: u32 = 1;
pub const OP_SET_CONTAINER_HEIGHT: u32 = 2;

/// Number of u32 values per patch
pub const U32_PER_PATCH: usize = 6;

/// Number of f32 values per patch
pub const F32_PER_PATCH: usize = 2;

/// Chrome diff encoded for transfer to JS
#[derive(Debug, Default)]
pub struct ChromeBuffer {
    /// Opcodes, kinds, indices and text ranges
    pub u32_data: Vec<u32>,
    /// Geometry
    pub f32_data: Vec<f32>,
    /// UTF-8 labels
    pub text_data: Vec<u8>,
}

impl ChromeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.u32_data.clear();
        self.f32_data.clear();
        self.text_data.clear();
    }

    /// Encode a diff, replacing any previous contents
    pub fn encode(&mut self, diff: &ChromeDiff) {
        self.clear();
        self.u32_data
            .reserve(HEADER_SIZE + diff.patch_count() * U32_PER_PATCH);
        self.f32_data.reserve(diff.patch_count() * F32_PER_PATCH);

        self.u32_data.push(MAGIC); // [0] magic number
        self.u32_data.push(SCHEMA_VERSION); // [1] schema version
        self.u32_data.push(diff.patch_count() as u32); // [2] patch count
        self.u32_data.push(0); // [3] text_buffer_len (placeholder)

        for patch in &diff.patches {
            match patch {
                ChromePatch::Remove { id } => {
                    self.push_patch(OP_REMOVE, id.kind.code(), id.page, "", 0);
                    self.f32_data.extend_from_slice(&[0.0, 0.0]);
                }
                ChromePatch::Insert { element } => {
                    let id = element.id();
                    let page_number = match element {
                        ChromeElement::Footer { page_number, .. } => *page_number,
                        _ => 0,
                    };
                    self.push_patch(OP_INSERT, id.kind.code(), id.page, &element.label(), page_number);
                    self.f32_data
                        .extend_from_slice(&[element.top() as f32, element.height() as f32]);
                }
                ChromePatch::SetContainerHeight { height } => {
                    self.push_patch(OP_SET_CONTAINER_HEIGHT, 0, 0, "", 0);
                    self.f32_data.extend_from_slice(&[0.0, *height as f32]);
                }
            }
        }

        self.u32_data[3] = self.text_data.len() as u32;
    }

    fn push_patch(&mut self, opcode: u32, kind: u32, page: usize, text: &str, page_number: usize) {
        let text_offset = self.text_data.len() as u32;
        self.text_data.extend_from_slice(text.as_bytes());

        self.u32_data.extend_from_slice(&[
            opcode,
            kind,
            page as u32,
            text_offset,
            text.len() as u32,
            page_number as u32,
        ]);
    }

    pub fn patch_count(&self) -> usize {
        self.u32_data.get(2).copied().unwrap_or(0) as usize
    }

    /// u32 slice for patch `index`
    pub fn patch(&self, index: usize) -> Option<&[u32]> {
        let start = HEADER_SIZE + index * U32_PER_PATCH;
        self.u32_data.get(start..start + U32_PER_PATCH)
    }

    /// Decoded label of patch `index`
    pub fn patch_text(&self, index: usize) -> Option<&str> {
        let patch = self.patch(index)?;
        let (offset, len) = (patch[3] as usize, patch[4] as usize);
        std::str::from_utf8(self.text_data.get(offset..offset + len)?).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::layout::build_pages;
    use crate::render::{chrome_for, ChromeKind};

    fn grow_diff() -> ChromeDiff {
        let config = LayoutConfig {
            header_text: "transcript.txt".to_string(),
            footer_text: "Page".to_string(),
            ..LayoutConfig::default()
        };
        ChromeDiff::between(
            &chrome_for(&config, &build_pages(&config, 1)),
            &chrome_for(&config, &build_pages(&config, 2)),
            Some(890.0),
            1803.0,
        )
    }

    #[test]
    fn test_header() {
        let mut buffer = ChromeBuffer::new();
        let diff = grow_diff();
        buffer.encode(&diff);

        assert_eq!(buffer.u32_data[0], MAGIC);
        assert_eq!(buffer.u32_data[1], SCHEMA_VERSION);
        assert_eq!(buffer.patch_count(), 4);
        assert_eq!(buffer.u32_data[3] as usize, buffer.text_data.len());
        assert_eq!(buffer.u32_data.len(), HEADER_SIZE + 4 * U32_PER_PATCH);
        assert_eq!(buffer.f32_data.len(), 4 * F32_PER_PATCH);
    }

    #[test]
    fn test_insert_patches() {
        let mut buffer = ChromeBuffer::new();
        buffer.encode(&grow_diff());

        // Page break after page 0, then header and footer of page 1
        let brk = buffer.patch(0).unwrap();
        assert_eq!(brk[0], OP_INSERT);
        assert_eq!(brk[1], ChromeKind::PageBreak.code());
        assert_eq!(buffer.patch_text(0), Some("#ffffff"));
        assert_eq!(&buffer.f32_data[0..2], &[866.0f32, 71.0]);

        assert_eq!(buffer.patch_text(1), Some("transcript.txt"));

        let footer = buffer.patch(2).unwrap();
        assert_eq!(footer[2], 1);
        assert_eq!(footer[5], 2);
        assert_eq!(buffer.patch_text(2), Some("Page 2"));
    }

    #[test]
    fn test_container_height_patch() {
        let mut buffer = ChromeBuffer::new();
        buffer.encode(&grow_diff());

        let patch = buffer.patch(3).unwrap();
        assert_eq!(patch[0], OP_SET_CONTAINER_HEIGHT);
        assert_eq!(patch[4], 0);
        assert_eq!(buffer.f32_data[7], 1803.0);
    }

    #[test]
    fn test_reencode_replaces_contents() {
        let mut buffer = ChromeBuffer::new();
        buffer.encode(&grow_diff());
        buffer.encode(&ChromeDiff::default());

        assert_eq!(buffer.patch_count(), 0);
        assert_eq!(buffer.u32_data.len(), HEADER_SIZE);
        assert!(buffer.text_data.is_empty());
        assert_eq!(buffer.patch(0), None);
    }
}
