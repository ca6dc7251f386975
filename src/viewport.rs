//! Fixed-height windowing on top of [`virtualizer`].
//!
//! Sizes and offsets are measured in terminal lines along the scroll axis.
//! The engine only knows how many rows exist and how tall each one is;
//! [`FeedList`] keeps the scroll offset clamped and exposes the handful of
//! moves the browser needs.

use virtualizer::{Virtualizer, VirtualizerOptions};

pub use virtualizer::{VirtualItem, VirtualRange};

/// Rows rendered past each edge of the viewport.
pub const OVERSCAN: usize = 3;

#[derive(Clone, Debug)]
pub struct FeedList {
    engine: Virtualizer,
    row_height: u32,
}

impl FeedList {
    pub fn new(count: usize, row_height: u32, viewport_size: u32) -> Self {
        let row_height = row_height.max(1);
        let options = VirtualizerOptions::new(count, move |_| row_height).with_overscan(OVERSCAN);
        let mut engine = Virtualizer::new(options);
        engine.set_viewport_and_scroll_clamped(viewport_size, 0);

        Self { engine, row_height }
    }

    pub fn count(&self) -> usize {
        self.engine.count()
    }

    pub fn row_height(&self) -> u32 {
        self.row_height
    }

    pub fn viewport_size(&self) -> u32 {
        self.engine.viewport_size()
    }

    pub fn scroll_offset(&self) -> u64 {
        self.engine.scroll_offset()
    }

    /// Change the row count, pulling the offset back if the list shrank.
    pub fn set_count(&mut self, count: usize) {
        self.engine.set_count(count);
        let offset = self.engine.clamp_scroll_offset(self.engine.scroll_offset());
        self.engine.set_scroll_offset(offset);
    }

    pub fn scroll_to_offset(&mut self, offset: u64) {
        self.engine.set_scroll_offset_clamped(offset);
    }

    pub fn scroll_by(&mut self, delta: i64) {
        let current = self.engine.scroll_offset();
        let offset = if delta.is_negative() {
            current.saturating_sub(delta.unsigned_abs())
        } else {
            current.saturating_add(delta as u64)
        };
        self.scroll_to_offset(offset);
    }

    pub fn page_down(&mut self) {
        self.scroll_by(self.viewport_size() as i64);
    }

    pub fn page_up(&mut self) {
        self.scroll_by(-(self.viewport_size() as i64));
    }

    pub fn scroll_to_end(&mut self) {
        self.scroll_to_offset(self.engine.max_scroll_offset());
    }

    /// Rows intersecting the viewport, without overscan.
    pub fn visible_range(&self) -> VirtualRange {
        self.engine.visible_range()
    }

    /// Visible rows plus the overscan margin, in index order.
    pub fn virtual_items(&self) -> Vec<VirtualItem> {
        let mut items = Vec::new();
        self.engine.collect_virtual_items(&mut items);
        items
    }
}
