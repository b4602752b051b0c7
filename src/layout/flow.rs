//! # Flow Layout
//!
//! Stacks cells vertically inside a section and keeps their heights cached.
//!
//! ## Caching
//!
//! Heights are computed once per index and reused across frames. The cache
//! is thrown away when the item width changes or the thread shrinks. When
//! messages are appended, the previous last item is recomputed as well: its
//! compaction depends on the neighbour that just arrived.
//!
//! ## Coordinates
//!
//! Item frames are in content space: the section's top inset comes first,
//! then the items back to back, then the optional typing indicator, then the
//! bottom inset.

use std::ops::Range;

use log::debug;

use crate::core::geometry::{EdgeInsets, Rect, Size};
use crate::core::thread::ThreadSource;
use crate::layout::attributes::{LayoutAttributes, LayoutError};
use crate::layout::calculator::MessageSizeCalculator;

/// Cached layout measurements
#[derive(Debug, Clone, Default)]
pub struct LayoutCache {
    pub heights: Vec<f32>,
    pub prefix_heights: Vec<f32>,
    item_count: usize,
    item_width: f32,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many leading heights are still valid for `item_count` items laid
    /// out at `item_width`.
    pub fn reusable_count(&self, item_count: usize, item_width: f32) -> usize {
        if self.item_width != item_width || self.heights.is_empty() {
            return 0;
        }
        // Fewer items than cached: the thread was replaced.
        if item_count < self.item_count {
            return 0;
        }
        if item_count > self.item_count {
            return self.item_count.saturating_sub(1);
        }
        item_count
    }

    pub fn update_metadata(&mut self, item_count: usize, item_width: f32) {
        self.item_count = item_count;
        self.item_width = item_width;
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0.0f32, |acc, &h| {
                *acc += h;
                Some(*acc)
            })
            .collect();
    }

    pub fn clear(&mut self) {
        self.heights.clear();
        self.prefix_heights.clear();
        self.item_count = 0;
    }

    pub fn total_height(&self) -> f32 {
        self.prefix_heights.last().copied().unwrap_or(0.0)
    }

    /// Top of item `index`, relative to the first item.
    pub fn item_top(&self, index: usize) -> f32 {
        if index == 0 {
            0.0
        } else {
            self.prefix_heights
                .get(index - 1)
                .copied()
                .unwrap_or_else(|| self.total_height())
        }
    }

    /// Items overlapping the viewport, padded by half a viewport on both
    /// sides.
    pub fn visible_range(&self, scroll_offset: f32, viewport_height: f32) -> Range<usize> {
        let buffer = viewport_height / 2.0;
        let buffered_start = (scroll_offset - buffer).max(0.0);
        let buffered_end = scroll_offset + viewport_height + buffer;

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end.max(start)
    }

    /// Index of the item covering offset `y`.
    pub fn item_at(&self, y: f32) -> Option<usize> {
        if y < 0.0 {
            return None;
        }
        let index = self.prefix_heights.partition_point(|&end| end <= y);
        (index < self.prefix_heights.len()).then_some(index)
    }
}

#[derive(Debug, Clone)]
pub struct MessagesFlowLayout {
    calculator: MessageSizeCalculator,
    section_insets: EdgeInsets,
    content_width: f32,
    typing_indicator_height: f32,
    typing_indicator_visible: bool,
    cache: LayoutCache,
}

impl MessagesFlowLayout {
    pub fn new(calculator: MessageSizeCalculator, section_insets: EdgeInsets) -> Self {
        let typing_indicator_height = calculator.config().metrics.line_height * 2.0;
        Self {
            calculator,
            section_insets,
            content_width: 0.0,
            typing_indicator_height,
            typing_indicator_visible: false,
            cache: LayoutCache::new(),
        }
    }

    pub fn calculator(&self) -> &MessageSizeCalculator {
        &self.calculator
    }

    /// Swaps the calculator and drops every cached height.
    pub fn set_calculator(&mut self, calculator: MessageSizeCalculator) {
        self.calculator = calculator;
        self.cache.clear();
    }

    pub fn cache(&self) -> &LayoutCache {
        &self.cache
    }

    pub fn section_insets(&self) -> EdgeInsets {
        self.section_insets
    }

    pub fn set_content_width(&mut self, width: f32) {
        self.content_width = width;
    }

    /// Width available to every cell.
    pub fn item_width(&self) -> f32 {
        self.content_width - self.section_insets.horizontal()
    }

    pub fn set_typing_indicator_visible(&mut self, visible: bool) {
        self.typing_indicator_visible = visible;
    }

    pub fn typing_indicator_visible(&self) -> bool {
        self.typing_indicator_visible
    }

    pub fn with_typing_indicator_height(mut self, height: f32) -> Self {
        self.typing_indicator_height = height;
        self
    }

    /// Brings the height cache up to date with `source`.
    pub fn prepare<S: ThreadSource + ?Sized>(&mut self, source: &S) {
        let count = source.len();
        let item_width = self.item_width();
        let reusable = self.cache.reusable_count(count, item_width);
        self.cache.heights.truncate(reusable);

        let first_new = self.cache.heights.len();
        for index in first_new..count {
            let height = self.calculator.size_for_item(source, index, item_width).height;
            self.cache.heights.push(height);
        }
        if first_new < count {
            debug!("Measured items {first_new}..{count} at width {item_width}");
        }
        self.cache.rebuild_prefix_heights();
        self.cache.update_metadata(count, item_width);
    }

    pub fn size_for_item<S: ThreadSource + ?Sized>(&self, source: &S, index: usize) -> Size {
        self.calculator.size_for_item(source, index, self.item_width())
    }

    pub fn attributes_for_item<S: ThreadSource + ?Sized>(
        &self,
        source: &S,
        index: usize,
    ) -> Result<LayoutAttributes, LayoutError> {
        self.calculator
            .attributes_for_item(source, index, self.item_width())
    }

    /// Frame of item `index` in content space, from the cache.
    pub fn item_frame(&self, index: usize) -> Option<Rect> {
        let height = *self.cache.heights.get(index)?;
        Some(Rect::new(
            self.section_insets.left,
            self.section_insets.top + self.cache.item_top(index),
            self.item_width(),
            height,
        ))
    }

    pub fn typing_indicator_frame(&self) -> Option<Rect> {
        self.typing_indicator_visible.then(|| {
            Rect::new(
                self.section_insets.left,
                self.section_insets.top + self.cache.total_height(),
                self.item_width(),
                self.typing_indicator_height,
            )
        })
    }

    pub fn content_height(&self) -> f32 {
        let typing = if self.typing_indicator_visible {
            self.typing_indicator_height
        } else {
            0.0
        };
        self.section_insets.top + self.cache.total_height() + typing + self.section_insets.bottom
    }

    /// Items worth rendering for a viewport at `scroll_offset`.
    pub fn visible_range(&self, scroll_offset: f32, viewport_height: f32) -> Range<usize> {
        self.cache
            .visible_range(scroll_offset - self.section_insets.top, viewport_height)
    }

    /// Item under content offset `y`.
    pub fn item_at(&self, y: f32) -> Option<usize> {
        self.cache.item_at(y - self.section_insets.top)
    }
}
