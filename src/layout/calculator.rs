//! # Message Size Calculator
//!
//! Turns one message of a [`ThreadSource`] into a cell size and a complete
//! [`LayoutAttributes`] record.
//!
//! ## Height policies
//!
//! The cell height depends on where the avatar is anchored vertically. With
//! `P` the container's vertical padding plus `message_vertical_spacing` and
//! `S` the `stack_spacing`:
//!
//! ```text
//! MessageCenter    max(avatar, labels + container + P), less compact_reduction
//!                  when compact (never below avatar)
//! MessageBottom    msgBottom + cellBottom + max(container + P + cellTop + msgTop, avatar)
//! MessageTop       cellTop + msgTop + max(container + P + msgBottom + cellBottom + S, avatar)
//! MessageLabelTop  cellTop + max(container + msgBottom + P + msgTop + cellBottom + S, avatar)
//! CellTop/Bottom   max(avatar, labels + container + P)
//! ```
//!
//! Every policy finally takes the max with the accessory height, so a cell
//! is never shorter than its avatar or accessory view.

use chrono::TimeDelta;
use log::warn;

use crate::core::date_format;
use crate::core::geometry::{EdgeInsets, Size};
use crate::core::message::{KindTag, Message};
use crate::core::thread::ThreadSource;
use crate::layout::attributes::{LayoutAttributes, LayoutError};
use crate::layout::kinds::{self, SizingInput};
use crate::layout::position::{AvatarPosition, VerticalAnchor};
use crate::layout::style::{CalculatorConfig, SideStyle};
use crate::layout::text;

/// Sizes of every piece of one cell, computed once per index.
#[derive(Debug, Clone, PartialEq)]
pub struct CellParts {
    pub avatar_size: Size,
    pub avatar_position: AvatarPosition,
    pub container_size: Size,
    pub container_padding: EdgeInsets,
    pub cell_top_label: Size,
    pub cell_bottom_label: Size,
    pub message_top_label: Size,
    pub message_bottom_label: Size,
    pub message_time_label: Size,
    pub accessory_size: Size,
    pub compact: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MessageSizeCalculator {
    config: CalculatorConfig,
}

impl MessageSizeCalculator {
    pub fn new(config: CalculatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// Whether the next message continues this one: same sender, same
    /// calendar day, and within the compaction window.
    pub fn is_compact_with_next<S: ThreadSource + ?Sized>(&self, source: &S, index: usize) -> bool {
        let next = index.checked_add(1).and_then(|next| source.message(next));
        let (Some(current), Some(next)) = (source.message(index), next) else {
            return false;
        };
        let same_sender = current.sender.id == next.sender.id;
        let same_day =
            date_format::is_same_day(&current.sent_at, &next.sent_at, &self.config.utc_offset);
        let window =
            TimeDelta::try_seconds(self.config.compaction_window_secs).unwrap_or(TimeDelta::MAX);
        let within_window = (next.sent_at - current.sent_at).abs() <= window;
        same_sender && same_day && within_window
    }

    fn side<S: ThreadSource + ?Sized>(&self, source: &S, message: &Message) -> (&SideStyle, bool) {
        let is_outgoing = source.is_from_current_sender(message);
        (self.config.side(is_outgoing), is_outgoing)
    }

    /// Avatar position with `Natural` resolved by message direction.
    pub fn avatar_position<S: ThreadSource + ?Sized>(
        &self,
        source: &S,
        message: &Message,
    ) -> AvatarPosition {
        let (side, is_outgoing) = self.side(source, message);
        side.avatar_position.resolved(is_outgoing)
    }

    fn avatar_size(&self, message: &Message, side: &SideStyle) -> Size {
        if message.tag() == KindTag::Header {
            Size::ZERO
        } else {
            side.avatar_size
        }
    }

    fn container_padding(&self, message: &Message, side: &SideStyle) -> EdgeInsets {
        if message.tag() == KindTag::Header {
            EdgeInsets::ZERO
        } else {
            side.container_padding
        }
    }

    fn label_size(&self, text: Option<String>, item_width: f32, insets: EdgeInsets) -> Size {
        let height = text
            .map(|text| {
                text::measure(
                    &text,
                    item_width - insets.horizontal(),
                    &self.config.metrics,
                    1.0,
                )
                .height
            })
            .unwrap_or(0.0);
        Size::new(item_width, height)
    }

    pub fn sizing_input<'a>(
        &'a self,
        message: &'a Message,
        side: &SideStyle,
        item_width: f32,
    ) -> SizingInput<'a> {
        SizingInput {
            message,
            config: &self.config,
            item_width,
            avatar_size: self.avatar_size(message, side),
            container_padding: self.container_padding(message, side),
            accessory_size: side.accessory_size,
            accessory_padding: side.accessory_padding,
        }
    }

    /// Widest the bubble of `message` may be.
    pub fn container_max_width<S: ThreadSource + ?Sized>(
        &self,
        source: &S,
        message: &Message,
        item_width: f32,
    ) -> f32 {
        let (side, _) = self.side(source, message);
        let input = self.sizing_input(message, side, item_width);
        (kinds::sizing_for(message.tag()).max_width)(&input)
    }

    pub fn container_size<S: ThreadSource + ?Sized>(
        &self,
        source: &S,
        message: &Message,
        item_width: f32,
    ) -> Size {
        let (side, _) = self.side(source, message);
        let input = self.sizing_input(message, side, item_width);
        (kinds::sizing_for(message.tag()).container_size)(&input)
    }

    pub fn cell_parts<S: ThreadSource + ?Sized>(
        &self,
        source: &S,
        index: usize,
        message: &Message,
        item_width: f32,
    ) -> CellParts {
        let (side, _) = self.side(source, message);
        let timestamp = source
            .message_timestamp_label(index)
            .map(|text| text::measure(&text, item_width, &self.config.metrics, 1.0))
            .unwrap_or(Size::ZERO);
        CellParts {
            avatar_size: self.avatar_size(message, side),
            avatar_position: self.avatar_position(source, message),
            container_size: self.container_size(source, message, item_width),
            container_padding: self.container_padding(message, side),
            cell_top_label: self.label_size(
                source.cell_top_label(index),
                item_width,
                side.cell_top_label_alignment.text_insets,
            ),
            cell_bottom_label: self.label_size(
                source.cell_bottom_label(index),
                item_width,
                side.cell_bottom_label_alignment.text_insets,
            ),
            message_top_label: self.label_size(
                source.message_top_label(index),
                item_width,
                side.message_top_label_alignment.text_insets,
            ),
            message_bottom_label: self.label_size(
                source.message_bottom_label(index),
                item_width,
                side.message_bottom_label_alignment.text_insets,
            ),
            message_time_label: timestamp,
            accessory_size: side.accessory_size,
            compact: self.is_compact_with_next(source, index),
        }
    }

    /// Cell height for already computed parts.
    pub fn height_for_parts(&self, parts: &CellParts) -> f32 {
        let metrics = &self.config.metrics;
        let container = parts.container_size.height;
        let cell_top = parts.cell_top_label.height;
        let cell_bottom = parts.cell_bottom_label.height;
        let message_top = parts.message_top_label.height;
        let message_bottom = parts.message_bottom_label.height;
        let padding = parts.container_padding.vertical() + metrics.message_vertical_spacing;
        let stack = metrics.stack_spacing;
        let avatar = parts.avatar_size.height;
        let labels_and_container =
            cell_top + message_top + container + padding + message_bottom + cell_bottom;

        let height = match parts.avatar_position.vertical {
            VerticalAnchor::MessageCenter => {
                let height = avatar.max(labels_and_container);
                if parts.compact {
                    (height - metrics.compact_reduction).max(avatar)
                } else {
                    height
                }
            }
            VerticalAnchor::MessageBottom => {
                message_bottom
                    + cell_bottom
                    + (container + padding + cell_top + message_top).max(avatar)
            }
            VerticalAnchor::MessageTop => {
                cell_top
                    + message_top
                    + (container + padding + message_bottom + cell_bottom + stack).max(avatar)
            }
            VerticalAnchor::MessageLabelTop => {
                cell_top
                    + (container + message_bottom + padding + message_top + cell_bottom + stack)
                        .max(avatar)
            }
            VerticalAnchor::CellTop | VerticalAnchor::CellBottom => {
                avatar.max(labels_and_container)
            }
        };
        height.max(parts.accessory_size.height)
    }

    pub fn cell_content_height<S: ThreadSource + ?Sized>(
        &self,
        source: &S,
        index: usize,
        item_width: f32,
    ) -> f32 {
        match source.message(index) {
            Some(message) => {
                let parts = self.cell_parts(source, index, message, item_width);
                self.height_for_parts(&parts)
            }
            None => 0.0,
        }
    }

    /// Size of the cell at `index`. Degenerate geometry collapses to zero.
    pub fn size_for_item<S: ThreadSource + ?Sized>(
        &self,
        source: &S,
        index: usize,
        item_width: f32,
    ) -> Size {
        if source.message(index).is_none() {
            warn!(
                "size_for_item: index {index} out of range for thread of {}",
                source.len()
            );
            return Size::ZERO;
        }
        let height = self.cell_content_height(source, index, item_width);
        if item_width < 0.0 || height < 0.0 {
            return Size::ZERO;
        }
        Size::new(item_width, height)
    }

    pub fn attributes_for_item<S: ThreadSource + ?Sized>(
        &self,
        source: &S,
        index: usize,
        item_width: f32,
    ) -> Result<LayoutAttributes, LayoutError> {
        let message = source.message(index).ok_or(LayoutError::IndexOutOfRange {
            index,
            len: source.len(),
        })?;
        let (side, _) = self.side(source, message);
        let parts = self.cell_parts(source, index, message, item_width);
        let height = self.height_for_parts(&parts);
        let size = if item_width < 0.0 || height < 0.0 {
            Size::ZERO
        } else {
            Size::new(item_width, height)
        };
        let sizing = kinds::sizing_for(message.tag());

        LayoutAttributes::builder(index)
            .size(size)
            .avatar_size(parts.avatar_size)
            .avatar_position(parts.avatar_position)
            .avatar_leading_trailing_padding(self.config.avatar_leading_trailing_padding)
            .container_size(parts.container_size)
            .container_padding(parts.container_padding)
            .cell_top_label_size(parts.cell_top_label)
            .cell_top_label_alignment(side.cell_top_label_alignment)
            .cell_bottom_label_size(parts.cell_bottom_label)
            .cell_bottom_label_alignment(side.cell_bottom_label_alignment)
            .message_top_label_size(parts.message_top_label)
            .message_top_label_alignment(side.message_top_label_alignment)
            .message_bottom_label_size(parts.message_bottom_label)
            .message_bottom_label_alignment(side.message_bottom_label_alignment)
            .message_time_label_size(parts.message_time_label)
            .message_label_insets((sizing.label_insets)(&self.config))
            .accessory_size(parts.accessory_size)
            .accessory_padding(side.accessory_padding)
            .accessory_position(side.accessory_position)
            .kind(message.tag())
            .compact(parts.compact)
            .build()
    }
}
