//! # Layout Metrics
//!
//! Every constant the sizing and positioning code uses, grouped so one
//! value set describes a pixel-density (points) and another describes a
//! character grid (terminal cells).

use serde::{Deserialize, Serialize};

use crate::core::geometry::Size;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutMetrics {
    /// Added to the container's vertical padding in every height policy.
    pub message_vertical_spacing: f32,
    /// Extra gap in the stacked (top-anchored) policies and container origin.
    pub stack_spacing: f32,
    /// Height removed from a compact message-center cell.
    pub compact_reduction: f32,
    pub header_width_inset: f32,
    /// Header text height grows by this fraction of itself.
    pub header_height_factor: f32,
    /// Image area below a media caption.
    pub media_height: f32,
    /// Details strip below a file or audio caption.
    pub attachment_height: f32,
    /// Gap between the container and the message-bottom label.
    pub label_gap: f32,
    pub bottom_label_x: f32,
    pub message_top_label_gap: f32,
    pub message_top_label_height: f32,
    pub message_top_label_x: f32,
    pub avatar_vertical_nudge: f32,
    pub container_leading_gap: f32,
    pub media_leading_gap: f32,
    /// Width of one measured character.
    pub char_width: f32,
    pub line_height: f32,
    /// Emoji-only messages render at this multiple of the text size.
    pub emoji_scale: f32,
    pub play_button_size: Size,
    /// Play button offset from the top-left of the attachment strip.
    pub play_button_inset: f32,
    /// Touch slop around the play button.
    pub play_button_slop: f32,
    pub contact_size: Size,
    pub location_size: Size,
    pub link_thumbnail_height: f32,
}

impl LayoutMetrics {
    /// Point-based metrics for a pixel canvas.
    pub fn points() -> Self {
        Self {
            message_vertical_spacing: 10.0,
            stack_spacing: 12.0,
            compact_reduction: 17.0,
            header_width_inset: 20.0,
            header_height_factor: 0.95,
            media_height: 64.0,
            attachment_height: 72.0,
            label_gap: 8.0,
            bottom_label_x: 8.0,
            message_top_label_gap: 10.0,
            message_top_label_height: 22.0,
            message_top_label_x: 6.0,
            avatar_vertical_nudge: 2.0,
            container_leading_gap: 4.0,
            media_leading_gap: 10.0,
            char_width: 7.0,
            line_height: 17.0,
            emoji_scale: 2.0,
            play_button_size: Size::new(32.0, 32.0),
            play_button_inset: 12.0,
            play_button_slop: 10.0,
            contact_size: Size::new(220.0, 64.0),
            location_size: Size::new(240.0, 160.0),
            link_thumbnail_height: 120.0,
        }
    }

    /// Character-cell metrics for a terminal grid.
    pub fn cells() -> Self {
        Self {
            message_vertical_spacing: 0.0,
            stack_spacing: 1.0,
            compact_reduction: 1.0,
            header_width_inset: 2.0,
            header_height_factor: 0.0,
            media_height: 3.0,
            attachment_height: 2.0,
            label_gap: 0.0,
            bottom_label_x: 1.0,
            message_top_label_gap: 0.0,
            message_top_label_height: 1.0,
            message_top_label_x: 1.0,
            avatar_vertical_nudge: 0.0,
            container_leading_gap: 1.0,
            media_leading_gap: 1.0,
            char_width: 1.0,
            line_height: 1.0,
            emoji_scale: 1.0,
            play_button_size: Size::new(3.0, 1.0),
            play_button_inset: 1.0,
            play_button_slop: 1.0,
            contact_size: Size::new(24.0, 3.0),
            location_size: Size::new(24.0, 4.0),
            link_thumbnail_height: 2.0,
        }
    }
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self::points()
    }
}
