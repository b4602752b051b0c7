//! Per-direction styling the size calculator reads.
//!
//! Incoming and outgoing messages each carry their own [`SideStyle`]; the
//! calculator picks one with [`CalculatorConfig::side`].

use chrono::{FixedOffset, Offset, Utc};

use crate::core::geometry::{EdgeInsets, HorizontalEdgeInsets, Size};
use crate::layout::attributes::{LabelAlignment, TextAlignment};
use crate::layout::metrics::LayoutMetrics;
use crate::layout::position::{AccessoryPosition, AvatarPosition, VerticalAnchor};

/// Messages closer together than this collapse into one visual run.
pub const DEFAULT_COMPACTION_WINDOW_SECS: i64 = 60;

#[derive(Debug, Clone, PartialEq)]
pub struct SideStyle {
    pub avatar_size: Size,
    pub avatar_position: AvatarPosition,
    pub container_padding: EdgeInsets,
    pub cell_top_label_alignment: LabelAlignment,
    pub cell_bottom_label_alignment: LabelAlignment,
    pub message_top_label_alignment: LabelAlignment,
    pub message_bottom_label_alignment: LabelAlignment,
    pub accessory_size: Size,
    pub accessory_padding: HorizontalEdgeInsets,
    pub accessory_position: AccessoryPosition,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorConfig {
    pub metrics: LayoutMetrics,
    pub incoming: SideStyle,
    pub outgoing: SideStyle,
    pub avatar_leading_trailing_padding: f32,
    /// Text insets inside text, attributed-text and emoji bubbles.
    pub text_insets: EdgeInsets,
    pub header_insets: EdgeInsets,
    /// Caption insets inside photo, video and gif bubbles.
    pub media_insets: EdgeInsets,
    pub compaction_window_secs: i64,
    /// Offset used to decide whether two messages fall on the same day.
    pub utc_offset: FixedOffset,
}

impl CalculatorConfig {
    pub fn points() -> Self {
        let label_inset = 42.0;
        let incoming = SideStyle {
            avatar_size: Size::new(24.0, 24.0),
            avatar_position: AvatarPosition::default(),
            container_padding: EdgeInsets::right(16.0),
            cell_top_label_alignment: LabelAlignment::new(
                TextAlignment::Center,
                EdgeInsets::left(label_inset),
            ),
            cell_bottom_label_alignment: LabelAlignment::new(
                TextAlignment::Left,
                EdgeInsets::left(label_inset),
            ),
            message_top_label_alignment: LabelAlignment::new(
                TextAlignment::Left,
                EdgeInsets::new(14.0, label_inset, 0.0, 0.0),
            ),
            message_bottom_label_alignment: LabelAlignment::new(
                TextAlignment::Left,
                EdgeInsets::left(label_inset),
            ),
            accessory_size: Size::ZERO,
            accessory_padding: HorizontalEdgeInsets::ZERO,
            accessory_position: VerticalAnchor::MessageCenter,
        };
        let outgoing = SideStyle {
            container_padding: EdgeInsets::left(16.0),
            cell_top_label_alignment: LabelAlignment::new(TextAlignment::Center, EdgeInsets::ZERO),
            cell_bottom_label_alignment: LabelAlignment::new(
                TextAlignment::Right,
                EdgeInsets::right(label_inset),
            ),
            message_top_label_alignment: LabelAlignment::new(
                TextAlignment::Right,
                EdgeInsets::right(label_inset),
            ),
            message_bottom_label_alignment: LabelAlignment::new(
                TextAlignment::Right,
                EdgeInsets::right(label_inset),
            ),
            ..incoming.clone()
        };
        Self {
            metrics: LayoutMetrics::points(),
            incoming,
            outgoing,
            avatar_leading_trailing_padding: 16.0,
            text_insets: EdgeInsets::new(7.0, 14.0, 7.0, 14.0),
            header_insets: EdgeInsets::new(0.0, 8.0, 12.0, 8.0),
            media_insets: EdgeInsets::new(8.0, 0.0, 8.0, 4.0),
            compaction_window_secs: DEFAULT_COMPACTION_WINDOW_SECS,
            utc_offset: Utc.fix(),
        }
    }

    pub fn cells() -> Self {
        let label_inset = 5.0;
        let incoming = SideStyle {
            avatar_size: Size::new(3.0, 1.0),
            avatar_position: AvatarPosition::default(),
            container_padding: EdgeInsets::right(2.0),
            cell_top_label_alignment: LabelAlignment::new(TextAlignment::Center, EdgeInsets::ZERO),
            cell_bottom_label_alignment: LabelAlignment::new(
                TextAlignment::Left,
                EdgeInsets::left(label_inset),
            ),
            message_top_label_alignment: LabelAlignment::new(
                TextAlignment::Left,
                EdgeInsets::left(label_inset),
            ),
            message_bottom_label_alignment: LabelAlignment::new(
                TextAlignment::Left,
                EdgeInsets::left(label_inset),
            ),
            accessory_size: Size::ZERO,
            accessory_padding: HorizontalEdgeInsets::ZERO,
            accessory_position: VerticalAnchor::MessageCenter,
        };
        let outgoing = SideStyle {
            container_padding: EdgeInsets::left(2.0),
            cell_bottom_label_alignment: LabelAlignment::new(
                TextAlignment::Right,
                EdgeInsets::right(label_inset),
            ),
            message_top_label_alignment: LabelAlignment::new(
                TextAlignment::Right,
                EdgeInsets::right(label_inset),
            ),
            message_bottom_label_alignment: LabelAlignment::new(
                TextAlignment::Right,
                EdgeInsets::right(label_inset),
            ),
            ..incoming.clone()
        };
        Self {
            metrics: LayoutMetrics::cells(),
            incoming,
            outgoing,
            avatar_leading_trailing_padding: 1.0,
            text_insets: EdgeInsets::new(1.0, 2.0, 1.0, 2.0),
            header_insets: EdgeInsets::new(0.0, 1.0, 0.0, 1.0),
            media_insets: EdgeInsets::new(1.0, 0.0, 1.0, 0.0),
            compaction_window_secs: DEFAULT_COMPACTION_WINDOW_SECS,
            utc_offset: Utc.fix(),
        }
    }

    pub fn side(&self, is_outgoing: bool) -> &SideStyle {
        if is_outgoing {
            &self.outgoing
        } else {
            &self.incoming
        }
    }

    /// Sets the avatar vertical anchor for both directions.
    pub fn with_avatar_vertical(mut self, vertical: VerticalAnchor) -> Self {
        self.incoming.avatar_position.vertical = vertical;
        self.outgoing.avatar_position.vertical = vertical;
        self
    }

    /// Sets the accessory view for both directions.
    pub fn with_accessory(
        mut self,
        size: Size,
        padding: HorizontalEdgeInsets,
        position: AccessoryPosition,
    ) -> Self {
        for side in [&mut self.incoming, &mut self.outgoing] {
            side.accessory_size = size;
            side.accessory_padding = padding;
            side.accessory_position = position;
        }
        self
    }
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self::points()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sides_mirror_padding() {
        let config = CalculatorConfig::points();
        assert_eq!(config.side(false).container_padding.right, 16.0);
        assert_eq!(config.side(true).container_padding.left, 16.0);
        assert_eq!(
            config.side(true).message_bottom_label_alignment.text_alignment,
            TextAlignment::Right
        );
    }

    #[test]
    fn test_with_avatar_vertical_sets_both_sides() {
        let config = CalculatorConfig::cells().with_avatar_vertical(VerticalAnchor::CellBottom);
        assert_eq!(config.incoming.avatar_position.vertical, VerticalAnchor::CellBottom);
        assert_eq!(config.outgoing.avatar_position.vertical, VerticalAnchor::CellBottom);
    }
}
