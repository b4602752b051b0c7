//! # Content Cell
//!
//! Places every sub-view of a message cell from its [`LayoutAttributes`] and
//! resolves taps against the result.
//!
//! ## Placement order
//!
//! ```text
//! container → message-bottom label → cell-bottom label → cell-top label
//!           → message-top label → avatar → accessory
//! ```
//!
//! Each step reads only frames placed before it. All frames are in the
//! cell's local space, origin at the cell's top-left corner.
//!
//! ## Stacking
//!
//! Bottom to top: accessory, cell-top label, message-top label,
//! message-bottom label, cell-bottom label, container, avatar. The avatar
//! covers the container where they overlap, so a tap there is an avatar tap.

use crate::core::geometry::{Point, Rect, Size};
use crate::core::message::KindTag;
use crate::layout::attributes::LayoutAttributes;
use crate::layout::metrics::LayoutMetrics;
use crate::layout::position::{HorizontalAnchor, VerticalAnchor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentHit {
    Image,
    PlayButton,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapTarget {
    Content(ContentHit),
    Message,
    Avatar,
    CellTopLabel,
    CellBottomLabel,
    MessageTopLabel,
    MessageBottomLabel,
    AccessoryView,
    Background,
}

/// Frames of every sub-view of one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellFrames {
    pub size: Size,
    pub container: Rect,
    pub message_bottom_label: Rect,
    pub cell_bottom_label: Rect,
    pub cell_top_label: Rect,
    pub message_top_label: Rect,
    pub avatar: Rect,
    pub accessory: Rect,
    /// Image area of photo, video and gif bubbles.
    pub image: Option<Rect>,
    /// Play button of audio and video bubbles, without touch slop.
    pub play_button: Option<Rect>,
    /// Avatar is not drawn for a message continued by the next one.
    pub avatar_hidden: bool,
    /// Added around the play button when hit-testing.
    play_button_slop: f32,
}

fn resolved_side(attrs: &LayoutAttributes) -> HorizontalAnchor {
    match attrs.avatar_position.horizontal {
        HorizontalAnchor::Natural => panic!(
            "avatar position for item {} is still Natural; the size calculator must resolve it",
            attrs.index
        ),
        side => side,
    }
}

fn container_frame(attrs: &LayoutAttributes, metrics: &LayoutMetrics) -> Rect {
    let side = resolved_side(attrs);
    let padding = attrs.container_padding;
    let size = attrs.container_size;
    let cell = attrs.size;

    let centered = cell.height / 2.0 - (size.height + padding.vertical()) / 2.0;
    let stacked = attrs.cell_top_label_size.height
        + attrs.message_top_label_size.height
        + padding.top
        + metrics.stack_spacing;
    let default_y = if attrs.accessory_size.height > size.height {
        centered
    } else {
        stacked
    };

    let y = match attrs.avatar_position.vertical {
        VerticalAnchor::MessageBottom => {
            cell.height
                - padding.bottom
                - attrs.cell_bottom_label_size.height
                - attrs.message_bottom_label_size.height
                - size.height
                - padding.top
        }
        VerticalAnchor::MessageCenter if attrs.avatar_size.height > size.height => centered,
        _ => default_y,
    };

    let x = match side {
        HorizontalAnchor::CellLeading => {
            let gap = if attrs.kind.is_media() {
                metrics.media_leading_gap
            } else {
                metrics.container_leading_gap
            };
            attrs.avatar_size.width + padding.left + gap
        }
        _ => {
            cell.width
                - attrs.avatar_size.width
                - size.width
                - padding.right
                - attrs.avatar_leading_trailing_padding
        }
    };

    let frame = Rect::new(x, y, size.width, size.height);
    if attrs.kind == KindTag::Header {
        frame.centered_on(Point::new(cell.width / 2.0, cell.height / 2.0))
    } else {
        frame
    }
}

fn avatar_frame(
    attrs: &LayoutAttributes,
    metrics: &LayoutMetrics,
    container: &Rect,
    message_top_label: &Rect,
) -> Rect {
    let avatar = attrs.avatar_size;
    let padding = attrs.avatar_leading_trailing_padding;
    let x = match resolved_side(attrs) {
        HorizontalAnchor::CellLeading => padding,
        _ => attrs.size.width - avatar.width - padding,
    };
    let y = match attrs.avatar_position.vertical {
        VerticalAnchor::MessageLabelTop => message_top_label.min_y() + metrics.avatar_vertical_nudge,
        VerticalAnchor::MessageTop => container.min_y() + metrics.avatar_vertical_nudge,
        VerticalAnchor::MessageBottom => container.max_y() - avatar.height,
        VerticalAnchor::MessageCenter => container.mid_y() - avatar.height / 2.0,
        VerticalAnchor::CellBottom => attrs.size.height - avatar.height,
        VerticalAnchor::CellTop => 0.0,
    };
    Rect::new(x, y, avatar.width, avatar.height)
}

fn accessory_frame(attrs: &LayoutAttributes, container: &Rect, message_top_label: &Rect) -> Rect {
    let accessory = attrs.accessory_size;
    let y = match attrs.accessory_position {
        VerticalAnchor::MessageLabelTop => message_top_label.min_y(),
        VerticalAnchor::MessageTop => container.min_y(),
        VerticalAnchor::MessageBottom => container.max_y() - accessory.height,
        VerticalAnchor::MessageCenter => container.mid_y() - accessory.height / 2.0,
        VerticalAnchor::CellBottom => attrs.size.height - accessory.height,
        VerticalAnchor::CellTop => 0.0,
    };
    // Opposite side of the avatar.
    let x = match resolved_side(attrs) {
        HorizontalAnchor::CellLeading => container.max_x() + attrs.accessory_padding.left,
        _ => container.min_x() - attrs.accessory_padding.right - accessory.width,
    };
    Rect::new(x, y, accessory.width, accessory.height)
}

/// Computes every frame of the cell described by `attrs`.
///
/// # Panics
///
/// When the avatar's horizontal position is still `Natural`.
pub fn layout_cell(attrs: &LayoutAttributes, metrics: &LayoutMetrics) -> CellFrames {
    let container = container_frame(attrs, metrics);

    let message_bottom_label = Rect::new(
        metrics.bottom_label_x,
        container.max_y() + metrics.label_gap,
        attrs.message_bottom_label_size.width,
        attrs.message_bottom_label_size.height,
    );
    let cell_bottom_label = Rect::from_origin_size(
        Point::new(0.0, message_bottom_label.max_y()),
        attrs.cell_bottom_label_size,
    );
    let cell_top_label = Rect::from_origin_size(Point::ZERO, attrs.cell_top_label_size);

    let message_top_height = if attrs.message_top_label_size.height > 0.0 {
        metrics.message_top_label_height
    } else {
        0.0
    };
    let message_top_label = Rect::new(
        metrics.message_top_label_x,
        container.min_y()
            - attrs.container_padding.top
            - attrs.message_top_label_size.height
            - metrics.message_top_label_gap,
        attrs.message_top_label_size.width,
        message_top_height,
    );

    let avatar = avatar_frame(attrs, metrics, &container, &message_top_label);
    let accessory = accessory_frame(attrs, &container, &message_top_label);

    let insets = attrs.message_label_insets;
    let image = attrs.kind.is_media().then(|| {
        Rect::new(
            container.min_x() + insets.left,
            container.max_y() - insets.bottom - metrics.media_height,
            container.size.width - insets.horizontal(),
            metrics.media_height,
        )
    });
    let play_size = metrics.play_button_size;
    let play_button = match attrs.kind {
        KindTag::Audio => Some(Rect::new(
            container.min_x() + metrics.play_button_inset,
            container.max_y() - metrics.attachment_height + metrics.play_button_inset,
            play_size.width,
            play_size.height,
        )),
        KindTag::Video => image.map(|area| {
            Rect::from_origin_size(Point::ZERO, play_size)
                .centered_on(Point::new(area.mid_x(), area.mid_y()))
        }),
        _ => None,
    };

    CellFrames {
        size: attrs.size,
        container,
        message_bottom_label,
        cell_bottom_label,
        cell_top_label,
        message_top_label,
        avatar,
        accessory,
        image,
        play_button,
        avatar_hidden: attrs.compact,
        play_button_slop: metrics.play_button_slop,
    }
}

impl CellFrames {
    /// Part of the container not covered by the avatar.
    fn container_visible_at(&self, point: Point) -> bool {
        self.container.contains(point) && !self.avatar.contains(point)
    }

    fn content_hit(&self, point: Point) -> Option<ContentHit> {
        let slop = self.play_button_slop;
        if self
            .play_button
            .is_some_and(|button| button.inflate(slop, slop).contains(point))
        {
            return Some(ContentHit::PlayButton);
        }
        if self.image.is_some_and(|image| image.contains(point)) {
            return Some(ContentHit::Image);
        }
        None
    }

    /// Resolves a tap at `point` (cell-local) to the sub-view it lands on.
    pub fn hit_test(&self, point: Point) -> TapTarget {
        if self.container_visible_at(point) {
            return match self.content_hit(point) {
                Some(hit) => TapTarget::Content(hit),
                None => TapTarget::Message,
            };
        }
        let targets = [
            (self.avatar, TapTarget::Avatar),
            (self.cell_top_label, TapTarget::CellTopLabel),
            (self.cell_bottom_label, TapTarget::CellBottomLabel),
            (self.message_top_label, TapTarget::MessageTopLabel),
            (self.message_bottom_label, TapTarget::MessageBottomLabel),
            (self.accessory, TapTarget::AccessoryView),
        ];
        targets
            .into_iter()
            .find(|(frame, _)| frame.contains(point))
            .map(|(_, target)| target)
            .unwrap_or(TapTarget::Background)
    }

    /// Long presses only register on the message container.
    pub fn long_press(&self, point: Point) -> bool {
        self.container.contains(point)
    }
}

/// Receives taps resolved by [`CellFrames::hit_test`]. Every callback
/// defaults to doing nothing.
pub trait MessageCellDelegate {
    fn did_tap_message(&mut self, _index: usize) {}
    fn did_tap_avatar(&mut self, _index: usize) {}
    fn did_tap_cell_top_label(&mut self, _index: usize) {}
    fn did_tap_cell_bottom_label(&mut self, _index: usize) {}
    fn did_tap_message_top_label(&mut self, _index: usize) {}
    fn did_tap_message_bottom_label(&mut self, _index: usize) {}
    fn did_tap_accessory_view(&mut self, _index: usize) {}
    fn did_tap_image(&mut self, _index: usize) {}
    fn did_tap_play_button(&mut self, _index: usize) {}
    fn did_tap_background(&mut self, _index: usize) {}
    fn did_long_press_message(&mut self, _index: usize) {}
}

/// Routes `target` to the matching delegate callback.
pub fn dispatch_tap<D: MessageCellDelegate + ?Sized>(
    delegate: &mut D,
    index: usize,
    target: TapTarget,
) {
    match target {
        TapTarget::Content(ContentHit::Image) => delegate.did_tap_image(index),
        TapTarget::Content(ContentHit::PlayButton) => delegate.did_tap_play_button(index),
        TapTarget::Message => delegate.did_tap_message(index),
        TapTarget::Avatar => delegate.did_tap_avatar(index),
        TapTarget::CellTopLabel => delegate.did_tap_cell_top_label(index),
        TapTarget::CellBottomLabel => delegate.did_tap_cell_bottom_label(index),
        TapTarget::MessageTopLabel => delegate.did_tap_message_top_label(index),
        TapTarget::MessageBottomLabel => delegate.did_tap_message_bottom_label(index),
        TapTarget::AccessoryView => delegate.did_tap_accessory_view(index),
        TapTarget::Background => delegate.did_tap_background(index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::{EdgeInsets, HorizontalEdgeInsets};
    use crate::layout::attributes::{LabelAlignment, LayoutAttributesBuilder};
    use crate::layout::position::AvatarPosition;

    fn builder(kind: KindTag, vertical: VerticalAnchor) -> LayoutAttributesBuilder {
        LayoutAttributesBuilder::new(0)
            .size(Size::new(320.0, 80.0))
            .avatar_size(Size::new(24.0, 24.0))
            .avatar_position(AvatarPosition::new(HorizontalAnchor::CellLeading, vertical))
            .avatar_leading_trailing_padding(16.0)
            .container_size(Size::new(200.0, 40.0))
            .container_padding(EdgeInsets::right(16.0))
            .cell_top_label_size(Size::new(320.0, 10.0))
            .cell_top_label_alignment(LabelAlignment::default())
            .cell_bottom_label_size(Size::new(320.0, 8.0))
            .cell_bottom_label_alignment(LabelAlignment::default())
            .message_top_label_size(Size::new(320.0, 12.0))
            .message_top_label_alignment(LabelAlignment::default())
            .message_bottom_label_size(Size::new(320.0, 6.0))
            .message_bottom_label_alignment(LabelAlignment::default())
            .message_time_label_size(Size::ZERO)
            .message_label_insets(EdgeInsets::ZERO)
            .accessory_size(Size::ZERO)
            .accessory_padding(HorizontalEdgeInsets::ZERO)
            .accessory_position(VerticalAnchor::MessageCenter)
            .kind(kind)
            .compact(false)
    }

    fn frames(kind: KindTag, vertical: VerticalAnchor) -> CellFrames {
        let attrs = builder(kind, vertical).build().unwrap();
        layout_cell(&attrs, &LayoutMetrics::points())
    }

    #[test]
    fn test_stacked_container_sits_below_top_labels() {
        let frames = frames(KindTag::Text, VerticalAnchor::MessageLabelTop);
        // cell top 10 + message top 12 + padding 0 + stack 12
        assert_eq!(frames.container, Rect::new(28.0, 34.0, 200.0, 40.0));
        assert_eq!(frames.message_bottom_label.min_y(), 74.0 + 8.0);
        assert_eq!(frames.cell_bottom_label.min_y(), 88.0);
        assert_eq!(frames.cell_top_label, Rect::new(0.0, 0.0, 320.0, 10.0));
        // 34 - 0 - 12 - 10, fixed 22pt height
        assert_eq!(frames.message_top_label, Rect::new(6.0, 12.0, 320.0, 22.0));
        assert_eq!(frames.avatar, Rect::new(16.0, 14.0, 24.0, 24.0));
    }

    #[test]
    fn test_message_bottom_anchors_above_bottom_labels() {
        let frames = frames(KindTag::Text, VerticalAnchor::MessageBottom);
        // 80 - 0 - 8 - 6 - 40 - 0
        assert_eq!(frames.container.min_y(), 26.0);
        assert_eq!(frames.avatar.max_y(), frames.container.max_y());
    }

    #[test]
    fn test_center_with_tall_avatar_centers_container() {
        let attrs = builder(KindTag::Text, VerticalAnchor::MessageCenter)
            .container_size(Size::new(100.0, 20.0))
            .build()
            .unwrap();
        let frames = layout_cell(&attrs, &LayoutMetrics::points());
        assert_eq!(frames.container.min_y(), 30.0);
        assert_eq!(frames.avatar.mid_y(), frames.container.mid_y());
    }

    #[test]
    fn test_center_with_short_avatar_falls_through_to_stacked() {
        let frames = frames(KindTag::Text, VerticalAnchor::MessageCenter);
        assert_eq!(frames.container.min_y(), 34.0);
    }

    #[test]
    fn test_tall_accessory_centers_container() {
        let attrs = builder(KindTag::Text, VerticalAnchor::CellTop)
            .accessory_size(Size::new(20.0, 60.0))
            .accessory_padding(HorizontalEdgeInsets::new(4.0, 0.0))
            .build()
            .unwrap();
        let frames = layout_cell(&attrs, &LayoutMetrics::points());
        assert_eq!(frames.container.min_y(), 20.0);
        assert_eq!(frames.avatar.min_y(), 0.0);
        assert_eq!(frames.accessory, Rect::new(232.0, 10.0, 20.0, 60.0));
    }

    #[test]
    fn test_trailing_side_mirrors() {
        let attrs = builder(KindTag::Text, VerticalAnchor::CellBottom)
            .avatar_position(AvatarPosition::new(
                HorizontalAnchor::CellTrailing,
                VerticalAnchor::CellBottom,
            ))
            .container_padding(EdgeInsets::left(16.0))
            .build()
            .unwrap();
        let frames = layout_cell(&attrs, &LayoutMetrics::points());
        // 320 - 24 - 200 - 0 - 16
        assert_eq!(frames.container.min_x(), 80.0);
        assert_eq!(frames.avatar, Rect::new(280.0, 56.0, 24.0, 24.0));
    }

    #[test]
    fn test_media_uses_wider_leading_gap() {
        let frames = frames(KindTag::Photo, VerticalAnchor::MessageTop);
        assert_eq!(frames.container.min_x(), 34.0);
        assert_eq!(frames.image.map(|r| r.size.height), Some(64.0));
        assert_eq!(frames.image.map(|r| r.max_y()), Some(frames.container.max_y()));
    }

    #[test]
    fn test_header_is_centered_in_cell() {
        let frames = frames(KindTag::Header, VerticalAnchor::MessageCenter);
        assert_eq!(frames.container.mid_x(), 160.0);
        assert_eq!(frames.container.mid_y(), 40.0);
    }

    #[test]
    fn test_absent_message_top_label_has_no_height() {
        let attrs = builder(KindTag::Text, VerticalAnchor::MessageTop)
            .message_top_label_size(Size::new(320.0, 0.0))
            .build()
            .unwrap();
        let frames = layout_cell(&attrs, &LayoutMetrics::points());
        assert_eq!(frames.message_top_label.size.height, 0.0);
    }

    #[test]
    #[should_panic(expected = "still Natural")]
    fn test_natural_position_panics() {
        let attrs = builder(KindTag::Text, VerticalAnchor::MessageCenter)
            .avatar_position(AvatarPosition::vertical(VerticalAnchor::MessageCenter))
            .build()
            .unwrap();
        layout_cell(&attrs, &LayoutMetrics::points());
    }

    #[test]
    fn test_container_avatar_overlap_resolves_to_avatar() {
        let frames = frames(KindTag::Text, VerticalAnchor::MessageTop);
        // Container starts at x 28, avatar spans 16..40.
        let overlap = Point::new(30.0, frames.avatar.mid_y());
        assert!(frames.container.contains(overlap));
        assert!(frames.avatar.contains(overlap));
        assert_eq!(frames.hit_test(overlap), TapTarget::Avatar);
        assert_eq!(
            frames.hit_test(Point::new(100.0, frames.container.mid_y())),
            TapTarget::Message
        );
    }

    #[test]
    fn test_hit_test_labels_and_background() {
        let frames = frames(KindTag::Text, VerticalAnchor::MessageLabelTop);
        assert_eq!(frames.hit_test(Point::new(200.0, 5.0)), TapTarget::CellTopLabel);
        assert_eq!(frames.hit_test(Point::new(200.0, 20.0)), TapTarget::MessageTopLabel);
        assert_eq!(frames.hit_test(Point::new(200.0, 84.0)), TapTarget::MessageBottomLabel);
        assert_eq!(frames.hit_test(Point::new(200.0, 90.0)), TapTarget::CellBottomLabel);
        assert_eq!(frames.hit_test(Point::new(300.0, 50.0)), TapTarget::Background);
    }

    #[test]
    fn test_play_button_has_touch_slop() {
        let attrs = builder(KindTag::Audio, VerticalAnchor::MessageTop)
            .container_size(Size::new(200.0, 100.0))
            .build()
            .unwrap();
        let frames = layout_cell(&attrs, &LayoutMetrics::points());
        let Some(button) = frames.play_button else {
            panic!("audio cell has a play button");
        };
        let just_outside = Point::new(button.min_x() - 5.0, button.min_y() + 1.0);
        assert!(!button.contains(just_outside));
        assert_eq!(
            frames.hit_test(just_outside),
            TapTarget::Content(ContentHit::PlayButton)
        );
    }

    #[test]
    fn test_image_hit() {
        let frames = frames(KindTag::Photo, VerticalAnchor::MessageTop);
        let Some(image) = frames.image else {
            panic!("photo cell has an image");
        };
        let inside = Point::new(image.mid_x(), image.mid_y());
        assert_eq!(frames.hit_test(inside), TapTarget::Content(ContentHit::Image));
    }

    #[test]
    fn test_long_press_only_on_container() {
        let frames = frames(KindTag::Text, VerticalAnchor::MessageTop);
        assert!(frames.long_press(Point::new(100.0, frames.container.mid_y())));
        assert!(!frames.long_press(Point::new(100.0, 2.0)));
    }

    #[derive(Default)]
    struct Recorder(Vec<&'static str>);

    impl MessageCellDelegate for Recorder {
        fn did_tap_avatar(&mut self, _index: usize) {
            self.0.push("avatar");
        }
        fn did_tap_play_button(&mut self, _index: usize) {
            self.0.push("play");
        }
    }

    #[test]
    fn test_dispatch_routes_and_defaults_are_noops() {
        let mut recorder = Recorder::default();
        dispatch_tap(&mut recorder, 0, TapTarget::Avatar);
        dispatch_tap(&mut recorder, 0, TapTarget::Background);
        dispatch_tap(&mut recorder, 0, TapTarget::Content(ContentHit::PlayButton));
        assert_eq!(recorder.0, vec!["avatar", "play"]);
    }
}
