//! # Layout Attributes
//!
//! The per-index geometry record handed from the size calculator to the
//! cell. [`LayoutAttributes`] is immutable; the only way to make one is
//! [`LayoutAttributesBuilder::build`], which refuses to produce a value with
//! an unset field.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::geometry::{EdgeInsets, HorizontalEdgeInsets, Size};
use crate::core::message::KindTag;
use crate::layout::position::{AccessoryPosition, AvatarPosition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlignment {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LabelAlignment {
    pub text_alignment: TextAlignment,
    pub text_insets: EdgeInsets,
}

impl LabelAlignment {
    pub const fn new(text_alignment: TextAlignment, text_insets: EdgeInsets) -> Self {
        Self {
            text_alignment,
            text_insets,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// The builder was finished without setting the named field.
    IncompleteAttributes(&'static str),
    /// The data source has no message at this index.
    IndexOutOfRange { index: usize, len: usize },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::IncompleteAttributes(field) => {
                write!(f, "layout attributes missing field: {field}")
            }
            LayoutError::IndexOutOfRange { index, len } => {
                write!(f, "no message at index {index} (thread has {len})")
            }
        }
    }
}

impl std::error::Error for LayoutError {}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutAttributes {
    pub index: usize,
    pub size: Size,
    pub avatar_size: Size,
    pub avatar_position: AvatarPosition,
    pub avatar_leading_trailing_padding: f32,
    pub container_size: Size,
    pub container_padding: EdgeInsets,
    pub cell_top_label_size: Size,
    pub cell_top_label_alignment: LabelAlignment,
    pub cell_bottom_label_size: Size,
    pub cell_bottom_label_alignment: LabelAlignment,
    pub message_top_label_size: Size,
    pub message_top_label_alignment: LabelAlignment,
    pub message_bottom_label_size: Size,
    pub message_bottom_label_alignment: LabelAlignment,
    pub message_time_label_size: Size,
    /// Insets of the text inside the container.
    pub message_label_insets: EdgeInsets,
    pub accessory_size: Size,
    pub accessory_padding: HorizontalEdgeInsets,
    pub accessory_position: AccessoryPosition,
    pub kind: KindTag,
    /// The next message continues this one; the avatar is not drawn.
    pub compact: bool,
}

impl LayoutAttributes {
    pub fn builder(index: usize) -> LayoutAttributesBuilder {
        LayoutAttributesBuilder::new(index)
    }
}

macro_rules! setters {
    ($($field:ident: $ty:ty),* $(,)?) => {
        $(
            pub fn $field(mut self, value: $ty) -> Self {
                self.$field = Some(value);
                self
            }
        )*
    };
}

macro_rules! require {
    ($builder:ident, $($field:ident),* $(,)?) => {
        LayoutAttributes {
            index: $builder.index,
            $(
                $field: $builder
                    .$field
                    .ok_or(LayoutError::IncompleteAttributes(stringify!($field)))?,
            )*
        }
    };
}

#[derive(Debug, Clone, Default)]
pub struct LayoutAttributesBuilder {
    index: usize,
    size: Option<Size>,
    avatar_size: Option<Size>,
    avatar_position: Option<AvatarPosition>,
    avatar_leading_trailing_padding: Option<f32>,
    container_size: Option<Size>,
    container_padding: Option<EdgeInsets>,
    cell_top_label_size: Option<Size>,
    cell_top_label_alignment: Option<LabelAlignment>,
    cell_bottom_label_size: Option<Size>,
    cell_bottom_label_alignment: Option<LabelAlignment>,
    message_top_label_size: Option<Size>,
    message_top_label_alignment: Option<LabelAlignment>,
    message_bottom_label_size: Option<Size>,
    message_bottom_label_alignment: Option<LabelAlignment>,
    message_time_label_size: Option<Size>,
    message_label_insets: Option<EdgeInsets>,
    accessory_size: Option<Size>,
    accessory_padding: Option<HorizontalEdgeInsets>,
    accessory_position: Option<AccessoryPosition>,
    kind: Option<KindTag>,
    compact: Option<bool>,
}

impl LayoutAttributesBuilder {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            ..Default::default()
        }
    }

    setters! {
        size: Size,
        avatar_size: Size,
        avatar_position: AvatarPosition,
        avatar_leading_trailing_padding: f32,
        container_size: Size,
        container_padding: EdgeInsets,
        cell_top_label_size: Size,
        cell_top_label_alignment: LabelAlignment,
        cell_bottom_label_size: Size,
        cell_bottom_label_alignment: LabelAlignment,
        message_top_label_size: Size,
        message_top_label_alignment: LabelAlignment,
        message_bottom_label_size: Size,
        message_bottom_label_alignment: LabelAlignment,
        message_time_label_size: Size,
        message_label_insets: EdgeInsets,
        accessory_size: Size,
        accessory_padding: HorizontalEdgeInsets,
        accessory_position: AccessoryPosition,
        kind: KindTag,
        compact: bool,
    }

    pub fn build(self) -> Result<LayoutAttributes, LayoutError> {
        Ok(require!(
            self,
            size,
            avatar_size,
            avatar_position,
            avatar_leading_trailing_padding,
            container_size,
            container_padding,
            cell_top_label_size,
            cell_top_label_alignment,
            cell_bottom_label_size,
            cell_bottom_label_alignment,
            message_top_label_size,
            message_top_label_alignment,
            message_bottom_label_size,
            message_bottom_label_alignment,
            message_time_label_size,
            message_label_insets,
            accessory_size,
            accessory_padding,
            accessory_position,
            kind,
            compact,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::position::VerticalAnchor;

    fn complete() -> LayoutAttributesBuilder {
        LayoutAttributes::builder(3)
            .size(Size::new(320.0, 60.0))
            .avatar_size(Size::new(24.0, 24.0))
            .avatar_position(AvatarPosition::vertical(VerticalAnchor::MessageCenter))
            .avatar_leading_trailing_padding(16.0)
            .container_size(Size::new(100.0, 30.0))
            .container_padding(EdgeInsets::right(16.0))
            .cell_top_label_size(Size::ZERO)
            .cell_top_label_alignment(LabelAlignment::default())
            .cell_bottom_label_size(Size::ZERO)
            .cell_bottom_label_alignment(LabelAlignment::default())
            .message_top_label_size(Size::ZERO)
            .message_top_label_alignment(LabelAlignment::default())
            .message_bottom_label_size(Size::ZERO)
            .message_bottom_label_alignment(LabelAlignment::default())
            .message_time_label_size(Size::ZERO)
            .message_label_insets(EdgeInsets::ZERO)
            .accessory_size(Size::ZERO)
            .accessory_padding(HorizontalEdgeInsets::ZERO)
            .accessory_position(VerticalAnchor::MessageCenter)
            .kind(KindTag::Text)
    }

    #[test]
    fn test_build_with_every_field() {
        let attrs = complete().compact(false).build().unwrap();
        assert_eq!(attrs.index, 3);
        assert_eq!(attrs.container_size, Size::new(100.0, 30.0));
        assert!(!attrs.compact);
    }

    #[test]
    fn test_missing_field_is_reported() {
        let err = complete().build().unwrap_err();
        assert_eq!(err, LayoutError::IncompleteAttributes("compact"));
        assert_eq!(err.to_string(), "layout attributes missing field: compact");
    }

    #[test]
    fn test_first_missing_field_wins() {
        let err = LayoutAttributes::builder(0).build().unwrap_err();
        assert_eq!(err, LayoutError::IncompleteAttributes("size"));
    }
}
