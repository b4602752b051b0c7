//! Thumbnail geometry.

use crate::core::geometry::{Rect, Size};

/// Largest rect with `content`'s aspect ratio that fits inside `bounds`,
/// centered. Empty content yields an empty rect at the center.
pub fn aspect_fit(content: Size, bounds: Size) -> Rect {
    let scale = if content.is_empty() {
        0.0
    } else {
        (bounds.width / content.width).min(bounds.height / content.height)
    };
    let width = content.width * scale;
    let height = content.height * scale;
    Rect::new(
        (bounds.width - width) / 2.0,
        (bounds.height - height) / 2.0,
        width,
        height,
    )
}

/// Bounding box of `size` rotated by `radians`, floored to whole units.
pub fn rotated_bounds(size: Size, radians: f32) -> Size {
    let (sin, cos) = radians.sin_cos();
    Size::new(
        (size.width * cos.abs() + size.height * sin.abs()).floor(),
        (size.width * sin.abs() + size.height * cos.abs()).floor(),
    )
}
