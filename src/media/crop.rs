//! # Face-Aware Crop
//!
//! Aspect-fill placement of an image inside a view that keeps detected faces
//! in frame. Faces are given in image pixels with a top-left origin.
//!
//! Wide images are shifted horizontally to center the faces. Tall images are
//! shifted vertically so the faces sit on the upper golden-ratio line.

use image::DynamicImage;

use crate::core::geometry::{Rect, Size};

/// Faces sit this far down the view in tall images.
const GOLDEN_LINE: f32 = 1.0 - 0.618;

/// Finds faces in a decoded image.
pub trait FaceDetector: Send + Sync {
    fn detect(&self, image: &DynamicImage) -> Vec<Rect>;
}

/// Finds nothing; every image keeps its plain aspect-fill crop.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFaceDetector;

impl FaceDetector for NoFaceDetector {
    fn detect(&self, _image: &DynamicImage) -> Vec<Rect> {
        Vec::new()
    }
}

/// Smallest rect covering every face.
pub fn face_bounds(faces: &[Rect]) -> Option<Rect> {
    let (first, rest) = faces.split_first()?;
    Some(rest.iter().fold(*first, |acc, face| acc.union(face)))
}

/// Frame of the scaled image relative to the view, or `None` when there
/// are no faces or either size is empty.
pub fn face_focus(image: Size, view: Size, faces: &[Rect]) -> Option<Rect> {
    if image.is_empty() || view.is_empty() {
        return None;
    }
    let faces = face_bounds(faces)?;
    let (center_x, center_y) = (faces.mid_x(), faces.mid_y());

    if image.width / image.height > view.width / view.height {
        let height = view.height;
        let width = image.width / image.height * height;
        let scale = width / image.width;
        let offset = (center_x * scale - view.width * 0.5)
            .min(width - view.width)
            .max(0.0);
        Some(Rect::new(-offset, 0.0, width, height))
    } else {
        let width = view.width;
        let height = image.height / image.width * width;
        let scale = width / image.width;
        let offset = (center_y * scale - view.height * GOLDEN_LINE)
            .min(height - view.height)
            .max(0.0);
        Some(Rect::new(0.0, -offset, width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_faces_means_no_crop() {
        assert_eq!(face_focus(Size::new(100.0, 100.0), Size::new(50.0, 50.0), &[]), None);
        assert_eq!(NoFaceDetector.detect(&DynamicImage::new_rgb8(4, 4)), Vec::new());
    }

    #[test]
    fn test_face_bounds_unions_all_faces() {
        let faces = [Rect::new(10.0, 10.0, 5.0, 5.0), Rect::new(30.0, 2.0, 4.0, 4.0)];
        assert_eq!(face_bounds(&faces), Some(Rect::new(10.0, 2.0, 24.0, 13.0)));
    }

    #[test]
    fn test_wide_image_centers_face_horizontally() {
        // 400x100 scaled to 200x50 in a 50x50 view; face center x 300 -> 150.
        let face = [Rect::new(290.0, 40.0, 20.0, 20.0)];
        let frame = face_focus(Size::new(400.0, 100.0), Size::new(50.0, 50.0), &face);
        assert_eq!(frame, Some(Rect::new(-125.0, 0.0, 200.0, 50.0)));
    }

    #[test]
    fn test_wide_image_offset_is_clamped() {
        let face = [Rect::new(390.0, 40.0, 10.0, 10.0)];
        let frame = face_focus(Size::new(400.0, 100.0), Size::new(50.0, 50.0), &face);
        assert_eq!(frame.map(|f| f.min_x()), Some(-150.0));
    }

    #[test]
    fn test_tall_image_uses_golden_line() {
        // 100x400 in a 100x100 view keeps scale 1; face center y 200.
        let face = [Rect::new(40.0, 190.0, 20.0, 20.0)];
        let Some(frame) = face_focus(Size::new(100.0, 400.0), Size::new(100.0, 100.0), &face)
        else {
            panic!("face present");
        };
        assert!((frame.min_y() + (200.0 - 38.2)).abs() < 1e-3);
        assert_eq!(frame.size, Size::new(100.0, 400.0));
    }

    #[test]
    fn test_tall_image_face_near_bottom_stays_in_frame() {
        let face = [Rect::new(40.0, 390.0, 10.0, 10.0)];
        let frame = face_focus(Size::new(100.0, 400.0), Size::new(100.0, 100.0), &face);
        assert_eq!(frame.map(|f| f.min_y()), Some(-300.0));
    }
}
