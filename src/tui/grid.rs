//! Conversion between layout units and terminal cells.
//!
//! The layout engine works in abstract units. With the cells preset one
//! unit is one terminal cell; with the points preset a cell spans one
//! character advance horizontally and one line vertically. Both edges of a
//! frame are rounded independently so adjacent frames never overlap.

use ratatui::layout::Rect as CellRect;

use crate::core::geometry::{Point, Rect};
use crate::layout::LayoutMetrics;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridScale {
    /// Layout units per terminal column.
    pub unit_width: f32,
    /// Layout units per terminal row.
    pub unit_height: f32,
}

impl Default for GridScale {
    fn default() -> Self {
        Self {
            unit_width: 1.0,
            unit_height: 1.0,
        }
    }
}

impl GridScale {
    pub fn for_metrics(metrics: &LayoutMetrics) -> Self {
        let positive = |value: f32| if value > 0.0 { value } else { 1.0 };
        Self {
            unit_width: positive(metrics.char_width),
            unit_height: positive(metrics.line_height),
        }
    }

    pub fn columns_to_units(&self, columns: u16) -> f32 {
        f32::from(columns) * self.unit_width
    }

    pub fn rows_to_units(&self, rows: u16) -> f32 {
        f32::from(rows) * self.unit_height
    }

    pub fn column(&self, x: f32) -> u16 {
        (x / self.unit_width).round() as u16
    }

    pub fn row(&self, y: f32) -> u16 {
        (y / self.unit_height).round() as u16
    }

    /// Cell rect covering `rect`. Negative coordinates clamp to zero.
    pub fn to_cells(&self, rect: Rect) -> CellRect {
        let x0 = self.column(rect.min_x());
        let y0 = self.row(rect.min_y());
        let x1 = self.column(rect.max_x());
        let y1 = self.row(rect.max_y());
        CellRect::new(x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
    }

    /// Layout point at the center of cell (`column`, `row`).
    pub fn cell_center(&self, column: u16, row: u16) -> Point {
        Point::new(
            (f32::from(column) + 0.5) * self.unit_width,
            (f32::from(row) + 0.5) * self.unit_height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cells_scale_is_identity() {
        let scale = GridScale::for_metrics(&LayoutMetrics::cells());
        assert_eq!(
            scale.to_cells(Rect::new(2.0, 3.0, 10.0, 4.0)),
            CellRect::new(2, 3, 10, 4)
        );
        assert_eq!(scale.cell_center(2, 3), Point::new(2.5, 3.5));
    }

    #[test]
    fn test_points_scale_divides_by_advance() {
        let scale = GridScale::for_metrics(&LayoutMetrics::points());
        // 14..84 wide, 17..51 tall
        assert_eq!(
            scale.to_cells(Rect::new(14.0, 17.0, 70.0, 34.0)),
            CellRect::new(2, 1, 10, 2)
        );
        assert_eq!(scale.columns_to_units(3), 21.0);
        assert_eq!(scale.rows_to_units(2), 34.0);
    }

    #[test]
    fn test_adjacent_frames_share_an_edge() {
        let scale = GridScale::for_metrics(&LayoutMetrics::points());
        let a = scale.to_cells(Rect::new(0.0, 0.0, 10.0, 25.0));
        let b = scale.to_cells(Rect::new(0.0, 25.0, 10.0, 25.0));
        assert_eq!(a.y + a.height, b.y);
    }

    #[test]
    fn test_negative_origin_clamps() {
        let scale = GridScale::default();
        assert_eq!(
            scale.to_cells(Rect::new(-3.0, 0.0, 5.0, 1.0)),
            CellRect::new(0, 0, 2, 1)
        );
    }
}
