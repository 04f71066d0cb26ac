use serde::Serialize;

/// A point in graph space or screen space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Fixed spacing constants of the layout, in graph-space units
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Geometry {
    /// Left edge of the first column
    pub left_padding: f64,
    /// Y of row 0
    pub top_padding: f64,
    /// Width of a column with no sub-branch offsets
    pub column_width: f64,
    /// Lateral distance between neighbouring offsets
    pub offset_spacing: f64,
    /// Vertical distance between rows
    pub row_spacing: f64,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            left_padding: 40.0,
            top_padding: 40.0,
            column_width: 80.0,
            offset_spacing: 20.0,
            row_spacing: 30.0,
        }
    }
}

impl Geometry {
    pub fn column_width_for(&self, max_offset: u32) -> f64 {
        self.column_width + f64::from(max_offset) * self.offset_spacing
    }

    /// Unzoomed Y of a row
    pub fn row_y(&self, row: usize) -> f64 {
        self.top_padding + row as f64 * self.row_spacing
    }

    /// X of a commit at `offset` inside a column starting at `column_x`
    pub fn offset_x(&self, column_x: f64, offset: u32) -> f64 {
        column_x + f64::from(offset) * self.offset_spacing
    }
}
