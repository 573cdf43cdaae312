pub mod grid;
pub mod rect;

pub use grid::{snap_to_grid, GridPos};
pub use rect::{classify_overlap, rectangles_overlap_area, Overlap, OverlapKind, Rect};

/// 2D point in continuous coordinates (pixels or fractional grid units).
pub type Point2 = nalgebra::Point2<f64>;

/// 2D integer displacement in grid units.
pub type GridOffset = nalgebra::Vector2<i32>;

/// Largest coordinate or size a room may have. Sums of a position, a size
/// and a search offset then stay far inside `i32`.
pub const MAX_COORDINATE: i32 = 1 << 24;

/// Distance below which two cut points along a wall are treated as one.
pub const CUT_TOLERANCE: f64 = 1e-3;
