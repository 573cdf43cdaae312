use serde::{Deserialize, Serialize};

use super::{GridOffset, Point2, MAX_COORDINATE};
use crate::error::{GeometryError, Result};

/// An integer cell coordinate on the plan grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    /// Creates a new grid position.
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns `self + offset`, saturating at the `i32` range.
    #[must_use]
    pub fn offset_by(self, offset: GridOffset) -> Self {
        Self::new(
            self.x.saturating_add(offset.x),
            self.y.saturating_add(offset.y),
        )
    }

    /// Returns the displacement that moves `from` onto `self`.
    #[must_use]
    pub fn offset_from(self, from: GridPos) -> GridOffset {
        GridOffset::new(self.x - from.x, self.y - from.y)
    }

    /// Manhattan distance between two cells.
    #[must_use]
    pub fn manhattan(self, other: GridPos) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Returns `true` if both coordinates lie in `0..=MAX_COORDINATE`.
    #[must_use]
    pub fn is_on_grid(self) -> bool {
        let range = 0..=MAX_COORDINATE;
        range.contains(&self.x) && range.contains(&self.y)
    }
}

/// Rounds a continuous point (in pixels) to the nearest grid line.
///
/// `grid_size` is the number of pixels per grid unit.
///
/// # Errors
///
/// Returns `GeometryError::InvalidGridSize` if `grid_size` is not a positive,
/// finite number.
#[allow(clippy::cast_possible_truncation)]
pub fn snap_to_grid(point: &Point2, grid_size: f64) -> Result<GridPos> {
    if !grid_size.is_finite() || grid_size <= 0.0 {
        return Err(GeometryError::InvalidGridSize(grid_size).into());
    }
    Ok(GridPos::new(
        (point.x / grid_size).round() as i32,
        (point.y / grid_size).round() as i32,
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn snap_rounds_to_nearest_line() {
        let g = snap_to_grid(&Point2::new(29.0, 31.0), 20.0).unwrap();
        assert_eq!(g, GridPos::new(1, 2));
    }

    #[test]
    fn snap_half_way_rounds_away_from_zero() {
        let g = snap_to_grid(&Point2::new(10.0, -10.0), 20.0).unwrap();
        assert_eq!(g, GridPos::new(1, -1));
    }

    #[test]
    fn snap_rejects_bad_grid_size() {
        assert!(snap_to_grid(&Point2::new(1.0, 1.0), 0.0).is_err());
        assert!(snap_to_grid(&Point2::new(1.0, 1.0), f64::NAN).is_err());
    }

    #[test]
    fn grid_range_is_bounded() {
        assert!(GridPos::new(0, MAX_COORDINATE).is_on_grid());
        assert!(!GridPos::new(-1, 0).is_on_grid());
        assert!(!GridPos::new(0, MAX_COORDINATE + 1).is_on_grid());
        let far = GridPos::new(i32::MAX - 1, 0).offset_by(GridOffset::new(5, 0));
        assert_eq!(far.x, i32::MAX);
        assert!(!far.is_on_grid());
    }

    #[test]
    fn manhattan_distance() {
        assert_eq!(GridPos::new(1, 1).manhattan(GridPos::new(4, -1)), 5);
    }

    #[test]
    fn offsets_round_trip() {
        let a = GridPos::new(3, 7);
        let b = GridPos::new(10, 2);
        assert_eq!(a.offset_by(b.offset_from(a)), b);
    }
}
