use super::{IsValidPlacement, SearchResult, SEARCH_RADIUS, WALL_THICKNESS};
use crate::math::GridPos;
use crate::plan::Room;

/// Finds the closest legal top-left cell for a room near a target cell.
///
/// Cells are visited by increasing Manhattan distance from the target; within
/// one distance, row-major (smaller y first, then smaller x). Cells with a
/// negative coordinate are never returned. A legal target is returned as is.
pub struct NearestValidPosition<'a> {
    room: &'a Room,
    target: GridPos,
    radius: i32,
    wall_thickness: i32,
}

impl<'a> NearestValidPosition<'a> {
    /// Creates a new search for `room` around `target`.
    #[must_use]
    pub fn new(room: &'a Room, target: GridPos) -> Self {
        Self {
            room,
            target,
            radius: SEARCH_RADIUS,
            wall_thickness: WALL_THICKNESS,
        }
    }

    /// Overrides the search radius.
    #[must_use]
    pub fn with_radius(mut self, radius: i32) -> Self {
        self.radius = radius;
        self
    }

    /// Overrides the allowed shared-wall thickness.
    #[must_use]
    pub fn with_wall_thickness(mut self, wall_thickness: i32) -> Self {
        self.wall_thickness = wall_thickness;
        self
    }

    /// Executes the search against `existing` (the room itself is skipped by id).
    #[must_use]
    pub fn execute(&self, existing: &[Room]) -> SearchResult {
        let result = ring_search(self.target, self.radius, |pos| {
            let candidate = self.room.at(pos);
            IsValidPlacement::new(&candidate)
                .with_wall_thickness(self.wall_thickness)
                .execute(existing)
        });
        tracing::debug!(
            room = %self.room.id,
            target = ?self.target,
            ?result,
            "nearest valid position"
        );
        result
    }
}

/// Visits on-grid cells around `target` in distance then row-major order and
/// returns the first one `accept` approves.
pub(crate) fn ring_search(
    target: GridPos,
    radius: i32,
    mut accept: impl FnMut(GridPos) -> bool,
) -> SearchResult {
    for d in 0..=radius.max(0) {
        for dy in -d..=d {
            let rem = d - dy.abs();
            let dxs = [-rem, rem];
            let count = if rem == 0 { 1 } else { 2 };
            for &dx in &dxs[..count] {
                let pos = GridPos::new(target.x.saturating_add(dx), target.y.saturating_add(dy));
                if pos.is_on_grid() && accept(pos) {
                    return SearchResult::Found(pos);
                }
            }
        }
    }
    SearchResult::NotFound
}
