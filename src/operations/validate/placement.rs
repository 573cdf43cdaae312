use super::WALL_THICKNESS;
use crate::math::{classify_overlap, OverlapKind, Rect};
use crate::plan::{Room, RoomId};

/// Checks whether a room may sit where it is relative to other rooms.
///
/// A pair is legal when the rooms are disjoint, only touch, or overlap by a
/// strip no thicker than the wall thickness. Two 4×4 rooms sharing a 1-wide
/// strip are fine; a 2-wide strip is not. A candidate whose corner is off the
/// grid is never legal.
pub struct IsValidPlacement<'a> {
    candidate: Rect,
    ignore: Option<&'a RoomId>,
    wall_thickness: i32,
}

impl<'a> IsValidPlacement<'a> {
    /// Creates a new check for `candidate`. An existing room with the same id
    /// is skipped, so a room can be checked against a set that contains it.
    #[must_use]
    pub fn new(candidate: &'a Room) -> Self {
        Self {
            candidate: candidate.rect(),
            ignore: Some(&candidate.id),
            wall_thickness: WALL_THICKNESS,
        }
    }

    /// Creates a check for a bare rectangle.
    #[must_use]
    pub fn for_rect(candidate: Rect) -> Self {
        Self {
            candidate,
            ignore: None,
            wall_thickness: WALL_THICKNESS,
        }
    }

    /// Overrides the allowed shared-wall thickness.
    #[must_use]
    pub fn with_wall_thickness(mut self, wall_thickness: i32) -> Self {
        self.wall_thickness = wall_thickness;
        self
    }

    /// Executes the check against `existing`.
    #[must_use]
    pub fn execute(&self, existing: &[Room]) -> bool {
        if !self.candidate.position().is_on_grid() {
            return false;
        }
        existing
            .iter()
            .filter(|r| Some(&r.id) != self.ignore)
            .all(|r| shares_wall_legally(&self.candidate, &r.rect(), self.wall_thickness))
    }
}

/// Pair rule behind [`IsValidPlacement`].
#[must_use]
pub fn shares_wall_legally(a: &Rect, b: &Rect, wall_thickness: i32) -> bool {
    match classify_overlap(a, b) {
        OverlapKind::Disjoint | OverlapKind::Touching => true,
        OverlapKind::Overlapping(o) => o.thickness() <= wall_thickness,
    }
}
