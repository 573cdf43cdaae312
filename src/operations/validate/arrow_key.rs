use super::{IsValidPlacement, WALL_THICKNESS};
use crate::math::GridOffset;
use crate::plan::Room;

/// Checks a keyboard nudge: the moved room must be legal exactly where it
/// lands, with no snapping or search.
pub struct IsValidArrowKeyMove<'a> {
    room: &'a Room,
    delta: GridOffset,
    wall_thickness: i32,
}

impl<'a> IsValidArrowKeyMove<'a> {
    /// Creates a new check for moving `room` by `(dx, dy)`.
    #[must_use]
    pub fn new(room: &'a Room, dx: i32, dy: i32) -> Self {
        Self {
            room,
            delta: GridOffset::new(dx, dy),
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
        let target = self.room.position().offset_by(self.delta);
        if !target.is_on_grid() {
            return false;
        }
        let moved = self.room.at(target);
        IsValidPlacement::new(&moved)
            .with_wall_thickness(self.wall_thickness)
            .execute(existing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{RoomColor, RoomId};

    fn room(id: &str, x: i32, y: i32) -> Room {
        Room {
            id: RoomId::from(id),
            name: String::new(),
            x,
            y,
            width: 4,
            height: 4,
            color: RoomColor::Green,
            created_at: 1,
            conditions: Vec::new(),
        }
    }

    #[test]
    fn nudge_into_shared_wall_is_allowed() {
        let a = room("a", 0, 0);
        let b = room("b", 4, 0);
        assert!(IsValidArrowKeyMove::new(&b, -1, 0).execute(&[a]));
    }

    #[test]
    fn nudge_past_shared_wall_is_refused() {
        let a = room("a", 0, 0);
        let b = room("b", 3, 0);
        assert!(!IsValidArrowKeyMove::new(&b, -1, 0).execute(&[a]));
    }

    #[test]
    fn nudge_off_grid_is_refused() {
        let b = room("b", 0, 3);
        assert!(!IsValidArrowKeyMove::new(&b, -1, 0).execute(&[]));
        assert!(IsValidArrowKeyMove::new(&b, 0, -3).execute(&[]));
    }
}
