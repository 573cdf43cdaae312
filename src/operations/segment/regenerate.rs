use super::SegmentRoomEdges;
use crate::math::CUT_TOLERANCE;
use crate::plan::{Edge, Room};

/// Rebuilds every room's wall segments and carries user data over from the
/// previous generation.
///
/// Segment ids are not stable, so overrides are matched by position: a new
/// segment takes the override and name of the old segment (same room, same
/// side) whose offset range along the wall contains the new segment's
/// midpoint. When no old segment covers it, the first override and first
/// name found on that wall are used.
pub struct RegenerateEdges<'a> {
    rooms: &'a [Room],
    previous: &'a [Edge],
    tolerance: f64,
}

impl<'a> RegenerateEdges<'a> {
    /// Creates a new regeneration over `rooms`, reusing user data from `previous`.
    #[must_use]
    pub fn new(rooms: &'a [Room], previous: &'a [Edge]) -> Self {
        Self {
            rooms,
            previous,
            tolerance: CUT_TOLERANCE,
        }
    }

    /// Overrides the distance below which cut points are merged.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Executes the regeneration.
    #[must_use]
    pub fn execute(&self) -> Vec<Edge> {
        let mut edges = Vec::new();
        for room in self.rooms {
            let mut segments = SegmentRoomEdges::new(room)
                .with_tolerance(self.tolerance)
                .execute(self.rooms);
            for segment in &mut segments {
                self.reattach(segment, room);
            }
            edges.extend(segments);
        }
        tracing::debug!(
            rooms = self.rooms.len(),
            edges = edges.len(),
            "regenerated wall segments"
        );
        edges
    }

    fn reattach(&self, segment: &mut Edge, room: &Room) {
        let old: Vec<&Edge> = self
            .previous
            .iter()
            .filter(|e| e.room_id == segment.room_id && e.side == segment.side)
            .collect();
        if !old.iter().any(|e| e.has_user_data()) {
            return;
        }

        // Offsets are measured from each generation's wall start, so a room
        // that moved keeps its overrides.
        let old_start = old
            .iter()
            .map(|e| e.span().0)
            .fold(f64::INFINITY, f64::min);
        let (_, new_start, _) = segment.side.wall_of(&room.rect());
        let (lo, hi) = segment.span();
        let mid = (lo + hi) * 0.5 - new_start;

        let covering = old.iter().find(|e| {
            let (a, b) = e.span();
            a - old_start <= mid + self.tolerance && mid <= b - old_start + self.tolerance
        });

        match covering {
            Some(e) => {
                segment.color_override = e.color_override;
                segment.name.clone_from(&e.name);
            }
            None => {
                segment.color_override = old.iter().find_map(|e| e.color_override);
                segment.name = old.iter().find_map(|e| e.name.clone());
            }
        }
    }
}
