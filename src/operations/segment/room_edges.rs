use crate::math::CUT_TOLERANCE;
use crate::plan::edge::wall_overlap;
use crate::plan::{Edge, EdgeId, Room, Side};

/// Splits each wall of a room into segments with a uniform set of
/// overlapping rooms.
///
/// For every side, the wall span is cut wherever another room's box meets
/// the wall line over a positive length. Each emitted segment therefore has
/// the same competing rooms along its whole length.
pub struct SegmentRoomEdges<'a> {
    room: &'a Room,
    tolerance: f64,
}

impl<'a> SegmentRoomEdges<'a> {
    /// Creates a new segmentation of `room`'s walls.
    #[must_use]
    pub fn new(room: &'a Room) -> Self {
        Self {
            room,
            tolerance: CUT_TOLERANCE,
        }
    }

    /// Overrides the distance below which cut points are merged.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Executes the segmentation against every room of the plan.
    ///
    /// Segments are returned side by side (north, south, east, west), each
    /// side ordered along its axis.
    #[must_use]
    pub fn execute(&self, all_rooms: &[Room]) -> Vec<Edge> {
        let rect = self.room.rect();
        let mut edges = Vec::new();

        for side in Side::ALL {
            let (fixed, lo, hi) = side.wall_of(&rect);

            // Step 1: wall endpoints plus every intersection interval.
            let mut points = vec![lo, hi];
            for other in all_rooms.iter().filter(|r| r.id != self.room.id) {
                if let Some((a, b)) = wall_overlap(
                    side.is_horizontal(),
                    fixed,
                    lo,
                    hi,
                    &other.rect(),
                    self.tolerance,
                ) {
                    points.push(a);
                    points.push(b);
                }
            }

            // Step 2: order along the wall and merge coincident cuts.
            let points = sort_and_dedup(points, self.tolerance);

            // Step 3: one segment per consecutive pair.
            let mut index = 0;
            for pair in points.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                if b - a <= self.tolerance {
                    continue;
                }
                let id = EdgeId::segment(&self.room.id, side, index);
                edges.push(Edge::on_wall(id, self.room.id.clone(), side, fixed, a, b));
                index += 1;
            }
        }

        edges
    }
}

fn sort_and_dedup(mut points: Vec<f64>, tolerance: f64) -> Vec<f64> {
    points.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    points.dedup_by(|a, b| (*a - *b).abs() < tolerance);
    points
}
