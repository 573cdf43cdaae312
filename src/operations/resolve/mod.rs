mod competing;
mod policy;

pub use competing::{competing_rooms, competitors, distinct_colors, Competitor};
pub use policy::{by_matrix, by_priority, chronological};

use crate::plan::{
    ColorPriority, ConflictMatrix, Edge, OverrideScope, ResolutionMode, Room, RoomColor,
};

/// Where the owning room's color override is looked up.
#[derive(Debug, Clone, Copy)]
pub enum OverrideLookup<'a> {
    /// Only the segment being resolved.
    EdgeOnly,
    /// The segment first, then any other segment of the same room and side.
    Wall(&'a [Edge]),
}

impl<'a> OverrideLookup<'a> {
    /// Builds the lookup for a configured scope over the plan's edges.
    #[must_use]
    pub fn from_scope(scope: OverrideScope, edges: &'a [Edge]) -> Self {
        match scope {
            OverrideScope::EdgeOnly => OverrideLookup::EdgeOnly,
            OverrideScope::Wall => OverrideLookup::Wall(edges),
        }
    }

    /// The owner's override for `edge`, if any.
    #[must_use]
    pub fn owner_override(&self, edge: &Edge) -> Option<RoomColor> {
        edge.color_override.or_else(|| match self {
            OverrideLookup::EdgeOnly => None,
            OverrideLookup::Wall(all) => all
                .iter()
                .filter(|e| e.room_id == edge.room_id && e.side == edge.side)
                .find_map(|e| e.color_override),
        })
    }
}

/// Computes the color a wall segment is drawn with.
///
/// Collects the rooms present at the segment, derives one competing color per
/// room, and applies the active mode when more than one distinct color
/// remains. The result is derived data: call it on every read, never cache it.
pub struct ResolveEdgeColor<'a> {
    edge: &'a Edge,
    mode: ResolutionMode,
    priority: &'a ColorPriority,
    matrix: &'a ConflictMatrix,
    overrides: OverrideLookup<'a>,
}

impl<'a> ResolveEdgeColor<'a> {
    /// Creates a new resolution that only looks at `edge`'s own override.
    #[must_use]
    pub fn new(
        edge: &'a Edge,
        mode: ResolutionMode,
        priority: &'a ColorPriority,
        matrix: &'a ConflictMatrix,
    ) -> Self {
        Self {
            edge,
            mode,
            priority,
            matrix,
            overrides: OverrideLookup::EdgeOnly,
        }
    }

    /// Sets where the owner's override is looked up.
    #[must_use]
    pub fn with_overrides(mut self, overrides: OverrideLookup<'a>) -> Self {
        self.overrides = overrides;
        self
    }

    /// Executes the resolution against the plan's rooms.
    ///
    /// Never fails: a segment whose owning room is missing resolves to the
    /// default color.
    #[must_use]
    pub fn execute(&self, rooms: &[Room]) -> RoomColor {
        let Some(owner) = rooms.iter().find(|r| r.id == self.edge.room_id) else {
            tracing::warn!(
                edge = %self.edge.id,
                room = %self.edge.room_id,
                "edge references a missing room; using default color"
            );
            return RoomColor::default();
        };

        let competitors = competitors(self.edge, owner, rooms, &self.overrides);
        let colors = distinct_colors(&competitors);
        let owner_color = competitors
            .iter()
            .find(|c| *c.room == owner.id)
            .map_or(owner.color, |c| c.color);

        match colors.as_slice() {
            [] => return owner_color,
            [only] => return *only,
            _ => {}
        }

        match self.mode {
            ResolutionMode::Chronological => chronological(&competitors),
            ResolutionMode::Priority => by_priority(&colors, self.priority),
            ResolutionMode::Matrix => by_matrix(&colors, self.matrix)
                .or_else(|| by_priority(&colors, self.priority)),
            ResolutionMode::Unset => Some(owner.color),
        }
        .unwrap_or(owner_color)
    }
}
