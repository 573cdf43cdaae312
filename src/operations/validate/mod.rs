mod arrow_key;
mod nearest;
mod placement;

pub use arrow_key::IsValidArrowKeyMove;
pub use nearest::NearestValidPosition;
pub use placement::{shares_wall_legally, IsValidPlacement};

pub(crate) use nearest::ring_search;

use crate::math::GridPos;

/// Largest overlap two rooms may share as a common wall, in grid units.
pub const WALL_THICKNESS: i32 = 1;

/// Manhattan radius of the nearest-valid-position search.
pub const SEARCH_RADIUS: i32 = 10;

/// Outcome of a bounded position search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchResult {
    /// The closest legal cell.
    Found(GridPos),
    /// No legal cell within the search radius.
    NotFound,
}

impl SearchResult {
    /// The found position, if any.
    #[must_use]
    pub fn position(self) -> Option<GridPos> {
        match self {
            SearchResult::Found(p) => Some(p),
            SearchResult::NotFound => None,
        }
    }

    /// The found position, or `fallback` when the search failed.
    #[must_use]
    pub fn position_or(self, fallback: GridPos) -> GridPos {
        self.position().unwrap_or(fallback)
    }

    /// Returns `true` if a position was found.
    #[must_use]
    pub fn is_found(self) -> bool {
        matches!(self, SearchResult::Found(_))
    }
}
