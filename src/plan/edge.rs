use std::fmt;

use serde::{Deserialize, Serialize};

use super::color::RoomColor;
use super::room::RoomId;
use crate::math::{Rect, CUT_TOLERANCE};

/// Identifier of a wall segment: `{roomId}-{side}-{index}`.
///
/// Not stable across regeneration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub String);

impl EdgeId {
    /// Builds the id of the `index`-th segment on one side of a room.
    #[must_use]
    pub fn segment(room: &RoomId, side: Side, index: usize) -> Self {
        Self(format!("{room}-{side}-{index}"))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EdgeId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Which wall of a room a segment belongs to. North is the top (smallest y).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    North,
    South,
    East,
    West,
}

impl Side {
    /// All four sides in segmentation order.
    pub const ALL: [Side; 4] = [Side::North, Side::South, Side::East, Side::West];

    /// North and south walls run along x.
    #[must_use]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::North | Side::South)
    }

    /// Returns `(fixed, lo, hi)` for this side of `rect`: the coordinate of the
    /// wall line and its span along the primary axis.
    #[must_use]
    pub fn wall_of(self, rect: &Rect) -> (f64, f64, f64) {
        let (x, y) = (f64::from(rect.x), f64::from(rect.y));
        let (r, b) = (f64::from(rect.right()), f64::from(rect.bottom()));
        match self {
            Side::North => (y, x, r),
            Side::South => (b, x, r),
            Side::West => (x, y, b),
            Side::East => (r, y, b),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::North => "north",
            Side::South => "south",
            Side::East => "east",
            Side::West => "west",
        })
    }
}

/// One straight segment of one room's wall.
///
/// Coordinates are in grid units with `x1 <= x2` and `y1 <= y2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: EdgeId,
    pub room_id: RoomId,
    pub side: Side,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_override: Option<RoomColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Edge {
    /// Builds a segment on `side` covering `[lo, hi]` of a wall line at `fixed`.
    #[must_use]
    pub fn on_wall(id: EdgeId, room_id: RoomId, side: Side, fixed: f64, lo: f64, hi: f64) -> Self {
        let (x1, y1, x2, y2) = if side.is_horizontal() {
            (lo, fixed, hi, fixed)
        } else {
            (fixed, lo, fixed, hi)
        };
        Self {
            id,
            room_id,
            side,
            x1,
            y1,
            x2,
            y2,
            color_override: None,
            name: None,
        }
    }

    /// Returns `true` for segments running along x.
    #[must_use]
    pub fn is_horizontal(&self) -> bool {
        self.side.is_horizontal()
    }

    /// The coordinate of the wall line (y for horizontal, x for vertical).
    #[must_use]
    pub fn fixed(&self) -> f64 {
        if self.is_horizontal() {
            self.y1
        } else {
            self.x1
        }
    }

    /// The `(lo, hi)` span along the primary axis.
    #[must_use]
    pub fn span(&self) -> (f64, f64) {
        if self.is_horizontal() {
            (self.x1.min(self.x2), self.x1.max(self.x2))
        } else {
            (self.y1.min(self.y2), self.y1.max(self.y2))
        }
    }

    /// Segment length in grid units.
    #[must_use]
    pub fn length(&self) -> f64 {
        let (lo, hi) = self.span();
        hi - lo
    }

    /// Whether this segment lies on the line of `rect` and shares a
    /// positive-length stretch with it (boundary included).
    #[must_use]
    pub fn meets_rect(&self, rect: &Rect) -> bool {
        let (lo, hi) = self.span();
        wall_overlap(self.is_horizontal(), self.fixed(), lo, hi, rect, CUT_TOLERANCE).is_some()
    }

    /// Whether a user-set property lives on this segment.
    #[must_use]
    pub fn has_user_data(&self) -> bool {
        self.color_override.is_some() || self.name.is_some()
    }
}

/// Intersects the wall stretch `[lo, hi]` on the line at `fixed` with `rect`.
///
/// The line must fall inside `rect`'s band (edges included). Returns the
/// shared interval when it is longer than `tolerance`.
pub(crate) fn wall_overlap(
    horizontal: bool,
    fixed: f64,
    lo: f64,
    hi: f64,
    rect: &Rect,
    tolerance: f64,
) -> Option<(f64, f64)> {
    let (band_lo, band_hi, along_lo, along_hi) = if horizontal {
        (rect.y, rect.bottom(), rect.x, rect.right())
    } else {
        (rect.x, rect.right(), rect.y, rect.bottom())
    };
    if fixed < f64::from(band_lo) || fixed > f64::from(band_hi) {
        return None;
    }
    let a = lo.max(f64::from(along_lo));
    let b = hi.min(f64::from(along_hi));
    (b - a > tolerance).then_some((a, b))
}
