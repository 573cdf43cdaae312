use std::cmp::Ordering;
use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use serde::{Deserialize, Serialize};

use super::color::RoomColor;
use crate::error::{GeometryError, Result};
use crate::math::{snap_to_grid, GridOffset, GridPos, Point2, Rect};

/// Unique identifier for a room in a plan.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    /// Wraps any string as a room id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Orders ids with digit runs compared by value, so `room-9` sorts before
    /// `room-10` and `instance-9:room-1` before `instance-10:room-1`.
    ///
    /// Ids that compare equal this way (`room-01`, `room-1`) fall back to
    /// plain string order.
    #[must_use]
    pub fn natural_cmp(&self, other: &RoomId) -> Ordering {
        let mut a = self.0.chars().peekable();
        let mut b = other.0.chars().peekable();
        loop {
            match (a.peek().copied(), b.peek().copied()) {
                (None, None) => return self.0.cmp(&other.0),
                (None, Some(_)) => return Ordering::Less,
                (Some(_), None) => return Ordering::Greater,
                (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                    let ord = cmp_digit_runs(&digit_run(&mut a), &digit_run(&mut b));
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                (Some(x), Some(y)) => {
                    if x != y {
                        return x.cmp(&y);
                    }
                    a.next();
                    b.next();
                }
            }
        }
    }
}

fn digit_run(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.next_if(char::is_ascii_digit) {
        run.push(c);
    }
    run
}

fn cmp_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// An axis-aligned rectangular room on the integer grid.
///
/// `created_at` is a logical timestamp assigned once when the room is drawn.
/// Moving or resizing a room never changes it; it is the tie-breaker for
/// chronological conflict resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RoomId,
    #[serde(default)]
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub color: RoomColor,
    #[serde(default)]
    pub created_at: u64,
    #[serde(default)]
    pub conditions: Vec<String>,
}

impl Room {
    /// Returns the room's footprint.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Returns the top-left corner.
    #[must_use]
    pub fn position(&self) -> GridPos {
        GridPos::new(self.x, self.y)
    }

    /// Returns a copy placed at `pos`, keeping everything else.
    #[must_use]
    pub fn at(&self, pos: GridPos) -> Room {
        Room {
            x: pos.x,
            y: pos.y,
            ..self.clone()
        }
    }

    /// Returns a copy moved by `offset` under a new id.
    #[must_use]
    pub fn translated(&self, id: RoomId, offset: GridOffset) -> Room {
        Room {
            id,
            x: self.x + offset.x,
            y: self.y + offset.y,
            ..self.clone()
        }
    }

    /// Checks that a footprint lies on the grid with sizes in range.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::OutOfBounds` otherwise.
    pub fn check_bounds(rect: &Rect) -> Result<()> {
        if !rect.is_within_bounds() {
            return Err(GeometryError::OutOfBounds {
                x: rect.x,
                y: rect.y,
                width: rect.width,
                height: rect.height,
            }
            .into());
        }
        Ok(())
    }

    /// Checks the size invariant.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidDimensions` if either dimension is not positive.
    pub fn check_dimensions(width: i32, height: i32) -> Result<()> {
        if width <= 0 || height <= 0 {
            return Err(GeometryError::InvalidDimensions { width, height }.into());
        }
        Ok(())
    }
}

/// Half-open containment test of a point (in grid units) against a room.
#[must_use]
pub fn point_in_room(point: &Point2, room: &Room) -> bool {
    room.rect().contains_point(point)
}

/// A room that has not been added to a plan yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomDraft {
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub color: RoomColor,
}

impl RoomDraft {
    /// Creates a draft with an empty name.
    #[must_use]
    pub fn new(x: i32, y: i32, width: i32, height: i32, color: RoomColor) -> Self {
        Self {
            name: String::new(),
            x,
            y,
            width,
            height,
            color,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builds a draft from a draw gesture between two pixel positions.
    ///
    /// Corners are snapped to the grid and normalized so the gesture can run in
    /// any direction. A gesture that collapses on an axis still yields one cell.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidGridSize` if `grid_size` is not positive.
    pub fn from_drag(
        start: &Point2,
        end: &Point2,
        grid_size: f64,
        color: RoomColor,
    ) -> Result<Self> {
        let a = snap_to_grid(start, grid_size)?;
        let b = snap_to_grid(end, grid_size)?;
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        let width = (a.x - b.x).abs().max(1);
        let height = (a.y - b.y).abs().max(1);
        Ok(Self::new(x, y, width, height, color))
    }

    /// Returns the draft's footprint.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}
