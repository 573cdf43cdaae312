use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The palette a room or wall override can be painted with.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RoomColor {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    /// Neutral fallback used when an edge cannot be resolved.
    #[default]
    Gray,
}

impl RoomColor {
    /// Every palette entry, in display order.
    pub const ALL: [RoomColor; 6] = [
        RoomColor::Red,
        RoomColor::Blue,
        RoomColor::Green,
        RoomColor::Yellow,
        RoomColor::Purple,
        RoomColor::Gray,
    ];

    /// Returns the lowercase palette name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            RoomColor::Red => "red",
            RoomColor::Blue => "blue",
            RoomColor::Green => "green",
            RoomColor::Yellow => "yellow",
            RoomColor::Purple => "purple",
            RoomColor::Gray => "gray",
        }
    }

    /// Returns the CSS hex string used to draw this color.
    #[must_use]
    pub fn hex(self) -> &'static str {
        match self {
            RoomColor::Red => "#ef4444",
            RoomColor::Blue => "#3b82f6",
            RoomColor::Green => "#22c55e",
            RoomColor::Yellow => "#eab308",
            RoomColor::Purple => "#a855f7",
            RoomColor::Gray => "#6b7280",
        }
    }
}

impl fmt::Display for RoomColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RoomColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoomColor::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown color {s:?}"))
    }
}
