use std::fmt;

use serde::{Deserialize, Serialize};

use super::room::{Room, RoomId};
use crate::math::{GridOffset, GridPos};

/// Unique identifier for a component template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(pub String);

/// Unique identifier for a placed component instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(pub String);

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TemplateId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<&str> for InstanceId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl InstanceId {
    /// Id of the placed copy of template room `room` in this instance.
    #[must_use]
    pub fn placed_room_id(&self, room: &RoomId) -> RoomId {
        RoomId(format!("{}:{room}", self.0))
    }
}

/// A reusable group of rooms.
///
/// The canonical rooms stay at their original coordinates; they are shown
/// only through instances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentTemplate {
    pub id: TemplateId,
    #[serde(default)]
    pub name: String,
    pub room_ids: Vec<RoomId>,
    /// Anchor point chosen when the template was created.
    #[serde(default)]
    pub origin: GridPos,
}

impl ComponentTemplate {
    /// Returns `true` if `room` is one of this template's rooms.
    #[must_use]
    pub fn contains(&self, room: &RoomId) -> bool {
        self.room_ids.contains(room)
    }
}

/// One placement of a template.
///
/// `(x, y)` is where the template's bounding-box minimum corner lands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentInstance {
    pub id: InstanceId,
    pub template_id: TemplateId,
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub created_at: u64,
}

impl ComponentInstance {
    /// The placed minimum corner.
    #[must_use]
    pub fn position(&self) -> GridPos {
        GridPos::new(self.x, self.y)
    }

    /// Translation applied to template rooms whose minimum corner is `template_min`.
    #[must_use]
    pub fn offset(&self, template_min: GridPos) -> GridOffset {
        self.position().offset_from(template_min)
    }

    /// Translated copies of `rooms` for this instance.
    ///
    /// A copy's `created_at` is the later of its room's creation time and the
    /// instance's placement time, so an instance placed over older rooms wins
    /// chronological conflicts.
    #[must_use]
    pub fn place(&self, rooms: &[Room], template_min: GridPos) -> Vec<Room> {
        let offset = self.offset(template_min);
        rooms
            .iter()
            .map(|r| {
                let mut copy = r.translated(self.id.placed_room_id(&r.id), offset);
                copy.created_at = copy.created_at.max(self.created_at);
                copy
            })
            .collect()
    }
}

/// Minimum corner of the bounding box of `rooms`, or `None` if empty.
#[must_use]
pub fn bounds_min(rooms: &[Room]) -> Option<GridPos> {
    let x = rooms.iter().map(|r| r.x).min()?;
    let y = rooms.iter().map(|r| r.y).min()?;
    Some(GridPos::new(x, y))
}

const SHADOW_PREFIX: &str = "edit:";

/// Staged edits of one template's rooms.
///
/// Shadow rooms are decoupled from the live instances until saved.
#[derive(Debug, Clone)]
pub struct TemplateEditSession {
    pub(crate) template_id: TemplateId,
    pub(crate) shadows: Vec<Room>,
    pub(crate) snapshot: Vec<Room>,
}

impl TemplateEditSession {
    /// Starts a session over the template's canonical `rooms`.
    #[must_use]
    pub fn new(template_id: TemplateId, rooms: Vec<Room>) -> Self {
        let shadows = rooms
            .iter()
            .map(|r| Room {
                id: shadow_id(&r.id),
                ..r.clone()
            })
            .collect();
        Self {
            template_id,
            shadows,
            snapshot: rooms,
        }
    }

    /// The template being edited.
    #[must_use]
    pub fn template_id(&self) -> &TemplateId {
        &self.template_id
    }

    /// The staged rooms.
    #[must_use]
    pub fn shadows(&self) -> &[Room] {
        &self.shadows
    }

    /// Mutable access to the shadow of canonical room `room`.
    pub fn shadow_mut(&mut self, room: &RoomId) -> Option<&mut Room> {
        let id = shadow_id(room);
        self.shadows.iter_mut().find(|r| r.id == id)
    }
}

/// Shadow-room id for canonical room `room`.
#[must_use]
pub fn shadow_id(room: &RoomId) -> RoomId {
    RoomId(format!("{SHADOW_PREFIX}{room}"))
}

/// Canonical id behind a shadow-room id.
#[must_use]
pub fn canonical_id(shadow: &RoomId) -> Option<RoomId> {
    shadow
        .as_str()
        .strip_prefix(SHADOW_PREFIX)
        .map(RoomId::from)
}
