use std::collections::BTreeMap;

use crate::error::{DocumentError, PlacementError, Result};
use crate::operations::validate::IsValidPlacement;
use crate::plan::component::canonical_id;
use crate::plan::{FloorPlan, Room, RoomId, TemplateEditSession};

/// Commits the active template edit session.
///
/// Each shadow room's name, size, color and conditions are copied onto its
/// canonical room; positions are never copied. Every instance of the template
/// picks the change up on the following recompute.
pub struct SaveTemplateEdit;

impl SaveTemplateEdit {
    /// Executes the save and ends the session.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::NoEditSession` without an active session,
    /// `GeometryError::InvalidDimensions` for an empty shadow room,
    /// `GeometryError::OutOfBounds` for an oversized one and
    /// `PlacementError::Collision` if a resized copy would overlap a placed
    /// room illegally. The session stays open on error.
    pub fn execute(plan: &mut FloorPlan) -> Result<()> {
        let session = plan
            .edit_session
            .as_ref()
            .ok_or(DocumentError::NoEditSession)?;
        let updated = Self::apply(plan, session)?;
        Self::check_instances(plan, session, &updated)?;

        let template = session.template_id.clone();
        plan.rooms.extend(updated);
        plan.edit_session = None;
        tracing::debug!(%template, "template edit saved");
        plan.rebuild();
        Ok(())
    }

    /// Canonical rooms with the shadow edits applied.
    fn apply(plan: &FloorPlan, session: &TemplateEditSession) -> Result<BTreeMap<RoomId, Room>> {
        let mut updated = BTreeMap::new();
        for shadow in &session.shadows {
            Room::check_dimensions(shadow.width, shadow.height)?;
            let id = canonical_id(&shadow.id)
                .ok_or_else(|| DocumentError::EntityNotFound(format!("room {}", shadow.id)))?;
            let mut room = plan.room(&id)?.clone();
            room.name.clone_from(&shadow.name);
            room.width = shadow.width;
            room.height = shadow.height;
            Room::check_bounds(&room.rect())?;
            room.color = shadow.color;
            room.conditions.clone_from(&shadow.conditions);
            updated.insert(id, room);
        }
        Ok(updated)
    }

    /// Checks every instance's copies of `updated` against the rest of the plan.
    fn check_instances(
        plan: &FloorPlan,
        session: &TemplateEditSession,
        updated: &BTreeMap<RoomId, Room>,
    ) -> Result<()> {
        let (canonical, min) = plan.template_layout(&session.template_id)?;
        let rooms: Vec<Room> = canonical
            .into_iter()
            .map(|r| updated.get(&r.id).cloned().unwrap_or(r))
            .collect();

        let instances: Vec<_> = plan
            .instances()
            .filter(|i| i.template_id == session.template_id)
            .collect();
        let prefixes: Vec<String> = instances.iter().map(|i| format!("{}:", i.id)).collect();
        let mut placed: Vec<Room> = plan
            .placed_rooms()
            .iter()
            .filter(|r| !prefixes.iter().any(|p| r.id.as_str().starts_with(p.as_str())))
            .cloned()
            .collect();
        for instance in &instances {
            placed.extend(instance.place(&rooms, min));
        }

        let thickness = plan.config.wall_thickness;
        for instance in &instances {
            for copy in instance.place(&rooms, min) {
                let ok = IsValidPlacement::new(&copy)
                    .with_wall_thickness(thickness)
                    .execute(&placed);
                if !ok {
                    tracing::warn!(
                        instance = %instance.id,
                        room = %copy.id,
                        "template edit refused"
                    );
                    return Err(PlacementError::Collision(format!("room {}", copy.id)).into());
                }
            }
        }
        Ok(())
    }
}

/// Drops the active template edit session and restores the template's rooms
/// as they were when the session began.
pub struct DiscardTemplateEdit;

impl DiscardTemplateEdit {
    /// Executes the discard.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::NoEditSession` without an active session.
    pub fn execute(plan: &mut FloorPlan) -> Result<()> {
        let session = plan
            .edit_session
            .take()
            .ok_or(DocumentError::NoEditSession)?;
        for room in session.snapshot {
            plan.rooms.insert(room.id.clone(), room);
        }
        tracing::debug!(template = %session.template_id, "template edit discarded");
        plan.rebuild();
        Ok(())
    }
}
