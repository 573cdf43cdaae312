use super::{
    ColorPriority, ConflictRule, EdgeId, FloorPlan, ResolutionMode, Room, RoomColor, RoomDraft,
    RoomId, TemplateId,
};
use crate::error::{DocumentError, PlacementError, Result};
use crate::math::{GridPos, Rect};
use crate::operations::validate::{
    IsValidArrowKeyMove, IsValidPlacement, NearestValidPosition, SearchResult,
};

impl FloorPlan {
    /// Returns a room that may be edited directly (not part of a template).
    fn regular_room(&self, id: &RoomId) -> Result<&Room> {
        let room = self.room(id)?;
        if self.template_of(id).is_some() {
            return Err(DocumentError::TemplateRoom(id.to_string()).into());
        }
        Ok(room)
    }

    fn regular_room_mut(&mut self, id: &RoomId) -> Result<&mut Room> {
        self.regular_room(id)?;
        self.rooms
            .get_mut(id)
            .ok_or_else(|| DocumentError::EntityNotFound(format!("room {id}")).into())
    }

    fn nearest_for(&self, room: &Room, target: GridPos) -> SearchResult {
        NearestValidPosition::new(room, target)
            .with_radius(self.config.search_radius)
            .with_wall_thickness(self.config.wall_thickness)
            .execute(&self.placed)
    }

    /// Adds a drawn room at the nearest legal position to where it was drawn.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidDimensions` for an empty draft,
    /// `GeometryError::OutOfBounds` for a draft beyond the grid's far edges and
    /// `PlacementError::NoValidPosition` when no legal cell is within reach.
    pub fn add_room(&mut self, draft: RoomDraft) -> Result<RoomId> {
        Room::check_dimensions(draft.width, draft.height)?;
        // A corner dragged past the top or left edge is pulled back by the search.
        Room::check_bounds(&Rect::new(
            draft.x.max(0),
            draft.y.max(0),
            draft.width,
            draft.height,
        ))?;
        let id = RoomId(self.next_id("room"));
        let mut room = Room {
            id: id.clone(),
            name: draft.name,
            x: draft.x,
            y: draft.y,
            width: draft.width,
            height: draft.height,
            color: draft.color,
            created_at: 0,
            conditions: Vec::new(),
        };

        let target = GridPos::new(draft.x, draft.y);
        let Some(pos) = self.nearest_for(&room, target).position() else {
            tracing::warn!(room = %id, ?target, "no legal position for new room");
            return Err(PlacementError::NoValidPosition {
                entity: format!("room {id}"),
                x: target.x,
                y: target.y,
                radius: self.config.search_radius,
            }
            .into());
        };

        room.x = pos.x;
        room.y = pos.y;
        room.created_at = self.tick();
        tracing::debug!(room = %id, ?pos, created_at = room.created_at, "room added");
        self.rooms.insert(id.clone(), room);
        self.rebuild();
        Ok(id)
    }

    /// Where a dragged room would land if dropped at `target`.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::EntityNotFound` for an unknown room and
    /// `DocumentError::TemplateRoom` for a room owned by a template.
    pub fn preview_move(&self, id: &RoomId, target: GridPos) -> Result<SearchResult> {
        let room = self.regular_room(id)?;
        Ok(self.nearest_for(room, target))
    }

    /// Moves a room to the legal position nearest `target`.
    ///
    /// The result is the same as [`FloorPlan::preview_move`] for the same
    /// target. On `SearchResult::NotFound` the room stays where it was.
    ///
    /// # Errors
    ///
    /// Same as [`FloorPlan::preview_move`].
    pub fn move_room(&mut self, id: &RoomId, target: GridPos) -> Result<SearchResult> {
        let result = self.preview_move(id, target)?;
        match result {
            SearchResult::Found(pos) => {
                let room = self.regular_room_mut(id)?;
                if room.position() != pos {
                    room.x = pos.x;
                    room.y = pos.y;
                    tracing::debug!(room = %id, ?pos, "room moved");
                    self.rebuild();
                }
            }
            SearchResult::NotFound => {
                tracing::debug!(room = %id, ?target, "move refused");
            }
        }
        Ok(result)
    }

    /// Nudges a room by `(dx, dy)` if it is legal exactly there.
    ///
    /// Returns `false` (and leaves the room alone) otherwise.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::EntityNotFound` for an unknown room and
    /// `DocumentError::TemplateRoom` for a room owned by a template.
    pub fn nudge_room(&mut self, id: &RoomId, dx: i32, dy: i32) -> Result<bool> {
        let room = self.regular_room(id)?;
        let ok = IsValidArrowKeyMove::new(room, dx, dy)
            .with_wall_thickness(self.config.wall_thickness)
            .execute(&self.placed);
        if !ok {
            return Ok(false);
        }
        let room = self.regular_room_mut(id)?;
        room.x += dx;
        room.y += dy;
        self.rebuild();
        Ok(true)
    }

    /// Resizes a room in place; its top-left corner stays fixed.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidDimensions` for a non-positive size,
    /// `GeometryError::OutOfBounds` for an oversized one and
    /// `PlacementError::Collision` if the new footprint overlaps illegally.
    pub fn resize_room(&mut self, id: &RoomId, width: i32, height: i32) -> Result<()> {
        Room::check_dimensions(width, height)?;
        let candidate = Room {
            width,
            height,
            ..self.regular_room(id)?.clone()
        };
        Room::check_bounds(&candidate.rect())?;
        let ok = IsValidPlacement::new(&candidate)
            .with_wall_thickness(self.config.wall_thickness)
            .execute(&self.placed);
        if !ok {
            return Err(PlacementError::Collision(format!("room {id}")).into());
        }
        *self.regular_room_mut(id)? = candidate;
        self.rebuild();
        Ok(())
    }

    /// Changes a room's color.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::EntityNotFound` for an unknown room and
    /// `DocumentError::TemplateRoom` for a room owned by a template.
    pub fn set_room_color(&mut self, id: &RoomId, color: RoomColor) -> Result<()> {
        self.regular_room_mut(id)?.color = color;
        self.rebuild();
        Ok(())
    }

    /// Renames a room.
    ///
    /// # Errors
    ///
    /// Same as [`FloorPlan::set_room_color`].
    pub fn rename_room(&mut self, id: &RoomId, name: impl Into<String>) -> Result<()> {
        self.regular_room_mut(id)?.name = name.into();
        Ok(())
    }

    /// Replaces a room's conditions list.
    ///
    /// # Errors
    ///
    /// Same as [`FloorPlan::set_room_color`].
    pub fn set_room_conditions(&mut self, id: &RoomId, conditions: Vec<String>) -> Result<()> {
        self.regular_room_mut(id)?.conditions = conditions;
        Ok(())
    }

    /// Deletes a room. A template room is also removed from its template; a
    /// template left empty is removed together with its instances. The other
    /// copies of every instance stay where they were, even when the deleted
    /// room defined the template's minimum corner.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::EntityNotFound` for an unknown room and
    /// `DocumentError::EditSessionActive` if its template is being edited.
    pub fn delete_room(&mut self, id: &RoomId) -> Result<Room> {
        if let (Some(session), Some(template)) = (&self.edit_session, self.template_of(id)) {
            if session.template_id == template.id {
                return Err(DocumentError::EditSessionActive(template.id.to_string()).into());
            }
        }
        let old_min = self
            .template_of(id)
            .map(|t| t.id.clone())
            .and_then(|t| self.template_layout(&t).ok().map(|(_, min)| (t, min)));
        let room = self
            .rooms
            .remove(id)
            .ok_or_else(|| DocumentError::EntityNotFound(format!("room {id}")))?;

        let mut emptied = Vec::new();
        for template in self.templates.values_mut() {
            if template.contains(id) {
                template.room_ids.retain(|r| r != id);
                if template.room_ids.is_empty() {
                    emptied.push(template.id.clone());
                }
            }
        }
        for template in emptied {
            self.templates.remove(&template);
            self.instances.retain(|_, i| i.template_id != template);
            tracing::debug!(%template, "empty template removed");
        }
        if let Some((template, old_min)) = old_min {
            self.keep_instances_in_place(&template, old_min);
        }

        tracing::debug!(room = %id, "room deleted");
        self.rebuild();
        Ok(room)
    }

    /// Re-anchors the instances of `template` after its minimum corner moved
    /// away from `old_min`, so their copies keep their grid positions.
    fn keep_instances_in_place(&mut self, template: &TemplateId, old_min: GridPos) {
        let Ok((_, new_min)) = self.template_layout(template) else {
            return;
        };
        let shift = new_min.offset_from(old_min);
        if shift.x == 0 && shift.y == 0 {
            return;
        }
        for instance in self
            .instances
            .values_mut()
            .filter(|i| &i.template_id == template)
        {
            let pos = instance.position().offset_by(shift);
            instance.x = pos.x;
            instance.y = pos.y;
        }
        tracing::debug!(%template, ?shift, "instances re-anchored");
    }

    // --- Wall properties ---

    /// Sets or clears a segment's color override.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::EntityNotFound` if no segment has this id.
    pub fn set_edge_override(&mut self, id: &EdgeId, color: Option<RoomColor>) -> Result<()> {
        self.edge_mut(id)?.color_override = color;
        self.sync_priority();
        Ok(())
    }

    /// Sets or clears a segment's name.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::EntityNotFound` if no segment has this id.
    pub fn set_edge_name(&mut self, id: &EdgeId, name: Option<String>) -> Result<()> {
        self.edge_mut(id)?.name = name;
        Ok(())
    }

    fn edge_mut(&mut self, id: &EdgeId) -> Result<&mut super::Edge> {
        self.edges
            .iter_mut()
            .find(|e| &e.id == id)
            .ok_or_else(|| DocumentError::EntityNotFound(format!("edge {id}")).into())
    }

    // --- Resolution settings ---

    /// Switches the resolution mode.
    pub fn set_mode(&mut self, mode: ResolutionMode) {
        tracing::debug!(?mode, "resolution mode changed");
        self.mode = mode;
    }

    /// Reorders the priority list. Colors not in use are dropped and colors
    /// in use but missing are appended.
    pub fn set_color_priority(&mut self, colors: impl IntoIterator<Item = RoomColor>) {
        self.color_priority = ColorPriority::new(colors);
        self.sync_priority();
    }

    /// Adds a matrix rule, replacing any rule for the same ordered pair.
    pub fn add_conflict_rule(&mut self, rule: ConflictRule) {
        self.conflict_matrix.insert(rule);
    }

    /// Removes the matrix rule for an ordered pair.
    pub fn remove_conflict_rule(&mut self, underneath: RoomColor, on_top: RoomColor) -> bool {
        self.conflict_matrix.remove(underneath, on_top)
    }
}
