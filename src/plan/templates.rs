use super::{
    ComponentInstance, ComponentTemplate, FloorPlan, InstanceId, RoomId, TemplateEditSession,
    TemplateId,
};
use crate::error::{DocumentError, Result};
use crate::math::GridPos;
use crate::operations::compose::{
    CreateTemplate, DiscardTemplateEdit, MoveInstance, PlaceInstance, SaveTemplateEdit,
};
use crate::operations::validate::SearchResult;

impl FloorPlan {
    /// Turns regular rooms into a template anchored at `origin`, with a home
    /// instance where the rooms already are.
    ///
    /// # Errors
    ///
    /// See [`CreateTemplate::execute`].
    pub fn create_template(
        &mut self,
        name: impl Into<String>,
        room_ids: &[RoomId],
        origin: GridPos,
    ) -> Result<(TemplateId, InstanceId)> {
        CreateTemplate::new(name, room_ids)
            .with_origin(origin)
            .execute(self)
    }

    /// Places another instance of a template with its minimum corner at `at`.
    ///
    /// # Errors
    ///
    /// See [`PlaceInstance::execute`].
    pub fn place_instance(&mut self, template: &TemplateId, at: GridPos) -> Result<InstanceId> {
        PlaceInstance::new(template, at).execute(self)
    }

    /// Where an instance would land if dropped at `target`.
    ///
    /// # Errors
    ///
    /// See [`MoveInstance::search`].
    pub fn preview_instance_move(
        &self,
        instance: &InstanceId,
        target: GridPos,
    ) -> Result<SearchResult> {
        MoveInstance::new(instance, target).search(self)
    }

    /// Moves an instance to the legal position nearest `target`.
    ///
    /// # Errors
    ///
    /// See [`MoveInstance::execute`].
    pub fn move_instance(
        &mut self,
        instance: &InstanceId,
        target: GridPos,
    ) -> Result<SearchResult> {
        MoveInstance::new(instance, target).execute(self)
    }

    /// Removes one instance. The template stays, even with no instances left.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::EntityNotFound` for an unknown instance.
    pub fn remove_instance(&mut self, id: &InstanceId) -> Result<ComponentInstance> {
        let instance = self
            .instances
            .remove(id)
            .ok_or_else(|| DocumentError::EntityNotFound(format!("instance {id}")))?;
        tracing::debug!(instance = %id, "instance removed");
        self.rebuild();
        Ok(instance)
    }

    /// Removes a template together with its canonical rooms and instances.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::EntityNotFound` for an unknown template and
    /// `DocumentError::EditSessionActive` while it is being edited.
    pub fn remove_template(&mut self, id: &TemplateId) -> Result<ComponentTemplate> {
        if self.edit_session.as_ref().is_some_and(|s| &s.template_id == id) {
            return Err(DocumentError::EditSessionActive(id.to_string()).into());
        }
        let template = self
            .templates
            .remove(id)
            .ok_or_else(|| DocumentError::EntityNotFound(format!("template {id}")))?;
        for room in &template.room_ids {
            self.rooms.remove(room);
        }
        self.instances.retain(|_, i| &i.template_id != id);
        tracing::debug!(template = %id, "template removed");
        self.rebuild();
        Ok(template)
    }

    // --- Template edit mode ---

    /// Starts editing a template through shadow rooms.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::EditSessionActive` if a session is already open
    /// and `DocumentError` variants for an unknown or empty template.
    pub fn begin_template_edit(&mut self, id: &TemplateId) -> Result<&mut TemplateEditSession> {
        if let Some(active) = &self.edit_session {
            return Err(DocumentError::EditSessionActive(active.template_id.to_string()).into());
        }
        let (rooms, _) = self.template_layout(id)?;
        tracing::debug!(template = %id, rooms = rooms.len(), "template edit started");
        Ok(self
            .edit_session
            .insert(TemplateEditSession::new(id.clone(), rooms)))
    }

    /// The open edit session, for staging changes on shadow rooms.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::NoEditSession` if no session is open.
    pub fn template_edit_mut(&mut self) -> Result<&mut TemplateEditSession> {
        self.edit_session
            .as_mut()
            .ok_or_else(|| DocumentError::NoEditSession.into())
    }

    /// Commits the open edit session to the template and all its instances.
    ///
    /// # Errors
    ///
    /// See [`SaveTemplateEdit::execute`].
    pub fn save_template_edit(&mut self) -> Result<()> {
        SaveTemplateEdit::execute(self)
    }

    /// Drops the open edit session.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::NoEditSession` if no session is open.
    pub fn discard_template_edit(&mut self) -> Result<()> {
        DiscardTemplateEdit::execute(self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::PlanError;
    use crate::operations::validate::IsValidPlacement;
    use crate::plan::{RoomColor, RoomDraft, Side};

    fn plan_with_two_instances() -> (FloorPlan, TemplateId, RoomId, InstanceId, InstanceId) {
        let mut plan = FloorPlan::new();
        let a = plan
            .add_room(RoomDraft::new(0, 0, 4, 4, RoomColor::Red))
            .unwrap();
        let (t, home) = plan
            .create_template("unit", &[a.clone()], GridPos::new(0, 0))
            .unwrap();
        let second = plan.place_instance(&t, GridPos::new(10, 0)).unwrap();
        (plan, t, a, home, second)
    }

    #[test]
    fn template_rooms_reject_direct_edits() {
        let (mut plan, _, a, _, _) = plan_with_two_instances();
        let err = plan.set_room_color(&a, RoomColor::Blue).unwrap_err();
        assert!(matches!(err, PlanError::Document(DocumentError::TemplateRoom(_))));
        assert!(plan.move_room(&a, GridPos::new(5, 5)).is_err());
    }

    #[test]
    fn edit_session_updates_every_instance() {
        let (mut plan, t, a, home, second) = plan_with_two_instances();
        plan.begin_template_edit(&t).unwrap();
        assert!(matches!(
            plan.begin_template_edit(&t).unwrap_err(),
            PlanError::Document(DocumentError::EditSessionActive(_))
        ));
        plan.template_edit_mut()
            .unwrap()
            .shadow_mut(&a)
            .unwrap()
            .color = RoomColor::Blue;
        // Staged changes stay out of the live plan until saved.
        assert!(plan.placed_rooms().iter().all(|r| r.color == RoomColor::Red));

        plan.save_template_edit().unwrap();
        for instance in [&home, &second] {
            let id = instance.placed_room_id(&a);
            let copy = plan.placed_rooms().iter().find(|r| r.id == id).unwrap();
            assert_eq!(copy.color, RoomColor::Blue);
        }
        assert_eq!(plan.color_priority().colors(), &[RoomColor::Blue]);
    }

    #[test]
    fn instance_move_preview_matches_move() {
        let (mut plan, _, a, home, second) = plan_with_two_instances();
        let preview = plan.preview_instance_move(&second, GridPos::new(2, 0)).unwrap();
        let moved = plan.move_instance(&second, GridPos::new(2, 0)).unwrap();
        assert_eq!(preview, moved);
        assert_eq!(moved, SearchResult::Found(GridPos::new(3, 0)));

        // The two copies now share a one-unit strip and fight over it.
        let east = plan
            .edges()
            .iter()
            .find(|e| e.room_id == home.placed_room_id(&a) && e.side == Side::East)
            .unwrap();
        assert_eq!(plan.edge_color(&east.id).unwrap(), RoomColor::Red);
    }

    #[test]
    fn removing_instances_and_templates() {
        let (mut plan, t, a, home, second) = plan_with_two_instances();
        plan.remove_instance(&second).unwrap();
        assert_eq!(plan.placed_rooms().len(), 1);
        assert!(plan.remove_instance(&second).is_err());

        plan.begin_template_edit(&t).unwrap();
        assert!(plan.remove_template(&t).is_err());
        plan.discard_template_edit().unwrap();

        plan.remove_template(&t).unwrap();
        assert!(plan.room(&a).is_err());
        assert!(plan.instance(&home).is_err());
        assert!(plan.edges().is_empty());
    }

    #[test]
    fn later_instance_wins_over_older_room() {
        let mut plan = FloorPlan::new();
        let a = plan
            .add_room(RoomDraft::new(0, 0, 4, 4, RoomColor::Blue))
            .unwrap();
        let (t, _) = plan.create_template("unit", &[a.clone()], GridPos::new(0, 0)).unwrap();
        let red = plan
            .add_room(RoomDraft::new(10, 0, 4, 4, RoomColor::Red))
            .unwrap();
        let placed = plan.place_instance(&t, GridPos::new(7, 0)).unwrap();
        assert!(
            plan.instance(&placed).unwrap().created_at > plan.room(&red).unwrap().created_at
        );

        let west = plan
            .edges()
            .iter()
            .find(|e| e.room_id == red && e.side == Side::West)
            .unwrap();
        assert_eq!(plan.edge_color(&west.id).unwrap(), RoomColor::Blue);
        let east = plan
            .edges()
            .iter()
            .find(|e| e.room_id == placed.placed_room_id(&a) && e.side == Side::East)
            .unwrap();
        assert_eq!(plan.edge_color(&east.id).unwrap(), RoomColor::Blue);
    }

    #[test]
    fn deleting_corner_room_keeps_other_copies_in_place() {
        let mut plan = FloorPlan::new();
        let a = plan
            .add_room(RoomDraft::new(0, 0, 4, 1, RoomColor::Red))
            .unwrap();
        let b = plan
            .add_room(RoomDraft::new(8, 0, 4, 8, RoomColor::Blue))
            .unwrap();
        let (t, home) = plan
            .create_template("pair", &[a.clone(), b.clone()], GridPos::new(0, 0))
            .unwrap();
        let second = plan.place_instance(&t, GridPos::new(20, 10)).unwrap();
        plan.add_room(RoomDraft::new(0, 2, 4, 4, RoomColor::Green))
            .unwrap();
        let copy_at = |plan: &FloorPlan, id: &RoomId| {
            plan.placed_rooms()
                .iter()
                .find(|r| &r.id == id)
                .unwrap()
                .position()
        };
        let before = [
            copy_at(&plan, &home.placed_room_id(&b)),
            copy_at(&plan, &second.placed_room_id(&b)),
        ];

        plan.delete_room(&a).unwrap();
        let after = [
            copy_at(&plan, &home.placed_room_id(&b)),
            copy_at(&plan, &second.placed_room_id(&b)),
        ];
        assert_eq!(after, before);
        assert_eq!(before, [GridPos::new(8, 0), GridPos::new(28, 10)]);
        assert_eq!(plan.instance(&home).unwrap().position(), GridPos::new(8, 0));
        assert_eq!(plan.placed_rooms().len(), 3);
        for room in plan.placed_rooms() {
            assert!(IsValidPlacement::new(room).execute(plan.placed_rooms()));
        }
    }

    #[test]
    fn deleting_inner_room_leaves_instances_alone() {
        let mut plan = FloorPlan::new();
        let a = plan
            .add_room(RoomDraft::new(0, 0, 4, 4, RoomColor::Red))
            .unwrap();
        let b = plan
            .add_room(RoomDraft::new(3, 0, 4, 4, RoomColor::Blue))
            .unwrap();
        let (t, home) = plan
            .create_template("pair", &[a.clone(), b.clone()], GridPos::new(0, 0))
            .unwrap();
        let second = plan.place_instance(&t, GridPos::new(10, 5)).unwrap();

        plan.delete_room(&b).unwrap();
        assert_eq!(plan.instance(&home).unwrap().position(), GridPos::new(0, 0));
        assert_eq!(plan.instance(&second).unwrap().position(), GridPos::new(10, 5));
        let copy = plan
            .placed_rooms()
            .iter()
            .find(|r| r.id == second.placed_room_id(&a))
            .unwrap();
        assert_eq!(copy.position(), GridPos::new(10, 5));
    }

    #[test]
    fn deleting_last_template_room_drops_template() {
        let (mut plan, t, a, _, _) = plan_with_two_instances();
        plan.delete_room(&a).unwrap();
        assert!(plan.template(&t).is_err());
        assert_eq!(plan.instances().count(), 0);
        assert!(plan.placed_rooms().is_empty());
    }
}
