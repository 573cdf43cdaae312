use crate::error::{DocumentError, Result};
use crate::math::GridPos;
use crate::plan::component::bounds_min;
use crate::plan::{ComponentInstance, ComponentTemplate, FloorPlan, InstanceId, RoomId, TemplateId};

/// Turns a selection of regular rooms into a template.
///
/// The rooms keep their coordinates as the template's canonical layout, and a
/// home instance is placed at the layout's bounding-box minimum so nothing
/// moves on screen. Wall overrides on the selected rooms carry over to the
/// home instance's copies, and chronological resolution is unchanged.
pub struct CreateTemplate<'a> {
    name: String,
    room_ids: &'a [RoomId],
    origin: Option<GridPos>,
}

impl<'a> CreateTemplate<'a> {
    /// Creates a new template operation over `room_ids`.
    #[must_use]
    pub fn new(name: impl Into<String>, room_ids: &'a [RoomId]) -> Self {
        Self {
            name: name.into(),
            room_ids,
            origin: None,
        }
    }

    /// Sets the template's anchor point. Defaults to the bounding-box minimum.
    #[must_use]
    pub fn with_origin(mut self, origin: GridPos) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::EmptyTemplate` for an empty selection,
    /// `DocumentError::EntityNotFound` for an unknown room and
    /// `DocumentError::TemplateRoom` for a room already in a template.
    pub fn execute(&self, plan: &mut FloorPlan) -> Result<(TemplateId, InstanceId)> {
        let mut ids: Vec<RoomId> = Vec::with_capacity(self.room_ids.len());
        for id in self.room_ids {
            plan.room(id)?;
            if plan.template_of(id).is_some() {
                return Err(DocumentError::TemplateRoom(id.to_string()).into());
            }
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        let rooms: Vec<_> = ids.iter().filter_map(|id| plan.rooms.get(id).cloned()).collect();
        let min = bounds_min(&rooms).ok_or(DocumentError::EmptyTemplate)?;

        let template_id = TemplateId(plan.next_id("template"));
        let instance_id = InstanceId(plan.next_id("instance"));
        // The home instance dates from its oldest room so every copy keeps
        // its own drawing time.
        let created_at = rooms.iter().map(|r| r.created_at).min().unwrap_or(0);

        for edge in &mut plan.edges {
            if ids.contains(&edge.room_id) {
                edge.room_id = instance_id.placed_room_id(&edge.room_id);
            }
        }

        plan.templates.insert(
            template_id.clone(),
            ComponentTemplate {
                id: template_id.clone(),
                name: self.name.clone(),
                room_ids: ids,
                origin: self.origin.unwrap_or(min),
            },
        );
        plan.instances.insert(
            instance_id.clone(),
            ComponentInstance {
                id: instance_id.clone(),
                template_id: template_id.clone(),
                x: min.x,
                y: min.y,
                created_at,
            },
        );
        tracing::debug!(template = %template_id, instance = %instance_id, "template created");
        plan.rebuild();
        Ok((template_id, instance_id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::PlanError;
    use crate::plan::{RoomColor, RoomDraft, Side};

    #[test]
    fn home_instance_keeps_layout_and_overrides() {
        let mut plan = FloorPlan::new();
        let a = plan
            .add_room(RoomDraft::new(2, 3, 4, 4, RoomColor::Red))
            .unwrap();
        let b = plan
            .add_room(RoomDraft::new(5, 3, 4, 4, RoomColor::Blue))
            .unwrap();
        let north = plan
            .edges()
            .iter()
            .find(|e| e.room_id == a && e.side == Side::North)
            .unwrap()
            .id
            .clone();
        plan.set_edge_override(&north, Some(RoomColor::Yellow)).unwrap();

        let (template, instance) = CreateTemplate::new("pair", &[a.clone(), b.clone()])
            .execute(&mut plan)
            .unwrap();

        assert_eq!(plan.template(&template).unwrap().origin, GridPos::new(2, 3));
        assert_eq!(plan.instance(&instance).unwrap().position(), GridPos::new(2, 3));
        let placed_a = instance.placed_room_id(&a);
        let copy = plan.placed_rooms().iter().find(|r| r.id == placed_a).unwrap();
        assert_eq!(copy.position(), GridPos::new(2, 3));
        assert_eq!(copy.created_at, plan.room(&a).unwrap().created_at);
        assert_eq!(plan.placed_rooms().len(), 2);
        assert!(plan
            .edges()
            .iter()
            .any(|e| e.room_id == placed_a && e.color_override == Some(RoomColor::Yellow)));
    }

    #[test]
    fn rejects_empty_and_nested_selections() {
        let mut plan = FloorPlan::new();
        let err = CreateTemplate::new("none", &[]).execute(&mut plan).unwrap_err();
        assert!(matches!(err, PlanError::Document(DocumentError::EmptyTemplate)));

        let a = plan
            .add_room(RoomDraft::new(0, 0, 4, 4, RoomColor::Red))
            .unwrap();
        CreateTemplate::new("one", &[a.clone()])
            .execute(&mut plan)
            .unwrap();
        let err = CreateTemplate::new("again", &[a]).execute(&mut plan).unwrap_err();
        assert!(matches!(err, PlanError::Document(DocumentError::TemplateRoom(_))));
    }
}
