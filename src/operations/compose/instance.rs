use crate::error::{PlacementError, Result};
use crate::math::GridPos;
use crate::operations::validate::{ring_search, IsValidPlacement, SearchResult};
use crate::plan::{ComponentInstance, FloorPlan, InstanceId, Room, TemplateId};

/// Returns `true` if every copy in `copies` is legal against `existing`.
fn fits(copies: &[Room], existing: &[Room], wall_thickness: i32) -> bool {
    copies.iter().all(|copy| {
        IsValidPlacement::new(copy)
            .with_wall_thickness(wall_thickness)
            .execute(existing)
    })
}

/// Places a new instance of a template with its bounding-box minimum at `at`.
///
/// Placement is strict: the instance goes exactly where asked or not at all.
pub struct PlaceInstance<'a> {
    template_id: &'a TemplateId,
    at: GridPos,
}

impl<'a> PlaceInstance<'a> {
    /// Creates a new placement of `template_id` at `at`.
    #[must_use]
    pub fn new(template_id: &'a TemplateId, at: GridPos) -> Self {
        Self { template_id, at }
    }

    /// Executes the placement.
    ///
    /// # Errors
    ///
    /// Returns `PlacementError::OffGrid` for a negative position,
    /// `PlacementError::Collision` if any translated room overlaps a placed
    /// room illegally, and `DocumentError` variants for an unknown or empty
    /// template.
    pub fn execute(&self, plan: &mut FloorPlan) -> Result<InstanceId> {
        if !self.at.is_on_grid() {
            return Err(PlacementError::OffGrid {
                x: self.at.x,
                y: self.at.y,
            }
            .into());
        }
        let (rooms, min) = plan.template_layout(self.template_id)?;
        let mut instance = ComponentInstance {
            id: InstanceId(String::new()),
            template_id: self.template_id.clone(),
            x: self.at.x,
            y: self.at.y,
            created_at: 0,
        };
        let copies = instance.place(&rooms, min);
        if !fits(&copies, &plan.placed, plan.config.wall_thickness) {
            tracing::warn!(
                template = %self.template_id,
                at = ?self.at,
                "instance placement refused"
            );
            return Err(
                PlacementError::Collision(format!("instance of {}", self.template_id)).into(),
            );
        }

        instance.id = InstanceId(plan.next_id("instance"));
        instance.created_at = plan.tick();
        let id = instance.id.clone();
        tracing::debug!(
            instance = %id,
            template = %self.template_id,
            at = ?self.at,
            "instance placed"
        );
        plan.instances.insert(id.clone(), instance);
        plan.rebuild();
        Ok(id)
    }
}

/// Moves an instance as a rigid body to the legal position nearest `target`.
///
/// Uses the same radius and visiting order as the single-room search.
pub struct MoveInstance<'a> {
    instance_id: &'a InstanceId,
    target: GridPos,
}

impl<'a> MoveInstance<'a> {
    /// Creates a new move of `instance_id` towards `target`.
    #[must_use]
    pub fn new(instance_id: &'a InstanceId, target: GridPos) -> Self {
        Self {
            instance_id,
            target,
        }
    }

    /// Finds where the instance would land without changing the plan.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError` variants for an unknown instance or an empty
    /// template.
    pub fn search(&self, plan: &FloorPlan) -> Result<SearchResult> {
        let instance = plan.instance(self.instance_id)?;
        let (rooms, min) = plan.template_layout(&instance.template_id)?;
        let others = plan.placed_excluding(Some(self.instance_id));
        let wall_thickness = plan.config.wall_thickness;

        let mut probe = instance.clone();
        let result = ring_search(self.target, plan.config.search_radius, |pos| {
            probe.x = pos.x;
            probe.y = pos.y;
            fits(&probe.place(&rooms, min), &others, wall_thickness)
        });
        tracing::debug!(
            instance = %self.instance_id,
            target = ?self.target,
            ?result,
            "instance search"
        );
        Ok(result)
    }

    /// Executes the move. On `SearchResult::NotFound` the instance stays put.
    ///
    /// # Errors
    ///
    /// Same as [`MoveInstance::search`].
    pub fn execute(&self, plan: &mut FloorPlan) -> Result<SearchResult> {
        let result = self.search(plan)?;
        if let SearchResult::Found(pos) = result {
            let moved = plan
                .instances
                .get_mut(self.instance_id)
                .is_some_and(|instance| {
                    let changed = instance.position() != pos;
                    instance.x = pos.x;
                    instance.y = pos.y;
                    changed
                });
            if moved {
                plan.rebuild();
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::PlanError;
    use crate::operations::compose::CreateTemplate;
    use crate::plan::{RoomColor, RoomDraft, RoomId};

    /// A plan with one 4x4 template at the origin and its home instance.
    fn plan_with_template() -> (FloorPlan, TemplateId, InstanceId) {
        let mut plan = FloorPlan::new();
        let a: RoomId = plan
            .add_room(RoomDraft::new(0, 0, 4, 4, RoomColor::Green))
            .unwrap();
        let (t, home) = CreateTemplate::new("unit", &[a]).execute(&mut plan).unwrap();
        (plan, t, home)
    }

    #[test]
    fn place_beside_home_instance() {
        let (mut plan, t, _) = plan_with_template();
        let id = PlaceInstance::new(&t, GridPos::new(3, 0)).execute(&mut plan).unwrap();
        assert_eq!(plan.instance(&id).unwrap().position(), GridPos::new(3, 0));
        assert_eq!(plan.placed_rooms().len(), 2);
    }

    #[test]
    fn overlapping_place_is_rejected() {
        let (mut plan, t, _) = plan_with_template();
        let err = PlaceInstance::new(&t, GridPos::new(2, 0)).execute(&mut plan).unwrap_err();
        assert!(matches!(err, PlanError::Placement(PlacementError::Collision(_))));
        assert_eq!(plan.instances().count(), 1);
    }

    #[test]
    fn off_grid_place_is_rejected() {
        let (mut plan, t, _) = plan_with_template();
        let err = PlaceInstance::new(&t, GridPos::new(-1, 0)).execute(&mut plan).unwrap_err();
        assert!(matches!(err, PlanError::Placement(PlacementError::OffGrid { .. })));
    }

    #[test]
    fn overlapping_move_is_redirected() {
        let (mut plan, t, home) = plan_with_template();
        let second = PlaceInstance::new(&t, GridPos::new(10, 0)).execute(&mut plan).unwrap();

        let result = MoveInstance::new(&second, GridPos::new(1, 0)).execute(&mut plan).unwrap();
        assert_eq!(result, SearchResult::Found(GridPos::new(3, 0)));
        assert_eq!(plan.instance(&second).unwrap().position(), GridPos::new(3, 0));
        assert_eq!(plan.instance(&home).unwrap().position(), GridPos::new(0, 0));
    }

    #[test]
    fn blocked_move_leaves_instance_in_place() {
        let (mut plan, t, _) = plan_with_template();
        let second = PlaceInstance::new(&t, GridPos::new(40, 40)).execute(&mut plan).unwrap();
        let blocker = plan
            .add_room(RoomDraft::new(60, 0, 40, 40, RoomColor::Red))
            .unwrap();
        assert!(plan.room(&blocker).is_ok());

        let result = MoveInstance::new(&second, GridPos::new(80, 20))
            .search(&plan)
            .unwrap();
        assert_eq!(result, SearchResult::NotFound);
        let result = MoveInstance::new(&second, GridPos::new(80, 20))
            .execute(&mut plan)
            .unwrap();
        assert_eq!(result, SearchResult::NotFound);
        assert_eq!(plan.instance(&second).unwrap().position(), GridPos::new(40, 40));
    }
}
