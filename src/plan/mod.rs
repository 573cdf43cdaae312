pub mod color;
pub mod component;
pub mod conflict;
pub mod edge;
pub mod room;

mod edit;
mod templates;

pub use color::RoomColor;
pub use component::{
    ComponentInstance, ComponentTemplate, InstanceId, TemplateEditSession, TemplateId,
};
pub use conflict::{ColorPriority, ConflictMatrix, ConflictRule, OverrideScope, ResolutionMode};
pub use edge::{Edge, EdgeId, Side};
pub use room::{point_in_room, Room, RoomDraft, RoomId};

use std::collections::BTreeMap;

use crate::config::EditorConfig;
use crate::error::{DocumentError, Result};
use crate::math::GridPos;
use crate::operations::resolve::{OverrideLookup, ResolveEdgeColor};
use crate::operations::segment::RegenerateEdges;

/// The document being edited: the single owner of rooms, derived wall
/// segments, resolution settings and components.
///
/// Every edit runs one recompute of placed rooms, segments and the color
/// priority, so the derived state always matches the rooms. Colors are not
/// stored; [`FloorPlan::edge_color`] resolves them on each call.
#[derive(Debug, Clone, Default)]
pub struct FloorPlan {
    pub(crate) rooms: BTreeMap<RoomId, Room>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) placed: Vec<Room>,
    pub(crate) mode: ResolutionMode,
    pub(crate) color_priority: ColorPriority,
    pub(crate) conflict_matrix: ConflictMatrix,
    pub(crate) templates: BTreeMap<TemplateId, ComponentTemplate>,
    pub(crate) instances: BTreeMap<InstanceId, ComponentInstance>,
    pub(crate) file_name: Option<String>,
    pub(crate) config: EditorConfig,
    pub(crate) edit_session: Option<TemplateEditSession>,
    clock: u64,
    next_seq: u64,
}

impl FloorPlan {
    /// Creates a new, empty plan with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new, empty plan with the given configuration.
    #[must_use]
    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    // --- Rooms ---

    /// Returns a room by id, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::EntityNotFound` if no room has this id.
    pub fn room(&self, id: &RoomId) -> Result<&Room> {
        self.rooms
            .get(id)
            .ok_or_else(|| DocumentError::EntityNotFound(format!("room {id}")).into())
    }

    /// All rooms, including canonical template rooms, ordered by id.
    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    /// Rooms as laid out on the grid: regular rooms plus every instance's
    /// translated template rooms. This is the set that is validated,
    /// segmented and resolved.
    #[must_use]
    pub fn placed_rooms(&self) -> &[Room] {
        &self.placed
    }

    /// The template that owns `room`, if any.
    #[must_use]
    pub fn template_of(&self, room: &RoomId) -> Option<&ComponentTemplate> {
        self.templates.values().find(|t| t.contains(room))
    }

    // --- Edges ---

    /// All wall segments of the placed rooms.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns a segment by id, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::EntityNotFound` if no segment has this id.
    pub fn edge(&self, id: &EdgeId) -> Result<&Edge> {
        self.edges
            .iter()
            .find(|e| &e.id == id)
            .ok_or_else(|| DocumentError::EntityNotFound(format!("edge {id}")).into())
    }

    /// Resolves the display color of a segment with the current settings.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::EntityNotFound` if no segment has this id.
    pub fn edge_color(&self, id: &EdgeId) -> Result<RoomColor> {
        let edge = self.edge(id)?;
        Ok(self.resolve(edge))
    }

    /// Resolves every segment's display color.
    #[must_use]
    pub fn edge_colors(&self) -> Vec<(EdgeId, RoomColor)> {
        self.edges
            .iter()
            .map(|e| (e.id.clone(), self.resolve(e)))
            .collect()
    }

    fn resolve(&self, edge: &Edge) -> RoomColor {
        ResolveEdgeColor::new(edge, self.mode, &self.color_priority, &self.conflict_matrix)
            .with_overrides(OverrideLookup::from_scope(
                self.config.override_lookup,
                &self.edges,
            ))
            .execute(&self.placed)
    }

    // --- Settings ---

    /// The active resolution mode.
    #[must_use]
    pub fn mode(&self) -> ResolutionMode {
        self.mode
    }

    /// The color priority list.
    #[must_use]
    pub fn color_priority(&self) -> &ColorPriority {
        &self.color_priority
    }

    /// The conflict matrix.
    #[must_use]
    pub fn conflict_matrix(&self) -> &ConflictMatrix {
        &self.conflict_matrix
    }

    /// The document's file name, if one was set.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Sets the document's file name.
    pub fn set_file_name(&mut self, name: Option<String>) {
        self.file_name = name;
    }

    // --- Components ---

    /// Returns a template by id, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::EntityNotFound` if no template has this id.
    pub fn template(&self, id: &TemplateId) -> Result<&ComponentTemplate> {
        self.templates
            .get(id)
            .ok_or_else(|| DocumentError::EntityNotFound(format!("template {id}")).into())
    }

    /// All templates, ordered by id.
    pub fn templates(&self) -> impl Iterator<Item = &ComponentTemplate> {
        self.templates.values()
    }

    /// Returns an instance by id, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::EntityNotFound` if no instance has this id.
    pub fn instance(&self, id: &InstanceId) -> Result<&ComponentInstance> {
        self.instances
            .get(id)
            .ok_or_else(|| DocumentError::EntityNotFound(format!("instance {id}")).into())
    }

    /// All instances, ordered by id.
    pub fn instances(&self) -> impl Iterator<Item = &ComponentInstance> {
        self.instances.values()
    }

    /// The active template edit session, if any.
    #[must_use]
    pub fn edit_session(&self) -> Option<&TemplateEditSession> {
        self.edit_session.as_ref()
    }

    // --- Internal bookkeeping ---

    /// Canonical rooms of `template`, in template order.
    pub(crate) fn template_rooms(&self, template: &ComponentTemplate) -> Vec<Room> {
        template
            .room_ids
            .iter()
            .filter_map(|id| self.rooms.get(id).cloned())
            .collect()
    }

    /// Canonical rooms and bounding-box minimum of a template.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::EntityNotFound` for an unknown template and
    /// `DocumentError::EmptyTemplate` if it has no rooms left.
    pub(crate) fn template_layout(&self, id: &TemplateId) -> Result<(Vec<Room>, GridPos)> {
        let template = self.template(id)?;
        let rooms = self.template_rooms(template);
        let min = component::bounds_min(&rooms).ok_or(DocumentError::EmptyTemplate)?;
        Ok((rooms, min))
    }

    /// Placed rooms, leaving out the copies belonging to `skip`.
    pub(crate) fn placed_excluding(&self, skip: Option<&InstanceId>) -> Vec<Room> {
        let mut placed: Vec<Room> = self
            .rooms
            .values()
            .filter(|r| self.template_of(&r.id).is_none())
            .cloned()
            .collect();
        for instance in self.instances.values() {
            if Some(&instance.id) == skip {
                continue;
            }
            if let Ok((rooms, min)) = self.template_layout(&instance.template_id) {
                placed.extend(instance.place(&rooms, min));
            }
        }
        placed
    }

    /// Advances the logical clock and returns the new timestamp.
    pub(crate) fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Moves the clock past `t` so later timestamps stay larger.
    pub(crate) fn observe_time(&mut self, t: u64) {
        self.clock = self.clock.max(t);
    }

    /// Returns a fresh `{prefix}-{n}` id not used by any room, template or instance.
    pub(crate) fn next_id(&mut self, prefix: &str) -> String {
        loop {
            self.next_seq += 1;
            let id = format!("{prefix}-{}", self.next_seq);
            let taken = self.rooms.contains_key(&RoomId(id.clone()))
                || self.templates.contains_key(&TemplateId(id.clone()))
                || self.instances.contains_key(&InstanceId(id.clone()));
            if !taken {
                return id;
            }
        }
    }

    /// Recomputes placed rooms and wall segments, then re-syncs the priority.
    pub(crate) fn rebuild(&mut self) {
        self.placed = self.placed_excluding(None);
        let edges = RegenerateEdges::new(&self.placed, &self.edges)
            .with_tolerance(self.config.cut_tolerance)
            .execute();
        self.edges = edges;
        self.sync_priority();
    }

    /// Keeps the priority list equal to the colors in use: placed room colors
    /// in creation order, then wall overrides.
    pub(crate) fn sync_priority(&mut self) {
        let mut by_age: Vec<&Room> = self.placed.iter().collect();
        by_age.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.natural_cmp(&b.id))
        });
        let in_use: Vec<RoomColor> = by_age
            .iter()
            .map(|r| r.color)
            .chain(self.edges.iter().filter_map(|e| e.color_override))
            .collect();
        if self.color_priority.sync(in_use) {
            tracing::debug!(priority = ?self.color_priority.colors(), "color priority synced");
        }
    }
}
