//! JSON import and export of a floor plan.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::error::{DocumentError, ImportError, Result};
use crate::plan::{
    ColorPriority, ComponentInstance, ComponentTemplate, ConflictMatrix, ConflictRule, Edge,
    FloorPlan, ResolutionMode, Room, RoomColor,
};

/// The serialized form of a [`FloorPlan`].
///
/// Missing keys take their defaults and unknown keys are ignored, so older
/// and newer documents load without migration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanDocument {
    pub rooms: Vec<Room>,
    pub edges: Vec<Edge>,
    pub mode: ResolutionMode,
    pub color_priority: Vec<RoomColor>,
    pub conflict_matrix: Vec<ConflictRule>,
    pub component_templates: Vec<ComponentTemplate>,
    pub component_instances: Vec<ComponentInstance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl PlanDocument {
    /// Parses a document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::InvalidFormat` if the text is not a valid document.
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ImportError::InvalidFormat(e.to_string()).into())
    }

    /// Checks cross references that serde cannot.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::InvalidFormat` naming the first problem found.
    pub fn validate(&self) -> Result<()> {
        let mut rooms = BTreeSet::new();
        for room in &self.rooms {
            if Room::check_dimensions(room.width, room.height).is_err() {
                return Err(invalid(format!(
                    "room {} has size {}x{}",
                    room.id, room.width, room.height
                )));
            }
            if Room::check_bounds(&room.rect()).is_err() {
                return Err(invalid(format!(
                    "room {} at ({}, {}) lies outside the grid",
                    room.id, room.x, room.y
                )));
            }
            if !rooms.insert(&room.id) {
                return Err(invalid(format!("duplicate room id {}", room.id)));
            }
        }

        let mut owner = BTreeMap::new();
        for template in &self.component_templates {
            if template.room_ids.is_empty() {
                return Err(invalid(format!("template {} has no rooms", template.id)));
            }
            for id in &template.room_ids {
                if !rooms.contains(id) {
                    return Err(invalid(format!(
                        "template {} references unknown room {id}",
                        template.id
                    )));
                }
                if let Some(other) = owner.insert(id, &template.id) {
                    return Err(invalid(format!(
                        "room {id} belongs to templates {other} and {}",
                        template.id
                    )));
                }
            }
        }
        let templates: BTreeSet<_> = self.component_templates.iter().map(|t| &t.id).collect();
        if templates.len() != self.component_templates.len() {
            return Err(invalid("duplicate template id".into()));
        }

        let mut instances = BTreeSet::new();
        for instance in &self.component_instances {
            if !templates.contains(&instance.template_id) {
                return Err(invalid(format!(
                    "instance {} references unknown template {}",
                    instance.id, instance.template_id
                )));
            }
            if !instances.insert(&instance.id) {
                return Err(invalid(format!("duplicate instance id {}", instance.id)));
            }
            if !instance.position().is_on_grid() {
                return Err(invalid(format!(
                    "instance {} at ({}, {}) lies outside the grid",
                    instance.id, instance.x, instance.y
                )));
            }
        }
        Ok(())
    }
}

fn invalid(message: String) -> crate::error::PlanError {
    ImportError::InvalidFormat(message).into()
}

impl FloorPlan {
    /// Captures the plan's persistent state.
    #[must_use]
    pub fn to_document(&self) -> PlanDocument {
        PlanDocument {
            rooms: self.rooms.values().cloned().collect(),
            edges: self.edges.clone(),
            mode: self.mode,
            color_priority: self.color_priority.colors().to_vec(),
            conflict_matrix: self.conflict_matrix.rules().to_vec(),
            component_templates: self.templates.values().cloned().collect(),
            component_instances: self.instances.values().cloned().collect(),
            file_name: self.file_name.clone(),
        }
    }

    /// Serializes the plan to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::Serialize` if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_document())
            .map_err(|e| DocumentError::Serialize(e.to_string()).into())
    }

    /// Builds a plan from a validated document.
    ///
    /// Wall overrides and names from the document are carried onto the
    /// regenerated segments.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::InvalidFormat` if the document fails validation.
    pub fn from_document(doc: PlanDocument, config: EditorConfig) -> Result<Self> {
        doc.validate()?;
        let mut plan = FloorPlan::with_config(config);
        let latest = doc
            .rooms
            .iter()
            .map(|r| r.created_at)
            .chain(doc.component_instances.iter().map(|i| i.created_at))
            .max()
            .unwrap_or(0);
        plan.observe_time(latest);

        plan.rooms = doc.rooms.into_iter().map(|r| (r.id.clone(), r)).collect();
        plan.templates = doc
            .component_templates
            .into_iter()
            .map(|t| (t.id.clone(), t))
            .collect();
        plan.instances = doc
            .component_instances
            .into_iter()
            .map(|i| (i.id.clone(), i))
            .collect();
        plan.edges = doc.edges;
        plan.mode = doc.mode;
        plan.color_priority = ColorPriority::new(doc.color_priority);
        plan.conflict_matrix = ConflictMatrix::new(doc.conflict_matrix);
        plan.file_name = doc.file_name;
        plan.rebuild();
        Ok(plan)
    }

    /// Parses a plan from JSON with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::InvalidFormat` for malformed or inconsistent data.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_document(PlanDocument::parse(json)?, EditorConfig::default())
    }

    /// Replaces this plan's contents with an imported document, keeping the
    /// configuration. On error the plan is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::InvalidFormat` for malformed or inconsistent data.
    pub fn import_json(&mut self, json: &str) -> Result<()> {
        let imported = PlanDocument::parse(json)
            .and_then(|doc| Self::from_document(doc, self.config.clone()));
        match imported {
            Ok(plan) => {
                tracing::debug!(
                    rooms = plan.rooms.len(),
                    edges = plan.edges.len(),
                    "plan imported"
                );
                *self = plan;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "import rejected");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::PlanError;
    use crate::math::GridPos;
    use crate::plan::{RoomDraft, Side};

    fn sample() -> FloorPlan {
        let mut plan = FloorPlan::new();
        let a = plan
            .add_room(RoomDraft::new(0, 0, 4, 4, RoomColor::Red).named("hall"))
            .unwrap();
        let b = plan
            .add_room(RoomDraft::new(3, 0, 4, 4, RoomColor::Blue))
            .unwrap();
        let c = plan
            .add_room(RoomDraft::new(0, 10, 2, 2, RoomColor::Green))
            .unwrap();
        let west = plan
            .edges()
            .iter()
            .find(|e| e.room_id == a && e.side == Side::West)
            .unwrap()
            .id
            .clone();
        plan.set_edge_override(&west, Some(RoomColor::Yellow)).unwrap();
        plan.set_edge_name(&west, Some("front".into())).unwrap();
        plan.set_mode(ResolutionMode::Matrix);
        plan.add_conflict_rule(ConflictRule::new(
            RoomColor::Red,
            RoomColor::Blue,
            RoomColor::Purple,
        ));
        let (t, _) = plan.create_template("unit", &[c], GridPos::new(1, 11)).unwrap();
        plan.place_instance(&t, GridPos::new(10, 10)).unwrap();
        plan.set_file_name(Some("demo.json".into()));
        assert!(plan.room(&b).is_ok());
        plan
    }

    #[test]
    fn export_import_reproduces_plan() {
        let plan = sample();
        let json = plan.to_json().unwrap();
        let back = FloorPlan::from_json(&json).unwrap();
        assert_eq!(back.to_document(), plan.to_document());
        assert_eq!(back.edge_colors(), plan.edge_colors());
    }

    #[test]
    fn import_keeps_clock_ahead_of_documents() {
        let plan = sample();
        let mut back = FloorPlan::from_json(&plan.to_json().unwrap()).unwrap();
        let newest = back.rooms().map(|r| r.created_at).max().unwrap();
        let d = back
            .add_room(RoomDraft::new(30, 30, 2, 2, RoomColor::Gray))
            .unwrap();
        assert!(back.room(&d).unwrap().created_at > newest);
    }

    #[test]
    fn missing_keys_default_and_unknown_keys_are_ignored() {
        let json = r#"{
            "rooms": [{"id": "r1", "x": 0, "y": 0, "width": 3, "height": 2, "extra": true}],
            "mode": "sideways",
            "somethingElse": 1
        }"#;
        let plan = FloorPlan::from_json(json).unwrap();
        assert_eq!(plan.mode(), ResolutionMode::Unset);
        assert_eq!(plan.edges().len(), 4);
        assert_eq!(plan.color_priority().colors(), &[RoomColor::Gray]);
    }

    #[test]
    fn malformed_import_leaves_plan_untouched() {
        let mut plan = sample();
        let before = plan.to_document();
        for bad in [
            "not json",
            r#"{"rooms": [{"id": "a", "x": 0, "y": 0, "width": 0, "height": 2}]}"#,
            r#"{"rooms": [{"id": "a", "x": 0, "y": 0, "width": 1, "height": 1},
                          {"id": "a", "x": 5, "y": 0, "width": 1, "height": 1}]}"#,
            r#"{"componentTemplates": [{"id": "t", "roomIds": ["ghost"]}]}"#,
            r#"{"componentInstances": [{"id": "i", "templateId": "t", "x": 0, "y": 0}]}"#,
            r#"{"rooms":[{"id":"a","x":2147483000,"y":0,"width":1000,"height":2}]}"#,
            r#"{"rooms":[{"id":"a","x":-3,"y":0,"width":2,"height":2}]}"#,
            r#"{"rooms":[{"id":"a","x":0,"y":0,"width":2,"height":2}],
                "componentTemplates":[{"id":"t","roomIds":["a"]}],
                "componentInstances":[{"id":"i","templateId":"t","x":0,"y":2147483000}]}"#,
        ] {
            let err = plan.import_json(bad).unwrap_err();
            assert!(matches!(err, PlanError::Import(ImportError::InvalidFormat(_))));
            assert!(err.to_string().starts_with("Invalid data format"));
        }
        assert_eq!(plan.to_document(), before);
    }
}
