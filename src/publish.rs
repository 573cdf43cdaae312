//! Published snapshots of a plan.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::error::{DocumentError, Result};
use crate::json::PlanDocument;
use crate::plan::FloorPlan;

/// A named, timestamped snapshot of a plan's document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedPlan {
    pub id: String,
    pub name: String,
    /// Milliseconds since the Unix epoch, supplied by the caller.
    pub timestamp: u64,
    /// Number of component instances placed in the plan.
    pub unit_count: usize,
    pub app_state: PlanDocument,
}

impl PublishedPlan {
    /// Snapshots `plan` under `id` and `name`.
    #[must_use]
    pub fn capture(
        plan: &FloorPlan,
        id: impl Into<String>,
        name: impl Into<String>,
        timestamp: u64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            timestamp,
            unit_count: plan.instances().count(),
            app_state: plan.to_document(),
        }
    }

    /// Rebuilds an editable plan from the snapshot.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::InvalidFormat` if the stored document is inconsistent.
    pub fn restore(&self, config: EditorConfig) -> Result<FloorPlan> {
        FloorPlan::from_document(self.app_state.clone(), config)
    }
}

/// Storage for published snapshots.
pub trait PlanArchive {
    /// Stores a new snapshot.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::DuplicateId` if the id is already stored.
    fn create(&mut self, plan: PublishedPlan) -> Result<()>;

    /// Returns a snapshot by id.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::EntityNotFound` if no snapshot has this id.
    fn get(&self, id: &str) -> Result<&PublishedPlan>;

    /// All snapshots, newest first.
    fn list(&self) -> Vec<&PublishedPlan>;

    /// Removes a snapshot and returns it.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::EntityNotFound` if no snapshot has this id.
    fn delete(&mut self, id: &str) -> Result<PublishedPlan>;
}

/// An in-process [`PlanArchive`].
#[derive(Debug, Clone, Default)]
pub struct MemoryArchive {
    plans: BTreeMap<String, PublishedPlan>,
}

impl MemoryArchive {
    /// Creates an empty archive.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlanArchive for MemoryArchive {
    fn create(&mut self, plan: PublishedPlan) -> Result<()> {
        if self.plans.contains_key(&plan.id) {
            return Err(DocumentError::DuplicateId(plan.id).into());
        }
        tracing::debug!(id = %plan.id, units = plan.unit_count, "plan published");
        self.plans.insert(plan.id.clone(), plan);
        Ok(())
    }

    fn get(&self, id: &str) -> Result<&PublishedPlan> {
        self.plans
            .get(id)
            .ok_or_else(|| DocumentError::EntityNotFound(format!("published plan {id}")).into())
    }

    fn list(&self) -> Vec<&PublishedPlan> {
        let mut plans: Vec<_> = self.plans.values().collect();
        plans.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| a.id.cmp(&b.id)));
        plans
    }

    fn delete(&mut self, id: &str) -> Result<PublishedPlan> {
        self.plans
            .remove(id)
            .ok_or_else(|| DocumentError::EntityNotFound(format!("published plan {id}")).into())
    }
}
