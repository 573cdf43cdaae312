//! Template and instance operations on a [`FloorPlan`](crate::plan::FloorPlan).

mod create;
mod edit_session;
mod instance;

pub use create::CreateTemplate;
pub use edit_session::{DiscardTemplateEdit, SaveTemplateEdit};
pub use instance::{MoveInstance, PlaceInstance};
