pub mod config;
pub mod error;
pub mod json;
pub mod math;
pub mod operations;
pub mod plan;
pub mod publish;

pub use config::EditorConfig;
pub use error::{PlanError, Result};
pub use plan::FloorPlan;
