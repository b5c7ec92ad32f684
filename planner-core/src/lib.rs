//! planner-core: error taxonomy and configuration shared by the
//! Soccer Session Planner backend crates.

pub mod config;
pub mod errors;

pub use config::{PlannerConfig, PlannerConfigSnapshot};
pub use errors::{ErrorKind, PlannerError, PlannerResult};
