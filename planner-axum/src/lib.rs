//! planner-axum: HTTP surface of the Soccer Session Planner API.
//!
//! Exposes the range-aware media proxy from `planner-blob` as
//! `GET {mount}/{bucket}/{*path}` together with the health endpoints and the
//! middleware stack every route shares.

pub mod app;
mod error;
pub mod health;
pub mod media;
pub mod settings;
pub mod state;

pub use app::PlannerApp;
pub use error::{planner_error_for, PlannerAxumError, GENERIC_ERROR_MESSAGE};
pub use settings::ServerSettings;
pub use state::MediaState;
