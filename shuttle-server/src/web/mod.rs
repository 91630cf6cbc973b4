//! Web layer for the shuttle planner.
//!
//! Serves the CMS widget-JSON pages and a small JSON API over the planning
//! core. Boundary validation (identifiers, time strings, form fields) lives
//! here; the core only ever sees resolved ids and parsed times.

mod dto;
mod pages;
mod routes;
mod state;
pub mod widget;

pub use dto::*;
pub use routes::{create_router, AppError};
pub use state::AppState;
