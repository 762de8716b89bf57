//! Web layer for the ferry trip planner.
//!
//! Provides an HTTP endpoint that evaluates a round trip over the car and
//! ferry records supplied in the request (or a dataset loaded at startup)
//! and shares each itinerary's costs between the people named.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
