//! Ferry round-trip planner.
//!
//! Answers: "Which way across the channel and back is cheapest (or
//! quickest) for this trip?" by joining drives and sailings into complete
//! round trips, filtering and ranking them.

pub mod domain;
pub mod planner;
pub mod records;
pub mod repository;
pub mod web;
