//! Round-trip planning.
//!
//! This module implements the core of the planner: join car legs and
//! sailings into complete round trips, drop the ones that break a hard
//! constraint, and rank the rest into a short-list of distinct choices.

mod assemble;
mod config;
mod filter;
mod rank;
mod trip;

#[cfg(test)]
mod fixtures;
#[cfg(test)]
mod trip_tests;

pub use assemble::{Assembler, Assembly, AssemblyError, Half};
pub use config::{ConfigError, MAX_BUFFER_MINUTES, PlannerConfig};
pub use filter::{Constraint, apply_constraints};
pub use rank::{
    DedupPolicy, RankError, RankField, RankingCriterion, SortDirection, deduplicate,
    default_criteria, rank_itineraries, shortlist,
};
pub use trip::{Evaluation, Trip, TripBuilder, TripError};
