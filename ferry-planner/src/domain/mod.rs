//! Domain types for the ferry trip planner.
//!
//! This module contains the core domain model: places, money, drives,
//! sailings, the round-trip itineraries built from them and the ledger
//! that shares their costs out. All types enforce their invariants at
//! construction time, so code that receives these types can trust their
//! validity.

mod car_leg;
mod crossing;
mod error;
mod itinerary;
mod location;
mod money;
mod sharing;
mod time;
mod window;

pub use car_leg::{CarLeg, MAX_DRIVE_MINUTES};
pub use crossing::{CrossingId, Direction, FerryCrossing, SUPPORTED_YEARS};
pub use error::{DataError, ItineraryError, RecordKind};
pub use itinerary::{Itinerary, ItineraryLegs, LegRef, Schedule, ScheduleRules};
pub use location::Location;
pub use money::Money;
pub use sharing::{BillEntry, CostItem, CostKind, Ledger, Person, ShareError};
pub use time::{format_datetime, format_hmm, minutes, parse_datetime, parse_hmm};
pub use window::DriveWindow;
