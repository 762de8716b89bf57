//! Domain error types.
//!
//! These errors represent validation failures and data inconsistencies
//! in the domain layer. They are distinct from assembly and ranking errors,
//! which belong to the planner.

use std::fmt;

use super::{Direction, Location, Money};

/// Which kind of input record an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Car,
    Ferry,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Car => f.write_str("car"),
            RecordKind::Ferry => f.write_str("ferry"),
        }
    }
}

/// Malformed input data, detected when records are loaded.
///
/// Every variant carries enough context to find the offending record.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DataError {
    /// Location identifier is empty (or only whitespace)
    #[error("location identifier cannot be empty")]
    EmptyLocation,

    /// A leg starts and ends at the same place
    #[error("{context}: origin and destination are both {location}")]
    SameEndpoints { context: String, location: Location },

    /// Cost below zero
    #[error("{context}: cost {cost} is negative")]
    NegativeCost { context: String, cost: Money },

    /// Cost too large to add up safely
    #[error("{context}: cost {cost} exceeds the largest supported amount")]
    CostTooLarge { context: String, cost: Money },

    /// Duration below zero
    #[error("{context}: duration of {minutes} minutes is negative")]
    NegativeDuration { context: String, minutes: i64 },

    /// Drive longer than any real drive
    #[error("{context}: duration of {minutes} minutes is too long for one drive")]
    DurationTooLong { context: String, minutes: i64 },

    /// Date outside the years the planner schedules in
    #[error("{context}: {time} is outside the supported years")]
    TimeOutOfRange { context: String, time: String },

    /// Distance below zero (or not a number)
    #[error("{context}: distance {km} km is not a valid distance")]
    InvalidDistance { context: String, km: f64 },

    /// Amount that cannot be represented as money
    #[error("{context}: amount {amount} is not a valid amount")]
    InvalidAmount { context: String, amount: f64 },

    /// Ferry arrives at or before it departs
    #[error("{context}: arrival must be after departure")]
    ArrivalBeforeDeparture { context: String },

    /// Drive window ends before it starts
    #[error("{context}: window ends before it starts")]
    InvertedWindow { context: String },

    /// Ferry operator is missing
    #[error("{context}: operator cannot be empty")]
    EmptyOperator { context: String },

    /// A port appears on both sides of the channel
    #[error("port {port} is used both as a UK-side and an FR-side port")]
    InconsistentDirection { port: Location },

    /// Car record has neither a cost nor a distance to estimate one from
    #[error("{context}: no cost given and no distance to estimate fuel from")]
    MissingCost { context: String },

    /// Date/time text could not be parsed
    #[error("invalid date/time: {0}")]
    InvalidDateTime(String),

    /// Duration text could not be parsed
    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    /// Vehicle parameters are out of range
    #[error("invalid vehicle: {0}")]
    InvalidVehicle(&'static str),

    /// An input record failed validation
    #[error("{kind} record {index}: {source}")]
    Record {
        kind: RecordKind,
        index: usize,
        #[source]
        source: Box<DataError>,
    },
}

impl DataError {
    /// Wrap this error with the position of the record that caused it.
    pub fn in_record(self, kind: RecordKind, index: usize) -> Self {
        DataError::Record {
            kind,
            index,
            source: Box::new(self),
        }
    }
}

/// An itinerary chain that does not hold together.
///
/// The assembler only joins legs on matching endpoints, so these indicate
/// a bug rather than bad input.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ItineraryError {
    /// Consecutive legs don't connect
    #[error("legs do not connect: {0} then {1}")]
    Disconnected(Location, Location),

    /// Crossing used in the wrong direction
    #[error("{position} crossing must be {expected}")]
    WrongDirection {
        position: &'static str,
        expected: Direction,
    },

    /// Party must contain at least one person
    #[error("party size must be at least one")]
    EmptyParty,

    /// A scheduled time falls outside the representable range
    #[error("schedule falls outside the representable date range")]
    ScheduleOutOfRange,
}
