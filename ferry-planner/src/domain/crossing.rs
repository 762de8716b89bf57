//! Ferry crossing types.

use std::fmt;

use std::ops::RangeInclusive;

use chrono::{Datelike, Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{DataError, Location, Money};

/// Which way a crossing goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// UK to France.
    #[serde(alias = "out", alias = "uk-fr")]
    Outbound,
    /// France to UK.
    #[serde(alias = "ret", alias = "fr-uk")]
    Return,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Outbound => f.write_str("outbound (UK to FR)"),
            Direction::Return => f.write_str("return (FR to UK)"),
        }
    }
}

/// Years a sailing may depart or arrive in.
pub const SUPPORTED_YEARS: RangeInclusive<i32> = 1900..=9999;

/// Index of a crossing in a repository's crossing arena.
///
/// Two itineraries using the same sailing share the same `CrossingId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CrossingId(pub usize);

/// A scheduled ferry sailing between two ports.
///
/// # Invariants
///
/// - `origin != destination`
/// - `arrival > departure`, both within `SUPPORTED_YEARS`
/// - `0 <= cost <= Money::MAX`
/// - operator is non-empty
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FerryCrossing {
    origin: Location,
    destination: Location,
    departure: NaiveDateTime,
    arrival: NaiveDateTime,
    cost: Money,
    operator: String,
    direction: Direction,
    cabin: bool,
}

impl FerryCrossing {
    /// Construct a crossing, validating its figures.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferry_planner::domain::{Direction, FerryCrossing, Location, Money, parse_datetime};
    /// use chrono::Duration;
    ///
    /// let crossing = FerryCrossing::new(
    ///     Location::new("Dover").unwrap(),
    ///     Location::new("Calais").unwrap(),
    ///     parse_datetime("2024-07-01 10:00").unwrap(),
    ///     parse_datetime("2024-07-01 11:30").unwrap(),
    ///     Money::from_pence(9900),
    ///     "P&O",
    ///     Direction::Outbound,
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(crossing.duration(), Duration::minutes(90));
    /// assert!(!crossing.has_cabin());
    /// ```
    pub fn new(
        origin: Location,
        destination: Location,
        departure: NaiveDateTime,
        arrival: NaiveDateTime,
        cost: Money,
        operator: impl Into<String>,
        direction: Direction,
    ) -> Result<Self, DataError> {
        let operator = operator.into().trim().to_string();
        let context = || format!("crossing {origin} -> {destination} at {departure}");

        if origin == destination {
            return Err(DataError::SameEndpoints {
                context: context(),
                location: origin.clone(),
            });
        }
        if arrival <= departure {
            return Err(DataError::ArrivalBeforeDeparture { context: context() });
        }
        for time in [departure, arrival] {
            if !SUPPORTED_YEARS.contains(&time.year()) {
                return Err(DataError::TimeOutOfRange {
                    context: context(),
                    time: time.to_string(),
                });
            }
        }
        if cost.is_negative() {
            return Err(DataError::NegativeCost {
                context: context(),
                cost,
            });
        }
        if cost > Money::MAX {
            return Err(DataError::CostTooLarge {
                context: context(),
                cost,
            });
        }
        if operator.is_empty() {
            return Err(DataError::EmptyOperator { context: context() });
        }

        Ok(FerryCrossing {
            origin,
            destination,
            departure,
            arrival,
            cost,
            operator,
            direction,
            cabin: false,
        })
    }

    /// The same sailing booked with cabin accommodation on top.
    pub fn cabin_variant(&self, cabin_cost: Money) -> Result<Self, DataError> {
        if cabin_cost.is_negative() {
            return Err(DataError::NegativeCost {
                context: format!("cabin on {}", self.describe()),
                cost: cabin_cost,
            });
        }
        if cabin_cost > Money::MAX {
            return Err(DataError::CostTooLarge {
                context: format!("cabin on {}", self.describe()),
                cost: cabin_cost,
            });
        }
        Ok(FerryCrossing {
            cost: self.cost + cabin_cost,
            cabin: true,
            ..self.clone()
        })
    }

    /// Returns the departure port.
    pub fn origin(&self) -> &Location {
        &self.origin
    }

    /// Returns the arrival port.
    pub fn destination(&self) -> &Location {
        &self.destination
    }

    /// Returns the sailing time.
    pub fn departure(&self) -> NaiveDateTime {
        self.departure
    }

    /// Returns the arrival time.
    pub fn arrival(&self) -> NaiveDateTime {
        self.arrival
    }

    /// Returns the time on board.
    pub fn duration(&self) -> Duration {
        self.arrival.signed_duration_since(self.departure)
    }

    /// Returns the fare, including any cabin.
    pub fn cost(&self) -> Money {
        self.cost
    }

    /// Returns the operator name.
    pub fn operator(&self) -> &str {
        &self.operator
    }

    /// Returns which way the crossing goes.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns true for the cabin variant of a sailing.
    pub fn has_cabin(&self) -> bool {
        self.cabin
    }

    /// Short human-readable description for logs and errors.
    pub fn describe(&self) -> String {
        format!(
            "{} {} -> {} at {}",
            self.operator,
            self.origin,
            self.destination,
            self.departure.format("%Y-%m-%d %H:%M")
        )
    }
}
