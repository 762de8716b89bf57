//! Car leg type.
//!
//! A `CarLeg` is one pre-computed drive between two places. Legs are opaque
//! data points: the planner never routes, it only chains legs whose
//! endpoints match.

use chrono::{Duration, NaiveDateTime};

use super::{DataError, DriveWindow, Location, Money};

/// Longest drive a single leg may take.
pub const MAX_DRIVE_MINUTES: i64 = 7 * 24 * 60;

/// A drive from one location to another.
///
/// # Invariants
///
/// - `origin != destination`
/// - `0 <= duration <= MAX_DRIVE_MINUTES`, `0 <= cost <= Money::MAX`
/// - distance, when known, is a finite non-negative number of kilometres
#[derive(Debug, Clone, PartialEq)]
pub struct CarLeg {
    origin: Location,
    destination: Location,
    duration: Duration,
    cost: Money,
    windows: Vec<DriveWindow>,
    variant: Option<String>,
    distance_km: Option<f64>,
}

impl CarLeg {
    /// Construct a leg, validating its figures.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - origin and destination are the same place
    /// - duration or cost is negative
    /// - duration is longer than a week or cost is above `Money::MAX`
    ///
    /// # Examples
    ///
    /// ```
    /// use ferry_planner::domain::{CarLeg, Location, Money};
    /// use chrono::Duration;
    ///
    /// let home = Location::new("Home").unwrap();
    /// let dover = Location::new("Dover").unwrap();
    ///
    /// let leg = CarLeg::new(home.clone(), dover.clone(), Duration::minutes(150), Money::from_pence(2400)).unwrap();
    /// assert_eq!(leg.origin(), &home);
    /// assert_eq!(leg.duration(), Duration::minutes(150));
    ///
    /// // Negative durations are rejected
    /// assert!(CarLeg::new(home, dover, Duration::minutes(-1), Money::ZERO).is_err());
    /// ```
    pub fn new(
        origin: Location,
        destination: Location,
        duration: Duration,
        cost: Money,
    ) -> Result<Self, DataError> {
        let context = || format!("car leg {origin} -> {destination}");

        if origin == destination {
            return Err(DataError::SameEndpoints {
                context: context(),
                location: origin.clone(),
            });
        }
        if duration < Duration::zero() {
            return Err(DataError::NegativeDuration {
                context: context(),
                minutes: duration.num_minutes(),
            });
        }
        if duration.num_minutes() > MAX_DRIVE_MINUTES {
            return Err(DataError::DurationTooLong {
                context: context(),
                minutes: duration.num_minutes(),
            });
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

        Ok(CarLeg {
            origin,
            destination,
            duration,
            cost,
            windows: Vec::new(),
            variant: None,
            distance_km: None,
        })
    }

    /// Restrict the leg to the given drive windows.
    ///
    /// An empty list means the leg can be driven at any time.
    pub fn with_windows(mut self, windows: Vec<DriveWindow>) -> Self {
        self.windows = windows;
        self
    }

    /// Tag the leg as a named route alternative.
    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        let variant = variant.into();
        self.variant = (!variant.trim().is_empty()).then_some(variant);
        self
    }

    /// Record the distance driven.
    pub fn with_distance(mut self, km: f64) -> Result<Self, DataError> {
        if !km.is_finite() || km < 0.0 {
            return Err(DataError::InvalidDistance {
                context: format!("car leg {} -> {}", self.origin, self.destination),
                km,
            });
        }
        self.distance_km = Some(km);
        Ok(self)
    }

    /// Returns the starting location.
    pub fn origin(&self) -> &Location {
        &self.origin
    }

    /// Returns the end location.
    pub fn destination(&self) -> &Location {
        &self.destination
    }

    /// Returns the drive duration.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Returns the cost (fuel, tolls).
    pub fn cost(&self) -> Money {
        self.cost
    }

    /// Returns the drive windows; empty means unrestricted.
    pub fn windows(&self) -> &[DriveWindow] {
        &self.windows
    }

    /// Returns the route alternative tag, if any.
    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    /// Returns the distance in kilometres, if known.
    pub fn distance_km(&self) -> Option<f64> {
        self.distance_km
    }

    /// Latest departure that arrives by `deadline` and fits a window.
    ///
    /// `None` if no window fits or the departure would fall outside the
    /// representable range.
    pub fn latest_departure_arriving_by(&self, deadline: NaiveDateTime) -> Option<NaiveDateTime> {
        if self.windows.is_empty() {
            return deadline.checked_sub_signed(self.duration);
        }
        self.windows
            .iter()
            .filter_map(|w| w.latest_departure(deadline, self.duration))
            .max()
    }

    /// Earliest departure no sooner than `ready` that fits a window.
    pub fn earliest_departure_from(&self, ready: NaiveDateTime) -> Option<NaiveDateTime> {
        if self.windows.is_empty() {
            return Some(ready);
        }
        self.windows
            .iter()
            .filter_map(|w| w.earliest_departure(ready, self.duration))
            .min()
    }
}
