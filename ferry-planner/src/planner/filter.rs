//! Hard constraints on itineraries.
//!
//! A constraint is a pass/fail test over an itinerary's precomputed
//! figures. An itinerary survives filtering only if it passes every active
//! constraint.

use std::fmt;

use chrono::{Duration, NaiveDateTime};
use tracing::trace;

use crate::domain::{Itinerary, Money, format_datetime, format_hmm};

/// A pass/fail test over an itinerary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// Total cost at most this much
    MaxTotalCost(Money),
    /// Each person's share at most this much
    MaxCostPerPerson(Money),
    /// Travel time, both ways, at most this long
    MaxTotalDuration(Duration),
    /// Time at sea, both ways, at most this long
    MaxCrossingDuration(Duration),
    /// Leave the origin no earlier than this
    DepartAfter(NaiveDateTime),
    /// Be home no later than this
    ReturnBy(NaiveDateTime),
    /// Every port connection at least this long
    MinConnection(Duration),
    /// At least this long at the destination
    MinStay(Duration),
    /// Every drive fits its windows
    Feasible,
}

impl Constraint {
    /// Returns true if the itinerary passes this constraint.
    pub fn is_satisfied_by(&self, itinerary: &Itinerary) -> bool {
        match self {
            Constraint::MaxTotalCost(max) => itinerary.total_cost() <= *max,
            Constraint::MaxCostPerPerson(max) => itinerary.cost_per_person() <= *max,
            Constraint::MaxTotalDuration(max) => itinerary.total_duration() <= *max,
            Constraint::MaxCrossingDuration(max) => itinerary.crossing_duration() <= *max,
            Constraint::DepartAfter(t) => itinerary.schedule().leave_origin >= *t,
            Constraint::ReturnBy(t) => itinerary.schedule().reach_home <= *t,
            Constraint::MinConnection(min) => itinerary.min_connection() >= *min,
            Constraint::MinStay(min) => itinerary.stay() >= *min,
            Constraint::Feasible => itinerary.is_feasible(),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::MaxTotalCost(m) => write!(f, "total cost <= {m}"),
            Constraint::MaxCostPerPerson(m) => write!(f, "cost per person <= {m}"),
            Constraint::MaxTotalDuration(d) => write!(f, "total duration <= {}", format_hmm(*d)),
            Constraint::MaxCrossingDuration(d) => {
                write!(f, "crossing duration <= {}", format_hmm(*d))
            }
            Constraint::DepartAfter(t) => write!(f, "depart after {}", format_datetime(t)),
            Constraint::ReturnBy(t) => write!(f, "return by {}", format_datetime(t)),
            Constraint::MinConnection(d) => write!(f, "connections >= {}", format_hmm(*d)),
            Constraint::MinStay(d) => write!(f, "stay >= {}", format_hmm(*d)),
            Constraint::Feasible => f.write_str("feasible"),
        }
    }
}

/// Keep only itineraries that pass every constraint.
///
/// An empty constraint list keeps everything. Input order is preserved.
pub fn apply_constraints(itineraries: Vec<Itinerary>, constraints: &[Constraint]) -> Vec<Itinerary> {
    if constraints.is_empty() {
        return itineraries;
    }

    itineraries
        .into_iter()
        .filter(|it| match constraints.iter().find(|c| !c.is_satisfied_by(it)) {
            Some(failed) => {
                trace!(
                    outbound = %it.outbound_crossing().describe(),
                    return_crossing = %it.return_crossing().describe(),
                    constraint = %failed,
                    "itinerary rejected"
                );
                false
            }
            None => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::fixtures::{Sample, base};

    #[test]
    fn cost_constraints() {
        // 24000 total for a party of two
        let it = Sample::default().build();

        assert!(Constraint::MaxTotalCost(Money::from_pence(24_000)).is_satisfied_by(&it));
        assert!(!Constraint::MaxTotalCost(Money::from_pence(23_999)).is_satisfied_by(&it));
        assert!(Constraint::MaxCostPerPerson(Money::from_pence(12_000)).is_satisfied_by(&it));
        assert!(!Constraint::MaxCostPerPerson(Money::from_pence(11_999)).is_satisfied_by(&it));
    }

    #[test]
    fn duration_constraints() {
        let it = Sample::default().build();

        assert!(Constraint::MaxCrossingDuration(Duration::minutes(180)).is_satisfied_by(&it));
        assert!(!Constraint::MaxCrossingDuration(Duration::minutes(179)).is_satisfied_by(&it));

        let total = it.total_duration();
        assert!(Constraint::MaxTotalDuration(total).is_satisfied_by(&it));
        assert!(!Constraint::MaxTotalDuration(total - Duration::minutes(1)).is_satisfied_by(&it));
    }

    #[test]
    fn time_constraints() {
        // Sailing at 10:00 with an hour's check-in and a two hour drive
        let it = Sample::default().build();
        assert_eq!(it.schedule().leave_origin, base() + Duration::hours(7));

        assert!(Constraint::DepartAfter(base() + Duration::hours(7)).is_satisfied_by(&it));
        assert!(!Constraint::DepartAfter(base() + Duration::hours(8)).is_satisfied_by(&it));

        let home = it.schedule().reach_home;
        assert!(Constraint::ReturnBy(home).is_satisfied_by(&it));
        assert!(!Constraint::ReturnBy(home - Duration::minutes(1)).is_satisfied_by(&it));
    }

    #[test]
    fn connection_and_stay_constraints() {
        let it = Sample::default().build();

        // Disembarking takes 15 minutes by default
        assert!(Constraint::MinConnection(Duration::minutes(15)).is_satisfied_by(&it));
        assert!(!Constraint::MinConnection(Duration::minutes(16)).is_satisfied_by(&it));

        assert!(Constraint::MinStay(Duration::days(6)).is_satisfied_by(&it));
        assert!(!Constraint::MinStay(Duration::days(8)).is_satisfied_by(&it));
    }

    #[test]
    fn feasible_constraint() {
        let ok = Sample::default().build();
        // Return sailing before the outbound one arrives
        let impossible = Sample {
            return_departs: 60,
            ..Sample::default()
        }
        .build();

        assert!(Constraint::Feasible.is_satisfied_by(&ok));
        assert!(!Constraint::Feasible.is_satisfied_by(&impossible));
    }

    #[test]
    fn apply_keeps_order_and_requires_all() {
        let cheap = Sample {
            outbound_cost: 1_000,
            ..Sample::default()
        }
        .build();
        let dear = Sample::default().build();
        let cheap_but_slow = Sample {
            outbound_cost: 1_000,
            crossing_mins: 600,
            ..Sample::default()
        }
        .build();

        let constraints = [
            Constraint::MaxTotalCost(Money::from_pence(20_000)),
            Constraint::MaxCrossingDuration(Duration::hours(4)),
        ];
        let result = apply_constraints(vec![cheap_but_slow, dear, cheap], &constraints);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].total_cost(), Money::from_pence(15_000));
    }

    #[test]
    fn empty_constraints_is_identity() {
        let input = vec![Sample::default().build(), Sample::default().build()];
        assert_eq!(apply_constraints(input, &[]).len(), 2);
    }

    #[test]
    fn display() {
        assert_eq!(
            Constraint::MaxTotalCost(Money::from_pence(50_000)).to_string(),
            "total cost <= 500.00"
        );
        assert_eq!(
            Constraint::MinStay(Duration::minutes(90)).to_string(),
            "stay >= 1:30"
        );
        assert_eq!(
            Constraint::DepartAfter(base()).to_string(),
            "depart after 2024-07-01 00:00"
        );
    }
}
