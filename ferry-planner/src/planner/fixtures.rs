//! Itinerary fixtures shared by planner tests.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;

use crate::domain::{
    CarLeg, CrossingId, Direction, FerryCrossing, Itinerary, ItineraryLegs, Location, Money,
    ScheduleRules,
};

pub(crate) fn loc(s: &str) -> Location {
    Location::new(s).unwrap()
}

pub(crate) fn base() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 7, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

pub(crate) fn car(from: &str, to: &str, mins: i64, pence: i64) -> CarLeg {
    CarLeg::new(loc(from), loc(to), Duration::minutes(mins), Money::from_pence(pence)).unwrap()
}

pub(crate) fn ferry(
    from: &str,
    to: &str,
    departs: NaiveDateTime,
    mins: i64,
    pence: i64,
    operator: &str,
    direction: Direction,
) -> FerryCrossing {
    FerryCrossing::new(
        loc(from),
        loc(to),
        departs,
        departs + Duration::minutes(mins),
        Money::from_pence(pence),
        operator,
        direction,
    )
    .unwrap()
}

/// A Home -> Gite round trip via Dover and Calais, with adjustable figures.
#[derive(Debug, Clone)]
pub(crate) struct Sample {
    pub outbound_id: usize,
    pub return_id: usize,
    pub outbound_cost: i64,
    pub return_cost: i64,
    pub drive_cost: i64,
    /// Minutes after `base()`.
    pub outbound_departs: i64,
    /// Minutes after `base()`.
    pub return_departs: i64,
    pub crossing_mins: i64,
    pub operator: &'static str,
    pub party: u32,
}

impl Default for Sample {
    fn default() -> Self {
        Self {
            outbound_id: 0,
            return_id: 1,
            outbound_cost: 10_000,
            return_cost: 10_000,
            drive_cost: 1_000,
            outbound_departs: 10 * 60,
            return_departs: 7 * 24 * 60 + 16 * 60,
            crossing_mins: 90,
            operator: "DFDS",
            party: 2,
        }
    }
}

impl Sample {
    pub(crate) fn build(&self) -> Itinerary {
        let legs = ItineraryLegs {
            drive_out: Arc::new(car("Home", "Dover", 120, self.drive_cost)),
            outbound_id: CrossingId(self.outbound_id),
            outbound: Arc::new(ferry(
                "Dover",
                "Calais",
                base() + Duration::minutes(self.outbound_departs),
                self.crossing_mins,
                self.outbound_cost,
                self.operator,
                Direction::Outbound,
            )),
            drive_in: Arc::new(car("Calais", "Gite", 240, self.drive_cost)),
            drive_back: Arc::new(car("Gite", "Calais", 240, self.drive_cost)),
            return_id: CrossingId(self.return_id),
            return_crossing: Arc::new(ferry(
                "Calais",
                "Dover",
                base() + Duration::minutes(self.return_departs),
                self.crossing_mins,
                self.return_cost,
                self.operator,
                Direction::Return,
            )),
            drive_home: Arc::new(car("Dover", "Home", 120, self.drive_cost)),
        };
        Itinerary::new(legs, ScheduleRules::default(), self.party).unwrap()
    }
}

const OPERATORS: &[&str] = &["DFDS", "P&O", "Brittany", "Irish Ferries"];

/// Strategy over varied itineraries.
///
/// Crossing ids and costs come from small ranges so that duplicate groups
/// and ties turn up often.
pub(crate) fn itinerary_strategy() -> impl Strategy<Value = Itinerary> {
    (
        (0usize..3, 3usize..6),
        (0i64..4, 0i64..4, 0i64..3),
        (0i64..4 * 24 * 60, 0i64..10 * 24 * 60),
        (30i64..600, 0usize..OPERATORS.len(), 1u32..6),
    )
        .prop_map(
            |((out_id, ret_id), (out_cost, ret_cost, drive), (out_dep, ret_dep), (mins, op, party))| {
                Sample {
                    outbound_id: out_id,
                    return_id: ret_id,
                    outbound_cost: out_cost * 2_500,
                    return_cost: ret_cost * 2_500,
                    drive_cost: drive * 500,
                    outbound_departs: out_dep,
                    return_departs: ret_dep,
                    crossing_mins: mins,
                    operator: OPERATORS[op],
                    party,
                }
                .build()
            },
        )
}

pub(crate) fn itineraries_strategy() -> impl Strategy<Value = Vec<Itinerary>> {
    prop::collection::vec(itinerary_strategy(), 0..20)
}
