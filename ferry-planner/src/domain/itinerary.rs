//! Itinerary types.
//!
//! An `Itinerary` is a complete round trip: drive to a port, sail to
//! France, drive to the destination, and the same in reverse. All derived
//! figures are computed once, when the itinerary is built.

use std::sync::Arc;

use chrono::{Duration, NaiveDateTime};

use super::{CarLeg, CrossingId, Direction, FerryCrossing, ItineraryError, Location, Money};

/// A borrowed view of one of the six legs.
#[derive(Debug, Clone, Copy)]
pub enum LegRef<'a> {
    /// A drive
    Car(&'a CarLeg),
    /// A sailing
    Ferry(&'a FerryCrossing),
}

impl<'a> LegRef<'a> {
    /// Returns the origin of this leg.
    pub fn origin(&self) -> &'a Location {
        match self {
            LegRef::Car(leg) => leg.origin(),
            LegRef::Ferry(crossing) => crossing.origin(),
        }
    }

    /// Returns the destination of this leg.
    pub fn destination(&self) -> &'a Location {
        match self {
            LegRef::Car(leg) => leg.destination(),
            LegRef::Ferry(crossing) => crossing.destination(),
        }
    }

    /// Returns the duration of this leg.
    pub fn duration(&self) -> Duration {
        match self {
            LegRef::Car(leg) => leg.duration(),
            LegRef::Ferry(crossing) => crossing.duration(),
        }
    }

    /// Returns the cost of this leg.
    pub fn cost(&self) -> Money {
        match self {
            LegRef::Car(leg) => leg.cost(),
            LegRef::Ferry(crossing) => crossing.cost(),
        }
    }

    /// Returns true if this is a drive.
    pub fn is_car(&self) -> bool {
        matches!(self, LegRef::Car(_))
    }
}

/// The six legs of a round trip, in travel order.
#[derive(Debug, Clone)]
pub struct ItineraryLegs {
    pub drive_out: Arc<CarLeg>,
    pub outbound_id: CrossingId,
    pub outbound: Arc<FerryCrossing>,
    pub drive_in: Arc<CarLeg>,
    pub drive_back: Arc<CarLeg>,
    pub return_id: CrossingId,
    pub return_crossing: Arc<FerryCrossing>,
    pub drive_home: Arc<CarLeg>,
}

/// Buffers the schedule leaves around each sailing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleRules {
    /// How long before sailing the car must reach the port.
    pub check_in: Duration,
    /// How long after arrival before the car can drive away.
    pub disembark: Duration,
}

impl Default for ScheduleRules {
    fn default() -> Self {
        Self {
            check_in: Duration::minutes(60),
            disembark: Duration::minutes(15),
        }
    }
}

/// When each drive happens.
///
/// Sailings are the fixed points of a trip. Drives to a port take the
/// latest slot that reaches check-in; drives away from a port take the
/// earliest slot after disembarking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub leave_origin: NaiveDateTime,
    pub reach_port_out: NaiveDateTime,
    pub leave_port_in: NaiveDateTime,
    pub reach_destination: NaiveDateTime,
    pub leave_destination: NaiveDateTime,
    pub reach_port_back: NaiveDateTime,
    pub leave_port_home: NaiveDateTime,
    pub reach_home: NaiveDateTime,
}

/// A complete round trip from origin to destination and back via ferry.
///
/// # Invariants
///
/// - Consecutive legs connect (destination of one = origin of next)
/// - The outbound crossing is UK to FR and the return crossing FR to UK
/// - `total_cost` is the sum of the six leg costs
/// - `total_duration` is the sum of the six leg durations plus the layover
///   gaps at the ports; the stay at the destination is not travel time
#[derive(Debug, Clone)]
pub struct Itinerary {
    legs: ItineraryLegs,
    schedule: Schedule,
    total_cost: Money,
    total_duration: Duration,
    cost_per_person: Money,
    feasible: bool,
}

/// Latest departure reaching `deadline`, or the unconstrained slot if no
/// window fits. The flag records whether a window fitted.
fn schedule_to_port(leg: &CarLeg, deadline: NaiveDateTime) -> Option<(NaiveDateTime, bool)> {
    match leg.latest_departure_arriving_by(deadline) {
        Some(t) => Some((t, true)),
        None => Some((deadline.checked_sub_signed(leg.duration())?, false)),
    }
}

/// Earliest departure after `ready`, or `ready` itself if no window fits.
fn schedule_from_port(leg: &CarLeg, ready: NaiveDateTime) -> (NaiveDateTime, bool) {
    match leg.earliest_departure_from(ready) {
        Some(t) => (t, true),
        None => (ready, false),
    }
}

/// Fix every drive around the two sailings. The flag is false if any drive
/// missed its windows; `None` if a time leaves the representable range.
fn plan(legs: &ItineraryLegs, rules: ScheduleRules) -> Option<(Schedule, bool)> {
    let out = &legs.outbound;
    let ret = &legs.return_crossing;
    let after = |t: NaiveDateTime, leg: &CarLeg| t.checked_add_signed(leg.duration());

    let (leave_origin, out_fits) =
        schedule_to_port(&legs.drive_out, out.departure().checked_sub_signed(rules.check_in)?)?;
    let (leave_port_in, in_fits) =
        schedule_from_port(&legs.drive_in, out.arrival().checked_add_signed(rules.disembark)?);
    let (leave_destination, back_fits) =
        schedule_to_port(&legs.drive_back, ret.departure().checked_sub_signed(rules.check_in)?)?;
    let (leave_port_home, home_fits) =
        schedule_from_port(&legs.drive_home, ret.arrival().checked_add_signed(rules.disembark)?);

    let schedule = Schedule {
        leave_origin,
        reach_port_out: after(leave_origin, &legs.drive_out)?,
        leave_port_in,
        reach_destination: after(leave_port_in, &legs.drive_in)?,
        leave_destination,
        reach_port_back: after(leave_destination, &legs.drive_back)?,
        leave_port_home,
        reach_home: after(leave_port_home, &legs.drive_home)?,
    };
    Some((schedule, out_fits && in_fits && back_fits && home_fits))
}

impl Itinerary {
    /// Build an itinerary and compute its schedule and aggregates.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - consecutive legs don't connect
    /// - a crossing is used in the wrong direction
    /// - `party_size` is zero
    /// - a scheduled time falls outside chrono's range
    ///
    /// A trip whose drives cannot fit their windows, or that would have to
    /// leave the destination before reaching it, is still built but is
    /// marked infeasible.
    pub fn new(
        legs: ItineraryLegs,
        rules: ScheduleRules,
        party_size: u32,
    ) -> Result<Self, ItineraryError> {
        if party_size == 0 {
            return Err(ItineraryError::EmptyParty);
        }
        if legs.outbound.direction() != Direction::Outbound {
            return Err(ItineraryError::WrongDirection {
                position: "outbound",
                expected: Direction::Outbound,
            });
        }
        if legs.return_crossing.direction() != Direction::Return {
            return Err(ItineraryError::WrongDirection {
                position: "return",
                expected: Direction::Return,
            });
        }

        let chain = Self::chain(&legs);
        for window in chain.windows(2) {
            let prev_dest = window[0].destination();
            let next_origin = window[1].origin();
            if prev_dest != next_origin {
                return Err(ItineraryError::Disconnected(
                    prev_dest.clone(),
                    next_origin.clone(),
                ));
            }
        }
        if chain[5].destination() != chain[0].origin() {
            return Err(ItineraryError::Disconnected(
                chain[5].destination().clone(),
                chain[0].origin().clone(),
            ));
        }

        let total_cost: Money = chain.iter().map(LegRef::cost).sum();

        let (schedule, drives_fit) = plan(&legs, rules).ok_or(ItineraryError::ScheduleOutOfRange)?;
        let feasible = drives_fit && schedule.leave_destination >= schedule.reach_destination;

        let total_duration = schedule
            .reach_destination
            .signed_duration_since(schedule.leave_origin)
            + schedule
                .reach_home
                .signed_duration_since(schedule.leave_destination);

        Ok(Itinerary {
            legs,
            schedule,
            total_cost,
            total_duration,
            cost_per_person: total_cost.per_person(party_size),
            feasible,
        })
    }

    fn chain(legs: &ItineraryLegs) -> [LegRef<'_>; 6] {
        [
            LegRef::Car(&legs.drive_out),
            LegRef::Ferry(&legs.outbound),
            LegRef::Car(&legs.drive_in),
            LegRef::Car(&legs.drive_back),
            LegRef::Ferry(&legs.return_crossing),
            LegRef::Car(&legs.drive_home),
        ]
    }

    /// Returns the six legs in travel order.
    pub fn legs(&self) -> [LegRef<'_>; 6] {
        Self::chain(&self.legs)
    }

    /// Returns the owned leg handles.
    pub fn parts(&self) -> &ItineraryLegs {
        &self.legs
    }

    /// Returns the drive from the origin to the outbound port.
    pub fn drive_out(&self) -> &CarLeg {
        &self.legs.drive_out
    }

    /// Returns the outbound sailing.
    pub fn outbound_crossing(&self) -> &FerryCrossing {
        &self.legs.outbound
    }

    /// Returns the drive from the arrival port to the destination.
    pub fn drive_in(&self) -> &CarLeg {
        &self.legs.drive_in
    }

    /// Returns the drive from the destination to the return port.
    pub fn drive_back(&self) -> &CarLeg {
        &self.legs.drive_back
    }

    /// Returns the return sailing.
    pub fn return_crossing(&self) -> &FerryCrossing {
        &self.legs.return_crossing
    }

    /// Returns the drive from the return arrival port to the origin.
    pub fn drive_home(&self) -> &CarLeg {
        &self.legs.drive_home
    }

    /// Returns the arena id of the outbound sailing.
    pub fn outbound_id(&self) -> CrossingId {
        self.legs.outbound_id
    }

    /// Returns the arena id of the return sailing.
    pub fn return_id(&self) -> CrossingId {
        self.legs.return_id
    }

    /// Returns the trip origin.
    pub fn origin(&self) -> &Location {
        self.legs.drive_out.origin()
    }

    /// Returns the trip destination.
    pub fn destination(&self) -> &Location {
        self.legs.drive_in.destination()
    }

    /// Returns when each drive happens.
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Returns the sum of all six leg costs.
    pub fn total_cost(&self) -> Money {
        self.total_cost
    }

    /// Returns the total cost split across the party.
    pub fn cost_per_person(&self) -> Money {
        self.cost_per_person
    }

    /// Returns the travel time, both ways, including waits at ports.
    pub fn total_duration(&self) -> Duration {
        self.total_duration
    }

    /// Returns the time spent at sea, both ways.
    pub fn crossing_duration(&self) -> Duration {
        self.legs.outbound.duration() + self.legs.return_crossing.duration()
    }

    /// Returns the time between reaching and leaving the destination.
    ///
    /// Negative when the return sailing is too early to be reached.
    pub fn stay(&self) -> Duration {
        self.schedule
            .leave_destination
            .signed_duration_since(self.schedule.reach_destination)
    }

    /// Returns the shortest wait at any of the four port connections.
    pub fn min_connection(&self) -> Duration {
        let s = &self.schedule;
        let out = &self.legs.outbound;
        let ret = &self.legs.return_crossing;
        [
            out.departure().signed_duration_since(s.reach_port_out),
            s.leave_port_in.signed_duration_since(out.arrival()),
            ret.departure().signed_duration_since(s.reach_port_back),
            s.leave_port_home.signed_duration_since(ret.arrival()),
        ]
        .into_iter()
        .min()
        .unwrap_or_else(Duration::zero)
    }

    /// Returns true if every drive fits its windows and the return sailing
    /// can be reached after arriving at the destination.
    pub fn is_feasible(&self) -> bool {
        self.feasible
    }
}
