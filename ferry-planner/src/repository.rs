//! In-memory leg repository.
//!
//! Car legs and ferry crossings live in two arenas, loaded once and never
//! mutated. Lookups go through indices keyed by location so the assembler
//! can join legs on matching endpoints without scanning.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::domain::{CarLeg, CrossingId, DataError, Direction, FerryCrossing, Location};

/// Read-only store of car legs and ferry crossings.
///
/// Lookups return entries in load order.
#[derive(Debug, Default)]
pub struct LegRepository {
    cars: Vec<Arc<CarLeg>>,
    crossings: Vec<Arc<FerryCrossing>>,

    /// Map from origin -> indices into `cars`.
    cars_from: HashMap<Location, Vec<usize>>,

    /// Map from (origin, destination) -> indices into `cars`.
    cars_between: HashMap<(Location, Location), Vec<usize>>,

    /// Crossing ids split by direction.
    outbound: Vec<CrossingId>,
    inbound: Vec<CrossingId>,

    /// Map from (departure port, direction) -> crossing ids.
    crossings_from: HashMap<(Location, Direction), Vec<CrossingId>>,
}

impl LegRepository {
    /// Build a repository from validated legs.
    ///
    /// # Errors
    ///
    /// Returns `DataError::InconsistentDirection` if a port is used on the
    /// UK side by one crossing and the FR side by another.
    pub fn new(cars: Vec<CarLeg>, crossings: Vec<FerryCrossing>) -> Result<Self, DataError> {
        check_port_sides(&crossings)?;

        let mut repo = LegRepository::default();

        for (idx, leg) in cars.into_iter().enumerate() {
            repo.cars_from
                .entry(leg.origin().clone())
                .or_default()
                .push(idx);
            repo.cars_between
                .entry((leg.origin().clone(), leg.destination().clone()))
                .or_default()
                .push(idx);
            repo.cars.push(Arc::new(leg));
        }

        for (idx, crossing) in crossings.into_iter().enumerate() {
            let id = CrossingId(idx);
            match crossing.direction() {
                Direction::Outbound => repo.outbound.push(id),
                Direction::Return => repo.inbound.push(id),
            }
            repo.crossings_from
                .entry((crossing.origin().clone(), crossing.direction()))
                .or_default()
                .push(id);
            repo.crossings.push(Arc::new(crossing));
        }

        Ok(repo)
    }

    /// Car legs starting at `location`.
    pub fn legs_from<'a>(&'a self, location: &Location) -> impl Iterator<Item = &'a Arc<CarLeg>> + use<'a> {
        let ids = self
            .cars_from
            .get(location)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        ids.iter().map(move |&i| &self.cars[i])
    }

    /// Car legs from `origin` to `destination`, one per variant.
    pub fn legs_between<'a>(
        &'a self,
        origin: &Location,
        destination: &Location,
    ) -> impl Iterator<Item = &'a Arc<CarLeg>> + use<'a> {
        let ids = self
            .cars_between
            .get(&(origin.clone(), destination.clone()))
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        ids.iter().map(move |&i| &self.cars[i])
    }

    /// All crossings going one way.
    pub fn crossings_by_direction(
        &self,
        direction: Direction,
    ) -> impl Iterator<Item = (CrossingId, &Arc<FerryCrossing>)> + '_ {
        let ids = match direction {
            Direction::Outbound => &self.outbound,
            Direction::Return => &self.inbound,
        };
        ids.iter().map(move |&id| (id, &self.crossings[id.0]))
    }

    /// Crossings leaving `port` in the given direction.
    pub fn crossings_from<'a>(
        &'a self,
        port: &Location,
        direction: Direction,
    ) -> impl Iterator<Item = (CrossingId, &'a Arc<FerryCrossing>)> + use<'a> {
        let ids = self
            .crossings_from
            .get(&(port.clone(), direction))
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        ids.iter().map(move |&id| (id, &self.crossings[id.0]))
    }

    /// Look up a crossing by id.
    pub fn crossing(&self, id: CrossingId) -> Option<&Arc<FerryCrossing>> {
        self.crossings.get(id.0)
    }

    /// Number of car legs.
    pub fn car_count(&self) -> usize {
        self.cars.len()
    }

    /// Number of crossings.
    pub fn crossing_count(&self) -> usize {
        self.crossings.len()
    }
}

/// Reject data where a port sits on both sides of the channel.
fn check_port_sides(crossings: &[FerryCrossing]) -> Result<(), DataError> {
    let mut uk_side: HashSet<&Location> = HashSet::new();
    let mut fr_side: HashSet<&Location> = HashSet::new();

    for c in crossings {
        let (uk, fr) = match c.direction() {
            Direction::Outbound => (c.origin(), c.destination()),
            Direction::Return => (c.destination(), c.origin()),
        };
        if fr_side.contains(uk) {
            return Err(DataError::InconsistentDirection { port: uk.clone() });
        }
        if uk_side.contains(fr) {
            return Err(DataError::InconsistentDirection { port: fr.clone() });
        }
        uk_side.insert(uk);
        fr_side.insert(fr);
    }
    Ok(())
}
