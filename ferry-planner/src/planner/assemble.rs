//! Itinerary assembly.
//!
//! Every round trip splits into two halves that meet at the destination:
//! drive to a UK port, sail, drive on to the destination; then drive to a
//! French port, sail back, drive home. The halves are found independently
//! through the repository indices and only then combined, so the work done
//! before the ceiling check grows with the number of halves, not with
//! their product.

use std::sync::Arc;

use tracing::debug;

use crate::domain::{
    CarLeg, CrossingId, Direction, FerryCrossing, Itinerary, ItineraryError, ItineraryLegs,
    Location, ScheduleRules,
};
use crate::repository::LegRepository;

use super::config::PlannerConfig;

/// Error from itinerary assembly.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssemblyError {
    /// The trip would generate more itineraries than allowed
    #[error("trip has {count} candidate itineraries, more than the limit of {limit}")]
    TooManyCombinations { count: usize, limit: usize },
}

/// Three legs on one side of the trip: drive, sailing, drive.
#[derive(Debug, Clone)]
pub struct Half {
    pub drive_to_port: Arc<CarLeg>,
    pub crossing_id: CrossingId,
    pub crossing: Arc<FerryCrossing>,
    pub drive_from_port: Arc<CarLeg>,
}

/// Every way to make one half of the trip.
fn halves(
    repo: &LegRepository,
    from: &Location,
    to: &Location,
    direction: Direction,
) -> Vec<Half> {
    let mut result = Vec::new();
    for drive_to_port in repo.legs_from(from) {
        for (crossing_id, crossing) in repo.crossings_from(drive_to_port.destination(), direction) {
            for drive_from_port in repo.legs_between(crossing.destination(), to) {
                result.push(Half {
                    drive_to_port: drive_to_port.clone(),
                    crossing_id,
                    crossing: crossing.clone(),
                    drive_from_port: drive_from_port.clone(),
                });
            }
        }
    }
    result
}

/// The outbound and return halves of a trip, ready to be combined.
#[derive(Debug, Clone)]
pub struct Assembly {
    outbound: Vec<Half>,
    inbound: Vec<Half>,
    rules: ScheduleRules,
    party_size: u32,
}

impl Assembly {
    /// Number of itineraries `iter` will yield.
    pub fn len(&self) -> usize {
        self.outbound.len().saturating_mul(self.inbound.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn outbound_halves(&self) -> &[Half] {
        &self.outbound
    }

    pub fn return_halves(&self) -> &[Half] {
        &self.inbound
    }

    /// Build every combination of an outbound and a return half.
    ///
    /// Itineraries are built as the iterator is consumed. Order is
    /// outbound-major, each half in repository load order, so repeated
    /// calls yield the same sequence.
    pub fn iter(&self) -> impl Iterator<Item = Result<Itinerary, ItineraryError>> + '_ {
        self.outbound.iter().flat_map(move |out| {
            self.inbound.iter().map(move |ret| {
                let legs = ItineraryLegs {
                    drive_out: out.drive_to_port.clone(),
                    outbound_id: out.crossing_id,
                    outbound: out.crossing.clone(),
                    drive_in: out.drive_from_port.clone(),
                    drive_back: ret.drive_to_port.clone(),
                    return_id: ret.crossing_id,
                    return_crossing: ret.crossing.clone(),
                    drive_home: ret.drive_from_port.clone(),
                };
                Itinerary::new(legs, self.rules, self.party_size)
            })
        })
    }
}

/// Joins repository legs into round-trip itineraries.
pub struct Assembler<'a> {
    repo: &'a LegRepository,
    config: &'a PlannerConfig,
}

impl<'a> Assembler<'a> {
    /// Create a new assembler.
    pub fn new(repo: &'a LegRepository, config: &'a PlannerConfig) -> Self {
        Self { repo, config }
    }

    /// Find both halves of a trip from `origin` to `destination` and back.
    ///
    /// Unconnected locations give an empty assembly, not an error.
    ///
    /// # Errors
    ///
    /// Returns `TooManyCombinations` if the number of itineraries exceeds
    /// `max_itineraries`. Nothing is generated in that case.
    pub fn assemble(
        &self,
        origin: &Location,
        destination: &Location,
        party_size: u32,
    ) -> Result<Assembly, AssemblyError> {
        let outbound = halves(self.repo, origin, destination, Direction::Outbound);
        let inbound = halves(self.repo, destination, origin, Direction::Return);

        let assembly = Assembly {
            outbound,
            inbound,
            rules: self.config.schedule_rules(),
            party_size,
        };

        debug!(
            %origin,
            %destination,
            outbound_halves = assembly.outbound.len(),
            return_halves = assembly.inbound.len(),
            combinations = assembly.len(),
            "assembled trip halves"
        );

        let limit = self.config.max_itineraries;
        if assembly.len() > limit {
            return Err(AssemblyError::TooManyCombinations {
                count: assembly.len(),
                limit,
            });
        }

        Ok(assembly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LegRef;
    use crate::planner::fixtures::{base, car, ferry, loc};
    use chrono::Duration;

    fn hours(h: i64) -> chrono::NaiveDateTime {
        base() + Duration::hours(h)
    }

    /// Home -> {Dover, Portsmouth} -> {Calais, Caen} -> Gite, and back.
    fn make_repo() -> LegRepository {
        LegRepository::new(
            vec![
                car("Home", "Dover", 120, 1_500),
                car("Home", "Portsmouth", 90, 1_200),
                car("Calais", "Gite", 300, 2_500),
                car("Caen", "Gite", 200, 2_000),
                car("Gite", "Calais", 300, 2_500),
                car("Gite", "Caen", 200, 2_000),
                car("Dover", "Home", 120, 1_500),
                car("Portsmouth", "Home", 90, 1_200),
                // Leads nowhere useful
                car("Home", "Harwich", 150, 1_800),
            ],
            vec![
                ferry("Dover", "Calais", hours(10), 90, 9_000, "DFDS", Direction::Outbound),
                ferry("Dover", "Calais", hours(14), 90, 7_000, "P&O", Direction::Outbound),
                ferry("Portsmouth", "Caen", hours(8), 360, 15_000, "Brittany", Direction::Outbound),
                ferry("Calais", "Dover", hours(170), 90, 9_000, "DFDS", Direction::Return),
                ferry("Caen", "Portsmouth", hours(160), 360, 15_000, "Brittany", Direction::Return),
                // Not reachable from the Gite by any car leg
                ferry("Dunkirk", "Dover", hours(170), 120, 5_000, "DFDS", Direction::Return),
            ],
        )
        .unwrap()
    }

    #[test]
    fn assembles_full_product() {
        let repo = make_repo();
        let config = PlannerConfig::default();
        let assembly = Assembler::new(&repo, &config)
            .assemble(&loc("Home"), &loc("Gite"), 2)
            .unwrap();

        assert_eq!(assembly.outbound_halves().len(), 3);
        assert_eq!(assembly.return_halves().len(), 2);
        assert_eq!(assembly.len(), 6);

        let itineraries: Vec<Itinerary> = assembly.iter().collect::<Result<_, _>>().unwrap();
        assert_eq!(itineraries.len(), 6);
    }

    #[test]
    fn itineraries_are_contiguous_and_directed() {
        let repo = make_repo();
        let config = PlannerConfig::default();
        let assembly = Assembler::new(&repo, &config)
            .assemble(&loc("Home"), &loc("Gite"), 1)
            .unwrap();

        for it in assembly.iter() {
            let it = it.unwrap();
            let legs = it.legs();
            for pair in legs.windows(2) {
                assert_eq!(pair[0].destination(), pair[1].origin());
            }
            assert_eq!(legs[0].origin(), &loc("Home"));
            assert_eq!(legs[5].destination(), &loc("Home"));
            assert!(matches!(legs[1], LegRef::Ferry(_)));
            assert_eq!(it.outbound_crossing().direction(), Direction::Outbound);
            assert_eq!(it.return_crossing().direction(), Direction::Return);
        }
    }

    #[test]
    fn reassembly_is_repeatable() {
        let repo = make_repo();
        let config = PlannerConfig::default();
        let assembler = Assembler::new(&repo, &config);

        let ids = |a: &Assembly| -> Vec<(CrossingId, CrossingId)> {
            a.iter()
                .map(|it| {
                    let it = it.unwrap();
                    (it.outbound_id(), it.return_id())
                })
                .collect()
        };

        let first = assembler.assemble(&loc("Home"), &loc("Gite"), 1).unwrap();
        let second = assembler.assemble(&loc("Home"), &loc("Gite"), 1).unwrap();
        assert_eq!(ids(&first), ids(&second));
        assert_eq!(
            ids(&first)[0],
            (CrossingId(0), CrossingId(3)),
            "outbound-major, load order"
        );
    }

    #[test]
    fn unconnected_destination_is_empty() {
        let repo = make_repo();
        let config = PlannerConfig::default();
        let assembly = Assembler::new(&repo, &config)
            .assemble(&loc("Home"), &loc("Paris"), 1)
            .unwrap();

        assert!(assembly.is_empty());
        assert_eq!(assembly.iter().count(), 0);
    }

    #[test]
    fn ceiling_exceeded() {
        let repo = make_repo();
        let config = PlannerConfig {
            max_itineraries: 5,
            ..PlannerConfig::default()
        };
        let result = Assembler::new(&repo, &config).assemble(&loc("Home"), &loc("Gite"), 1);

        assert_eq!(
            result.unwrap_err(),
            AssemblyError::TooManyCombinations { count: 6, limit: 5 }
        );
    }

    #[test]
    fn ceiling_is_inclusive() {
        let repo = make_repo();
        let config = PlannerConfig {
            max_itineraries: 6,
            ..PlannerConfig::default()
        };
        let result = Assembler::new(&repo, &config).assemble(&loc("Home"), &loc("Gite"), 1);
        assert!(result.is_ok());
    }

    #[test]
    fn schedule_uses_config_buffers() {
        let repo = make_repo();
        let config = PlannerConfig {
            check_in_mins: 30,
            ..PlannerConfig::default()
        };
        let assembly = Assembler::new(&repo, &config)
            .assemble(&loc("Home"), &loc("Gite"), 1)
            .unwrap();

        let first = assembly.iter().next().unwrap().unwrap();
        // 10:00 sailing, 30 minute check-in, two hour drive
        assert_eq!(first.schedule().leave_origin, hours(10) - Duration::minutes(150));
        assert_eq!(
            first.schedule().reach_port_out,
            hours(10) - Duration::minutes(30)
        );
    }
}
