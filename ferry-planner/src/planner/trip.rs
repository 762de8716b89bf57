//! Trip evaluation.
//!
//! A `Trip` binds an origin, a destination and the travel data into one
//! request. Evaluating it runs the whole pipeline: assemble every round
//! trip, drop those that break a constraint, rank the rest and cut the
//! list down to a short-list.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{CarLeg, DataError, FerryCrossing, Itinerary, ItineraryError, Location};
use crate::records::{CarRecord, FerryRecord, Vehicle, convert_car_records, convert_ferry_records};
use crate::repository::LegRepository;

use super::assemble::{Assembler, AssemblyError};
use super::config::{ConfigError, PlannerConfig};
use super::filter::{Constraint, apply_constraints};
use super::rank::{DedupPolicy, RankError, RankingCriterion, default_criteria, shortlist};

/// Error from building or evaluating a trip.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TripError {
    /// Travel data is malformed
    #[error(transparent)]
    Data(#[from] DataError),

    /// Too many combinations to evaluate
    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    /// Ranking criteria are invalid
    #[error(transparent)]
    Rank(#[from] RankError),

    /// Itinerary could not be built
    #[error(transparent)]
    Itinerary(#[from] ItineraryError),

    /// Planner configuration is unusable
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result of evaluating a trip.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Short-listed itineraries, best first.
    pub itineraries: Vec<Itinerary>,

    /// Number of itineraries assembled.
    pub assembled: usize,

    /// Number that passed every constraint.
    pub survived: usize,
}

/// A round trip request: where from, where to, and what to choose from.
///
/// The leg data is shared, so cloning a trip or building several trips over
/// the same repository is cheap. Evaluation never modifies the trip.
#[derive(Debug, Clone)]
pub struct Trip {
    origin: Location,
    destination: Location,
    repo: Arc<LegRepository>,
    constraints: Vec<Constraint>,
    criteria: Vec<RankingCriterion>,
    party_size: u32,
    config: PlannerConfig,
}

impl Trip {
    /// Start building a trip.
    pub fn builder(origin: Location, destination: Location) -> TripBuilder {
        TripBuilder::new(origin, destination)
    }

    /// A trip with default constraints and ranking over the given legs.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the crossings disagree about which side of the
    /// channel a port is on.
    pub fn new(
        origin: Location,
        destination: Location,
        ferries: Vec<FerryCrossing>,
        cars: Vec<CarLeg>,
    ) -> Result<Self, TripError> {
        Self::builder(origin, destination)
            .ferries(ferries)
            .cars(cars)
            .build()
    }

    pub fn origin(&self) -> &Location {
        &self.origin
    }

    pub fn destination(&self) -> &Location {
        &self.destination
    }

    pub fn repository(&self) -> &Arc<LegRepository> {
        &self.repo
    }

    /// Active constraints, including `Feasible` when the config asks for it.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn criteria(&self) -> &[RankingCriterion] {
        &self.criteria
    }

    pub fn party_size(&self) -> u32 {
        self.party_size
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Assemble, filter, rank and short-list the trip's itineraries.
    ///
    /// The same trip always gives the same result. No itineraries is a
    /// valid result, not an error.
    ///
    /// # Errors
    ///
    /// Returns `TooManyCombinations` if the data allows more itineraries
    /// than `max_itineraries`.
    pub fn evaluate(&self) -> Result<Evaluation, TripError> {
        let assembly = Assembler::new(&self.repo, &self.config).assemble(
            &self.origin,
            &self.destination,
            self.party_size,
        )?;

        let itineraries = assembly.iter().collect::<Result<Vec<_>, _>>()?;
        let assembled = itineraries.len();

        let survivors = apply_constraints(itineraries, &self.constraints);
        let survived = survivors.len();
        debug!(assembled, survived, "filtered itineraries");

        let itineraries = shortlist(
            survivors,
            &self.criteria,
            self.config.dedup,
            self.config.max_results,
        );

        info!(
            origin = %self.origin,
            destination = %self.destination,
            assembled,
            survived,
            returned = itineraries.len(),
            "trip evaluated"
        );

        Ok(Evaluation {
            itineraries,
            assembled,
            survived,
        })
    }
}

/// Builder for [`Trip`].
///
/// Legs can be given as domain values, as raw records, or as an existing
/// repository to share with other trips. Domain values and records are
/// combined; a shared repository replaces both.
#[derive(Debug, Clone)]
pub struct TripBuilder {
    origin: Location,
    destination: Location,
    cars: Vec<CarLeg>,
    ferries: Vec<FerryCrossing>,
    car_records: Vec<CarRecord>,
    ferry_records: Vec<FerryRecord>,
    vehicle: Vehicle,
    repo: Option<Arc<LegRepository>>,
    constraints: Vec<Constraint>,
    criteria: Vec<RankingCriterion>,
    party_size: u32,
    config: PlannerConfig,
}

impl TripBuilder {
    fn new(origin: Location, destination: Location) -> Self {
        Self {
            origin,
            destination,
            cars: Vec::new(),
            ferries: Vec::new(),
            car_records: Vec::new(),
            ferry_records: Vec::new(),
            vehicle: Vehicle::default(),
            repo: None,
            constraints: Vec::new(),
            criteria: Vec::new(),
            party_size: 1,
            config: PlannerConfig::default(),
        }
    }

    pub fn cars(mut self, cars: Vec<CarLeg>) -> Self {
        self.cars.extend(cars);
        self
    }

    pub fn ferries(mut self, ferries: Vec<FerryCrossing>) -> Self {
        self.ferries.extend(ferries);
        self
    }

    pub fn car_records(mut self, records: Vec<CarRecord>) -> Self {
        self.car_records.extend(records);
        self
    }

    pub fn ferry_records(mut self, records: Vec<FerryRecord>) -> Self {
        self.ferry_records.extend(records);
        self
    }

    /// Vehicle used to estimate fuel for car records without a cost.
    pub fn vehicle(mut self, vehicle: Vehicle) -> Self {
        self.vehicle = vehicle;
        self
    }

    /// Use an existing repository instead of building one.
    pub fn repository(mut self, repo: Arc<LegRepository>) -> Self {
        self.repo = Some(repo);
        self
    }

    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn constraints(mut self, constraints: impl IntoIterator<Item = Constraint>) -> Self {
        self.constraints.extend(constraints);
        self
    }

    /// Add a ranking criterion. The first added is the primary key.
    pub fn criterion(mut self, criterion: RankingCriterion) -> Self {
        self.criteria.push(criterion);
        self
    }

    pub fn ranking(mut self, criteria: impl IntoIterator<Item = RankingCriterion>) -> Self {
        self.criteria.extend(criteria);
        self
    }

    pub fn party_size(mut self, party_size: u32) -> Self {
        self.party_size = party_size;
        self
    }

    pub fn dedup(mut self, policy: DedupPolicy) -> Self {
        self.config.dedup = policy;
        self
    }

    pub fn max_results(mut self, max_results: usize) -> Self {
        self.config.max_results = max_results;
        self
    }

    /// Replace the whole configuration.
    ///
    /// Call this before `dedup` or `max_results` if combining them.
    pub fn config(mut self, config: PlannerConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate the data and build the trip.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - a record fails validation
    /// - a port is used on both sides of the channel
    /// - the party is empty
    /// - a port buffer in the configuration is out of range
    pub fn build(self) -> Result<Trip, TripError> {
        if self.party_size == 0 {
            return Err(ItineraryError::EmptyParty.into());
        }
        self.config.validate()?;

        let repo = match self.repo {
            Some(repo) => repo,
            None => {
                let mut cars = self.cars;
                cars.extend(convert_car_records(&self.car_records, &self.vehicle)?);
                let mut ferries = self.ferries;
                ferries.extend(convert_ferry_records(&self.ferry_records)?);
                Arc::new(LegRepository::new(cars, ferries)?)
            }
        };

        let mut constraints = self.constraints;
        if self.config.feasible_only && !constraints.contains(&Constraint::Feasible) {
            constraints.push(Constraint::Feasible);
        }

        let criteria = if self.criteria.is_empty() {
            default_criteria()
        } else {
            self.criteria
        };

        debug!(
            origin = %self.origin,
            destination = %self.destination,
            cars = repo.car_count(),
            crossings = repo.crossing_count(),
            constraints = constraints.len(),
            criteria = criteria.len(),
            "trip built"
        );

        Ok(Trip {
            origin: self.origin,
            destination: self.destination,
            repo,
            constraints,
            criteria,
            party_size: self.party_size,
            config: self.config,
        })
    }
}
