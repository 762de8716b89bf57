//! Data transfer objects for web requests and responses.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::{
    CarLeg, CostItem, DataError, FerryCrossing, Itinerary, Ledger, Money, Person,
    format_datetime, format_hmm, minutes, parse_datetime,
};
use crate::planner::{Constraint, DedupPolicy, RankError, RankField, RankingCriterion, SortDirection};
use crate::records::{CarRecord, FerryRecord, Vehicle};

/// Request to evaluate a trip.
#[derive(Debug, Deserialize)]
pub struct EvaluateTripRequest {
    /// Where the trip starts and ends
    pub origin: String,

    /// Where the party is going
    pub destination: String,

    #[serde(default)]
    pub cars: Vec<CarRecord>,

    #[serde(default)]
    pub ferries: Vec<FerryRecord>,

    #[serde(default)]
    pub constraints: Vec<ConstraintDto>,

    /// Ranking criteria, primary first. Empty means cheapest then quickest.
    #[serde(default)]
    pub ranking: Vec<CriterionDto>,

    /// Number of people sharing the cost (defaults to 1)
    pub party_size: Option<u32>,

    /// Short-list length, capped by the server's limit
    pub max_results: Option<usize>,

    pub dedup: Option<DedupPolicy>,

    /// Used to estimate fuel for car records without a cost
    pub vehicle: Option<Vehicle>,

    /// Names of the people sharing the costs. Sets the party size when
    /// `party_size` is absent.
    #[serde(default)]
    pub people: Vec<String>,

    /// Money people have already paid towards the trip
    #[serde(default)]
    pub expenses: Vec<ExpenseDto>,

    /// Fuel actually spent, shared over the drives by their estimates
    pub fuel_spent: Option<f64>,
}

/// Money one person paid up front.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExpenseDto {
    pub person: String,

    #[serde(default = "default_expense")]
    pub description: String,

    pub amount: f64,
}

fn default_expense() -> String {
    "Expense".to_string()
}

/// How an itinerary's costs are shared out.
#[derive(Debug, Clone, Default)]
pub struct CostSharing {
    /// Bills before the itinerary's costs are added, if anyone is named
    pub ledger: Option<Ledger>,

    /// Replaces the fuel estimates
    pub fuel_spent: Option<Money>,
}

impl CostSharing {
    fn costs(&self, it: &Itinerary) -> Vec<CostItem> {
        match self.fuel_spent {
            Some(spent) => it.fuel_breakdown(spent),
            None => it.cost_breakdown(),
        }
    }
}

/// A hard constraint, tagged by `type`.
///
/// Amounts are decimals in major units; times use the same formats as the
/// records.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConstraintDto {
    MaxTotalCost { amount: f64 },
    MaxCostPerPerson { amount: f64 },
    MaxTotalDuration { minutes: i64 },
    MaxCrossingDuration { minutes: i64 },
    DepartAfter { time: String },
    ReturnBy { time: String },
    MinConnection { minutes: i64 },
    MinStay { minutes: i64 },
    Feasible,
}

fn money(amount: f64) -> Result<Money, DataError> {
    amount_in("constraint", amount)
}

/// Parse a decimal amount from a request field.
pub fn amount_in(context: &str, amount: f64) -> Result<Money, DataError> {
    Money::from_decimal(amount).ok_or_else(|| DataError::InvalidAmount {
        context: context.to_string(),
        amount,
    })
}

impl ConstraintDto {
    /// Convert to a domain constraint.
    pub fn to_constraint(&self) -> Result<Constraint, DataError> {
        Ok(match self {
            ConstraintDto::MaxTotalCost { amount } => Constraint::MaxTotalCost(money(*amount)?),
            ConstraintDto::MaxCostPerPerson { amount } => {
                Constraint::MaxCostPerPerson(money(*amount)?)
            }
            ConstraintDto::MaxTotalDuration { minutes: m } => {
                Constraint::MaxTotalDuration(minutes(*m)?)
            }
            ConstraintDto::MaxCrossingDuration { minutes: m } => {
                Constraint::MaxCrossingDuration(minutes(*m)?)
            }
            ConstraintDto::DepartAfter { time } => Constraint::DepartAfter(parse_datetime(time)?),
            ConstraintDto::ReturnBy { time } => Constraint::ReturnBy(parse_datetime(time)?),
            ConstraintDto::MinConnection { minutes: m } => {
                Constraint::MinConnection(minutes(*m)?)
            }
            ConstraintDto::MinStay { minutes: m } => Constraint::MinStay(minutes(*m)?),
            ConstraintDto::Feasible => Constraint::Feasible,
        })
    }
}

/// Field names accepted in ranking criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldDto {
    TotalCost,
    CostPerPerson,
    TotalDuration,
    CrossingDuration,
    DepartureTime,
    ReturnTime,
    Stay,
    PreferredOperators,
}

fn default_weight() -> f64 {
    1.0
}

/// A ranking criterion.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CriterionDto {
    pub field: FieldDto,

    #[serde(default = "default_weight")]
    pub weight: f64,

    #[serde(default)]
    pub direction: SortDirection,

    /// Operator names, most preferred first. Only used by
    /// `preferred_operators`.
    #[serde(default)]
    pub operators: Vec<String>,
}

impl CriterionDto {
    /// Convert to a domain criterion, validating the weight.
    pub fn to_criterion(&self) -> Result<RankingCriterion, RankError> {
        let field = match self.field {
            FieldDto::TotalCost => RankField::TotalCost,
            FieldDto::CostPerPerson => RankField::CostPerPerson,
            FieldDto::TotalDuration => RankField::TotalDuration,
            FieldDto::CrossingDuration => RankField::CrossingDuration,
            FieldDto::DepartureTime => RankField::DepartureTime,
            FieldDto::ReturnTime => RankField::ReturnTime,
            FieldDto::Stay => RankField::Stay,
            FieldDto::PreferredOperators => RankField::PreferredOperators(self.operators.clone()),
        };
        RankingCriterion::new(field, self.weight, self.direction)
    }
}

/// Response for trip evaluation.
#[derive(Debug, Serialize)]
pub struct EvaluateTripResponse {
    /// Short-listed itineraries, best first
    pub itineraries: Vec<ItineraryResult>,

    /// Number of itineraries assembled
    pub assembled: usize,

    /// Number that passed every constraint
    pub survived: usize,
}

/// One leg of an itinerary, with its scheduled times.
#[derive(Debug, Serialize)]
pub struct LegResult {
    /// "car" or "ferry"
    pub kind: &'static str,
    pub from: String,
    pub to: String,
    pub depart: String,
    pub arrive: String,
    pub duration_mins: i64,
    pub cost: String,

    /// Ferry operator
    pub operator: Option<String>,

    /// Route alternative for a drive
    pub variant: Option<String>,

    /// Cabin booked on a sailing
    pub cabin: bool,
}

impl LegResult {
    fn from_car(leg: &CarLeg, depart: NaiveDateTime) -> Self {
        Self {
            kind: "car",
            from: leg.origin().to_string(),
            to: leg.destination().to_string(),
            depart: format_datetime(&depart),
            arrive: format_datetime(&(depart + leg.duration())),
            duration_mins: leg.duration().num_minutes(),
            cost: leg.cost().to_string(),
            operator: None,
            variant: leg.variant().map(String::from),
            cabin: false,
        }
    }

    fn from_crossing(crossing: &FerryCrossing) -> Self {
        Self {
            kind: "ferry",
            from: crossing.origin().to_string(),
            to: crossing.destination().to_string(),
            depart: format_datetime(&crossing.departure()),
            arrive: format_datetime(&crossing.arrival()),
            duration_mins: crossing.duration().num_minutes(),
            cost: crossing.cost().to_string(),
            operator: Some(crossing.operator().to_string()),
            variant: None,
            cabin: crossing.has_cabin(),
        }
    }
}

/// An itinerary option, with every figure a client needs to show it.
#[derive(Debug, Serialize)]
pub struct ItineraryResult {
    /// The six legs in travel order
    pub legs: Vec<LegResult>,

    /// Total cost, e.g. "230.00"
    pub total_cost: String,
    pub total_cost_pence: i64,
    pub cost_per_person: String,

    /// Travel time both ways, "H:MM"
    pub total_duration: String,
    pub total_duration_mins: i64,
    pub crossing_duration_mins: i64,
    pub stay_mins: i64,
    pub min_connection_mins: i64,

    pub depart_origin: String,
    pub arrive_destination: String,
    pub depart_destination: String,
    pub arrive_home: String,

    pub feasible: bool,

    /// One line per leg
    pub costs: Vec<CostLine>,

    /// Balance per person, when people are named
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub shares: Vec<ShareResult>,
}

/// One line of an itinerary's costs.
#[derive(Debug, Serialize)]
pub struct CostLine {
    pub description: String,

    /// "fuel" or "crossing"
    pub kind: String,
    pub amount: String,
    pub amount_pence: i64,
}

impl CostLine {
    fn from_item(item: &CostItem) -> Self {
        Self {
            description: item.description.clone(),
            kind: item.kind.to_string(),
            amount: item.amount.to_string(),
            amount_pence: item.amount.pence(),
        }
    }
}

/// What one person owes (positive) or is owed (negative) for an itinerary.
#[derive(Debug, Serialize)]
pub struct ShareResult {
    pub name: String,
    pub balance: String,
    pub balance_pence: i64,
}

impl ShareResult {
    fn from_person(person: &Person) -> Self {
        Self {
            name: person.name().to_string(),
            balance: person.balance().to_string(),
            balance_pence: person.balance().pence(),
        }
    }
}

impl ItineraryResult {
    /// Create from a domain Itinerary.
    pub fn from_itinerary(it: &Itinerary) -> Self {
        Self::from_itinerary_shared(it, &CostSharing::default())
    }

    /// Create from a domain Itinerary, sharing its costs out.
    pub fn from_itinerary_shared(it: &Itinerary, sharing: &CostSharing) -> Self {
        let costs = sharing.costs(it);
        let shares = match &sharing.ledger {
            Some(ledger) => {
                let mut ledger = ledger.clone();
                ledger.split_all(&costs);
                ledger.people().iter().map(ShareResult::from_person).collect()
            }
            None => Vec::new(),
        };

        let s = it.schedule();
        let legs = vec![
            LegResult::from_car(it.drive_out(), s.leave_origin),
            LegResult::from_crossing(it.outbound_crossing()),
            LegResult::from_car(it.drive_in(), s.leave_port_in),
            LegResult::from_car(it.drive_back(), s.leave_destination),
            LegResult::from_crossing(it.return_crossing()),
            LegResult::from_car(it.drive_home(), s.leave_port_home),
        ];

        Self {
            legs,
            total_cost: it.total_cost().to_string(),
            total_cost_pence: it.total_cost().pence(),
            cost_per_person: it.cost_per_person().to_string(),
            total_duration: format_hmm(it.total_duration()),
            total_duration_mins: it.total_duration().num_minutes(),
            crossing_duration_mins: it.crossing_duration().num_minutes(),
            stay_mins: it.stay().num_minutes(),
            min_connection_mins: it.min_connection().num_minutes(),
            depart_origin: format_datetime(&s.leave_origin),
            arrive_destination: format_datetime(&s.reach_destination),
            depart_destination: format_datetime(&s.leave_destination),
            arrive_home: format_datetime(&s.reach_home),
            feasible: it.is_feasible(),
            costs: costs.iter().map(CostLine::from_item).collect(),
            shares,
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
