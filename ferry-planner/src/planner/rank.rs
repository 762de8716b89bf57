//! Itinerary ranking for evaluation results.
//!
//! Ranks itineraries by a list of weighted criteria to present the most
//! useful options first, then collapses near-identical options so the
//! short-list shows distinct choices.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{CrossingId, Itinerary, Money};

/// Error building ranking criteria.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RankError {
    /// Weight is zero, negative, or not a number
    #[error("ranking weight must be a positive finite number, got {0}")]
    InvalidWeight(f64),
}

/// Sort order for one criterion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smaller values first
    #[default]
    Ascending,
    /// Larger values first
    Descending,
}

/// An itinerary figure to rank by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RankField {
    TotalCost,
    CostPerPerson,
    TotalDuration,
    CrossingDuration,
    /// When the trip leaves the origin
    DepartureTime,
    /// When the trip gets back home
    ReturnTime,
    /// Time at the destination
    Stay,
    /// Position of each crossing's operator in the list, summed over both
    /// crossings. Operators not in the list rank after all listed ones.
    PreferredOperators(Vec<String>),
}

impl RankField {
    /// The figure for one itinerary, in pence, minutes, or list positions.
    fn value(&self, itinerary: &Itinerary) -> f64 {
        match self {
            RankField::TotalCost => itinerary.total_cost().pence() as f64,
            RankField::CostPerPerson => itinerary.cost_per_person().pence() as f64,
            RankField::TotalDuration => itinerary.total_duration().num_minutes() as f64,
            RankField::CrossingDuration => itinerary.crossing_duration().num_minutes() as f64,
            RankField::DepartureTime => minutes_since_epoch(itinerary.schedule().leave_origin),
            RankField::ReturnTime => minutes_since_epoch(itinerary.schedule().reach_home),
            RankField::Stay => itinerary.stay().num_minutes() as f64,
            RankField::PreferredOperators(preferred) => {
                let position = |operator: &str| {
                    preferred
                        .iter()
                        .position(|p| p.trim().eq_ignore_ascii_case(operator))
                        .unwrap_or(preferred.len())
                };
                (position(itinerary.outbound_crossing().operator())
                    + position(itinerary.return_crossing().operator())) as f64
            }
        }
    }
}

fn minutes_since_epoch(t: chrono::NaiveDateTime) -> f64 {
    (t.and_utc().timestamp() / 60) as f64
}

impl fmt::Display for RankField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankField::TotalCost => f.write_str("total cost"),
            RankField::CostPerPerson => f.write_str("cost per person"),
            RankField::TotalDuration => f.write_str("total duration"),
            RankField::CrossingDuration => f.write_str("crossing duration"),
            RankField::DepartureTime => f.write_str("departure time"),
            RankField::ReturnTime => f.write_str("return time"),
            RankField::Stay => f.write_str("stay"),
            RankField::PreferredOperators(ops) => write!(f, "operators [{}]", ops.join(", ")),
        }
    }
}

/// One sort key: a field, a weight and a direction.
///
/// # Examples
///
/// ```
/// use ferry_planner::planner::{RankField, RankingCriterion, SortDirection};
///
/// let by_cost = RankingCriterion::new(RankField::TotalCost, 1.0, SortDirection::Ascending);
/// assert!(by_cost.is_ok());
///
/// let bad = RankingCriterion::new(RankField::TotalCost, 0.0, SortDirection::Ascending);
/// assert!(bad.is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RankingCriterion {
    field: RankField,
    weight: f64,
    direction: SortDirection,
}

impl RankingCriterion {
    /// Create a criterion, rejecting weights that are not finite and positive.
    pub fn new(field: RankField, weight: f64, direction: SortDirection) -> Result<Self, RankError> {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(RankError::InvalidWeight(weight));
        }
        Ok(Self {
            field,
            weight,
            direction,
        })
    }

    /// Unit-weight ascending criterion.
    pub fn ascending(field: RankField) -> Self {
        Self {
            field,
            weight: 1.0,
            direction: SortDirection::Ascending,
        }
    }

    /// Unit-weight descending criterion.
    pub fn descending(field: RankField) -> Self {
        Self {
            field,
            weight: 1.0,
            direction: SortDirection::Descending,
        }
    }

    pub fn field(&self) -> &RankField {
        &self.field
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Weighted key where smaller always sorts first.
    fn key(&self, itinerary: &Itinerary) -> f64 {
        let weighted = self.field.value(itinerary) * self.weight;
        match self.direction {
            SortDirection::Ascending => weighted,
            SortDirection::Descending => -weighted,
        }
    }
}

/// Ranking used when a trip supplies none: cheapest, then quickest.
pub fn default_criteria() -> Vec<RankingCriterion> {
    vec![
        RankingCriterion::ascending(RankField::TotalCost),
        RankingCriterion::ascending(RankField::TotalDuration),
    ]
}

/// Which itineraries count as showing the same choice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupPolicy {
    /// Show everything
    None,
    /// Same outbound and return sailing
    CrossingPair,
    /// Same sailings at the same total cost
    #[default]
    CrossingPairAndCost,
}

#[derive(Debug, PartialEq, Eq, Hash)]
enum DedupKey {
    Crossings(CrossingId, CrossingId),
    CrossingsAndCost(CrossingId, CrossingId, Money),
}

impl DedupPolicy {
    fn key(self, itinerary: &Itinerary) -> Option<DedupKey> {
        let (out, ret) = (itinerary.outbound_id(), itinerary.return_id());
        match self {
            DedupPolicy::None => None,
            DedupPolicy::CrossingPair => Some(DedupKey::Crossings(out, ret)),
            DedupPolicy::CrossingPairAndCost => {
                Some(DedupKey::CrossingsAndCost(out, ret, itinerary.total_cost()))
            }
        }
    }
}

/// Rank itineraries by the given criteria.
///
/// Criteria are compared in order: the first is the primary key, later
/// ones only break ties. The sort is stable, so itineraries that tie on
/// every criterion keep their input order.
///
/// Returns itineraries sorted best-first.
pub fn rank_itineraries(
    itineraries: Vec<Itinerary>,
    criteria: &[RankingCriterion],
) -> Vec<Itinerary> {
    let mut keyed: Vec<(Vec<f64>, Itinerary)> = itineraries
        .into_iter()
        .map(|it| (criteria.iter().map(|c| c.key(&it)).collect(), it))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| compare_keys(a, b));

    keyed.into_iter().map(|(_, it)| it).collect()
}

fn compare_keys(a: &[f64], b: &[f64]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| x.total_cmp(y))
        .find(|o| *o != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

/// Deduplicate itineraries that present the same choice.
///
/// Keeps the first member of each group, so on ranked input the
/// best-ranked member survives. Order is otherwise preserved.
pub fn deduplicate(itineraries: Vec<Itinerary>, policy: DedupPolicy) -> Vec<Itinerary> {
    if policy == DedupPolicy::None || itineraries.len() <= 1 {
        return itineraries;
    }

    let mut seen = HashSet::new();
    itineraries
        .into_iter()
        .filter(|it| policy.key(it).is_none_or(|key| seen.insert(key)))
        .collect()
}

/// Rank, deduplicate, then keep the best `max_results`.
pub fn shortlist(
    itineraries: Vec<Itinerary>,
    criteria: &[RankingCriterion],
    policy: DedupPolicy,
    max_results: usize,
) -> Vec<Itinerary> {
    let ranked = rank_itineraries(itineraries, criteria);
    let mut unique = deduplicate(ranked, policy);
    unique.truncate(max_results);
    unique
}
