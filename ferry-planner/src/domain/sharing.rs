//! Sharing a trip's costs between the people on it.
//!
//! An itinerary breaks down into one cost item per leg. Once the trip has
//! happened the fuel lines can be rescaled to what was really spent, keeping
//! the proportions of the estimates. A `Ledger` then keeps an itemised bill
//! per person: shares of costs count against them, money they paid up front
//! counts for them.

use std::fmt;

use super::{Itinerary, LegRef, Money};

/// What a cost item pays for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostKind {
    Fuel,
    Crossing,
}

impl fmt::Display for CostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostKind::Fuel => f.write_str("fuel"),
            CostKind::Crossing => f.write_str("crossing"),
        }
    }
}

/// One line of an itinerary's costs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostItem {
    pub description: String,
    pub amount: Money,
    pub kind: CostKind,
}

impl CostItem {
    fn from_leg(leg: LegRef<'_>) -> Self {
        match leg {
            LegRef::Car(car) => CostItem {
                description: format!("Fuel {} to {}", car.origin(), car.destination()),
                amount: car.cost(),
                kind: CostKind::Fuel,
            },
            LegRef::Ferry(crossing) => {
                let cabin = if crossing.has_cabin() { " with cabin" } else { "" };
                CostItem {
                    description: format!(
                        "{} {} to {}{cabin}",
                        crossing.operator(),
                        crossing.origin(),
                        crossing.destination()
                    ),
                    amount: crossing.cost(),
                    kind: CostKind::Crossing,
                }
            }
        }
    }
}

impl Itinerary {
    /// Itemised costs, one per leg in travel order.
    pub fn cost_breakdown(&self) -> Vec<CostItem> {
        self.legs().into_iter().map(CostItem::from_leg).collect()
    }

    /// Itemised costs with the fuel lines replaced by shares of `spent`.
    ///
    /// Each drive gets a share in proportion to its estimate, and the
    /// shares add up to `spent` exactly. Crossing lines are unchanged.
    ///
    /// # Examples
    ///
    /// An estimate of 10.00 each way that turned out to cost 45.00:
    ///
    /// ```text
    /// Fuel Home to Dover      10.00  ->  11.25
    /// DFDS Dover to Calais    89.00  ->  89.00
    /// ...
    /// ```
    pub fn fuel_breakdown(&self, spent: Money) -> Vec<CostItem> {
        let mut items = self.cost_breakdown();
        let estimates: Vec<Money> = items
            .iter()
            .filter(|item| item.kind == CostKind::Fuel)
            .map(|item| item.amount)
            .collect();
        let mut shares = spent.abs().allocate(&estimates).into_iter();

        for item in items.iter_mut().filter(|item| item.kind == CostKind::Fuel) {
            if let Some(share) = shares.next() {
                item.amount = share;
            }
        }
        items
    }
}

/// Error recording costs against people.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShareError {
    /// Costs need at least one person to share them
    #[error("at least one person must share the costs")]
    NoPeople,

    /// Person names must be non-empty
    #[error("person name cannot be empty")]
    EmptyName,

    /// A name appears more than once
    #[error("{0} is listed more than once")]
    DuplicatePerson(String),

    /// Name not in the ledger
    #[error("{0} is not on this trip")]
    UnknownPerson(String),

    /// Amount too large to add up safely
    #[error("{description}: amount {amount} exceeds the largest supported amount")]
    AmountTooLarge { description: String, amount: Money },
}

/// One line on a person's bill.
///
/// Positive amounts are owed by the person, negative amounts were paid by
/// them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillEntry {
    pub description: String,
    pub amount: Money,
}

/// A trip participant and their bill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    name: String,
    bill: Vec<BillEntry>,
}

impl Person {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the bill entries in the order they were added.
    pub fn bill(&self) -> &[BillEntry] {
        &self.bill
    }

    /// Costs minus expenses. Positive means the person still owes money,
    /// negative means they are owed.
    pub fn balance(&self) -> Money {
        self.bill.iter().map(|entry| entry.amount).sum()
    }
}

/// The bills of everyone sharing a trip.
///
/// # Examples
///
/// ```
/// use ferry_planner::domain::{Ledger, Money};
///
/// let mut ledger = Ledger::new(["Alice", "Bob"]).unwrap();
/// ledger.add_expense("Alice", "Fuel", Money::from_pence(6_000)).unwrap();
/// ledger.split_assign("Fuel", Money::from_pence(6_000), &["Alice", "Bob"]).unwrap();
///
/// assert_eq!(ledger.balance("Alice").unwrap(), Money::from_pence(-3_000));
/// assert_eq!(ledger.balance("Bob").unwrap(), Money::from_pence(3_000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    people: Vec<Person>,
}

impl Ledger {
    /// Start a ledger with empty bills.
    ///
    /// Names are trimmed and must be unique.
    pub fn new<I, S>(names: I) -> Result<Self, ShareError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut people: Vec<Person> = Vec::new();
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                return Err(ShareError::EmptyName);
            }
            if people.iter().any(|p| p.name == name) {
                return Err(ShareError::DuplicatePerson(name.to_string()));
            }
            people.push(Person {
                name: name.to_string(),
                bill: Vec::new(),
            });
        }
        if people.is_empty() {
            return Err(ShareError::NoPeople);
        }
        Ok(Self { people })
    }

    /// Returns everyone in the order they were added.
    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn person(&self, name: &str) -> Option<&Person> {
        self.index_of(name).ok().map(|i| &self.people[i])
    }

    /// Returns a person's balance.
    pub fn balance(&self, name: &str) -> Result<Money, ShareError> {
        Ok(self.people[self.index_of(name)?].balance())
    }

    /// Sum of every balance. Zero once all expenses are shared out.
    pub fn outstanding(&self) -> Money {
        self.people.iter().map(Person::balance).sum()
    }

    /// Charge a cost to one person. The sign of `amount` is ignored.
    pub fn add_cost(&mut self, name: &str, description: &str, amount: Money) -> Result<(), ShareError> {
        let amount = checked(description, amount)?;
        let index = self.index_of(name)?;
        self.push(index, description.to_string(), amount);
        Ok(())
    }

    /// Record money a person paid. The sign of `amount` is ignored.
    pub fn add_expense(
        &mut self,
        name: &str,
        description: &str,
        amount: Money,
    ) -> Result<(), ShareError> {
        let amount = checked(description, amount)?;
        let index = self.index_of(name)?;
        self.push(index, description.to_string(), -amount);
        Ok(())
    }

    /// Divide a cost evenly between `names`. The shares add up to the cost
    /// exactly; the first names listed take any odd pennies.
    ///
    /// Nothing is recorded unless every name is known and listed once.
    pub fn split_assign(
        &mut self,
        description: &str,
        amount: Money,
        names: &[&str],
    ) -> Result<(), ShareError> {
        let amount = checked(description, amount)?;
        if names.is_empty() {
            return Err(ShareError::NoPeople);
        }

        let mut indices = Vec::with_capacity(names.len());
        for name in names {
            let index = self.index_of(name)?;
            if indices.contains(&index) {
                return Err(ShareError::DuplicatePerson(name.trim().to_string()));
            }
            indices.push(index);
        }

        let description = match names.len() {
            1 => description.to_string(),
            n => format!("{description} / {n} people"),
        };
        for (index, share) in indices.into_iter().zip(amount.split(names.len())) {
            self.push(index, description.clone(), share);
        }
        Ok(())
    }

    /// Divide every item evenly between everyone on the ledger.
    pub fn split_all(&mut self, items: &[CostItem]) {
        let count = self.people.len();
        for item in items {
            let description = match count {
                1 => item.description.clone(),
                n => format!("{} / {n} people", item.description),
            };
            for (person, share) in self.people.iter_mut().zip(item.amount.abs().split(count)) {
                person.bill.push(BillEntry {
                    description: description.clone(),
                    amount: share,
                });
            }
        }
    }

    fn index_of(&self, name: &str) -> Result<usize, ShareError> {
        let name = name.trim();
        self.people
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| ShareError::UnknownPerson(name.to_string()))
    }

    fn push(&mut self, index: usize, description: String, amount: Money) {
        self.people[index].bill.push(BillEntry { description, amount });
    }
}

fn checked(description: &str, amount: Money) -> Result<Money, ShareError> {
    let amount = amount.abs();
    if amount > Money::MAX {
        return Err(ShareError::AmountTooLarge {
            description: description.to_string(),
            amount,
        });
    }
    Ok(amount)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// However costs are split, the bills add up to what was charged.
        #[test]
        fn bills_add_up(
            people in 1usize..8,
            amounts in prop::collection::vec(0i64..10_000_000, 0..10),
        ) {
            let names: Vec<String> = (0..people).map(|i| format!("P{i}")).collect();
            let mut ledger = Ledger::new(&names).unwrap();
            let items: Vec<CostItem> = amounts
                .iter()
                .map(|&p| CostItem {
                    description: "item".into(),
                    amount: Money::from_pence(p),
                    kind: CostKind::Crossing,
                })
                .collect();
            ledger.split_all(&items);

            let charged: i64 = amounts.iter().sum();
            prop_assert_eq!(ledger.outstanding(), Money::from_pence(charged));
            for person in ledger.people() {
                let fair = charged / people as i64;
                prop_assert!((person.balance().pence() - fair).abs() <= amounts.len() as i64);
            }
        }
    }
}
