//! Money amounts.
//!
//! All amounts in a dataset share one currency; there is no conversion.
//! Amounts are held in minor units (pence) so that sums are exact and two
//! itineraries with the same total cost compare equal.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Neg};

/// A single-currency amount in minor units.
///
/// # Examples
///
/// ```
/// use ferry_planner::domain::Money;
///
/// let fare = Money::from_decimal(89.5).unwrap();
/// assert_eq!(fare.pence(), 8950);
/// assert_eq!(fare.to_string(), "89.50");
///
/// let total: Money = [fare, Money::from_pence(50)].into_iter().sum();
/// assert_eq!(total.to_string(), "90.00");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Money(i64);

impl Money {
    /// Zero.
    pub const ZERO: Money = Money(0);

    /// Largest amount accepted for a single cost: ten trillion in major
    /// units. Any realistic number of such amounts sums without overflow.
    pub const MAX: Money = Money(1_000_000_000_000_000);

    /// Create an amount from minor units.
    pub const fn from_pence(pence: i64) -> Self {
        Money(pence)
    }

    /// Create an amount from a decimal value in major units, rounding to
    /// the nearest minor unit.
    ///
    /// Returns `None` for NaN, infinities and values beyond [`Money::MAX`]
    /// in either direction.
    pub fn from_decimal(amount: f64) -> Option<Self> {
        if !amount.is_finite() {
            return None;
        }
        let pence = (amount * 100.0).round();
        if pence.abs() > Money::MAX.0 as f64 {
            return None;
        }
        Some(Money(pence as i64))
    }

    /// Returns the amount in minor units.
    pub const fn pence(self) -> i64 {
        self.0
    }

    /// Returns true if the amount is below zero.
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Returns the amount without its sign.
    pub const fn abs(self) -> Money {
        Money(self.0.saturating_abs())
    }

    /// Split the amount evenly between `people`, rounding up so the shares
    /// cover the whole amount.
    ///
    /// Returns the amount unchanged for a party of zero.
    pub fn per_person(self, people: u32) -> Money {
        if people == 0 {
            return self;
        }
        let people = i64::from(people);
        Money(self.0.div_euclid(people) + i64::from(self.0.rem_euclid(people) != 0))
    }

    /// Split the amount into `parts` shares that differ by at most a penny
    /// and add up exactly. Earlier shares take the odd pennies.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferry_planner::domain::Money;
    ///
    /// let shares = Money::from_pence(1000).split(3);
    /// assert_eq!(shares, [334, 333, 333].map(Money::from_pence));
    /// ```
    pub fn split(self, parts: usize) -> Vec<Money> {
        if parts == 0 {
            return Vec::new();
        }
        let n = i64::try_from(parts).unwrap_or(i64::MAX);
        let base = self.0.div_euclid(n);
        let odd = usize::try_from(self.0.rem_euclid(n)).unwrap_or(0);
        (0..parts)
            .map(|i| Money(base + i64::from(i < odd)))
            .collect()
    }

    /// Divide the amount in proportion to `weights`, so that the shares add
    /// up exactly. Negative weights count as zero; if every weight is zero
    /// the amount is split evenly.
    ///
    /// Odd pennies go to the shares with the largest rounding remainder,
    /// earlier shares first on a tie.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferry_planner::domain::Money;
    ///
    /// // 45.00 actually spent against estimates of 10.00 and 25.00
    /// let estimates = [Money::from_pence(1000), Money::from_pence(2500)];
    /// let shares = Money::from_pence(4500).allocate(&estimates);
    /// assert_eq!(shares, [1286, 3214].map(Money::from_pence));
    /// ```
    pub fn allocate(self, weights: &[Money]) -> Vec<Money> {
        let weights: Vec<i128> = weights.iter().map(|w| i128::from(w.0.max(0))).collect();
        let total_weight: i128 = weights.iter().sum();
        if total_weight == 0 {
            return self.split(weights.len());
        }

        let amount = i128::from(self.0);
        let mut shares = Vec::with_capacity(weights.len());
        let mut remainders = Vec::with_capacity(weights.len());
        for (index, weight) in weights.iter().enumerate() {
            let exact = amount * weight;
            shares.push(exact.div_euclid(total_weight));
            remainders.push((exact.rem_euclid(total_weight), index));
        }

        // Flooring loses less than a penny per share
        let leftover = amount - shares.iter().sum::<i128>();
        remainders.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        for &(_, index) in remainders.iter().take(usize::try_from(leftover).unwrap_or(0)) {
            shares[index] += 1;
        }

        // Each share lies between zero and the amount, so it fits
        shares.into_iter().map(|p| Money(p as i64)).collect()
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(self.0.saturating_neg())
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}
