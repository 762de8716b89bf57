//! Fuel cost estimation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{DataError, Money};

/// Pump price used when none is given, in pence per litre.
pub const DEFAULT_FUEL_PRICE: f64 = 127.0;

/// Consumption used when none is given, in litres per 100 km.
pub const DEFAULT_CONSUMPTION: f64 = 6.5;

/// The car making the trip, as far as fuel is concerned.
///
/// # Examples
///
/// ```
/// use ferry_planner::records::Vehicle;
///
/// let car = Vehicle::new(5.0, 150.0).unwrap();
/// // 200 km at 5 L/100km is 10 litres
/// assert_eq!(car.fuel_cost(200.0).unwrap().pence(), 1500);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "VehicleParams", into = "VehicleParams")]
pub struct Vehicle {
    litres_per_100km: f64,
    pence_per_litre: f64,
}

#[derive(Serialize, Deserialize)]
struct VehicleParams {
    #[serde(default = "default_consumption")]
    litres_per_100km: f64,
    #[serde(default = "default_price")]
    pence_per_litre: f64,
}

fn default_consumption() -> f64 {
    DEFAULT_CONSUMPTION
}

fn default_price() -> f64 {
    DEFAULT_FUEL_PRICE
}

impl TryFrom<VehicleParams> for Vehicle {
    type Error = DataError;

    fn try_from(p: VehicleParams) -> Result<Self, DataError> {
        Vehicle::new(p.litres_per_100km, p.pence_per_litre)
    }
}

impl From<Vehicle> for VehicleParams {
    fn from(v: Vehicle) -> Self {
        VehicleParams {
            litres_per_100km: v.litres_per_100km,
            pence_per_litre: v.pence_per_litre,
        }
    }
}

impl Vehicle {
    /// Create a vehicle; both figures must be finite and non-negative.
    pub fn new(litres_per_100km: f64, pence_per_litre: f64) -> Result<Self, DataError> {
        if !litres_per_100km.is_finite() || litres_per_100km < 0.0 {
            return Err(DataError::InvalidVehicle("fuel consumption must be non-negative"));
        }
        if !pence_per_litre.is_finite() || pence_per_litre < 0.0 {
            return Err(DataError::InvalidVehicle("fuel price must be non-negative"));
        }
        Ok(Self {
            litres_per_100km,
            pence_per_litre,
        })
    }

    pub fn litres_per_100km(&self) -> f64 {
        self.litres_per_100km
    }

    pub fn pence_per_litre(&self) -> f64 {
        self.pence_per_litre
    }

    /// Estimated fuel cost for a distance, to the nearest penny.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` if the estimate is not a representable
    /// amount of money.
    pub fn fuel_cost(&self, km: f64) -> Result<Money, DataError> {
        let litres = km * self.litres_per_100km / 100.0;
        let pounds = litres * self.pence_per_litre / 100.0;
        Money::from_decimal(pounds).ok_or_else(|| DataError::InvalidAmount {
            context: format!("fuel for {km} km"),
            amount: pounds,
        })
    }
}

impl Default for Vehicle {
    fn default() -> Self {
        Self {
            litres_per_100km: DEFAULT_CONSUMPTION,
            pence_per_litre: DEFAULT_FUEL_PRICE,
        }
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} L/100km at {}p/L",
            self.litres_per_100km, self.pence_per_litre
        )
    }
}
