//! Conversion from record DTOs to domain types.
//!
//! One record can produce more than one domain value: a two-way drive
//! becomes a leg in each direction, and a sailing with a cabin price
//! becomes a plain crossing plus a cabin crossing. Any failure names the
//! record it came from.

use chrono::Duration;
use tracing::debug;

use crate::domain::{
    CarLeg, DataError, DriveWindow, FerryCrossing, Location, Money, RecordKind, minutes,
    parse_datetime, parse_hmm,
};

use crate::repository::LegRepository;

use super::types::{CarRecord, Dataset, DurationField, FerryRecord, WindowRecord};
use super::vehicle::Vehicle;

fn amount(context: impl FnOnce() -> String, value: f64) -> Result<Money, DataError> {
    Money::from_decimal(value).ok_or_else(|| DataError::InvalidAmount {
        context: context(),
        amount: value,
    })
}

fn duration(field: &DurationField) -> Result<Duration, DataError> {
    match field {
        DurationField::Minutes(m) => minutes(*m),
        DurationField::Text(s) => match s.trim().parse::<i64>() {
            Ok(m) => minutes(m),
            Err(_) => parse_hmm(s),
        },
    }
}

fn window(record: &WindowRecord) -> Result<DriveWindow, DataError> {
    DriveWindow::new(parse_datetime(&record.start)?, parse_datetime(&record.end)?)
}

/// Convert one car record into one leg, or two for a two-way drive.
pub fn convert_car_record(record: &CarRecord, vehicle: &Vehicle) -> Result<Vec<CarLeg>, DataError> {
    let from = Location::new(&record.from)?;
    let to = Location::new(&record.to)?;
    let context = || format!("car leg {from} -> {to}");

    let duration = duration(&record.duration)?;

    let cost = match (record.cost, record.distance_km) {
        (Some(cost), _) => amount(context, cost)?,
        (None, Some(km)) => vehicle.fuel_cost(km)?,
        (None, None) => return Err(DataError::MissingCost { context: context() }),
    };

    let windows = record
        .windows
        .iter()
        .map(window)
        .collect::<Result<Vec<_>, _>>()?;

    let build = |origin: &Location, destination: &Location| -> Result<CarLeg, DataError> {
        let mut leg = CarLeg::new(origin.clone(), destination.clone(), duration, cost)?
            .with_windows(windows.clone());
        if let Some(note) = &record.note {
            leg = leg.with_variant(note.trim());
        }
        if let Some(km) = record.distance_km {
            leg = leg.with_distance(km)?;
        }
        Ok(leg)
    };

    let mut legs = vec![build(&from, &to)?];
    if record.bidirectional {
        legs.push(build(&to, &from)?);
    }
    Ok(legs)
}

/// Convert one ferry record into a crossing, plus a cabin variant when the
/// record prices one.
pub fn convert_ferry_record(record: &FerryRecord) -> Result<Vec<FerryCrossing>, DataError> {
    let from = Location::new(&record.from)?;
    let to = Location::new(&record.to)?;
    let context = || format!("crossing {from} -> {to} at {}", record.departs.trim());

    let departs = parse_datetime(&record.departs)?;
    let arrives = parse_datetime(&record.arrives)?;
    let cost = amount(context, record.cost)?;

    let crossing = FerryCrossing::new(
        from.clone(),
        to.clone(),
        departs,
        arrives,
        cost,
        record.operator.as_str(),
        record.direction,
    )?;

    let cabin = match record.cabin_cost {
        Some(extra) if extra != 0.0 => Some(crossing.cabin_variant(amount(context, extra)?)?),
        _ => None,
    };

    Ok(std::iter::once(crossing).chain(cabin).collect())
}

/// Convert every car record, stopping at the first bad one.
pub fn convert_car_records(
    records: &[CarRecord],
    vehicle: &Vehicle,
) -> Result<Vec<CarLeg>, DataError> {
    let mut legs = Vec::with_capacity(records.len() * 2);
    for (index, record) in records.iter().enumerate() {
        let converted = convert_car_record(record, vehicle)
            .map_err(|e| e.in_record(RecordKind::Car, index))?;
        legs.extend(converted);
    }
    debug!(records = records.len(), legs = legs.len(), "converted car records");
    Ok(legs)
}

/// Convert every ferry record, stopping at the first bad one.
pub fn convert_ferry_records(records: &[FerryRecord]) -> Result<Vec<FerryCrossing>, DataError> {
    let mut crossings = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let converted =
            convert_ferry_record(record).map_err(|e| e.in_record(RecordKind::Ferry, index))?;
        crossings.extend(converted);
    }
    debug!(
        records = records.len(),
        crossings = crossings.len(),
        "converted ferry records"
    );
    Ok(crossings)
}

impl Dataset {
    /// Convert the whole dataset into domain values.
    pub fn to_domain(&self, vehicle: &Vehicle) -> Result<(Vec<CarLeg>, Vec<FerryCrossing>), DataError> {
        Ok((
            convert_car_records(&self.cars, vehicle)?,
            convert_ferry_records(&self.ferries)?,
        ))
    }

    /// Convert the dataset and index it, ready to share between trips.
    pub fn to_repository(&self, vehicle: &Vehicle) -> Result<LegRepository, DataError> {
        let (cars, ferries) = self.to_domain(vehicle)?;
        LegRepository::new(cars, ferries)
    }
}
