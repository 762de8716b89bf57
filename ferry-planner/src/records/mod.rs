//! Trip data records.
//!
//! Car and ferry data arrive as spreadsheet-style rows (usually a JSON
//! document). This module holds the row DTOs and turns them into validated
//! domain values, expanding two-way drives and cabin fares on the way.

mod convert;
mod types;
mod vehicle;

pub use convert::{
    convert_car_record, convert_car_records, convert_ferry_record, convert_ferry_records,
};
pub use types::{CarRecord, Dataset, DatasetError, DurationField, FerryRecord, WindowRecord};
pub use vehicle::{DEFAULT_CONSUMPTION, DEFAULT_FUEL_PRICE, Vehicle};
