//! Trip data record DTOs.
//!
//! These types mirror the columns of a hand-kept travel spreadsheet: one
//! row per drive, one row per sailing. Amounts are decimals in major units
//! and times are text, exactly as typed. Nothing here is validated; see
//! `convert` for that.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::Direction;

/// A drive between two places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarRecord {
    pub from: String,
    pub to: String,

    /// Distance in kilometres. Used to estimate fuel when `cost` is absent.
    #[serde(default)]
    pub distance_km: Option<f64>,

    /// Drive time, as `"H:MM"` or a whole number of minutes.
    pub duration: DurationField,

    /// Fuel and tolls. Estimated from the distance when absent.
    #[serde(default)]
    pub cost: Option<f64>,

    /// Free text; a non-empty note names the route alternative.
    #[serde(default)]
    pub note: Option<String>,

    /// Periods the whole drive must fit inside. Absent means any time.
    #[serde(default)]
    pub windows: Vec<WindowRecord>,

    /// The same drive is also possible in the other direction.
    #[serde(default = "default_true")]
    pub bidirectional: bool,
}

fn default_true() -> bool {
    true
}

/// Drive time as it appears in a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DurationField {
    /// Whole minutes
    Minutes(i64),
    /// `"H:MM"` text
    Text(String),
}

/// A drive window as it appears in a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub start: String,
    pub end: String,
}

/// A scheduled sailing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FerryRecord {
    pub from: String,
    pub to: String,
    pub operator: String,
    pub departs: String,
    pub arrives: String,
    pub cost: f64,

    /// Extra charge for a cabin. A positive value adds a cabin variant of
    /// the sailing alongside the plain one.
    #[serde(default)]
    pub cabin_cost: Option<f64>,

    pub direction: Direction,

    #[serde(default)]
    pub note: Option<String>,
}

/// A complete set of trip data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub cars: Vec<CarRecord>,
    #[serde(default)]
    pub ferries: Vec<FerryRecord>,
}

/// Error loading a dataset document.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// File could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document is not a valid dataset
    #[error("invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Dataset {
    /// Parse a `{ "cars": [...], "ferries": [...] }` document.
    pub fn from_json_str(json: &str) -> Result<Self, DatasetError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a dataset file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }
}
