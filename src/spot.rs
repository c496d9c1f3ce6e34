use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::Coordinate;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpotError {
    #[error("spot has no name")]
    MissingName,

    #[error("spot '{0}' has no location")]
    MissingLocation(String),

    #[error("spot '{name}' location must be [lat, lng], got {len} values")]
    MalformedLocation { name: String, len: usize },

    #[error("spot '{name}' location ({lat}, {lng}) is out of range")]
    OutOfRange { name: String, lat: f64, lng: f64 },
}

/// A point of interest. `distance` is in miles and only set once ranked against a reference.
#[derive(Clone, Debug, PartialEq)]
pub struct Spot {
    pub name: String,
    pub description: String,
    pub location: Coordinate,
    pub distance: Option<f64>,
}

impl Spot {
    pub fn new(name: impl Into<String>, description: impl Into<String>, location: Coordinate) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            location,
            distance: None,
        }
    }
}

/// On-disk shape of a spot: `{"name", "description", "location": [lat, lng]}`.
/// Any other field, `distance` included, is ignored.
#[derive(Debug, Deserialize)]
pub struct SpotRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: Option<Vec<f64>>,
}

/// Output shape: the input record plus `distance` once ranked against a reference.
#[derive(Debug, Serialize)]
pub struct RankedRecord {
    pub name: String,
    pub description: String,
    pub location: [f64; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl TryFrom<SpotRecord> for Spot {
    type Error = SpotError;

    fn try_from(record: SpotRecord) -> Result<Self, Self::Error> {
        let name = record.name.trim().to_string();
        if name.is_empty() {
            return Err(SpotError::MissingName);
        }
        let location = match record.location.as_deref() {
            None => return Err(SpotError::MissingLocation(name)),
            Some(&[lat, lng]) => Coordinate::new(lat, lng),
            Some(values) => {
                return Err(SpotError::MalformedLocation {
                    name,
                    len: values.len(),
                })
            }
        };
        if !location.is_valid() {
            return Err(SpotError::OutOfRange {
                name,
                lat: location.lat,
                lng: location.lng,
            });
        }
        Ok(Spot::new(name, record.description, location))
    }
}

impl From<&Spot> for RankedRecord {
    fn from(spot: &Spot) -> Self {
        RankedRecord {
            name: spot.name.clone(),
            description: spot.description.clone(),
            location: [spot.location.lat, spot.location.lng],
            distance: spot.distance,
        }
    }
}

/// Parse a JSON array of spot records, rejecting the whole set on the first invalid record.
pub fn parse_spots(json: &str) -> Result<Vec<Spot>> {
    let records: Vec<SpotRecord> = serde_json::from_str(json).context("parsing spot records")?;
    records
        .into_iter()
        .enumerate()
        .map(|(idx, record)| Spot::try_from(record).with_context(|| format!("spot record #{idx}")))
        .collect()
}
