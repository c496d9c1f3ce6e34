use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::geo::Coordinate;

/// Where the reference location comes from.
#[derive(Clone, Debug, PartialEq)]
pub enum LocationSource {
    Unavailable,
    Fixed(Coordinate),
    File(PathBuf),
}

#[derive(Debug, Deserialize)]
struct PositionFile {
    #[serde(alias = "latitude")]
    lat: f64,
    #[serde(alias = "longitude", alias = "lon")]
    lng: f64,
}

impl LocationSource {
    /// Build a source from the CLI options. `--lat`/`--lng` win over a location file.
    pub fn from_options(
        lat: Option<f64>,
        lng: Option<f64>,
        file: Option<PathBuf>,
    ) -> Result<Self> {
        match (lat, lng) {
            (Some(lat), Some(lng)) => {
                let coord = Coordinate::new(lat, lng);
                if !coord.is_valid() {
                    bail!("reference location ({lat}, {lng}) is out of range");
                }
                Ok(LocationSource::Fixed(coord))
            }
            (Some(_), None) | (None, Some(_)) => bail!("--lat and --lng must be given together"),
            (None, None) => Ok(file.map_or(LocationSource::Unavailable, LocationSource::File)),
        }
    }

    /// Resolve to a coordinate. Failures are logged and resolve to `None`.
    pub async fn resolve(self) -> Option<Coordinate> {
        match self {
            LocationSource::Unavailable => {
                info!("No location source configured, keeping data order");
                None
            }
            LocationSource::Fixed(coord) => Some(coord),
            LocationSource::File(path) => match read_position(&path).await {
                Ok(coord) => {
                    info!("Resolved location ({}, {}) from {}", coord.lat, coord.lng, path.display());
                    Some(coord)
                }
                Err(e) => {
                    warn!("Location unavailable, keeping data order: {:#}", e);
                    None
                }
            },
        }
    }
}

async fn read_position(path: &Path) -> Result<Coordinate> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let pos: PositionFile =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
    let coord = Coordinate::new(pos.lat, pos.lng);
    if !coord.is_valid() {
        bail!("position ({}, {}) in {} is out of range", pos.lat, pos.lng, path.display());
    }
    Ok(coord)
}
