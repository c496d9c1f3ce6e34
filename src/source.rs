use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::spot::{parse_spots, Spot};

/// Read and validate the spot data file.
pub async fn load_spots(path: &Path) -> Result<Vec<Spot>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let spots = parse_spots(&raw).with_context(|| format!("loading {}", path.display()))?;
    info!("Loaded {} spots from {}", spots.len(), path.display());
    Ok(spots)
}
