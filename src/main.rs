use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod geo;
mod location;
mod ranker;
mod render;
mod source;
mod spot;

use location::LocationSource;
use render::MapView;

#[derive(Parser, Debug)]
#[command(name = "spots")]
#[command(about = "Load points of interest from a JSON file and list them nearest-first from your location.", long_about = None)]
struct Cli {
    /// Path to the spots JSON file (array of {name, description, location: [lat, lng]})
    #[arg(short, long, env = "SPOTS_DATA", default_value = "data.json")]
    data: PathBuf,

    /// Reference latitude in decimal degrees
    #[arg(long, env = "SPOTS_LAT", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Reference longitude in decimal degrees
    #[arg(long, env = "SPOTS_LNG", allow_hyphen_values = true)]
    lng: Option<f64>,

    /// JSON file holding the current position ({"lat": .., "lng": ..}). Ignored when --lat/--lng are set.
    #[arg(long, env = "SPOTS_LOCATION_FILE")]
    location_file: Option<PathBuf>,

    /// Output CSV (name, description, distance_mi, link). If omitted, prints a table to stdout.
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Write the ranked spots as JSON, with distances attached
    #[arg(long)]
    json_out: Option<PathBuf>,

    /// Write the map view (center, zoom, markers) as JSON
    #[arg(long)]
    map_out: Option<PathBuf>,

    /// Map zoom level
    #[arg(long, default_value_t = render::DEFAULT_ZOOM)]
    zoom: u8,
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    Ok(BufWriter::new(file))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    debug!(?cli, "parsed arguments");

    let location = LocationSource::from_options(cli.lat, cli.lng, cli.location_file.clone())?;

    // Location and data resolve independently; ranking waits for both.
    let (reference, spots) = tokio::join!(location.resolve(), source::load_spots(&cli.data));
    let spots = spots?;

    let ranked = ranker::rank(&spots, reference);
    match (reference, ranked.first()) {
        (Some(r), Some(nearest)) => info!(
            "Ranked {} spots from ({}, {}); nearest is {} at {:.2} mi",
            ranked.len(),
            r.lat,
            r.lng,
            nearest.name,
            nearest.distance.unwrap_or(f64::NAN)
        ),
        _ => info!("Listing {} spots in data order", ranked.len()),
    }

    let mut view = MapView::new(cli.zoom);
    if let Some(r) = reference {
        view.center_on_user(r);
    }
    view.add_spots(&ranked);

    let rows = render::table_rows(&ranked);
    if let Some(out_path) = &cli.out {
        render::write_csv(&rows, create(out_path)?)?;
        println!("Wrote {} spots to {}", rows.len(), out_path.display());
    } else {
        print!("{}", render::format_table(&rows));
    }

    if let Some(path) = &cli.json_out {
        render::write_spots_json(&ranked, create(path)?)?;
        info!("Wrote ranked spots to {}", path.display());
    }

    if let Some(path) = &cli.map_out {
        render::write_map_json(&view, create(path)?)?;
        info!(
            "Wrote map view ({} markers) to {}",
            view.markers.len(),
            path.display()
        );
    }

    Ok(())
}
