use anyhow::{bail, Context, Result};
use clap::Parser;
use csv::{ReaderBuilder, StringRecord, Writer};
use std::io::Write;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod geo;

use geo::{haversine_miles, Coordinate};

#[derive(Parser, Debug)]
#[command(name = "haversine")]
#[command(about = "Compute the great-circle distance in miles for each row of a CSV with lat1,lng1,lat2,lng2.", long_about = None)]
struct Cli {
    /// Path to the .csv file
    #[arg(short, long)]
    csv: String,

    /// Output CSV (lat1, lng1, lat2, lng2, distance_mi). If omitted, writes to stdout.
    #[arg(short, long)]
    out: Option<String>,
}

fn parse_pair(record: &StringRecord) -> Result<(Coordinate, Coordinate)> {
    let field = |i: usize| -> Result<f64> {
        let raw = record.get(i).context("expected 4 columns")?;
        raw.trim()
            .parse()
            .with_context(|| format!("column {} is not a number: {:?}", i + 1, raw))
    };
    let (a, b) = (
        Coordinate::new(field(0)?, field(1)?),
        Coordinate::new(field(2)?, field(3)?),
    );
    for c in [a, b] {
        if !c.is_valid() {
            bail!("coordinate ({}, {}) is out of range", c.lat, c.lng);
        }
    }
    Ok((a, b))
}

fn run<W: Write>(path: &str, out: W) -> Result<usize> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true) // skip header line
        .from_path(path)
        .with_context(|| format!("opening {}", path))?;
    let mut wtr = Writer::from_writer(out);
    wtr.write_record(["lat1", "lng1", "lat2", "lng2", "distance_mi"])?;

    let mut rows = 0;
    for (idx, result) in rdr.records().enumerate() {
        // header is line 1
        let line = idx + 2;
        let record = result.with_context(|| format!("reading line {}", line))?;
        let (a, b) = parse_pair(&record).with_context(|| format!("line {}", line))?;
        let d = haversine_miles(a, b);
        wtr.write_record(&[
            a.lat.to_string(),
            a.lng.to_string(),
            b.lat.to_string(),
            b.lng.to_string(),
            format!("{:.6}", d),
        ])?;
        rows += 1;
    }
    wtr.flush()?;
    Ok(rows)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let rows = match &cli.out {
        Some(out_path) => {
            let file = std::fs::File::create(out_path)
                .with_context(|| format!("creating CSV {}", out_path))?;
            run(&cli.csv, file)?
        }
        None => run(&cli.csv, std::io::stdout().lock())?,
    };
    info!("Computed {} distances from {}", rows, cli.csv);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn input(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn appends_distance_column() {
        let file = input("lat1,lng1,lat2,lng2\n32.7157,-117.1611,34.0522,-118.2437\n1,0,1,0\n");
        let mut buf = Vec::new();
        let rows = run(file.path().to_str().unwrap(), &mut buf).unwrap();
        assert_eq!(rows, 2);

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "lat1,lng1,lat2,lng2,distance_mi");
        let d: f64 = lines[1].rsplit(',').next().unwrap().parse().unwrap();
        assert!((d - 112.0).abs() <= 1.0);
        assert_eq!(lines[2], "1,0,1,0,0.000000");
    }

    #[test]
    fn bad_number_names_the_line() {
        let file = input("lat1,lng1,lat2,lng2\n1,2,3,4\n1,x,3,4\n");
        let err = run(file.path().to_str().unwrap(), Vec::new()).unwrap_err();
        assert!(format!("{err:#}").contains("line 3"));
    }

    #[test]
    fn out_of_range_row_is_rejected() {
        let file = input("lat1,lng1,lat2,lng2\n1,2,3,4\n-117.1611,32.7157,34.0522,-118.2437\n");
        let err = run(file.path().to_str().unwrap(), Vec::new()).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("line 3"));
        assert!(msg.contains("out of range"));
    }
}
