use anyhow::{Context, Result};
use csv::Writer;
use serde::Serialize;
use std::io::Write;

use crate::geo::Coordinate;
use crate::spot::{RankedRecord, Spot};

pub const DEFAULT_CENTER: Coordinate = Coordinate {
    lat: 32.7157,
    lng: -117.1611,
};
pub const DEFAULT_ZOOM: u8 = 11;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    User,
    Spot,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Marker {
    pub kind: MarkerKind,
    pub position: Coordinate,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
}

/// Everything a map front end needs for one run: where to look and what to pin.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MapView {
    pub center: Coordinate,
    pub zoom: u8,
    pub markers: Vec<Marker>,
}

impl Default for MapView {
    fn default() -> Self {
        Self::new(DEFAULT_ZOOM)
    }
}

impl MapView {
    pub fn new(zoom: u8) -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom,
            markers: Vec::new(),
        }
    }

    pub fn center_on_user(&mut self, user: Coordinate) {
        self.center = user;
        self.markers.push(Marker {
            kind: MarkerKind::User,
            position: user,
            title: String::from("Your Location"),
            info: None,
        });
    }

    pub fn add_spots(&mut self, spots: &[Spot]) {
        self.markers.extend(spots.iter().map(|spot| Marker {
            kind: MarkerKind::Spot,
            position: spot.location,
            title: spot.name.clone(),
            info: Some(spot.description.clone()),
        }));
    }
}

pub fn google_maps_link(location: Coordinate) -> String {
    format!("https://www.google.com/maps?q={},{}", location.lat, location.lng)
}

/// One table line. `distance` is already formatted, empty when unknown.
#[derive(Clone, Debug, PartialEq)]
pub struct TableRow {
    pub name: String,
    pub description: String,
    pub distance: String,
    pub link: String,
}

impl From<&Spot> for TableRow {
    fn from(spot: &Spot) -> Self {
        TableRow {
            name: spot.name.clone(),
            description: spot.description.clone(),
            distance: spot
                .distance
                .map(|d| format!("{:.2}", d))
                .unwrap_or_default(),
            link: google_maps_link(spot.location),
        }
    }
}

pub fn table_rows(spots: &[Spot]) -> Vec<TableRow> {
    spots.iter().map(TableRow::from).collect()
}

/// CSV with header `name,description,distance_mi,link`.
pub fn write_csv<W: Write>(rows: &[TableRow], writer: W) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(["name", "description", "distance_mi", "link"])?;
    for row in rows {
        wtr.write_record([&row.name, &row.description, &row.distance, &row.link])?;
    }
    wtr.flush().context("flushing CSV")?;
    Ok(())
}

/// Plain-text table, columns padded to their widest cell.
pub fn format_table(rows: &[TableRow]) -> String {
    let header = ["Name", "Description", "Distance (mi)", "Link"];
    let cells: Vec<[&str; 4]> = rows
        .iter()
        .map(|r| [r.name.as_str(), r.description.as_str(), r.distance.as_str(), r.link.as_str()])
        .collect();

    let mut widths = header.map(|h| h.chars().count());
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for row in std::iter::once(&header).chain(cells.iter()) {
        let line = row
            .iter()
            .zip(widths)
            .map(|(cell, w)| format!("{:<w$}", cell, w = w))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// The ranked spots in their input record shape, with `distance` attached when known.
pub fn write_spots_json<W: Write>(spots: &[Spot], mut writer: W) -> Result<()> {
    let records: Vec<RankedRecord> = spots.iter().map(RankedRecord::from).collect();
    serde_json::to_writer_pretty(&mut writer, &records).context("writing spots JSON")?;
    writer.flush().context("flushing spots JSON")?;
    Ok(())
}

pub fn write_map_json<W: Write>(view: &MapView, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, view).context("writing map view JSON")?;
    writer.flush().context("flushing map view JSON")?;
    Ok(())
}
