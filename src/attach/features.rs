//! Loading feature tables into typed records.

use std::path::Path;

use ahash::AHashSet;
use anyhow::Result;
use geo::{LineString, Point};
use polars::frame::DataFrame;

use super::PassSummary;
use crate::io::{csv::{CsvOptions, read_encoded_csv, string_columns}, wkt::parse_linestring};

/// Column layout of a line-feature table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineColumns {
    pub id: &'static str,
    pub geometry: &'static str,
    pub category: &'static str,
}

impl LineColumns {
    pub const ROADS: Self = Self { id: "edge_id", geometry: "geometry", category: "road_type_cd" };
    pub const PEDESTRIAN: Self = Self { id: "edge_id", geometry: "geometry", category: "coverage_type_nm" };
}

/// A road or pedestrian edge, deduplicated by `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct LineFeature {
    pub id: String,
    /// Road type code or coverage type name.
    pub category: String,
    pub geometry: LineString<f64>,
}

/// One (stop, route) pair from a transit schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct StopRecord {
    pub stop_id: String,
    pub route_id: String,
    pub location: Point<f64>,
}

/// Every-Nth downsampling starting from row 0. `every` of 0 or 1 keeps all rows.
#[inline]
pub(crate) fn keep_row(row: usize, every: usize) -> bool {
    every <= 1 || row % every == 0
}

fn field(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Read a line-feature table from disk. See [`line_features`].
pub fn read_line_features(
    path: &Path,
    csv: &CsvOptions,
    columns: LineColumns,
    downsample: usize,
    summary: &mut PassSummary,
) -> Result<Vec<LineFeature>> {
    let df = read_encoded_csv(path, csv)?;
    line_features(&df, columns, downsample, summary)
}

/// Convert table rows into line features.
/// Rows are downsampled first; rows with empty fields or unparseable
/// geometry are dropped; the first valid row wins for a repeated id.
pub fn line_features(
    df: &DataFrame,
    columns: LineColumns,
    downsample: usize,
    summary: &mut PassSummary,
) -> Result<Vec<LineFeature>> {
    let cols = string_columns(df, &[columns.id, columns.geometry, columns.category])?;
    let (ids, geometries, categories) = (cols[0], cols[1], cols[2]);

    summary.rows_read += df.height();

    let mut seen = AHashSet::new();
    let mut features = Vec::new();

    for row in 0..df.height() {
        if !keep_row(row, downsample) {
            summary.downsampled += 1;
            continue;
        }

        let (Some(id), Some(wkt), Some(category)) = (
            field(ids.get(row)),
            field(geometries.get(row)),
            field(categories.get(row)),
        ) else {
            summary.missing_fields += 1;
            continue;
        };

        let Some(geometry) = parse_linestring(wkt) else {
            summary.malformed_geometry += 1;
            continue;
        };

        if !seen.insert(id.to_string()) {
            summary.duplicates += 1;
            continue;
        }

        features.push(LineFeature { id: id.to_string(), category: category.to_string(), geometry });
    }

    Ok(features)
}

/// Read a transit schedule table from disk. See [`stop_records`].
pub fn read_stop_records(path: &Path, csv: &CsvOptions, summary: &mut PassSummary) -> Result<Vec<StopRecord>> {
    let df = read_encoded_csv(path, csv)?;
    stop_records(&df, summary)
}

/// Convert schedule rows into stop records, one per distinct
/// `(stop_id, route_id)` pair. Non-numeric coordinates drop the row.
pub fn stop_records(df: &DataFrame, summary: &mut PassSummary) -> Result<Vec<StopRecord>> {
    let cols = string_columns(df, &["route_id", "stop_id", "stop_latitude", "stop_longitude"])?;
    let (routes, stops, lats, lons) = (cols[0], cols[1], cols[2], cols[3]);

    summary.rows_read += df.height();

    let mut seen = AHashSet::new();
    let mut records = Vec::new();

    for row in 0..df.height() {
        let (Some(route_id), Some(stop_id)) = (field(routes.get(row)), field(stops.get(row))) else {
            summary.missing_fields += 1;
            continue;
        };

        let coordinate = |v: Option<&str>| field(v)?.parse::<f64>().ok().filter(|c| c.is_finite());
        let (Some(lat), Some(lon)) = (coordinate(lats.get(row)), coordinate(lons.get(row))) else {
            summary.invalid_coordinates += 1;
            continue;
        };

        if !seen.insert((stop_id.to_string(), route_id.to_string())) {
            summary.duplicates += 1;
            continue;
        }

        records.push(StopRecord {
            stop_id: stop_id.to_string(),
            route_id: route_id.to_string(),
            location: Point::new(lon, lat),
        });
    }

    Ok(records)
}
