use anyhow::{Result, bail, ensure};
use geo::Point;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::geom::geodesic::destination;
use super::{Boundary, Grid, HexId, Hexagon};

const NORTH: f64 = 0.0;
const EAST: f64 = 90.0;

/// Extent and cell size of a generated grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Center-to-vertex geodesic distance, km.
    pub radius_km: f64,
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { radius_km: 1.2, lat_min: 53.4, lat_max: 59.0, lon_min: 33.5, lon_max: 40.0 }
    }
}

impl GridConfig {
    fn validate(&self) -> Result<()> {
        ensure!(self.radius_km.is_finite() && self.radius_km > 0.0, "radius must be positive, got {}", self.radius_km);
        ensure!(self.lat_min < self.lat_max, "lat_min ({}) must be below lat_max ({})", self.lat_min, self.lat_max);
        ensure!(self.lon_min < self.lon_max, "lon_min ({}) must be below lon_max ({})", self.lon_min, self.lon_max);
        ensure!(self.lat_min >= -90.0 && self.lat_max <= 90.0, "latitudes must lie in [-90, 90]");
        Ok(())
    }

    /// Horizontal distance between neighbouring centers in a row, km.
    #[inline] pub fn dx(&self) -> f64 { self.radius_km * 3f64.sqrt() }

    /// Vertical distance between rows, km.
    #[inline] pub fn dy(&self) -> f64 { self.radius_km * 1.5 }
}

/// Vertices of a pointy-top hexagon around `center`, each `radius_km` away.
///
/// Corner `i` sits at `60·i + 30` degrees counterclockwise from east, so the
/// ring starts at the upper-right corner and runs counterclockwise. Corners
/// are projected along geodesics rather than on a plane.
pub fn hexagon_peaks(center: Point<f64>, radius_km: f64) -> Vec<[f64; 2]> {
    (0..6)
        .map(|i| {
            let angle = 60.0 * i as f64 + 30.0;
            let bearing = (90.0 - angle).rem_euclid(360.0);
            let corner = destination(center, bearing, radius_km);
            [corner.x(), corner.y()]
        })
        .collect()
}

/// Lay out offset rows of hexagon centers over the configured extent and
/// keep those inside `boundary`. Ids are assigned sequentially from 1 in
/// row-major order, so identical inputs always produce identical ids.
pub fn generate_grid(config: &GridConfig, boundary: &Boundary) -> Result<Grid> {
    config.validate()?;

    let (dx, dy) = (config.dx(), config.dy());
    let mut grid = Grid::default();
    let mut next_id = 1usize;
    let mut candidates = 0usize;

    let mut lat = config.lat_min;
    let mut row = 0usize;

    while lat <= config.lat_max {
        let offset = if row % 2 == 1 { dx / 2.0 } else { 0.0 };
        let mut center = destination(Point::new(config.lon_min, lat), EAST, offset);

        while center.x() <= config.lon_max {
            candidates += 1;
            if boundary.contains(&center) {
                let peaks = hexagon_peaks(center, config.radius_km);
                grid.insert(HexId::from_index(next_id), Hexagon::new([center.x(), center.y()], peaks));
                next_id += 1;
            }

            let next = destination(center, EAST, dx);
            if next.x() <= center.x() { break } // wrapped past the antimeridian
            center = next;
        }

        let next_lat = destination(Point::new(config.lon_min, lat), NORTH, dy).y();
        if next_lat <= lat {
            bail!("[grid::generate] Row latitude stopped increasing at {lat} (row {row})");
        }
        debug!("row {row} at lat {lat:.5}: {} hexagons so far", grid.len());
        lat = next_lat;
        row += 1;
    }

    info!("generated {} hexagons from {candidates} candidate centers in {row} rows", grid.len());
    Ok(grid)
}
