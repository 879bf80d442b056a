use std::{fs, path::Path};

use anyhow::{Context, Result, bail, ensure};
use geo::{Area, BoundingRect, Contains, Coord, LineString, Point, Polygon, Rect, Validation};

use crate::io::wkt::parse_polygon;

/// Moscow metro-area clipping ring, `[lon, lat]`.
const MOSCOW_RING: &[[f64; 2]] = &[
    [37.333727, 55.933541], [37.344452, 55.923801], [37.356644, 55.929873],
    [37.376506, 55.92163], [37.36116, 55.914088], [37.369455, 55.907788],
    [37.365739, 55.906276], [37.370094, 55.903594], [37.361961, 55.901366],
    [37.365497, 55.896786], [37.365557, 55.894994], [37.374117, 55.89518],
    [37.377415, 55.892687], [37.372992, 55.891327], [37.372905, 55.887602],
    [37.372508, 55.881907], [37.382085, 55.877884], [37.403668, 55.876062],
    [37.410827, 55.870757], [37.394467, 55.854197], [37.387028, 55.855902],
    [37.377747, 55.868282], [37.347619, 55.864480], [37.333023, 55.845503],
    [37.348873, 55.843874], [37.340475, 55.839055], [37.344782, 55.826164],
    [37.352113, 55.821034], [37.354054, 55.826327], [37.356898, 55.826556],
    [37.362183, 55.822071], [37.380655, 55.830585], [37.393968, 55.829714],
    [37.387990, 55.809853], [37.373696, 55.812689], [37.372044, 55.803158],
    [37.381356, 55.809481], [37.386693, 55.806732], [37.367632, 55.791047],
    [37.349858, 55.796860], [37.357800, 55.803289], [37.348965, 55.806694],
    [37.334083, 55.799432], [37.307738, 55.797445], [37.324837, 55.796489],
    [37.314130, 55.793697], [37.309938, 55.791994], [37.315129, 55.788335],
    [37.310487, 55.784394], [37.312197, 55.779666], [37.312861, 55.786360],
    [37.328211, 55.781109], [37.322718, 55.776866], [37.310775, 55.775429],
    [37.308728, 55.770241], [37.332267, 55.771919], [37.348521, 55.770036],
    [37.370575, 55.788185], [37.368915, 55.772951], [37.366612, 55.770135],
    [37.365868, 55.764366], [37.374798, 55.731911], [37.382436, 55.712960],
    [37.392623, 55.705848], [37.388982, 55.700820], [37.374846, 55.711452],
    [37.326020, 55.681862], [37.354484, 55.676509], [37.402461, 55.698615],
    [37.417653, 55.680817], [37.340007, 55.662856], [37.239333, 55.645805],
    [37.186052, 55.619124], [37.116490, 55.605525], [37.074896, 55.584765],
    [37.099997, 55.445767], [36.815578, 55.509474], [37.020793, 55.137332],
    [37.057235, 55.109822], [37.141774, 55.155766], [37.269423, 55.257563],
    [37.316800, 55.220658], [37.406081, 55.251084],
    [37.468576, 55.406710], [37.386484, 55.438441], [37.445240, 55.482092],
    [37.538306, 55.437531], [37.544755, 55.472566], [37.611030, 55.491414],
    [37.578603, 55.521781], [37.606772, 55.575117], [37.670430, 55.571554],
    [37.692785, 55.576587], [37.844412, 55.657521], [37.833863, 55.684417],
    [37.856814, 55.675787], [37.900333, 55.706582], [37.915378, 55.697125],
    [37.917356, 55.686472], [37.920532, 55.676229], [37.963945, 55.674003],
    [37.949848, 55.711258], [37.966683, 55.710508], [37.960022, 55.714460],
    [37.967221, 55.716361], [37.948105, 55.720306], [37.942547, 55.722374],
    [37.877111, 55.720191], [37.890264, 55.741970], [37.882526, 55.749229],
    [37.844338, 55.747033], [37.836710, 55.825015], [37.819872, 55.835909],
    [37.700935, 55.894961], [37.556665, 55.909807], [37.575554, 55.958570],
    [37.519040, 55.941856], [37.536975, 55.907551], [37.430569, 55.877840],
    [37.409643, 55.881071], [37.389777, 55.912666], [37.398475, 55.916808],
    [37.396885, 55.926150], [37.422451, 55.951451], [37.335067, 55.953807],
    [37.333727, 55.933541],
];

/// Clipping region for grid generation. Hexagons are kept only when their
/// center lies strictly inside the polygon.
#[derive(Debug, Clone)]
pub struct Boundary {
    polygon: Polygon<f64>,
    bounds: Rect<f64>,
}

impl Boundary {
    /// Build a boundary from a polygon, failing fast on degenerate input.
    pub fn new(polygon: Polygon<f64>) -> Result<Self> {
        let exterior = polygon.exterior();
        ensure!(
            exterior.0.iter().all(|c| c.x.is_finite() && c.y.is_finite()),
            "[grid::boundary] Boundary has non-finite coordinates"
        );
        // A closed ring needs at least three distinct vertices plus the closing one.
        ensure!(exterior.0.len() >= 4, "[grid::boundary] Boundary needs at least three vertices");
        ensure!(polygon.unsigned_area() > 0.0, "[grid::boundary] Boundary encloses no area");
        ensure!(polygon.is_valid(), "[grid::boundary] Boundary ring is self-intersecting");

        let bounds = polygon.bounding_rect()
            .context("[grid::boundary] Boundary has no bounding rectangle")?;
        Ok(Self { polygon, bounds })
    }

    /// Build a boundary from a `[lon, lat]` ring (closed or open).
    pub fn from_ring(ring: &[[f64; 2]]) -> Result<Self> {
        let coords = ring.iter().map(|&[x, y]| Coord { x, y }).collect::<Vec<_>>();
        Self::new(Polygon::new(LineString::from(coords), vec![]))
    }

    /// The built-in Moscow metro-area boundary.
    pub fn moscow() -> Result<Self> { Self::from_ring(MOSCOW_RING) }

    /// Read a boundary file: either a JSON `[[lon, lat], ...]` ring or a WKT `POLYGON`.
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("[grid::boundary] Failed to read boundary file: {}", path.display()))?;

        if text.trim_start().starts_with('[') {
            let ring: Vec<[f64; 2]> = serde_json::from_str(&text)
                .with_context(|| format!("[grid::boundary] Malformed boundary ring in {}", path.display()))?;
            return Self::from_ring(&ring);
        }

        match parse_polygon(&text) {
            Some(polygon) => Self::new(polygon),
            None => bail!("[grid::boundary] {} is neither a JSON ring nor a WKT POLYGON", path.display()),
        }
    }

    #[inline] pub fn polygon(&self) -> &Polygon<f64> { &self.polygon }

    /// Strict polygon containment; points on the boundary line are outside.
    pub fn contains(&self, point: &Point<f64>) -> bool {
        let (min, max) = (self.bounds.min(), self.bounds.max());
        if point.x() < min.x || point.x() > max.x || point.y() < min.y || point.y() > max.y {
            return false;
        }
        self.polygon.contains(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moscow_boundary_contains_the_kremlin() {
        let boundary = Boundary::moscow().unwrap();
        assert!(boundary.contains(&Point::new(37.6176, 55.7520)));
        assert!(!boundary.contains(&Point::new(30.3, 59.9)));
    }

    #[test]
    fn degenerate_rings_fail_fast() {
        assert!(Boundary::from_ring(&[[0.0, 0.0], [1.0, 1.0]]).is_err());
        assert!(Boundary::from_ring(&[[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]]).is_err());
        assert!(Boundary::from_ring(&[[0.0, 0.0], [1.0, f64::NAN], [1.0, 1.0]]).is_err());
        // Bow-tie with non-zero area.
        assert!(Boundary::from_ring(&[[0.0, 0.0], [2.0, 2.0], [2.0, 0.0], [0.0, 3.0]]).is_err());
    }

    #[test]
    fn reads_json_ring_and_wkt() {
        let dir = tempfile::tempdir().unwrap();

        let json = dir.path().join("ring.json");
        fs::write(&json, "[[0, 0], [2, 0], [2, 2], [0, 2]]").unwrap();
        assert!(Boundary::read(&json).unwrap().contains(&Point::new(1.0, 1.0)));

        let wkt = dir.path().join("ring.wkt");
        fs::write(&wkt, "POLYGON ((0 0, 2 0, 2 2, 0 2, 0 0))").unwrap();
        assert!(Boundary::read(&wkt).unwrap().contains(&Point::new(1.0, 1.0)));

        let junk = dir.path().join("junk.txt");
        fs::write(&junk, "not a polygon").unwrap();
        assert!(Boundary::read(&junk).is_err());
    }
}
