use std::collections::BTreeMap;

use geo::{Coord, LineString, Point, Polygon};
use serde::{Deserialize, Serialize};

use super::HexId;

/// One grid cell plus every attribute the enrichment passes attach to it.
/// Fields owned by collaborators outside this crate (speeds, POI counts) are
/// read when present; anything unrecognised is carried through in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hexagon {
    /// `[lon, lat]`
    pub center: [f64; 2],

    /// Six `[lon, lat]` vertices, counterclockwise.
    pub peaks: Vec<[f64; 2]>,

    // Roads pass
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roads: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_road: Option<BTreeMap<String, u32>>,

    // Transit pass
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_routes_count: Option<u32>,

    // Pedestrian pass
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pedestrian_roads_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dominant_coverage_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighbours: Option<Vec<HexId>>,

    // Collaborator-provided attributes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_limit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count_parks: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count_schools: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count_hospitals: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count_shops: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count_factories: Option<u32>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Hexagon {
    pub fn new(center: [f64; 2], peaks: Vec<[f64; 2]>) -> Self {
        Self { center, peaks, ..Default::default() }
    }

    #[inline] pub fn center_point(&self) -> Point<f64> { Point::new(self.center[0], self.center[1]) }

    /// Build the cell polygon, or `None` if the peaks cannot form one
    /// (fewer than three vertices, or non-finite coordinates).
    pub fn polygon(&self) -> Option<Polygon<f64>> {
        if self.peaks.len() < 3 { return None }
        if self.peaks.iter().flatten().any(|v| !v.is_finite()) { return None }

        let ring = self.peaks.iter()
            .map(|&[x, y]| Coord { x, y })
            .collect::<Vec<_>>();
        Some(Polygon::new(LineString::from(ring), vec![]))
    }

    /// Count of road segments of the given type code, zero when unknown.
    pub fn road_type_count(&self, code: &str) -> u32 {
        self.type_road.as_ref()
            .and_then(|types| types.get(code))
            .copied()
            .unwrap_or(0)
    }
}
