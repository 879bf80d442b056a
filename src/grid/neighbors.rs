use geo::{BoundingRect, Point};
use rstar::{RTree, primitives::GeomWithData};
use tracing::info;

use crate::geom::{envelope, geodesic::distance_km};
use super::{Grid, HexId, Hexagon};

/// Centers closer than this multiple of the cell radius are adjacent.
/// The first ring sits at √3·r ≈ 1.73r and the second at 3r or more.
const ADJACENCY_FACTOR: f64 = 2.25;

/// Mean geodesic distance from the center to the peaks.
fn cell_radius_km(hexagon: &Hexagon) -> Option<f64> {
    if hexagon.peaks.is_empty() { return None }
    let center = hexagon.center_point();
    let total = hexagon.peaks.iter()
        .map(|&[x, y]| distance_km(center, Point::new(x, y)))
        .sum::<f64>();
    Some(total / hexagon.peaks.len() as f64)
}

/// Compute adjacency for every hexagon from its geometry.
///
/// Fills `neighbours` on every hexagon (sorted by id, never containing the
/// hexagon itself). Hexagons whose polygon is malformed get an empty list.
/// Returns the number of adjacent pairs found.
pub fn resolve_neighbors(grid: &mut Grid) -> usize {
    let ids = grid.ids().cloned().collect::<Vec<HexId>>();
    let centers = RTree::bulk_load(
        grid.iter().enumerate()
            .map(|(i, (_, hexagon))| GeomWithData::new(hexagon.center, i))
            .collect()
    );

    let mut adjacency = Vec::with_capacity(ids.len());
    for (i, (_, hexagon)) in grid.iter().enumerate() {
        let rect = hexagon.polygon().and_then(|polygon| polygon.bounding_rect());
        let (Some(rect), Some(radius)) = (rect, cell_radius_km(hexagon)) else {
            adjacency.push(Vec::new());
            continue;
        };

        // Neighbouring centers lie within one cell width/height of the cell's own box.
        let margin = rect.width().max(rect.height());
        let center = hexagon.center_point();
        let mut neighbours = centers.locate_in_envelope(&envelope(&rect, margin))
            .filter(|entry| entry.data != i)
            .filter(|entry| {
                let [x, y] = *entry.geom();
                distance_km(center, Point::new(x, y)) < ADJACENCY_FACTOR * radius
            })
            .map(|entry| entry.data)
            .collect::<Vec<_>>();
        neighbours.sort_unstable();
        adjacency.push(neighbours);
    }

    let mut pairs = 0;
    for ((_, hexagon), neighbours) in grid.iter_mut().zip(adjacency) {
        pairs += neighbours.len();
        hexagon.neighbours = Some(neighbours.into_iter().map(|j| ids[j].clone()).collect());
    }

    info!("resolved {} adjacent pairs across {} hexagons", pairs / 2, ids.len());
    pairs / 2
}
