//! Containment join of transit stops onto hexagons.

use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;

use super::{Locate, PassSummary, StopRecord};
use crate::{geom::HexIndex, grid::{Grid, HexId}};

/// Distinct stops and routes seen inside one hexagon.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopTally {
    pub stops: BTreeSet<String>,
    pub routes: BTreeSet<String>,
}

/// Assign each stop record to the hexagon strictly containing it.
/// Points outside every hexagon, or exactly on a boundary, are unmatched.
pub fn attach_stops(
    records: &[StopRecord],
    index: &HexIndex,
    summary: &mut PassSummary,
) -> BTreeMap<HexId, StopTally> {
    summary.excluded_hexagons = index.rejected().len();

    let located = records.par_iter()
        .map(|r| r.location.locate(index))
        .collect::<Vec<_>>();

    let mut tallies = BTreeMap::<HexId, StopTally>::new();
    for (record, idx) in records.iter().zip(located) {
        let Some(idx) = idx else {
            summary.unmatched += 1;
            continue;
        };
        let tally = tallies.entry(index.id(idx).clone()).or_default();
        tally.stops.insert(record.stop_id.clone());
        tally.routes.insert(record.route_id.clone());
        summary.assigned += 1;
    }

    tallies
}

/// Write `stop_count` and `unique_routes_count` onto every hexagon,
/// zero where no stop landed.
pub fn apply_stops(grid: &mut Grid, tallies: &BTreeMap<HexId, StopTally>) {
    let count = |n: usize| u32::try_from(n).unwrap_or(u32::MAX);
    for (id, hexagon) in grid.iter_mut() {
        let tally = tallies.get(id);
        hexagon.stop_count = Some(count(tally.map_or(0, |t| t.stops.len())));
        hexagon.unique_routes_count = Some(count(tally.map_or(0, |t| t.routes.len())));
    }
}

#[cfg(test)]
mod tests {
    use geo::Point;

    use super::*;
    use crate::grid::Hexagon;

    fn grid() -> Grid {
        let square = |x0: f64| Hexagon::new(
            [x0 + 0.5, 0.5],
            vec![[x0, 0.0], [x0 + 1.0, 0.0], [x0 + 1.0, 1.0], [x0, 1.0]],
        );
        [(HexId::new("1"), square(0.0)), (HexId::new("2"), square(1.0))].into_iter().collect()
    }

    fn stop(stop_id: &str, route_id: &str, x: f64, y: f64) -> StopRecord {
        StopRecord { stop_id: stop_id.into(), route_id: route_id.into(), location: Point::new(x, y) }
    }

    #[test]
    fn counts_distinct_stops_and_routes() {
        let mut grid = grid();
        let index = HexIndex::new(&grid);
        let records = vec![
            stop("s1", "r1", 0.2, 0.2),
            stop("s1", "r2", 0.2, 0.2),
            stop("s2", "r1", 0.7, 0.4),
            stop("s3", "r9", 4.0, 4.0),
        ];

        let mut summary = PassSummary::default();
        let tallies = attach_stops(&records, &index, &mut summary);
        apply_stops(&mut grid, &tallies);

        let first = grid.get(&HexId::new("1")).unwrap();
        assert_eq!(first.stop_count, Some(2));
        assert_eq!(first.unique_routes_count, Some(2));

        let second = grid.get(&HexId::new("2")).unwrap();
        assert_eq!(second.stop_count, Some(0));
        assert_eq!(second.unique_routes_count, Some(0));

        assert_eq!(summary.assigned, 3);
        assert_eq!(summary.unmatched, 1);
    }

    #[test]
    fn boundary_points_are_unmatched() {
        let grid = grid();
        let index = HexIndex::new(&grid);
        let mut summary = PassSummary::default();
        let tallies = attach_stops(&[stop("edge", "r", 1.0, 0.5)], &index, &mut summary);
        assert!(tallies.is_empty());
        assert_eq!(summary.unmatched, 1);
    }
}
