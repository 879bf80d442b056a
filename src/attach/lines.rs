//! Longest-overlap join of line features onto hexagons.

use std::path::PathBuf;

use anyhow::Result;
use rayon::prelude::*;
use tracing::{debug, info};

use super::{CheckpointStore, EdgeAggregate, LineFeature, Locate, PassSummary};
use crate::{geom::HexIndex, grid::Grid};

/// Batch size for the parallel locate step when no checkpoint is kept.
const BATCH: usize = 4096;

/// Knobs shared by the line passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOptions {
    /// Keep every Nth input row. 1 keeps all.
    pub downsample: usize,
    /// Features processed between checkpoint writes.
    pub checkpoint_interval: usize,
    pub checkpoint: Option<PathBuf>,
}

impl Default for JoinOptions {
    fn default() -> Self {
        Self { downsample: 6, checkpoint_interval: 50_000, checkpoint: None }
    }
}

/// Attribute each feature to the hexagon holding the longest part of it.
///
/// With a checkpoint configured, progress is saved every
/// `checkpoint_interval` features and after the last partial batch; a previous
/// checkpoint is loaded first and its processed features are skipped, so an
/// interrupted run resumes to the same result a clean run produces.
pub fn attach_lines(
    features: &[LineFeature],
    index: &HexIndex,
    options: &JoinOptions,
    summary: &mut PassSummary,
) -> Result<EdgeAggregate> {
    let store = options.checkpoint.as_ref().map(CheckpointStore::new);
    let mut state = store.as_ref().and_then(CheckpointStore::load).unwrap_or_default();

    summary.excluded_hexagons = index.rejected().len();

    let pending = features.iter()
        .filter(|f| {
            let done = state.processed.contains(&f.id);
            if done { summary.resumed += 1 }
            !done
        })
        .collect::<Vec<_>>();

    info!("joining {} line features ({} already done) against {} hexagons",
        pending.len(), summary.resumed, index.len());

    let batch = match (&store, options.checkpoint_interval) {
        (Some(_), interval) if interval > 0 => interval,
        _ => BATCH,
    };

    for chunk in pending.chunks(batch) {
        let located = chunk.par_iter()
            .map(|f| f.geometry.locate(index))
            .collect::<Vec<_>>();

        for (feature, idx) in chunk.iter().zip(located) {
            match idx {
                Some(idx) => {
                    state.hexagons.entry(index.id(idx).clone())
                        .or_default()
                        .record(&feature.id, &feature.category);
                    summary.assigned += 1;
                }
                None => summary.unmatched += 1,
            }
            state.processed.insert(feature.id.clone());
        }

        if let Some(store) = &store {
            store.save(&state)?;
            debug!("checkpoint: {} features processed", state.processed.len());
        }
    }

    Ok(state)
}

/// Write `roads` and `type_road` onto every hexagon. Hexagons with no
/// attributed edges get empty values.
pub fn apply_roads(grid: &mut Grid, state: &EdgeAggregate) {
    for (id, hexagon) in grid.iter_mut() {
        let tally = state.hexagons.get(id);
        hexagon.roads = Some(tally.map(|t| distinct(&t.roads)).unwrap_or_default());
        hexagon.type_road = Some(tally.map(|t| t.type_road.clone()).unwrap_or_default());
    }
}

/// Write `pedestrian_roads_count` and `dominant_coverage_type` onto every
/// hexagon. The dominant type is absent when no pedestrian edge landed;
/// equal counts resolve to the lexicographically smallest type.
pub fn apply_pedestrian(grid: &mut Grid, state: &EdgeAggregate) {
    for (id, hexagon) in grid.iter_mut() {
        let tally = state.hexagons.get(id);
        let count = tally.map_or(0, |t| distinct(&t.roads).len());

        hexagon.pedestrian_roads_count = Some(u32::try_from(count).unwrap_or(u32::MAX));
        hexagon.dominant_coverage_type = tally.and_then(|t| {
            t.type_road.iter()
                .fold(None::<(&String, u32)>, |best, (kind, &n)| match best {
                    Some((_, top)) if n <= top => best,
                    _ => Some((kind, n)),
                })
                .map(|(kind, _)| kind.clone())
        });
    }
}

fn distinct(ids: &[String]) -> Vec<String> {
    let mut ids = ids.to_vec();
    ids.sort();
    ids.dedup();
    ids
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use geo::LineString;

    use super::*;
    use crate::{
        attach::EdgeTally,
        grid::{HexId, Hexagon},
    };

    /// Two unit squares side by side: "1" spans x in [0, 1], "2" spans [1, 2].
    fn two_cells() -> Grid {
        let square = |x0: f64| Hexagon::new(
            [x0 + 0.5, 0.5],
            vec![[x0, 0.0], [x0 + 1.0, 0.0], [x0 + 1.0, 1.0], [x0, 1.0]],
        );
        [(HexId::new("1"), square(0.0)), (HexId::new("2"), square(1.0))].into_iter().collect()
    }

    fn edge(id: &str, category: &str, coords: Vec<(f64, f64)>) -> LineFeature {
        LineFeature { id: id.into(), category: category.into(), geometry: LineString::from(coords) }
    }

    fn features() -> Vec<LineFeature> {
        vec![
            edge("a", "3", vec![(0.1, 0.5), (0.9, 0.5)]),
            edge("b", "3", vec![(0.2, 0.2), (1.4, 0.2)]),
            edge("c", "5", vec![(0.8, 0.7), (1.9, 0.7)]),
            edge("d", "4", vec![(5.0, 5.0), (6.0, 6.0)]),
        ]
    }

    fn no_checkpoint() -> JoinOptions {
        JoinOptions { downsample: 1, ..JoinOptions::default() }
    }

    #[test]
    fn each_line_goes_to_its_longest_overlap() {
        let grid = two_cells();
        let index = HexIndex::new(&grid);
        let mut summary = PassSummary::default();
        let state = attach_lines(&features(), &index, &no_checkpoint(), &mut summary).unwrap();

        assert_eq!(state.hexagons[&HexId::new("1")].roads, vec!["a", "b"]);
        assert_eq!(state.hexagons[&HexId::new("2")].roads, vec!["c"]);
        assert_eq!(state.hexagons[&HexId::new("1")].type_road["3"], 2);
        assert_eq!(summary.assigned, 3);
        assert_eq!(summary.unmatched, 1);
        assert!(state.processed.contains("d"));
    }

    #[test]
    fn every_hexagon_gets_road_fields() {
        let mut grid = two_cells();
        grid.insert(HexId::new("3"), Hexagon::new([9.5, 9.5], vec![[9.0, 9.0], [10.0, 9.0], [10.0, 10.0]]));
        let index = HexIndex::new(&grid);
        let state = attach_lines(&features(), &index, &no_checkpoint(), &mut PassSummary::default()).unwrap();
        apply_roads(&mut grid, &state);

        let empty = grid.get(&HexId::new("3")).unwrap();
        assert_eq!(empty.roads, Some(vec![]));
        assert_eq!(empty.type_road, Some(BTreeMap::new()));
        assert_eq!(grid.get(&HexId::new("1")).unwrap().road_type_count("3"), 2);
    }

    /// Staggered edges across both cells, plus one outside the grid.
    fn many_features() -> Vec<LineFeature> {
        let mut features = (0..14)
            .map(|i| {
                let (x, y) = (0.13 * i as f64, 0.05 + 0.06 * i as f64);
                edge(&format!("e{i}"), ["3", "4", "5"][i % 3], vec![(x, y), (x + 0.45, y)])
            })
            .collect::<Vec<_>>();
        features.insert(5, edge("far", "9", vec![(7.0, 7.0), (8.0, 8.0)]));
        features
    }

    #[test]
    fn resumed_run_matches_a_clean_run() {
        let grid = two_cells();
        let index = HexIndex::new(&grid);
        let features = many_features();
        let clean = attach_lines(&features, &index, &no_checkpoint(), &mut PassSummary::default()).unwrap();

        for interval in [1, 3, 7] {
            for cut in 0..=features.len() {
                let dir = tempfile::tempdir().unwrap();
                let path = dir.path().join("ckpt.json");
                let options = JoinOptions {
                    downsample: 1,
                    checkpoint_interval: interval,
                    checkpoint: Some(path.clone()),
                };

                attach_lines(&features[..cut], &index, &options, &mut PassSummary::default()).unwrap();

                let mut summary = PassSummary::default();
                let resumed = attach_lines(&features, &index, &options, &mut summary).unwrap();
                assert_eq!(resumed, clean, "interval {interval}, cut {cut}");
                assert_eq!(summary.resumed, cut);
                assert_eq!(summary.assigned + summary.unmatched, features.len() - cut);
                assert_eq!(CheckpointStore::new(&path).load().as_ref(), Some(&clean));
            }
        }
    }

    #[test]
    fn finished_checkpoint_is_left_untouched() {
        let grid = two_cells();
        let index = HexIndex::new(&grid);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ckpt.json");
        let options = JoinOptions { downsample: 1, checkpoint_interval: 2, checkpoint: Some(path.clone()) };

        let clean = attach_lines(&features(), &index, &options, &mut PassSummary::default()).unwrap();

        // Saved checkpoints are pretty-printed; a compact file shows whether it was rewritten.
        let compact = serde_json::to_string(&clean).unwrap();
        std::fs::write(&path, &compact).unwrap();

        let again = attach_lines(&features(), &index, &options, &mut PassSummary::default()).unwrap();
        assert_eq!(again, clean);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), compact);
    }

    #[test]
    fn dominant_coverage_breaks_ties_lexicographically() {
        let mut grid = two_cells();
        let mut state = EdgeAggregate::default();
        let mut tally = EdgeTally::default();
        tally.record("p1", "Плитка");
        tally.record("p2", "Асфальт");
        tally.record("p3", "Грунт");
        tally.record("p4", "Грунт");
        state.hexagons.insert(HexId::new("1"), tally);

        let mut tied = EdgeTally::default();
        tied.record("p5", "b");
        tied.record("p6", "a");
        state.hexagons.insert(HexId::new("2"), tied);

        apply_pedestrian(&mut grid, &state);
        let first = grid.get(&HexId::new("1")).unwrap();
        assert_eq!(first.pedestrian_roads_count, Some(4));
        assert_eq!(first.dominant_coverage_type.as_deref(), Some("Грунт"));
        assert_eq!(grid.get(&HexId::new("2")).unwrap().dominant_coverage_type.as_deref(), Some("a"));
    }

    #[test]
    fn hexagons_without_pedestrian_edges_count_zero() {
        let mut grid = two_cells();
        apply_pedestrian(&mut grid, &EdgeAggregate::default());
        let hexagon = grid.get(&HexId::new("1")).unwrap();
        assert_eq!(hexagon.pedestrian_roads_count, Some(0));
        assert_eq!(hexagon.dominant_coverage_type, None);
    }
}
