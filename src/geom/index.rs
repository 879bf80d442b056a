use geo::{BoundingRect, BooleanOps, Contains, Euclidean, Intersects, Length, LineString, MultiLineString, Point, Polygon, Validation};
use rstar::{AABB, RTree};
use smallvec::SmallVec;
use tracing::warn;

use crate::geom::bbox::{envelope, BoundingBox};
use crate::grid::{Grid, HexId};

/// Spatial index over the hexagons of a grid.
///
/// Entries are stored in ascending `HexId` order, and every candidate list is
/// returned in that order, so tie-breaking between equally good hexagons
/// always favours the smallest id.
#[derive(Debug)]
pub struct HexIndex {
    ids: Vec<HexId>,
    polygons: Vec<Polygon<f64>>,
    rtree: RTree<BoundingBox>,
    rejected: Vec<HexId>,
}

impl HexIndex {
    /// Index every hexagon of `grid` whose peaks form a usable polygon.
    /// Malformed hexagons are left out of the join set and reported.
    pub fn new(grid: &Grid) -> Self {
        let mut ids = Vec::with_capacity(grid.len());
        let mut polygons = Vec::with_capacity(grid.len());
        let mut rejected = Vec::new();

        for (id, hexagon) in grid.iter() {
            match hexagon.polygon().filter(|polygon| polygon.is_valid() && polygon.bounding_rect().is_some()) {
                Some(polygon) => {
                    ids.push(id.clone());
                    polygons.push(polygon);
                }
                None => rejected.push(id.clone()),
            }
        }

        if !rejected.is_empty() {
            warn!("{} hexagons have malformed polygons and are excluded from joins", rejected.len());
        }

        let rtree = RTree::bulk_load(
            polygons.iter().enumerate()
                .filter_map(|(i, polygon)| Some(BoundingBox::new(i, polygon.bounding_rect()?)))
                .collect()
        );

        Self { ids, polygons, rtree, rejected }
    }

    #[inline] pub fn len(&self) -> usize { self.ids.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.ids.is_empty() }

    #[inline] pub fn id(&self, idx: usize) -> &HexId { &self.ids[idx] }

    #[inline] pub fn polygon(&self, idx: usize) -> &Polygon<f64> { &self.polygons[idx] }

    /// Hexagons left out because their polygon was malformed.
    #[inline] pub fn rejected(&self) -> &[HexId] { &self.rejected }

    /// Indices of hexagons whose bounding box meets `env`, ascending.
    pub(crate) fn candidates(&self, env: &AABB<[f64; 2]>) -> SmallVec<[usize; 8]> {
        let mut found = self.rtree.locate_in_envelope_intersecting(env)
            .map(|bb| bb.idx())
            .collect::<SmallVec<[usize; 8]>>();
        found.sort_unstable();
        found
    }

    /// The hexagon strictly containing `point`, if any.
    /// Points on a hexagon boundary are not contained by it.
    pub fn containing(&self, point: &Point<f64>) -> Option<usize> {
        let env = AABB::from_point([point.x(), point.y()]);
        self.candidates(&env).into_iter()
            .find(|&idx| self.polygons[idx].contains(point))
    }

    /// Hexagons intersected by `line`, each with the length of the part of
    /// the line inside it, ascending by index.
    pub fn intersections(&self, line: &LineString<f64>) -> Vec<(usize, f64)> {
        let Some(rect) = line.bounding_rect() else { return Vec::new() };
        let lines = MultiLineString::new(vec![line.clone()]);

        self.candidates(&envelope(&rect, 0.0)).into_iter()
            .filter(|&idx| self.polygons[idx].intersects(line))
            .map(|idx| (idx, Euclidean.length(&self.polygons[idx].clip(&lines, false))))
            .collect()
    }

    /// The hexagon with the strictly greatest intersection length with
    /// `line`. Among equal lengths the first candidate (smallest id) wins.
    /// A candidate that only touches the line still qualifies with length 0.
    pub fn best_intersection(&self, line: &LineString<f64>) -> Option<(usize, f64)> {
        longest_first(self.intersections(line))
    }
}

/// Pick the entry with the strictly greatest length; earlier entries win ties.
pub(crate) fn longest_first(lengths: impl IntoIterator<Item = (usize, f64)>) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, length) in lengths {
        if best.is_none_or(|(_, best_length)| length > best_length) {
            best = Some((idx, length));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use geo::line_string;

    use super::*;
    use crate::grid::Hexagon;

    /// Two unit squares side by side, standing in for adjacent cells:
    /// "1" covers x in [0, 1], "2" covers x in [1, 2].
    fn two_cells() -> Grid {
        let mut grid = Grid::default();
        grid.insert(HexId::new("1"), Hexagon::new([0.5, 0.5], vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]));
        grid.insert(HexId::new("2"), Hexagon::new([1.5, 0.5], vec![[1.0, 0.0], [2.0, 0.0], [2.0, 1.0], [1.0, 1.0]]));
        grid
    }

    #[test]
    fn containment_is_exclusive() {
        let index = HexIndex::new(&two_cells());
        assert_eq!(index.containing(&Point::new(0.5, 0.5)).map(|i| index.id(i).clone()), Some(HexId::new("1")));
        assert_eq!(index.containing(&Point::new(1.5, 0.5)).map(|i| index.id(i).clone()), Some(HexId::new("2")));
        assert_eq!(index.containing(&Point::new(5.0, 5.0)), None);
    }

    #[test]
    fn longest_overlap_wins() {
        let index = HexIndex::new(&two_cells());
        let line = line_string![(x: 0.8, y: 0.5), (x: 1.9, y: 0.5)];

        let lengths = index.intersections(&line);
        assert_eq!(lengths.len(), 2);
        assert!((lengths[0].1 - 0.2).abs() < 1e-6);
        assert!((lengths[1].1 - 0.9).abs() < 1e-6);

        let (best, length) = index.best_intersection(&line).unwrap();
        assert_eq!(index.id(best), &HexId::new("2"));
        assert!(lengths.iter().all(|&(_, other)| length >= other));
    }

    #[test]
    fn ties_go_to_the_first_candidate() {
        assert_eq!(longest_first([(0, 0.5), (1, 0.5)]), Some((0, 0.5)));
        assert_eq!(longest_first([(0, 0.2), (1, 0.5), (2, 0.5)]), Some((1, 0.5)));
        assert_eq!(longest_first(Vec::<(usize, f64)>::new()), None);
    }

    #[test]
    fn touching_candidate_still_qualifies() {
        assert_eq!(longest_first([(4, 0.0)]), Some((4, 0.0)));
    }

    #[test]
    fn disjoint_line_matches_nothing() {
        let index = HexIndex::new(&two_cells());
        let line = line_string![(x: 3.0, y: 3.0), (x: 4.0, y: 4.0)];
        assert!(index.best_intersection(&line).is_none());
    }

    #[test]
    fn malformed_hexagons_are_rejected() {
        let mut grid = two_cells();
        grid.insert(HexId::new("3"), Hexagon::new([9.0, 9.0], vec![[9.0, 9.0]]));
        let index = HexIndex::new(&grid);
        assert_eq!(index.len(), 2);
        assert_eq!(index.rejected(), &[HexId::new("3")]);
    }

    #[test]
    fn self_intersecting_hexagons_are_rejected() {
        let mut grid = Grid::default();
        grid.insert(HexId::new("1"), Hexagon::new([0.5, 0.5], vec![[0.0, 0.0], [1.0, 1.0], [1.0, 0.0], [0.0, 1.0]]));
        let index = HexIndex::new(&grid);
        assert!(index.is_empty());
        assert_eq!(index.rejected(), &[HexId::new("1")]);

        let line = line_string![(x: 0.1, y: 0.5), (x: 0.9, y: 0.5)];
        assert!(index.best_intersection(&line).is_none());
    }
}
