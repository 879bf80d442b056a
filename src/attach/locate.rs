use geo::{LineString, Point};

use crate::geom::HexIndex;

/// Join predicate plus tie-break: the single hexagon a feature geometry
/// belongs to, if any.
pub trait Locate {
    fn locate(&self, index: &HexIndex) -> Option<usize>;
}

/// Points belong to the hexagon that strictly contains them.
impl Locate for Point<f64> {
    fn locate(&self, index: &HexIndex) -> Option<usize> {
        index.containing(self)
    }
}

/// Lines belong to the intersected hexagon holding the longest part of them.
impl Locate for LineString<f64> {
    fn locate(&self, index: &HexIndex) -> Option<usize> {
        index.best_intersection(self).map(|(idx, _)| idx)
    }
}
