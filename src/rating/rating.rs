use std::collections::BTreeMap;

use rayon::prelude::*;

use super::{FeatureVector, NEIGHBOR_EFFECT, Persona, RatingError};
use crate::grid::{Grid, HexId};

/// Read access to rated hexagons.
pub trait HexagonSource {
    /// Feature values of `id`, or `None` if it does not exist.
    fn feature_vector(&self, id: &HexId) -> Option<FeatureVector>;

    /// Adjacent hexagon ids of `id`, or `None` if it does not exist.
    fn neighbors(&self, id: &HexId) -> Option<Vec<HexId>>;
}

impl HexagonSource for Grid {
    fn feature_vector(&self, id: &HexId) -> Option<FeatureVector> {
        self.get(id).map(FeatureVector::from_hexagon)
    }

    fn neighbors(&self, id: &HexId) -> Option<Vec<HexId>> {
        self.get(id).map(|hexagon| hexagon.neighbours.clone().unwrap_or_default())
    }
}

/// Score of a hexagon from its own features alone.
#[inline]
pub fn own_score(values: &FeatureVector, weights: &FeatureVector) -> f64 {
    values.dot(weights)
}

/// Contribution of one neighbouring hexagon, damped per dimension.
#[inline]
pub fn neighbor_score(values: &FeatureVector, weights: &FeatureVector) -> f64 {
    values.zip_with(&NEIGHBOR_EFFECT, |v, e| v * e).dot(weights)
}

/// Rating of `id` for `persona`: its own score plus the damped scores of its
/// neighbours. Fails if the hexagon or any listed neighbour is unknown.
pub fn get_rating<S: HexagonSource + ?Sized>(source: &S, id: &HexId, persona: &Persona) -> Result<f64, RatingError> {
    let values = source.feature_vector(id).ok_or_else(|| RatingError::NotFound(id.clone()))?;
    let neighbors = source.neighbors(id).ok_or_else(|| RatingError::NotFound(id.clone()))?;
    let weights = persona.weights();

    neighbors.iter().try_fold(own_score(&values, &weights), |total, neighbor| {
        let values = source.feature_vector(neighbor).ok_or_else(|| RatingError::NotFound(neighbor.clone()))?;
        Ok(total + neighbor_score(&values, &weights))
    })
}

/// Rate every hexagon of `grid` in parallel.
pub fn rate_all(grid: &Grid, persona: &Persona) -> Result<BTreeMap<HexId, f64>, RatingError> {
    let ids = grid.ids().collect::<Vec<_>>();
    ids.into_par_iter()
        .map(|id| -> Result<_, RatingError> { Ok((id.clone(), get_rating(grid, id, persona)?)) })
        .collect()
}
