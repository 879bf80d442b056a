//! Persona-weighted hexagon ratings.
//!
//! Pure computation over already-enriched hexagons: a hexagon's own features
//! are weighted by the persona's blended weights, and each neighbour adds its
//! features damped by [`NEIGHBOR_EFFECT`].

mod error;
mod features;
mod persona;
mod rating;

pub use error::RatingError;
pub use features::{FeatureVector, NEIGHBOR_EFFECT};
pub use persona::{Mobility, Persona, blend};
pub use rating::{HexagonSource, get_rating, neighbor_score, own_score, rate_all};
