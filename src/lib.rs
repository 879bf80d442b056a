#![doc = "Hexagonal grid generation, feature attachment, and persona-weighted ratings"]
mod common;
mod geom;
mod io;

pub mod attach;
pub mod cli;
pub mod commands;
pub mod grid;
pub mod rating;

#[doc(inline)]
pub use grid::{Boundary, Grid, GridConfig, HexId, Hexagon, generate_grid, resolve_neighbors};

#[doc(inline)]
pub use geom::HexIndex;

#[doc(inline)]
pub use io::csv::CsvOptions;

#[doc(inline)]
pub use rating::{FeatureVector, HexagonSource, Persona, RatingError, get_rating, rate_all};
