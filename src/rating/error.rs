use thiserror::Error;

use crate::grid::HexId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RatingError {
    #[error("hexagon {0} not found")]
    NotFound(HexId),
}
