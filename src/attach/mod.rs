//! Attaching road, pedestrian, and transit features to grid hexagons.
//!
//! Each pass loads a feature table, joins it against a [`HexIndex`] of the
//! grid, and writes the per-hexagon aggregates back onto the grid.
//!
//! [`HexIndex`]: crate::geom::HexIndex

mod checkpoint;
mod features;
mod lines;
mod locate;
mod points;
mod summary;

pub use checkpoint::{CheckpointStore, EdgeAggregate, EdgeTally};
pub use features::{LineColumns, LineFeature, StopRecord, line_features, read_line_features, read_stop_records, stop_records};
pub use lines::{JoinOptions, apply_pedestrian, apply_roads, attach_lines};
pub use locate::Locate;
pub use points::{StopTally, apply_stops, attach_stops};
pub use summary::PassSummary;
