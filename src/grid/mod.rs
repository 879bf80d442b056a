mod boundary;
mod generate;
mod grid;
mod hex_id;
mod hexagon;
mod neighbors;

pub use boundary::Boundary;
pub use generate::{GridConfig, generate_grid, hexagon_peaks};
pub use grid::Grid;
pub use hex_id::HexId;
pub use hexagon::Hexagon;
pub use neighbors::resolve_neighbors;
