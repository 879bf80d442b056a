mod bbox;
pub mod geodesic;
mod index;

pub(crate) use bbox::envelope;
pub use index::HexIndex;
