//! Readers for the boundary formats consumed by the pipeline.
//!
//! - `csv` - delimited feature tables with encoding fallback
//! - `wkt` - WKT geometry columns

pub(crate) mod csv;
pub(crate) mod wkt;
