//! CSV reading for delimited feature tables.

mod read;

pub(crate) use read::*;
pub use read::CsvOptions;
