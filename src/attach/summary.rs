use std::fmt;

use tracing::info;

/// Row- and feature-level accounting for one attachment pass. Nothing that
/// is dropped along the way disappears silently: it is counted here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Rows in the source table.
    pub rows_read: usize,
    /// Rows skipped by every-Nth downsampling.
    pub downsampled: usize,
    /// Rows with an empty required field.
    pub missing_fields: usize,
    /// Rows whose geometry could not be parsed.
    pub malformed_geometry: usize,
    /// Rows whose coordinates were not numeric.
    pub invalid_coordinates: usize,
    /// Rows collapsed into an earlier row with the same key.
    pub duplicates: usize,
    /// Features already finalized by a previous, interrupted run.
    pub resumed: usize,
    /// Features attributed to a hexagon in this run.
    pub assigned: usize,
    /// Features that fell outside every hexagon.
    pub unmatched: usize,
    /// Hexagons left out of the join because their polygon was malformed.
    pub excluded_hexagons: usize,
}

impl PassSummary {
    /// Rows dropped before the spatial join.
    pub fn dropped_rows(&self) -> usize {
        self.downsampled + self.missing_fields + self.malformed_geometry
            + self.invalid_coordinates + self.duplicates
    }

    pub fn log(&self, pass: &str) {
        info!("[{pass}] {self}");
    }
}

impl fmt::Display for PassSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rows={} downsampled={} missing_fields={} malformed_geometry={} invalid_coordinates={} \
             duplicates={} resumed={} assigned={} unmatched={} excluded_hexagons={}",
            self.rows_read, self.downsampled, self.missing_fields, self.malformed_geometry,
            self.invalid_coordinates, self.duplicates, self.resumed, self.assigned,
            self.unmatched, self.excluded_hexagons,
        )
    }
}
