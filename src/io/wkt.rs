//! WKT parsing for feature geometry columns.

use geo::{LineString, Polygon};
use wkt::TryFromWkt;

const LINESTRING: &str = "LINESTRING";

/// Parse a WKT `LINESTRING`, accepting any casing of the keyword.
/// Returns `None` for other geometry types, malformed text, or lines with
/// fewer than two vertices.
pub(crate) fn parse_linestring(text: &str) -> Option<LineString<f64>> {
    let text = text.trim();
    let keyword = text.get(..LINESTRING.len())?;
    if !keyword.eq_ignore_ascii_case(LINESTRING) { return None }

    let normalized = format!("{LINESTRING}{}", &text[LINESTRING.len()..]);
    let line = LineString::<f64>::try_from_wkt_str(&normalized).ok()?;

    let finite = line.0.iter().all(|c| c.x.is_finite() && c.y.is_finite());
    (line.0.len() >= 2 && finite).then_some(line)
}

/// Parse a WKT `POLYGON`.
pub(crate) fn parse_polygon(text: &str) -> Option<Polygon<f64>> {
    Polygon::<f64>::try_from_wkt_str(text.trim()).ok()
}
