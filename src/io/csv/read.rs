//! CSV reading operations.

use std::{borrow::Cow, fs, io::Cursor, path::Path};

use anyhow::{Context, Result, anyhow, bail};
use encoding_rs::Encoding;
use polars::{frame::DataFrame, io::SerReader, prelude::{CsvReadOptions, CsvReader, StringChunked}};
use tracing::{debug, info};

/// Delimiter and text-encoding policy for a feature table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvOptions {
    pub separator: u8,
    /// Encoding labels tried in order until one decodes and parses.
    pub encodings: Vec<String>,
}

impl CsvOptions {
    /// Graph exports (roads, pedestrian edges): `;`-delimited, legacy code pages possible.
    pub fn graph_export() -> Self {
        Self {
            separator: b';',
            encodings: vec!["utf-8".into(), "cp1251".into(), "latin1".into()],
        }
    }

    /// Transit schedule exports: `,`-delimited UTF-8.
    pub fn schedule_export() -> Self {
        Self { separator: b',', encodings: vec!["utf-8".into()] }
    }
}

/// Decode `bytes` strictly with `encoding`.
/// Returns `None` when the bytes are not valid in that encoding.
fn decode<'a>(bytes: &'a [u8], encoding: &'static Encoding) -> Option<Cow<'a, str>> {
    // UTF-8 exports sometimes carry a BOM; drop it before strict decoding.
    let bytes = if encoding == encoding_rs::UTF_8 {
        bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes)
    } else {
        bytes
    };
    encoding.decode_without_bom_handling_and_without_replacement(bytes)
}

/// Parse decoded CSV text, keeping every column as a string.
pub(crate) fn read_csv_text(text: &str, separator: u8) -> Result<DataFrame> {
    let options = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|po| po.with_separator(separator));

    CsvReader::new(Cursor::new(text.as_bytes()))
        .with_options(options)
        .finish()
        .context("[io::csv::read] Failed to parse CSV text")
}

/// Read a delimited table from `path`, trying each configured encoding in
/// order. Fails only if the file cannot be opened or no encoding yields a
/// parseable table.
pub(crate) fn read_encoded_csv(path: &Path, options: &CsvOptions) -> Result<DataFrame> {
    let bytes = fs::read(path)
        .with_context(|| format!("[io::csv::read] Failed to open CSV file: {}", path.display()))?;

    for label in &options.encodings {
        let encoding = Encoding::for_label(label.as_bytes())
            .ok_or_else(|| anyhow!("[io::csv::read] Unknown text encoding '{label}'"))?;

        let Some(text) = decode(&bytes, encoding) else {
            debug!("{} is not valid {}, trying next encoding", path.display(), encoding.name());
            continue;
        };

        match read_csv_text(&text, options.separator) {
            Ok(df) => {
                info!("read {} rows from {} as {}", df.height(), path.display(), encoding.name());
                return Ok(df);
            }
            Err(e) => debug!("{} failed to parse as {}: {e:#}", path.display(), encoding.name()),
        }
    }

    bail!(
        "[io::csv::read] Could not read {} with any of the encodings {:?}",
        path.display(),
        options.encodings
    )
}

/// Look up the named string columns, failing if any is absent.
pub(crate) fn string_columns<'a>(df: &'a DataFrame, names: &[&str]) -> Result<Vec<&'a StringChunked>> {
    names.iter()
        .map(|&name| {
            df.column(name)
                .with_context(|| format!("[io::csv::read] Missing required column '{name}'"))?
                .str()
                .with_context(|| format!("[io::csv::read] Column '{name}' is not text"))
        })
        .collect()
}
