use std::borrow::Cow;
use std::collections::HashSet;
use std::path::Path;

use encoding_rs::WINDOWS_1252;

use super::error::LoadError;
use super::model::{Column, Table};
use super::schema::{infer_column_type, to_cell};

/// Field values treated as missing, in addition to the empty string.
const MISSING_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a CSV file from disk.
pub fn load_file(path: &Path) -> Result<Table, LoadError> {
    let bytes = std::fs::read(path)?;
    load_bytes(&bytes)
}

/// Parse an uploaded CSV byte stream into a typed [`Table`].
///
/// The bytes are decoded as UTF-8 first and as Latin-1 (Windows-1252) when
/// that fails. Nothing is returned unless the whole upload parses.
pub fn load_bytes(bytes: &[u8]) -> Result<Table, LoadError> {
    let text = decode(bytes);
    let raw = parse_csv(&text)?;
    let table = type_columns(raw);
    log::info!(
        "Loaded table with {} rows and columns {:?}",
        table.len(),
        table.column_names()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

fn decode(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text.strip_prefix('\u{feff}').unwrap_or(text)),
        Err(e) => {
            log::warn!("Upload is not valid UTF-8 ({e}); decoding as Latin-1");
            WINDOWS_1252.decode_without_bom_handling(bytes).0
        }
    }
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// Untyped parse result: header names and one `Option<String>` per field.
struct RawTable {
    headers: Vec<String>,
    columns: Vec<Vec<Option<String>>>,
}

fn parse_csv(text: &str) -> Result<RawTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = unique_headers(reader.headers()?.iter());
    if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
        return Err(LoadError::NoColumns);
    }

    let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for result in reader.records() {
        let record = result?;
        if record.len() > headers.len() {
            return Err(LoadError::TooManyFields {
                line: record.position().map(|p| p.line()).unwrap_or(0),
                expected: headers.len(),
                found: record.len(),
            });
        }
        // Blank lines are skipped by the reader; short rows are padded.
        for (idx, column) in columns.iter_mut().enumerate() {
            column.push(record.get(idx).and_then(present));
        }
    }

    Ok(RawTable { headers, columns })
}

fn present(field: &str) -> Option<String> {
    if field.is_empty() || MISSING_MARKERS.contains(&field) {
        None
    } else {
        Some(field.to_string())
    }
}

/// Rename repeated header names to `name.1`, `name.2`, ...
fn unique_headers<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut headers = Vec::new();
    for name in names {
        let mut candidate = name.to_string();
        let mut suffix = 1;
        while seen.contains(&candidate) {
            candidate = format!("{name}.{suffix}");
            suffix += 1;
        }
        seen.insert(candidate.clone());
        headers.push(candidate);
    }
    headers
}

// ---------------------------------------------------------------------------
// Type tagging pass
// ---------------------------------------------------------------------------

fn type_columns(raw: RawTable) -> Table {
    let columns: Vec<Column> = raw
        .headers
        .into_iter()
        .zip(raw.columns)
        .map(|(name, values)| {
            let borrowed: Vec<Option<&str>> = values.iter().map(|v| v.as_deref()).collect();
            let kind = infer_column_type(&borrowed);
            let cells = borrowed.into_iter().map(|v| to_cell(v, kind)).collect();
            log::debug!("Column {name:?} tagged as {kind}");
            Column::new(name, kind, cells)
        })
        .collect();
    // Every column received one value per record.
    Table::from_columns(columns).unwrap_or_default()
}
