//! CSV parsing.

use std::io::Read;

use serde_json::Value;

use crate::error::ImportResult;

use super::ParsedSheet;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parse CSV bytes into a [`ParsedSheet`].
///
/// Rows may have differing lengths. Cells are kept as strings (empty cells become null); type
/// decisions are left to inference and conversion.
pub fn parse_csv_bytes(bytes: &[u8], has_header_row: bool) -> ImportResult<ParsedSheet> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);
    parse_csv_from_reader(&mut rdr, has_header_row)
}

/// Parse CSV data from an existing reader. The reader should not consume headers itself.
pub fn parse_csv_from_reader<R: Read>(
    rdr: &mut csv::Reader<R>,
    has_header_row: bool,
) -> ImportResult<ParsedSheet> {
    let mut grid: Vec<Vec<Value>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        grid.push(record.iter().map(cell_value).collect());
    }
    ParsedSheet::from_grid(grid, has_header_row)
}

fn cell_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Value::Null
    } else {
        Value::String(trimmed.to_owned())
    }
}
