#![cfg(feature = "excel")]

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use serde_json::Value;

use crate::error::{ImportError, ImportResult};
use crate::value::{date_from_serial, number_value, to_iso_string};

use super::unified::SheetSelection;
use super::ParsedSheet;

/// Parse a workbook (`.xlsx`, `.xls`, `.xlsm`, `.xlsb`, `.ods`) into a [`ParsedSheet`].
///
/// Behavior:
/// - Reads the first sheet unless a sheet is named in `sheet`
/// - Date-formatted cells become ISO strings; other numeric cells stay numbers
/// - Error cells read as null
pub fn parse_workbook_bytes(
    bytes: &[u8],
    sheet: &SheetSelection,
    has_header_row: bool,
) -> ImportResult<ParsedSheet> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

    let name = match sheet {
        SheetSelection::Named(name) => name.clone(),
        SheetSelection::First => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or(ImportError::EmptyFile)?,
    };
    let range = workbook.worksheet_range(&name)?;

    let grid: Vec<Vec<Value>> = range
        .rows()
        .map(|row| row.iter().map(cell_value).collect())
        .collect();
    ParsedSheet::from_grid(grid, has_header_row)
}

fn cell_value(c: &Data) -> Value {
    match c {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Value::Null
            } else {
                Value::String(trimmed.to_string())
            }
        }
        Data::Int(i) => Value::from(*i),
        Data::Float(f) => number_value(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => date_from_serial(dt.as_f64())
            .map(|d| Value::String(to_iso_string(&d)))
            .unwrap_or_else(|| number_value(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
    }
}
