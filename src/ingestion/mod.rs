//! Spreadsheet import.
//!
//! Import runs in stages, each pure given the previous stage's output:
//!
//! 1. **Parse** raw bytes into a [`ParsedSheet`] ([`parse_spreadsheet`], format chosen by file
//!    extension or [`ImportOptions::format`]).
//! 2. **Infer** a field type per column ([`infer::infer_column_type`]).
//! 3. **Propose** a [`ColumnMapping`] per column: map onto a matching existing field, or create a
//!    new one ([`preview_import`]).
//! 4. **Commit** the rows as new records, creating fields as needed ([`commit_import`]).
//!
//! Failures never touch the table: commit returns a new snapshot and leaves its input alone.
//! When an [`ImportObserver`] is configured, parse and commit outcomes are reported to it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ImportError, ImportResult};
use crate::value::{is_blank, stringify};

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod infer;
pub mod mapping;
pub mod observability;
pub mod unified;

pub use infer::{infer_column_type, SAMPLE_SIZE};
pub use mapping::{
    commit_import, commit_import_reported, materialize_import, preview_import, propose_mappings,
    ColumnMapping, CommitOutcome, ImportPreview, MappingAction, MaterializedImport, PREVIEW_ROWS,
};
pub use observability::{
    CommitStats, CompositeObserver, FileObserver, ImportContext, ImportObserver, ImportSeverity,
    ParseStats, StdErrObserver,
};
pub use unified::{parse_spreadsheet, parse_spreadsheet_from_path, ImportFormat, ImportOptions, SheetSelection};

/// A parsed sheet: one header per column and rows padded to the header width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedSheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    pub total_rows: usize,
}

impl ParsedSheet {
    /// Build a sheet from a raw cell grid.
    ///
    /// Fully blank rows are dropped. With `has_header_row`, the first remaining row supplies the
    /// headers (blank headers become `Column N`); otherwise every column is named `Column N`.
    pub fn from_grid(grid: Vec<Vec<Value>>, has_header_row: bool) -> ImportResult<Self> {
        let mut grid: Vec<Vec<Value>> = grid
            .into_iter()
            .filter(|row| !row.iter().all(is_blank))
            .collect();
        if grid.is_empty() {
            return Err(ImportError::EmptyFile);
        }
        let width = grid.iter().map(Vec::len).max().unwrap_or(0);

        let headers: Vec<String> = if has_header_row {
            let header_row = grid.remove(0);
            (0..width)
                .map(|i| {
                    let title = header_row.get(i).map(stringify).unwrap_or_default();
                    let title = title.trim();
                    if title.is_empty() {
                        synthetic_header(i)
                    } else {
                        title.to_string()
                    }
                })
                .collect()
        } else {
            (0..width).map(synthetic_header).collect()
        };

        for row in &mut grid {
            row.resize(width, Value::Null);
        }
        Ok(Self {
            headers,
            total_rows: grid.len(),
            rows: grid,
        })
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter().filter_map(move |row| row.get(index))
    }
}

/// `Column N`, 1-based.
pub fn synthetic_header(index: usize) -> String {
    format!("Column {}", index + 1)
}
