//! Unified parse entrypoint.
//!
//! Most callers should use [`parse_spreadsheet`], which parses uploaded bytes into a
//! [`ParsedSheet`].
//!
//! - If [`ImportOptions::format`] is `None`, the format is inferred from the file extension.
//! - If an [`ImportObserver`] is provided, success/failure/alerts are reported to it.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{ImportError, ImportResult};

use super::observability::{report_failure, ImportContext, ImportObserver, ImportSeverity, ParseStats};
use super::{csv, ParsedSheet};

/// Supported import formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportFormat {
    /// Comma-separated values.
    Csv,
    /// Spreadsheet/workbook formats (feature-gated behind `excel`).
    Excel,
}

impl ImportFormat {
    /// Parse an import format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Excel),
            _ => None,
        }
    }

    /// Infer the format from a file name or path.
    pub fn from_file_name(file_name: &str) -> ImportResult<Self> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ImportError::UnsupportedFormat {
                message: format!("cannot infer format: file has no extension ({file_name})"),
            })?;

        Self::from_extension(ext).ok_or_else(|| ImportError::UnsupportedFormat {
            message: format!("cannot infer format from extension '{ext}' ({file_name})"),
        })
    }
}

/// Which sheet of a workbook to read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SheetSelection {
    /// The first sheet (default).
    #[default]
    First,
    /// A single named sheet.
    Named(String),
}

/// Options controlling parsing and observer reporting.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct ImportOptions {
    /// If `None`, detect the format from the file extension.
    pub format: Option<ImportFormat>,
    /// When false, columns are named `Column 1`, `Column 2`, ...
    pub has_header_row: bool,
    /// Workbook-specific options.
    pub sheet: SheetSelection,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn ImportObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: ImportSeverity,
}

impl fmt::Debug for ImportOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportOptions")
            .field("format", &self.format)
            .field("has_header_row", &self.has_header_row)
            .field("sheet", &self.sheet)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            format: None,
            has_header_row: true,
            sheet: SheetSelection::default(),
            observer: None,
            alert_at_or_above: ImportSeverity::Critical,
        }
    }
}

impl ImportOptions {
    /// Context describing `file_name` under these options. The format is `None` when it cannot
    /// be determined.
    pub fn context_for(&self, file_name: &str) -> ImportContext {
        ImportContext {
            source: file_name.to_string(),
            format: self
                .format
                .or_else(|| ImportFormat::from_file_name(file_name).ok()),
        }
    }

    fn report(&self, ctx: &ImportContext, result: &ImportResult<ParsedSheet>) {
        let Some(obs) = self.observer.as_ref() else {
            return;
        };
        match result {
            Ok(sheet) => obs.on_parsed(
                ctx,
                ParseStats {
                    rows: sheet.total_rows,
                    columns: sheet.column_count(),
                },
            ),
            Err(e) => report_failure(obs.as_ref(), ctx, e, self.alert_at_or_above),
        }
    }
}

/// Parse uploaded spreadsheet bytes.
///
/// When an observer is configured, this function reports:
///
/// - `on_parsed` on success, with row and column counts
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// # Examples
///
/// ```rust
/// use multiview_db::ingestion::{parse_spreadsheet, ImportOptions};
///
/// # fn main() -> Result<(), multiview_db::ImportError> {
/// let bytes = b"Name,Score\nAda,98\nGrace,87\n";
/// let sheet = parse_spreadsheet(bytes, "people.csv", &ImportOptions::default())?;
/// assert_eq!(sheet.headers, vec!["Name", "Score"]);
/// assert_eq!(sheet.total_rows, 2);
/// # Ok(())
/// # }
/// ```
///
/// ## Force a format, no header row
///
/// ```rust
/// use multiview_db::ingestion::{parse_spreadsheet, ImportFormat, ImportOptions};
///
/// # fn main() -> Result<(), multiview_db::ImportError> {
/// let opts = ImportOptions {
///     format: Some(ImportFormat::Csv),
///     has_header_row: false,
///     ..Default::default()
/// };
/// let sheet = parse_spreadsheet(b"a,b\nc,d\n", "upload", &opts)?;
/// assert_eq!(sheet.headers, vec!["Column 1", "Column 2"]);
/// # Ok(())
/// # }
/// ```
pub fn parse_spreadsheet(
    bytes: &[u8],
    file_name: &str,
    options: &ImportOptions,
) -> ImportResult<ParsedSheet> {
    let ctx = options.context_for(file_name);
    let result = match options.format {
        Some(f) => Ok(f),
        None => ImportFormat::from_file_name(file_name),
    }
    .and_then(|format| parse_with_format(bytes, format, options));

    options.report(&ctx, &result);
    result
}

/// Read a file from disk and parse it like [`parse_spreadsheet`].
///
/// A missing or unreadable file is an `Io` error, which reports as `Critical`.
pub fn parse_spreadsheet_from_path(
    path: impl AsRef<Path>,
    options: &ImportOptions,
) -> ImportResult<ParsedSheet> {
    let path = path.as_ref();
    let file_name = path.display().to_string();
    match std::fs::read(path) {
        Ok(bytes) => parse_spreadsheet(&bytes, &file_name, options),
        Err(e) => {
            let result = Err(ImportError::Io(e));
            options.report(&options.context_for(&file_name), &result);
            result
        }
    }
}

fn parse_with_format(bytes: &[u8], format: ImportFormat, options: &ImportOptions) -> ImportResult<ParsedSheet> {
    match format {
        ImportFormat::Csv => csv::parse_csv_bytes(bytes, options.has_header_row),
        ImportFormat::Excel => parse_excel_dispatch(bytes, options),
    }
}

fn parse_excel_dispatch(bytes: &[u8], options: &ImportOptions) -> ImportResult<ParsedSheet> {
    // Avoid unused warnings when the feature is off.
    let _ = (bytes, options);

    #[cfg(feature = "excel")]
    {
        super::excel::parse_workbook_bytes(bytes, &options.sheet, options.has_header_row)
    }

    #[cfg(not(feature = "excel"))]
    {
        Err(ImportError::UnsupportedFormat {
            message: "workbook import not enabled (enable cargo feature 'excel')".to_string(),
        })
    }
}
