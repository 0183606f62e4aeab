use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::ImportError;

use super::unified::ImportFormat;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ImportSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (import failed; the table is unchanged).
    Error,
    /// Critical error (typically I/O failures reading the file).
    Critical,
}

impl ImportSeverity {
    /// Severity of an import failure: I/O is critical, everything else is a plain error.
    pub fn of(error: &ImportError) -> Self {
        match error {
            ImportError::Io(_) => Self::Critical,
            ImportError::Csv(err) => match err.kind() {
                ::csv::ErrorKind::Io(_) => Self::Critical,
                _ => Self::Error,
            },
            #[cfg(feature = "excel")]
            ImportError::Excel(_) => Self::Error,
            ImportError::EmptyFile | ImportError::UnsupportedFormat { .. } | ImportError::NothingToImport => {
                Self::Error
            }
        }
    }
}

/// Which file an import event concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportContext {
    /// File name or path as given by the caller.
    pub source: String,
    /// Format the file was (or would have been) parsed as.
    pub format: Option<ImportFormat>,
}

/// Stats reported once a file has been parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseStats {
    pub rows: usize,
    pub columns: usize,
}

/// Stats reported once parsed rows have been written into a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitStats {
    pub records: usize,
    pub fields_created: usize,
}

/// Observer interface for import outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait ImportObserver: Send + Sync {
    /// Called when a file parses successfully.
    fn on_parsed(&self, _ctx: &ImportContext, _stats: ParseStats) {}

    /// Called when parsed rows are committed to a table.
    fn on_committed(&self, _ctx: &ImportContext, _stats: CommitStats) {}

    /// Called when parsing or committing fails.
    fn on_failure(&self, _ctx: &ImportContext, _severity: ImportSeverity, _error: &ImportError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Report a failure, and an alert when `severity >= alert_at_or_above`.
pub(crate) fn report_failure(
    observer: &dyn ImportObserver,
    ctx: &ImportContext,
    error: &ImportError,
    alert_at_or_above: ImportSeverity,
) {
    let severity = ImportSeverity::of(error);
    observer.on_failure(ctx, severity, error);
    if severity >= alert_at_or_above {
        observer.on_alert(ctx, severity, error);
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn ImportObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn ImportObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl ImportObserver for CompositeObserver {
    fn on_parsed(&self, ctx: &ImportContext, stats: ParseStats) {
        for o in &self.observers {
            o.on_parsed(ctx, stats);
        }
    }

    fn on_committed(&self, ctx: &ImportContext, stats: CommitStats) {
        for o in &self.observers {
            o.on_committed(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Logs import events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl ImportObserver for StdErrObserver {
    fn on_parsed(&self, ctx: &ImportContext, stats: ParseStats) {
        eprintln!(
            "[import][parsed] format={:?} source={} rows={} columns={}",
            ctx.format, ctx.source, stats.rows, stats.columns
        );
    }

    fn on_committed(&self, ctx: &ImportContext, stats: CommitStats) {
        eprintln!(
            "[import][committed] source={} records={} new_fields={}",
            ctx.source, stats.records, stats.fields_created
        );
    }

    fn on_failure(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        eprintln!(
            "[import][{:?}] format={:?} source={} err={}",
            severity, ctx.format, ctx.source, error
        );
    }

    fn on_alert(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        eprintln!(
            "[ALERT][import][{:?}] format={:?} source={} err={}",
            severity, ctx.format, ctx.source, error
        );
    }
}

/// Appends import events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Writes are best-effort; failures to open or write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl ImportObserver for FileObserver {
    fn on_parsed(&self, ctx: &ImportContext, stats: ParseStats) {
        self.append_line(&format!(
            "{} parsed format={:?} source={} rows={} columns={}",
            unix_ts(),
            ctx.format,
            ctx.source,
            stats.rows,
            stats.columns
        ));
    }

    fn on_committed(&self, ctx: &ImportContext, stats: CommitStats) {
        self.append_line(&format!(
            "{} committed source={} records={} new_fields={}",
            unix_ts(),
            ctx.source,
            stats.records,
            stats.fields_created
        ));
    }

    fn on_failure(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        self.append_line(&format!(
            "{} fail severity={:?} format={:?} source={} err={}",
            unix_ts(),
            severity,
            ctx.format,
            ctx.source,
            error
        ));
    }

    fn on_alert(&self, ctx: &ImportContext, severity: ImportSeverity, error: &ImportError) {
        self.append_line(&format!(
            "{} ALERT severity={:?} format={:?} source={} err={}",
            unix_ts(),
            severity,
            ctx.format,
            ctx.source,
            error
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
