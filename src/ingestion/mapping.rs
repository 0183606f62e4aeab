//! Column mappings: how each parsed column lands in the table.

use std::collections::HashSet;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::convert::{convert_raw_value, options_from_values, split_multi_value};
use crate::error::{ImportError, ImportResult};
use crate::id::{generate_id, IdKind};
use crate::table::TableState;
use crate::types::{FieldConfig, FieldType, RecordData};
use crate::value::stringify;

use super::infer::infer_column_type;
use super::observability::{report_failure, CommitStats, ImportContext};
use super::unified::ImportOptions;
use super::{synthetic_header, ParsedSheet};

/// Rows included in an [`ImportPreview`].
pub const PREVIEW_ROWS: usize = 5;

/// Most options generated for a new select column.
pub const IMPORT_OPTION_LIMIT: usize = 20;

/// What to do with one parsed column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum MappingAction {
    /// Create a new field of `field_type` titled `title`.
    CreateNew { field_type: FieldType, title: String },
    /// Write into an existing field.
    MapExisting { field_id: String },
    /// Leave the column out.
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMapping {
    pub column_index: usize,
    pub header: String,
    pub inferred_type: FieldType,
    pub action: MappingAction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportPreview {
    pub mappings: Vec<ColumnMapping>,
    pub sample_rows: Vec<Vec<Value>>,
    pub total_rows: usize,
}

/// Fields and records produced from a sheet, not yet merged into a table.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterializedImport {
    pub new_fields: Vec<FieldConfig>,
    pub records: Vec<RecordData>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommitOutcome {
    pub state: TableState,
    pub records_imported: usize,
    pub fields_created: usize,
}

/// Propose one mapping per column.
///
/// A column whose header equals an existing field's title or id (ignoring case) maps onto that
/// field; each field is claimed by at most one column, and computed fields are never matched.
/// Every other column creates a new field of its inferred type.
pub fn propose_mappings(sheet: &ParsedSheet, fields: &[FieldConfig]) -> Vec<ColumnMapping> {
    let mut claimed: HashSet<&str> = HashSet::new();
    sheet
        .headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let inferred_type = infer_column_type(sheet.column(i));
            let needle = header.trim().to_lowercase();
            let matched = fields.iter().find(|f| {
                !f.field_type.is_computed()
                    && !claimed.contains(f.id.as_str())
                    && (f.title.trim().to_lowercase() == needle || f.id.to_lowercase() == needle)
            });
            let action = match matched {
                Some(field) => {
                    claimed.insert(field.id.as_str());
                    MappingAction::MapExisting {
                        field_id: field.id.clone(),
                    }
                }
                None => MappingAction::CreateNew {
                    field_type: inferred_type,
                    title: header.clone(),
                },
            };
            ColumnMapping {
                column_index: i,
                header: header.clone(),
                inferred_type,
                action,
            }
        })
        .collect()
}

/// Proposed mappings plus the first [`PREVIEW_ROWS`] rows.
pub fn preview_import(sheet: &ParsedSheet, fields: &[FieldConfig]) -> ImportPreview {
    ImportPreview {
        mappings: propose_mappings(sheet, fields),
        sample_rows: sheet.rows.iter().take(PREVIEW_ROWS).cloned().collect(),
        total_rows: sheet.total_rows,
    }
}

/// Turn mapped columns into new fields and one new record per row.
///
/// Mappings onto unknown fields, the `id` field, or out-of-range columns are treated as skipped.
pub fn materialize_import(
    sheet: &ParsedSheet,
    mappings: &[ColumnMapping],
    fields: &[FieldConfig],
) -> ImportResult<MaterializedImport> {
    let mut new_fields: Vec<FieldConfig> = Vec::new();
    let mut targets: Vec<(usize, FieldConfig)> = Vec::new();

    for mapping in mappings {
        if mapping.column_index >= sheet.column_count() {
            continue;
        }
        match &mapping.action {
            MappingAction::Skip => {}
            MappingAction::MapExisting { field_id } => {
                if let Some(field) = fields
                    .iter()
                    .find(|f| &f.id == field_id && f.field_type != FieldType::Id)
                {
                    targets.push((mapping.column_index, field.clone()));
                }
            }
            MappingAction::CreateNew { field_type, title } => {
                if *field_type == FieldType::Id {
                    continue;
                }
                let field = new_field(sheet, mapping.column_index, *field_type, title);
                new_fields.push(field.clone());
                targets.push((mapping.column_index, field));
            }
        }
    }
    if targets.is_empty() {
        return Err(ImportError::NothingToImport);
    }

    let now = Utc::now();
    let records = sheet
        .rows
        .iter()
        .map(|row| {
            let mut record = RecordData::new(generate_id(Some(IdKind::Record)));
            record.created_time = Some(now);
            record.updated_time = Some(now);
            for (col, field) in &targets {
                let raw = row.get(*col).unwrap_or(&Value::Null);
                record.set(field.id.clone(), convert_raw_value(raw, field));
            }
            record
        })
        .collect();

    Ok(MaterializedImport { new_fields, records })
}

fn new_field(sheet: &ParsedSheet, column: usize, field_type: FieldType, title: &str) -> FieldConfig {
    let title = match title.trim() {
        "" => synthetic_header(column),
        t => t.to_string(),
    };
    let field = FieldConfig::new(generate_id(Some(IdKind::Field)), title, field_type);
    match field_type {
        FieldType::Select => {
            let options = options_from_values(sheet.column(column), FieldType::Text, IMPORT_OPTION_LIMIT);
            field.with_options(options)
        }
        FieldType::MultiSelect => {
            let parts: Vec<Value> = sheet
                .column(column)
                .flat_map(|v| {
                    let text = stringify(v);
                    split_multi_value(&text)
                        .map(|p| Value::String(p.to_string()))
                        .collect::<Vec<_>>()
                })
                .collect();
            let options = options_from_values(parts.iter(), FieldType::Text, IMPORT_OPTION_LIMIT);
            field.with_options(options)
        }
        _ => field,
    }
}

/// Merge an import into a copy of `state`.
///
/// New fields are appended; every imported record also carries a null cell for each existing
/// field the sheet did not fill. `state` itself is never modified, so a failed commit leaves the
/// table as it was.
pub fn commit_import(
    state: &TableState,
    sheet: &ParsedSheet,
    mappings: &[ColumnMapping],
) -> ImportResult<CommitOutcome> {
    let MaterializedImport { new_fields, mut records } = materialize_import(sheet, mappings, &state.fields)?;

    for record in &mut records {
        for field in &state.fields {
            if field.field_type != FieldType::Id && !record.values.contains_key(&field.id) {
                record.set(field.id.clone(), Value::Null);
            }
        }
    }

    let mut next = state.clone();
    let fields_created = new_fields.len();
    let records_imported = records.len();
    next.fields.extend(new_fields);
    next.data.extend(records);

    Ok(CommitOutcome {
        state: next,
        records_imported,
        fields_created,
    })
}

/// [`commit_import`] with observer reporting (`on_committed`, or `on_failure`/`on_alert`).
pub fn commit_import_reported(
    state: &TableState,
    sheet: &ParsedSheet,
    mappings: &[ColumnMapping],
    ctx: &ImportContext,
    options: &ImportOptions,
) -> ImportResult<CommitOutcome> {
    let result = commit_import(state, sheet, mappings);
    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(outcome) => obs.on_committed(
                ctx,
                CommitStats {
                    records: outcome.records_imported,
                    fields_created: outcome.fields_created,
                },
            ),
            Err(e) => report_failure(obs.as_ref(), ctx, e, options.alert_at_or_above),
        }
    }
    result
}
