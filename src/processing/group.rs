//! Grouping records by a derived key, preserving first-seen group order.

use indexmap::IndexMap;

use crate::convert::expand_option_refs;
use crate::types::{FieldConfig, RecordData};
use crate::value::{is_blank, stringify};

/// Label used for records whose grouping cell is blank.
pub const EMPTY_GROUP_LABEL: &str = "(Empty)";

/// Group records by `key`, in the order each key is first seen.
pub fn group_by<'a, F>(records: &'a [RecordData], mut key: F) -> IndexMap<String, Vec<&'a RecordData>>
where
    F: FnMut(&RecordData) -> String,
{
    let mut groups: IndexMap<String, Vec<&'a RecordData>> = IndexMap::new();
    for record in records {
        groups.entry(key(record)).or_default().push(record);
    }
    groups
}

/// Display label of a record's cell: option ids read as labels, blanks as [`EMPTY_GROUP_LABEL`].
pub fn category_label(record: &RecordData, field_id: &str, field: Option<&FieldConfig>) -> String {
    let cell = record.get(field_id);
    if is_blank(cell) {
        return EMPTY_GROUP_LABEL.to_string();
    }
    let text = match field {
        Some(f) => stringify(&expand_option_refs(cell, f)),
        None => stringify(cell),
    };
    if text.trim().is_empty() {
        EMPTY_GROUP_LABEL.to_string()
    } else {
        text
    }
}

/// Group records by the display label of one field.
pub fn group_by_field<'a>(
    records: &'a [RecordData],
    field_id: &str,
    field: Option<&FieldConfig>,
) -> IndexMap<String, Vec<&'a RecordData>> {
    group_by(records, |r| category_label(r, field_id, field))
}
