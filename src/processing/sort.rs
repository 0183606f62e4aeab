//! View sorts.

use std::cmp::Ordering;

use crate::types::{FieldConfig, FieldType, RecordData, SortDirection, ViewSort};
use crate::value::{is_blank, is_truthy, number_or_zero, stringify, value_to_date};

#[derive(Debug, PartialEq, PartialOrd)]
enum SortKey {
    Num(f64),
    Text(String),
}

fn sort_key(record: &RecordData, field: &FieldConfig) -> Option<SortKey> {
    let cell = record.get(&field.id);
    if is_blank(cell) {
        return None;
    }
    let key = match field.field_type {
        FieldType::Number | FieldType::Rating | FieldType::Progress | FieldType::AutoNumber => {
            SortKey::Num(number_or_zero(cell))
        }
        FieldType::Checkbox => SortKey::Num(f64::from(u8::from(is_truthy(cell)))),
        FieldType::Date | FieldType::CreatedTime | FieldType::UpdatedTime => {
            SortKey::Num(value_to_date(cell)?.timestamp_millis() as f64)
        }
        FieldType::Select => {
            let id = cell.as_str()?;
            let position = field.options().iter().position(|o| o.id == id)?;
            SortKey::Num(position as f64)
        }
        FieldType::Text
        | FieldType::MultiSelect
        | FieldType::Person
        | FieldType::Attachment
        | FieldType::Url
        | FieldType::Email
        | FieldType::Phone
        | FieldType::Formula
        | FieldType::Relation
        | FieldType::CreatedBy
        | FieldType::UpdatedBy
        | FieldType::Id => SortKey::Text(stringify(cell).to_lowercase()),
    };
    Some(key)
}

fn compare_by(a: &RecordData, b: &RecordData, field: &FieldConfig, direction: SortDirection) -> Ordering {
    match (sort_key(a, field), sort_key(b, field)) {
        (None, None) => Ordering::Equal,
        // Blanks sort last in either direction.
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => {
            let ord = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
            match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        }
    }
}

/// Stable multi-key sort. Earlier sorts take precedence; sorts on unknown fields are ignored.
pub fn sort(records: &mut [&RecordData], sorts: &[ViewSort], fields: &[FieldConfig]) {
    let keys: Vec<(&FieldConfig, SortDirection)> = sorts
        .iter()
        .filter_map(|s| fields.iter().find(|f| f.id == s.field_id).map(|f| (f, s.direction)))
        .collect();
    if keys.is_empty() {
        return;
    }
    records.sort_by(|a, b| {
        keys.iter()
            .map(|(field, dir)| compare_by(a, b, field, *dir))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::sort;
    use crate::types::{FieldConfig, FieldType, RecordData, SelectOption, SortDirection, ViewSort};

    fn by(field_id: &str, direction: SortDirection) -> ViewSort {
        ViewSort {
            field_id: field_id.to_string(),
            direction,
        }
    }

    #[test]
    fn sorts_numbers_with_blanks_last() {
        let fields = vec![FieldConfig::new("n", "N", FieldType::Number)];
        let records = vec![
            RecordData::new("a").with("n", json!(5)),
            RecordData::new("b"),
            RecordData::new("c").with("n", json!(-1)),
        ];
        let mut refs: Vec<&RecordData> = records.iter().collect();
        sort(&mut refs, &[by("n", SortDirection::Desc)], &fields);
        let ids: Vec<&str> = refs.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "b"]);
    }

    #[test]
    fn select_sorts_by_option_order_then_secondary_key() {
        let fields = vec![
            FieldConfig::new("s", "S", FieldType::Select).with_options(vec![
                SelectOption::new("hi", "High", "#f00"),
                SelectOption::new("lo", "Low", "#0f0"),
            ]),
            FieldConfig::new("t", "T", FieldType::Text),
        ];
        let records = vec![
            RecordData::new("1").with("s", json!("lo")).with("t", json!("b")),
            RecordData::new("2").with("s", json!("hi")).with("t", json!("z")),
            RecordData::new("3").with("s", json!("lo")).with("t", json!("A")),
        ];
        let mut refs: Vec<&RecordData> = records.iter().collect();
        sort(
            &mut refs,
            &[by("s", SortDirection::Asc), by("t", SortDirection::Asc)],
            &fields,
        );
        let ids: Vec<&str> = refs.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "1"]);
    }
}
