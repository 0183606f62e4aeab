//! Read-side projections of a view over the shared fields and records.

use serde::Serialize;

use crate::processing::{filter, sort};
use crate::types::{FieldConfig, RecordData, SelectOption, ViewConfig, ViewLayout};

/// The fields a view shows and the records that pass its filters, in sort order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewProjection<'a> {
    pub fields: Vec<&'a FieldConfig>,
    pub records: Vec<&'a RecordData>,
}

/// One kanban column. `option` is `None` for the trailing "no value" column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KanbanColumn<'a> {
    pub option: Option<&'a SelectOption>,
    pub records: Vec<&'a RecordData>,
}

/// Fields in display order: ids listed in `fieldOrder` first (unknown ids skipped), then the
/// rest in table order, minus `hiddenFields`.
pub fn visible_fields<'a>(view: &ViewConfig, fields: &'a [FieldConfig]) -> Vec<&'a FieldConfig> {
    let ordered = view
        .field_order
        .iter()
        .filter_map(|id| fields.iter().find(|f| &f.id == id));
    let rest = fields.iter().filter(|f| !view.field_order.contains(&f.id));

    let mut out: Vec<&FieldConfig> = Vec::with_capacity(fields.len());
    for field in ordered.chain(rest) {
        if view.hidden_fields.contains(&field.id) || out.iter().any(|f| f.id == field.id) {
            continue;
        }
        out.push(field);
    }
    out
}

/// Filter, then sort, the records of one view.
pub fn view_records<'a>(view: &ViewConfig, fields: &[FieldConfig], records: &'a [RecordData]) -> Vec<&'a RecordData> {
    let mut rows = filter(records, &view.filters, fields);
    sort(&mut rows, &view.sorts, fields);
    rows
}

pub fn project<'a>(view: &ViewConfig, fields: &'a [FieldConfig], records: &'a [RecordData]) -> ViewProjection<'a> {
    ViewProjection {
        fields: visible_fields(view, fields),
        records: view_records(view, fields, records),
    }
}

/// One column per option of the kanban's group-by field, in option order, then a trailing
/// column for records with no (or an unknown) option.
///
/// Returns an empty list for non-kanban views or when the group-by field is unset or missing.
pub fn kanban_columns<'a>(
    view: &ViewConfig,
    fields: &'a [FieldConfig],
    records: &'a [RecordData],
) -> Vec<KanbanColumn<'a>> {
    let ViewLayout::Kanban { config } = &view.layout else {
        return Vec::new();
    };
    let Some(group_field) = config
        .group_by_field
        .as_deref()
        .and_then(|id| fields.iter().find(|f| f.id == id))
    else {
        return Vec::new();
    };

    let rows = view_records(view, fields, records);
    let options = group_field.options();
    let mut columns: Vec<KanbanColumn<'a>> = options
        .iter()
        .map(|option| KanbanColumn {
            option: Some(option),
            records: Vec::new(),
        })
        .chain(std::iter::once(KanbanColumn {
            option: None,
            records: Vec::new(),
        }))
        .collect();

    let unassigned = options.len();
    for record in rows {
        let slot = record
            .get(&group_field.id)
            .as_str()
            .and_then(|id| options.iter().position(|o| o.id == id))
            .unwrap_or(unassigned);
        columns[slot].records.push(record);
    }
    columns
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::{
        FieldType, FilterOperator, KanbanConfig, SortDirection, ViewFilter, ViewSort, ID_FIELD_ID,
    };

    fn fields() -> Vec<FieldConfig> {
        vec![
            FieldConfig::new(ID_FIELD_ID, "ID", FieldType::Id),
            FieldConfig::new("name", "Name", FieldType::Text),
            FieldConfig::new("stage", "Stage", FieldType::Select).with_options(vec![
                SelectOption::new("todo", "To do", "#aaa"),
                SelectOption::new("done", "Done", "#0a0"),
            ]),
            FieldConfig::new("pts", "Points", FieldType::Number),
        ]
    }

    fn records() -> Vec<RecordData> {
        vec![
            RecordData::new("1").with("name", json!("a")).with("stage", json!("done")).with("pts", json!(3)),
            RecordData::new("2").with("name", json!("b")).with("stage", json!("todo")).with("pts", json!(8)),
            RecordData::new("3").with("name", json!("c")).with("pts", json!(1)),
            RecordData::new("4").with("name", json!("d")).with("stage", json!("gone")).with("pts", json!(5)),
        ]
    }

    #[test]
    fn field_order_then_hidden() {
        let fields = fields();
        let mut view = ViewConfig::new("v", "Grid", ViewLayout::Table);
        view.field_order = vec!["pts".to_string(), "missing".to_string(), "name".to_string()];
        view.hidden_fields = vec!["stage".to_string()];
        let ids: Vec<&str> = visible_fields(&view, &fields).iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["pts", "name", ID_FIELD_ID]);
    }

    #[test]
    fn projection_filters_then_sorts() {
        let fields = fields();
        let records = records();
        let mut view = ViewConfig::new("v", "Grid", ViewLayout::Table);
        view.filters.push(ViewFilter {
            id: "f".to_string(),
            field_id: "pts".to_string(),
            operator: FilterOperator::GreaterThan,
            value: json!(2),
        });
        view.sorts.push(ViewSort {
            field_id: "pts".to_string(),
            direction: SortDirection::Desc,
        });
        let projection = project(&view, &fields, &records);
        let ids: Vec<&str> = projection.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "4", "1"]);
        assert_eq!(projection.fields.len(), 4);
    }

    #[test]
    fn kanban_has_a_column_per_option_plus_no_value() {
        let fields = fields();
        let records = records();
        let view = ViewConfig::new(
            "k",
            "Board",
            ViewLayout::Kanban {
                config: KanbanConfig {
                    group_by_field: Some("stage".to_string()),
                },
            },
        );
        let columns = kanban_columns(&view, &fields, &records);
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[0].option.map(|o| o.id.as_str()), Some("todo"));
        assert_eq!(columns[0].records[0].id, "2");
        assert_eq!(columns[1].records[0].id, "1");
        let unassigned: Vec<&str> = columns[2].records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(unassigned, vec!["3", "4"]);
    }

    #[test]
    fn non_kanban_views_have_no_columns() {
        let fields = fields();
        let records = records();
        let view = ViewConfig::new("v", "Grid", ViewLayout::Table);
        assert!(kanban_columns(&view, &fields, &records).is_empty());
    }
}
