//! Whole-table snapshots and the operations that produce new ones.
//!
//! A [`TableState`] is the complete attribute bag a hosting document stores for one table.
//! Every operation borrows the current snapshot and returns a new one; nothing is mutated in
//! place. Guarded operations (deleting the last view, touching the `id` field, naming an unknown
//! id) return an unchanged copy instead of failing.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::chart::{Aggregation, ChartConfig, ChartType};
use crate::convert::{convert_field_value, expand_option_refs, options_from_values, MAX_GENERATED_OPTIONS};
use crate::id::{generate_id, IdKind};
use crate::types::{
    CalendarConfig, FieldConfig, FieldType, GalleryConfig, KanbanConfig, RecordData, SelectOption,
    TimelineConfig, ViewConfig, ViewLayout, ViewType, ID_FIELD_ID,
};
use crate::value::number_or_zero;
use crate::views::{project, ViewProjection};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableState {
    pub fields: Vec<FieldConfig>,
    pub views: Vec<ViewConfig>,
    pub current_view: String,
    pub data: Vec<RecordData>,
}

impl TableState {
    /// A fresh table: the `id` field, a `Title` text field and one table view.
    pub fn new_default() -> Self {
        let view = ViewConfig::new(generate_id(Some(IdKind::View)), "Table", ViewLayout::Table);
        Self {
            fields: vec![
                FieldConfig::new(ID_FIELD_ID, "ID", FieldType::Id),
                FieldConfig::new(generate_id(Some(IdKind::Field)), "Title", FieldType::Text),
            ],
            current_view: view.id.clone(),
            views: vec![view],
            data: Vec::new(),
        }
    }

    pub fn field(&self, field_id: &str) -> Option<&FieldConfig> {
        self.fields.iter().find(|f| f.id == field_id)
    }

    pub fn view(&self, view_id: &str) -> Option<&ViewConfig> {
        self.views.iter().find(|v| v.id == view_id)
    }

    pub fn record(&self, record_id: &str) -> Option<&RecordData> {
        self.data.iter().find(|r| r.id == record_id)
    }

    /// The active view, falling back to the first view when the pointer is stale.
    pub fn active_view(&self) -> Option<&ViewConfig> {
        self.view(&self.current_view).or_else(|| self.views.first())
    }

    fn is_id_field(&self, field_id: &str) -> bool {
        self.field(field_id).is_some_and(|f| f.field_type == FieldType::Id)
    }

    // ---- fields ----

    /// Append a field. Duplicate ids and a second `id`-typed field are ignored.
    pub fn add_field(&self, field: FieldConfig) -> Self {
        let mut next = self.clone();
        let duplicate = next.field(&field.id).is_some();
        let second_id = field.field_type == FieldType::Id
            && next.fields.iter().any(|f| f.field_type == FieldType::Id);
        if !duplicate && !second_id {
            next.fields.push(field);
        }
        next
    }

    /// Replace the field with the same id. The `id` field keeps its type.
    pub fn update_field(&self, field: FieldConfig) -> Self {
        let mut next = self.clone();
        if let Some(slot) = next.fields.iter_mut().find(|f| f.id == field.id) {
            let locked = slot.field_type == FieldType::Id;
            *slot = field;
            if locked {
                slot.field_type = FieldType::Id;
            } else if slot.field_type == FieldType::Id {
                return self.clone();
            }
        }
        next
    }

    /// Remove a field, its cells, and every view reference to it.
    pub fn delete_field(&self, field_id: &str) -> Self {
        if self.field(field_id).is_none() || self.is_id_field(field_id) {
            return self.clone();
        }
        let mut next = self.clone();
        next.fields.retain(|f| f.id != field_id);
        for record in &mut next.data {
            record.values.remove(field_id);
        }
        for view in &mut next.views {
            strip_field_from_view(view, field_id);
        }
        next
    }

    /// Move the field at index `from` to index `to`. Out-of-range indices are ignored.
    pub fn reorder_field(&self, from: usize, to: usize) -> Self {
        let mut next = self.clone();
        if from >= next.fields.len() || to >= next.fields.len() || from == to {
            return next;
        }
        let field = next.fields.remove(from);
        next.fields.insert(to, field);
        next
    }

    /// Change a field's type and convert every record's cell to it.
    ///
    /// Select cells are read through their option labels. A select or multi-select target with
    /// no explicit `options` gets options generated from the column's distinct values.
    pub fn convert_field_type(
        &self,
        field_id: &str,
        to: FieldType,
        options: Option<Vec<SelectOption>>,
    ) -> Self {
        let Some(source) = self.field(field_id) else {
            return self.clone();
        };
        if source.field_type == FieldType::Id || to == FieldType::Id {
            return self.clone();
        }
        let from = source.field_type;
        let expanded: Vec<Value> = self
            .data
            .iter()
            .map(|r| expand_option_refs(r.get(field_id), source))
            .collect();

        let mut target = source.clone();
        target.field_type = to;
        target.options = if to.has_options() {
            Some(options.unwrap_or_else(|| {
                if from == to {
                    source.options().to_vec()
                } else {
                    options_from_values(expanded.iter(), from, MAX_GENERATED_OPTIONS)
                }
            }))
        } else {
            None
        };

        let mut next = self.clone();
        if from != to {
            for (record, cell) in next.data.iter_mut().zip(&expanded) {
                let converted = convert_field_value(cell, from, to, Some(&target));
                record.set(field_id, converted);
            }
        }
        if let Some(slot) = next.fields.iter_mut().find(|f| f.id == field_id) {
            *slot = target;
        }
        next
    }

    // ---- records ----

    /// Append a record with a fresh id and timestamps. Every non-`id` field gets a cell:
    /// the supplied value, the next sequence number for auto-number fields, or null.
    pub fn add_record(&self, values: Map<String, Value>) -> Self {
        let mut next = self.clone();
        let now = Utc::now();
        let mut record = RecordData::new(generate_id(Some(IdKind::Record)));
        record.created_time = Some(now);
        record.updated_time = Some(now);

        for field in &self.fields {
            let value = match field.field_type {
                FieldType::Id => continue,
                FieldType::AutoNumber => Value::from(self.next_auto_number(&field.id)),
                _ => values.get(&field.id).cloned().unwrap_or(Value::Null),
            };
            record.set(field.id.clone(), value);
        }
        next.data.push(record);
        next
    }

    fn next_auto_number(&self, field_id: &str) -> i64 {
        let max = self
            .data
            .iter()
            .map(|r| number_or_zero(r.get(field_id)))
            .filter(|n| *n < i64::MAX as f64)
            .map(|n| n as i64)
            .max()
            .unwrap_or(0);
        max.saturating_add(1)
    }

    /// Set one cell, touch `updatedTime`, and backfill any fields the record is missing.
    pub fn update_record(&self, record_id: &str, field_id: &str, value: Value) -> Self {
        if self.field(field_id).is_none() || self.is_id_field(field_id) {
            return self.clone();
        }
        let mut next = self.clone();
        let field_ids: Vec<&str> = self
            .fields
            .iter()
            .filter(|f| f.field_type != FieldType::Id)
            .map(|f| f.id.as_str())
            .collect();
        if let Some(record) = next.data.iter_mut().find(|r| r.id == record_id) {
            for id in field_ids {
                record.values.entry(id.to_string()).or_insert(Value::Null);
            }
            record.set(field_id, value);
            record.updated_time = Some(Utc::now());
        }
        next
    }

    pub fn delete_records(&self, record_ids: &[String]) -> Self {
        let mut next = self.clone();
        next.data.retain(|r| !record_ids.contains(&r.id));
        next
    }

    // ---- views ----

    /// Append a view of `view_type` with defaults picked from the current fields, and make it
    /// the active view.
    pub fn add_view(&self, name: impl Into<String>, view_type: ViewType) -> Self {
        let first_of = |t: FieldType| self.fields.iter().find(|f| f.field_type == t).map(|f| f.id.clone());
        let layout = match view_type {
            ViewType::Table => ViewLayout::Table,
            ViewType::Kanban => ViewLayout::Kanban {
                config: KanbanConfig {
                    group_by_field: first_of(FieldType::Select),
                },
            },
            ViewType::Gallery => ViewLayout::Gallery {
                config: GalleryConfig {
                    cover_field: first_of(FieldType::Attachment),
                    ..GalleryConfig::default()
                },
            },
            ViewType::Calendar => ViewLayout::Calendar {
                config: CalendarConfig {
                    date_field: first_of(FieldType::Date),
                    ..CalendarConfig::default()
                },
            },
            ViewType::Timeline => ViewLayout::Timeline {
                config: TimelineConfig {
                    start_date_field: first_of(FieldType::Date),
                    ..TimelineConfig::default()
                },
            },
            ViewType::Chart => ViewLayout::Chart {
                config: ChartConfig {
                    chart_type: ChartType::Bar,
                    x_axis_field: self
                        .fields
                        .iter()
                        .find(|f| f.field_type != FieldType::Id)
                        .map(|f| f.id.clone()),
                    aggregation: Aggregation::None,
                    ..ChartConfig::default()
                },
            },
        };

        let mut next = self.clone();
        let view = ViewConfig::new(generate_id(Some(IdKind::View)), name, layout);
        next.current_view = view.id.clone();
        next.views.push(view);
        next
    }

    /// Replace the view with the same id.
    ///
    /// Rejected when a kanban groups by a non-select field or a calendar dates by a non-date field.
    pub fn update_view(&self, view: ViewConfig) -> Self {
        if !self.layout_is_valid(&view.layout) {
            return self.clone();
        }
        let mut next = self.clone();
        if let Some(slot) = next.views.iter_mut().find(|v| v.id == view.id) {
            *slot = view;
        }
        next
    }

    fn layout_is_valid(&self, layout: &ViewLayout) -> bool {
        let has_type = |id: &Option<String>, t: FieldType| match id {
            Some(id) => self.field(id).is_some_and(|f| f.field_type == t),
            None => true,
        };
        match layout {
            ViewLayout::Kanban { config } => has_type(&config.group_by_field, FieldType::Select),
            ViewLayout::Calendar { config } => has_type(&config.date_field, FieldType::Date),
            ViewLayout::Table
            | ViewLayout::Gallery { .. }
            | ViewLayout::Timeline { .. }
            | ViewLayout::Chart { .. } => true,
        }
    }

    /// Copy a view under a fresh id, placed right after the original.
    pub fn duplicate_view(&self, view_id: &str) -> Self {
        let mut next = self.clone();
        let Some(pos) = next.views.iter().position(|v| v.id == view_id) else {
            return next;
        };
        let mut copy = next.views[pos].clone();
        copy.id = generate_id(Some(IdKind::View));
        copy.name = format!("{} copy", copy.name);
        next.views.insert(pos + 1, copy);
        next
    }

    /// Remove a view. The last remaining view cannot be deleted; deleting the active view makes
    /// the first remaining view active.
    pub fn delete_view(&self, view_id: &str) -> Self {
        let mut next = self.clone();
        if next.views.len() <= 1 || next.view(view_id).is_none() {
            return next;
        }
        next.views.retain(|v| v.id != view_id);
        if next.view(&next.current_view).is_none() {
            if let Some(first) = next.views.first() {
                next.current_view = first.id.clone();
            }
        }
        next
    }

    pub fn set_current_view(&self, view_id: &str) -> Self {
        let mut next = self.clone();
        if next.view(view_id).is_some() {
            next.current_view = view_id.to_string();
        }
        next
    }

    /// Fields and records of one view after its filters and sorts.
    pub fn project_view(&self, view_id: &str) -> Option<ViewProjection<'_>> {
        self.view(view_id)
            .map(|view| project(view, &self.fields, &self.data))
    }
}

fn strip_field_from_view(view: &mut ViewConfig, field_id: &str) {
    let clear = |slot: &mut Option<String>| {
        if slot.as_deref() == Some(field_id) {
            *slot = None;
        }
    };
    view.hidden_fields.retain(|id| id != field_id);
    view.field_order.retain(|id| id != field_id);
    view.groups.retain(|id| id != field_id);
    view.sorts.retain(|s| s.field_id != field_id);
    view.filters.retain(|f| f.field_id != field_id);

    match &mut view.layout {
        ViewLayout::Table => {}
        ViewLayout::Kanban { config } => clear(&mut config.group_by_field),
        ViewLayout::Gallery { config } => clear(&mut config.cover_field),
        ViewLayout::Calendar { config } => {
            clear(&mut config.date_field);
            clear(&mut config.end_date_field);
            clear(&mut config.title_field);
        }
        ViewLayout::Timeline { config } => {
            clear(&mut config.start_date_field);
            clear(&mut config.end_date_field);
            clear(&mut config.title_field);
            clear(&mut config.progress_field);
            clear(&mut config.group_by_field);
        }
        ViewLayout::Chart { config } => {
            clear(&mut config.x_axis_field);
            config.y_axis_fields.retain(|y| y.field_id != field_id);
        }
    }
}
