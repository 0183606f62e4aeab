//! Core data model: typed fields, open-map records, and views.
//!
//! All types serialize with camelCase keys so they round-trip through the hosting document's
//! attribute bag unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::chart::ChartConfig;

/// Conventional id of the single, undeletable `id`-typed field.
pub const ID_FIELD_ID: &str = "id";

/// Column type. Every operation that dispatches on it matches exhaustively, so adding a variant
/// surfaces every call site that needs a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Number,
    Select,
    MultiSelect,
    Date,
    Checkbox,
    Person,
    Attachment,
    Url,
    Email,
    Phone,
    Rating,
    Progress,
    Formula,
    Relation,
    CreatedTime,
    UpdatedTime,
    CreatedBy,
    UpdatedBy,
    AutoNumber,
    Id,
}

impl FieldType {
    /// Every field type, in declaration order.
    pub const ALL: [FieldType; 21] = [
        FieldType::Text,
        FieldType::Number,
        FieldType::Select,
        FieldType::MultiSelect,
        FieldType::Date,
        FieldType::Checkbox,
        FieldType::Person,
        FieldType::Attachment,
        FieldType::Url,
        FieldType::Email,
        FieldType::Phone,
        FieldType::Rating,
        FieldType::Progress,
        FieldType::Formula,
        FieldType::Relation,
        FieldType::CreatedTime,
        FieldType::UpdatedTime,
        FieldType::CreatedBy,
        FieldType::UpdatedBy,
        FieldType::AutoNumber,
        FieldType::Id,
    ];

    /// Wire name, identical to the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Select => "select",
            FieldType::MultiSelect => "multi_select",
            FieldType::Date => "date",
            FieldType::Checkbox => "checkbox",
            FieldType::Person => "person",
            FieldType::Attachment => "attachment",
            FieldType::Url => "url",
            FieldType::Email => "email",
            FieldType::Phone => "phone",
            FieldType::Rating => "rating",
            FieldType::Progress => "progress",
            FieldType::Formula => "formula",
            FieldType::Relation => "relation",
            FieldType::CreatedTime => "created_time",
            FieldType::UpdatedTime => "updated_time",
            FieldType::CreatedBy => "created_by",
            FieldType::UpdatedBy => "updated_by",
            FieldType::AutoNumber => "auto_number",
            FieldType::Id => "id",
        }
    }

    /// The value an absent or null cell reads as.
    pub fn default_value(&self) -> Value {
        match self {
            FieldType::Text
            | FieldType::Url
            | FieldType::Email
            | FieldType::Phone
            | FieldType::Formula
            | FieldType::CreatedBy
            | FieldType::UpdatedBy
            | FieldType::Id => Value::String(String::new()),
            FieldType::Number | FieldType::Rating | FieldType::Progress | FieldType::AutoNumber => {
                Value::from(0)
            }
            FieldType::Checkbox => Value::Bool(false),
            FieldType::Select | FieldType::Date | FieldType::CreatedTime | FieldType::UpdatedTime => {
                Value::Null
            }
            FieldType::MultiSelect
            | FieldType::Person
            | FieldType::Attachment
            | FieldType::Relation => Value::Array(Vec::new()),
        }
    }

    /// Types whose values are maintained by the system rather than typed in by a user.
    pub fn is_computed(&self) -> bool {
        matches!(
            self,
            FieldType::Id
                | FieldType::CreatedTime
                | FieldType::UpdatedTime
                | FieldType::CreatedBy
                | FieldType::UpdatedBy
                | FieldType::AutoNumber
                | FieldType::Formula
        )
    }

    /// `select` or `multi_select`.
    pub fn has_options(&self) -> bool {
        matches!(self, FieldType::Select | FieldType::MultiSelect)
    }
}

/// One choice of a select/multi-select field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub id: String,
    pub label: String,
    pub color: String,
}

impl SelectOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            color: color.into(),
        }
    }
}

/// A typed column definition shared by all views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_show: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectOption>>,
    /// Type-specific tag: number format (`"currency"`), date pattern, rating scale (`"5"`/`"10"`),
    /// attachment layout (`"single:small"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldConfig {
    /// Create a field with no options, format or display hints.
    pub fn new(id: impl Into<String>, title: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            field_type,
            width: None,
            is_show: None,
            options: None,
            format: None,
            description: None,
        }
    }

    /// Builder-style setter for select options.
    pub fn with_options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = Some(options);
        self
    }

    /// Builder-style setter for the format tag.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Options as a slice (empty when unset).
    pub fn options(&self) -> &[SelectOption] {
        self.options.as_deref().unwrap_or(&[])
    }

    /// Look up an option by id.
    pub fn option(&self, option_id: &str) -> Option<&SelectOption> {
        self.options().iter().find(|o| o.id == option_id)
    }

    /// Look up an option by label, ignoring case and surrounding whitespace.
    pub fn option_by_label(&self, label: &str) -> Option<&SelectOption> {
        let needle = label.trim().to_lowercase();
        self.options()
            .iter()
            .find(|o| o.label.trim().to_lowercase() == needle)
    }

    /// Rating scale: 10 when `format == "10"`, otherwise 5.
    pub fn max_rating(&self) -> u32 {
        match self.format.as_deref() {
            Some("10") => 10,
            _ => 5,
        }
    }
}

static NULL: Value = Value::Null;

/// One row, keyed by field id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordData {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_time: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub values: Map<String, Value>,
}

impl RecordData {
    /// Create an empty record with the given id and no timestamps.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created_time: None,
            updated_time: None,
            values: Map::new(),
        }
    }

    /// Builder-style cell setter.
    pub fn with(mut self, field_id: impl Into<String>, value: Value) -> Self {
        self.values.insert(field_id.into(), value);
        self
    }

    /// Cell value; absent keys read as null.
    pub fn get(&self, field_id: &str) -> &Value {
        self.values.get(field_id).unwrap_or(&NULL)
    }

    pub fn set(&mut self, field_id: impl Into<String>, value: Value) {
        self.values.insert(field_id.into(), value);
    }
}

/// Discriminant of [`ViewLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewType {
    Table,
    Kanban,
    Gallery,
    Calendar,
    Timeline,
    Chart,
}

/// Kanban board grouped by a select field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KanbanConfig {
    #[serde(default)]
    pub group_by_field: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitType {
    #[default]
    Cover,
    Contain,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardSize {
    Small,
    #[default]
    Medium,
    Large,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryConfig {
    #[serde(default)]
    pub cover_field: Option<String>,
    #[serde(default)]
    pub fit_type: FitType,
    #[serde(default)]
    pub card_size: CardSize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarConfig {
    #[serde(default)]
    pub date_field: Option<String>,
    #[serde(default)]
    pub end_date_field: Option<String>,
    #[serde(default)]
    pub title_field: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleUnit {
    Day,
    #[default]
    Week,
    Month,
    Quarter,
    Year,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineConfig {
    #[serde(default)]
    pub start_date_field: Option<String>,
    #[serde(default)]
    pub end_date_field: Option<String>,
    #[serde(default)]
    pub title_field: Option<String>,
    #[serde(default)]
    pub progress_field: Option<String>,
    #[serde(default)]
    pub group_by_field: Option<String>,
    #[serde(default)]
    pub scale_unit: ScaleUnit,
}

/// The type-specific part of a view. Exactly one config exists and it always matches the
/// view's `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewLayout {
    Table,
    Kanban {
        #[serde(rename = "kanbanConfig", default)]
        config: KanbanConfig,
    },
    Gallery {
        #[serde(rename = "galleryConfig", default)]
        config: GalleryConfig,
    },
    Calendar {
        #[serde(rename = "calendarConfig", default)]
        config: CalendarConfig,
    },
    Timeline {
        #[serde(rename = "timelineConfig", default)]
        config: TimelineConfig,
    },
    Chart {
        #[serde(rename = "chartConfig", default)]
        config: ChartConfig,
    },
}

impl ViewLayout {
    pub fn view_type(&self) -> ViewType {
        match self {
            ViewLayout::Table => ViewType::Table,
            ViewLayout::Kanban { .. } => ViewType::Kanban,
            ViewLayout::Gallery { .. } => ViewType::Gallery,
            ViewLayout::Calendar { .. } => ViewType::Calendar,
            ViewLayout::Timeline { .. } => ViewType::Timeline,
            ViewLayout::Chart { .. } => ViewType::Chart,
        }
    }
}

/// Filter comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    IsEmpty,
    IsNotEmpty,
    GreaterThan,
    LessThan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewFilter {
    pub id: String,
    pub field_id: String,
    pub operator: FilterOperator,
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSort {
    pub field_id: String,
    #[serde(default)]
    pub direction: SortDirection,
}

/// A named projection over the shared fields and records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewConfig {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub layout: ViewLayout,
    #[serde(default)]
    pub filters: Vec<ViewFilter>,
    #[serde(default)]
    pub sorts: Vec<ViewSort>,
    /// Field ids the records are grouped by, outermost first.
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub hidden_fields: Vec<String>,
    #[serde(default)]
    pub field_order: Vec<String>,
}

impl ViewConfig {
    /// Create a view with no filters, sorts, groups or ordering.
    pub fn new(id: impl Into<String>, name: impl Into<String>, layout: ViewLayout) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            layout,
            filters: Vec::new(),
            sorts: Vec::new(),
            groups: Vec::new(),
            hidden_fields: Vec::new(),
            field_order: Vec::new(),
        }
    }

    pub fn view_type(&self) -> ViewType {
        self.layout.view_type()
    }

    /// Chart configuration, when this is a chart view.
    pub fn chart_config(&self) -> Option<&ChartConfig> {
        match &self.layout {
            ViewLayout::Chart { config } => Some(config),
            _ => None,
        }
    }
}
