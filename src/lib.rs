//! `multiview-db` is the data and transformation engine behind an embeddable multi-view table:
//! typed fields, open-map records, and several views (grid, kanban, gallery, calendar, timeline,
//! chart) over one shared record set.
//!
//! The engine keeps no state between calls. A hosting document owns the whole
//! [`table::TableState`]; every operation borrows the current snapshot and returns a new one.
//!
//! ## What's inside
//!
//! - **Data model** ([`types`], [`table`]): [`types::FieldConfig`], [`types::RecordData`],
//!   [`types::ViewConfig`] and the snapshot operations on [`table::TableState`].
//! - **Field type conversion** ([`convert`]): a total `convert(value, from, to)` over all field
//!   types, plus lossy-conversion warnings and option generation.
//! - **Chart aggregation** ([`chart`]): grouped, sorted, Top-N-truncated series for every chart
//!   family in one [`chart::ChartBundle`].
//! - **Spreadsheet import** ([`ingestion`]): CSV and workbook parsing, column type inference,
//!   mapping proposals and commit.
//! - **View projection** ([`views`], [`processing`]): filters, sorts, visible fields, kanban
//!   columns.
//! - **Identifiers** ([`id`]).
//!
//! Cell values are [`serde_json::Value`]s. The coercion rules shared by every module live in
//! [`value`].
//!
//! ## Quick example: build a table and chart it
//!
//! ```rust
//! use multiview_db::chart::{build_chart, Aggregation, ChartConfig, YAxisField};
//! use multiview_db::types::{FieldConfig, FieldType, RecordData};
//! use serde_json::json;
//!
//! let fields = vec![
//!     FieldConfig::new("cat", "Category", FieldType::Text),
//!     FieldConfig::new("v", "Value", FieldType::Number),
//! ];
//! let records = vec![
//!     RecordData::new("1").with("cat", json!("A")).with("v", json!(10)),
//!     RecordData::new("2").with("cat", json!("A")).with("v", json!(20)),
//!     RecordData::new("3").with("cat", json!("B")).with("v", json!(5)),
//! ];
//! let config = ChartConfig {
//!     x_axis_field: Some("cat".to_string()),
//!     y_axis_fields: vec![YAxisField::new("v")],
//!     aggregation: Aggregation::Sum,
//!     ..ChartConfig::default()
//! };
//!
//! let bundle = build_chart(&config, &fields, &records);
//! assert_eq!(bundle.chart_data[0].category, "A");
//! assert_eq!(bundle.chart_data[0].value("v"), 30.0);
//! assert_eq!(bundle.chart_data[1].value("v"), 5.0);
//! ```
//!
//! ## Quick example: import a CSV
//!
//! ```rust
//! use multiview_db::ingestion::{commit_import, parse_spreadsheet, preview_import, ImportOptions};
//! use multiview_db::table::TableState;
//!
//! # fn main() -> Result<(), multiview_db::ImportError> {
//! let state = TableState::new_default();
//! let sheet = parse_spreadsheet(
//!     b"Title,Due\nWrite docs,2024-01-05\nShip,2024-02-01\n",
//!     "tasks.csv",
//!     &ImportOptions::default(),
//! )?;
//!
//! let preview = preview_import(&sheet, &state.fields);
//! let outcome = commit_import(&state, &sheet, &preview.mappings)?;
//! assert_eq!(outcome.records_imported, 2);
//! assert_eq!(outcome.fields_created, 1); // `Due`; `Title` maps onto the existing field
//! # Ok(())
//! # }
//! ```
//!
//! ## Converting a column
//!
//! ```rust
//! use multiview_db::convert::convert_field_value;
//! use multiview_db::types::FieldType;
//! use serde_json::json;
//!
//! assert_eq!(convert_field_value(&json!(0.5), FieldType::Number, FieldType::Progress, None), json!(50));
//! assert_eq!(convert_field_value(&json!(500), FieldType::Number, FieldType::Progress, None), json!(50));
//! assert_eq!(convert_field_value(&json!(true), FieldType::Checkbox, FieldType::Text, None), json!("Yes"));
//! ```
//!
//! ## Modules
//!
//! - [`types`]: fields, records, views
//! - [`table`]: whole-snapshot table operations
//! - [`convert`]: field type conversion engine
//! - [`chart`]: chart aggregation pipeline
//! - [`ingestion`]: spreadsheet import
//! - [`views`] / [`processing`]: view projection and record transformations
//! - [`value`]: cell coercions
//! - [`id`]: identifier generation
//! - [`error`]: error types used across import

pub mod chart;
pub mod convert;
pub mod error;
pub mod id;
pub mod ingestion;
pub mod processing;
pub mod table;
pub mod types;
pub mod value;
pub mod views;

pub use error::{ImportError, ImportResult};
pub use id::{generate_id, IdKind};
pub use table::TableState;
