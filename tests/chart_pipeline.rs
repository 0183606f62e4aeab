use serde_json::json;

use multiview_db::chart::{
    build_chart, build_view_chart, Aggregation, AxisFormat, ChartConfig, ChartType, ColorScheme,
    SortOrder, YAxisField, OTHERS_COLOR, OTHERS_LABEL,
};
use multiview_db::ingestion::{commit_import, parse_spreadsheet_from_path, preview_import, ImportOptions};
use multiview_db::types::{FieldConfig, FieldType, RecordData, SelectOption, ViewType};
use multiview_db::TableState;

fn sales_table() -> TableState {
    let sheet = parse_spreadsheet_from_path("tests/fixtures/sales.csv", &ImportOptions::default()).unwrap();
    let state = TableState::new_default();
    let preview = preview_import(&sheet, &state.fields);
    commit_import(&state, &sheet, &preview.mappings).unwrap().state
}

fn field_id(state: &TableState, title: &str) -> String {
    state.fields.iter().find(|f| f.title == title).unwrap().id.clone()
}

#[test]
fn imported_sales_aggregate_by_region() {
    let state = sales_table();
    let config = ChartConfig {
        x_axis_field: Some(field_id(&state, "Region")),
        y_axis_fields: vec![YAxisField::new(field_id(&state, "Revenue"))],
        aggregation: Aggregation::Sum,
        sort_order: SortOrder::Desc,
        ..ChartConfig::default()
    };
    let bundle = build_chart(&config, &state.fields, &state.data);
    let revenue = field_id(&state, "Revenue");
    let rows: Vec<(String, f64)> = bundle
        .chart_data
        .iter()
        .map(|r| (r.category.clone(), r.value(&revenue)))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("South".to_string(), 1750.0),
            ("North".to_string(), 1500.0),
            ("East".to_string(), 450.0),
            ("West".to_string(), 200.0),
        ]
    );
    assert_eq!(bundle.stats.total, 6);
    assert_eq!(bundle.stats.categories, 4);
    assert_eq!(bundle.stats.min, 200.0);
    assert_eq!(bundle.stats.max, 1200.0);
    assert_eq!(bundle.stats.avg, 650.0);
}

#[test]
fn blank_categories_group_under_empty_label() {
    let state = sales_table();
    let config = ChartConfig {
        chart_type: ChartType::Pie,
        x_axis_field: Some(field_id(&state, "Product")),
        ..ChartConfig::default()
    };
    let bundle = build_chart(&config, &state.fields, &state.data);
    let names: Vec<&str> = bundle.pie_data.iter().map(|s| s.name.as_str()).collect();
    assert!(names.contains(&"(Empty)"));
    assert!(bundle.series_config.contains_key("(Empty)"));
}

#[test]
fn pie_top_n_folds_the_rest_into_others() {
    let fields = vec![
        FieldConfig::new("c", "Category", FieldType::Text),
        FieldConfig::new("v", "Value", FieldType::Number),
    ];
    let records: Vec<RecordData> = (1..=12)
        .map(|i| RecordData::new(format!("r{i}")).with("c", json!(format!("C{i}"))).with("v", json!(i)))
        .collect();
    let config = ChartConfig {
        chart_type: ChartType::Donut,
        x_axis_field: Some("c".to_string()),
        y_axis_fields: vec![YAxisField::new("v")],
        aggregation: Aggregation::Sum,
        sort_order: SortOrder::Desc,
        top_n: 5,
        ..ChartConfig::default()
    };
    let bundle = build_chart(&config, &fields, &records);
    assert_eq!(bundle.pie_data.len(), 6);
    let others = &bundle.pie_data[5];
    assert_eq!(others.name, OTHERS_LABEL);
    assert_eq!(others.value, 28.0);
    assert_eq!(others.fill, OTHERS_COLOR);
    // Categorical rows are truncated without an Others row.
    assert_eq!(bundle.chart_data.len(), 5);
}

#[test]
fn select_categories_read_as_labels() {
    let fields = vec![
        FieldConfig::new("s", "Stage", FieldType::Select).with_options(vec![
            SelectOption::new("o1", "Lead", "#111"),
            SelectOption::new("o2", "Won", "#222"),
        ]),
        FieldConfig::new("amt", "Amount", FieldType::Number),
    ];
    let records = vec![
        RecordData::new("1").with("s", json!("o1")).with("amt", json!(10)),
        RecordData::new("2").with("s", json!("o2")).with("amt", json!(40)),
        RecordData::new("3").with("s", json!("o1")).with("amt", json!(30)),
    ];
    let config = ChartConfig {
        chart_type: ChartType::Radar,
        x_axis_field: Some("s".to_string()),
        y_axis_fields: vec![YAxisField::new("amt")],
        aggregation: Aggregation::Avg,
        ..ChartConfig::default()
    };
    let bundle = build_chart(&config, &fields, &records);
    assert_eq!(bundle.chart_data[0].category, "Lead");
    assert_eq!(bundle.chart_data[0].value("amt"), 20.0);
    assert_eq!(bundle.radar_data[1].subject, "Won");
    assert_eq!(bundle.radar_data[1].values["Amount"], 40.0);
    assert!(bundle.series_config.contains_key("Lead"));
}

#[test]
fn scatter_and_radial_shapes() {
    let state = sales_table();
    let config = ChartConfig {
        chart_type: ChartType::Scatter,
        x_axis_field: Some(field_id(&state, "Product")),
        y_axis_fields: vec![
            YAxisField::new(field_id(&state, "Units")),
            YAxisField::new(field_id(&state, "Revenue")),
        ],
        color_scheme: ColorScheme::Cool,
        ..ChartConfig::default()
    };
    let bundle = build_chart(&config, &state.fields, &state.data);
    assert_eq!(bundle.scatter_data.len(), 6);
    assert_eq!(bundle.scatter_data[0].x, 10.0);
    assert_eq!(bundle.scatter_data[0].y, 1200.0);
    assert_eq!(bundle.scatter_data[0].z, 10.0);
    assert_eq!(bundle.scatter_data[0].name, "Widget");
    assert!(bundle.radial_data.len() <= 8);
}

#[test]
fn chart_view_defaults_and_tick_format() {
    let state = sales_table().add_view("Revenue", ViewType::Chart);
    let view = state.views.last().unwrap().clone();
    let mut config = view.chart_config().unwrap().clone();
    config.x_axis_field = Some(field_id(&state, "Region"));
    config.y_axis_fields = vec![YAxisField::new(field_id(&state, "Revenue"))];
    config.aggregation = Aggregation::Max;
    config.y_axis_config.format = AxisFormat::Compact;

    let mut updated = view.clone();
    updated.layout = multiview_db::types::ViewLayout::Chart { config };
    let state = state.update_view(updated);

    let bundle = build_view_chart(state.views.last().unwrap(), &state.fields, &state.data).unwrap();
    assert_eq!(bundle.chart_data[0].category, "North");
    assert_eq!(bundle.chart_data[0].value(&field_id(&state, "Revenue")), 1200.0);
    assert_eq!(bundle.format_tick(1_500.0), "1.5K");
    assert_eq!(bundle.format_tick(12.0), "12");
}

#[test]
fn missing_axes_never_fail() {
    let state = sales_table();
    let config = ChartConfig {
        x_axis_field: Some(field_id(&state, "Region")),
        aggregation: Aggregation::Sum,
        ..ChartConfig::default()
    };
    let bundle = build_chart(&config, &state.fields, &state.data);
    assert!(bundle.chart_data.is_empty());
    assert!(bundle.scatter_data.is_empty());
    assert_eq!(bundle.stats.min, 0.0);
}
