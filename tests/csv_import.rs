use serde_json::json;

use multiview_db::ingestion::{
    commit_import, parse_spreadsheet, parse_spreadsheet_from_path, preview_import, ImportOptions,
    MappingAction,
};
use multiview_db::types::FieldType;
use multiview_db::{ImportError, TableState};

#[test]
fn parses_fixture_with_header_row() {
    let sheet = parse_spreadsheet_from_path("tests/fixtures/tasks.csv", &ImportOptions::default()).unwrap();
    assert_eq!(
        sheet.headers,
        vec!["Title", "Status", "Due", "Points", "Done", "Owner Email", "Link"]
    );
    assert_eq!(sheet.total_rows, 6);
    assert_eq!(sheet.rows[0][0], json!("Write brief"));
}

#[test]
fn infers_every_column_type() {
    let sheet = parse_spreadsheet_from_path("tests/fixtures/tasks.csv", &ImportOptions::default()).unwrap();
    let preview = preview_import(&sheet, &[]);
    let types: Vec<FieldType> = preview.mappings.iter().map(|m| m.inferred_type).collect();
    assert_eq!(
        types,
        vec![
            // Six distinct titles over six samples still fit the select heuristic.
            FieldType::Select,
            FieldType::Select,
            FieldType::Date,
            FieldType::Number,
            FieldType::Checkbox,
            FieldType::Email,
            FieldType::Url,
        ]
    );
    assert_eq!(preview.sample_rows.len(), 5);
}

#[test]
fn no_header_row_uses_synthetic_headers() {
    let opts = ImportOptions {
        has_header_row: false,
        ..Default::default()
    };
    let sheet = parse_spreadsheet_from_path("tests/fixtures/no_header.csv", &opts).unwrap();
    assert_eq!(sheet.headers, vec!["Column 1", "Column 2"]);
    assert_eq!(sheet.total_rows, 3);
    assert_eq!(sheet.rows[1][1], json!("1,850"));
}

#[test]
fn empty_file_is_reported() {
    let err = parse_spreadsheet_from_path("tests/fixtures/empty.csv", &ImportOptions::default()).unwrap_err();
    assert!(matches!(err, ImportError::EmptyFile));
}

#[test]
fn missing_file_is_io_error() {
    let err = parse_spreadsheet_from_path("tests/fixtures/does_not_exist.csv", &ImportOptions::default())
        .unwrap_err();
    assert!(matches!(err, ImportError::Io(_)));
}

#[test]
fn commit_builds_typed_records() {
    let bytes = std::fs::read("tests/fixtures/tasks.csv").unwrap();
    let sheet = parse_spreadsheet(&bytes, "tasks.csv", &ImportOptions::default()).unwrap();
    let state = TableState::new_default();
    let preview = preview_import(&sheet, &state.fields);

    // `Title` lands in the default title field.
    assert_eq!(
        preview.mappings[0].action,
        MappingAction::MapExisting {
            field_id: state.fields[1].id.clone()
        }
    );

    let outcome = commit_import(&state, &sheet, &preview.mappings).unwrap();
    assert_eq!(outcome.records_imported, 6);
    assert_eq!(outcome.fields_created, 6);

    let next = &outcome.state;
    let field = |title: &str| next.fields.iter().find(|f| f.title == title).unwrap();
    let status = field("Status");
    assert_eq!(status.field_type, FieldType::Select);
    let labels: Vec<&str> = status.options().iter().map(|o| o.label.as_str()).collect();
    assert_eq!(labels, vec!["Open", "Closed", "Blocked"]);

    let first = &next.data[0];
    let open_id = status.option_by_label("Open").unwrap().id.clone();
    assert_eq!(first.get(&status.id), &json!(open_id));
    assert_eq!(first.get(&field("Due").id), &json!("2024-01-05T00:00:00.000Z"));
    assert_eq!(first.get(&field("Points").id), &json!(3));
    assert_eq!(first.get(&field("Done").id), &json!(true));
    assert_eq!(next.data[1].get(&field("Done").id), &json!(false));
    assert_eq!(first.get(&field("Link").id), &json!("https://example.com/1"));
}

#[test]
fn commit_into_existing_number_field_strips_separators() {
    let opts = ImportOptions {
        has_header_row: false,
        ..Default::default()
    };
    let sheet = parse_spreadsheet_from_path("tests/fixtures/no_header.csv", &opts).unwrap();
    let mut preview = preview_import(&sheet, &[]);
    preview.mappings[1].action = MappingAction::CreateNew {
        field_type: FieldType::Number,
        title: "Amount".to_string(),
    };
    let outcome = commit_import(&TableState::new_default(), &sheet, &preview.mappings).unwrap();
    let amount = outcome.state.fields.iter().find(|f| f.title == "Amount").unwrap();
    let values: Vec<_> = outcome.state.data.iter().map(|r| r.get(&amount.id).clone()).collect();
    assert_eq!(values, vec![json!(1200), json!(1850), json!(300)]);
}

fn import_csv(csv: &str) -> (Vec<FieldType>, TableState) {
    let sheet = parse_spreadsheet(csv.as_bytes(), "upload.csv", &ImportOptions::default()).unwrap();
    let state = TableState::new_default();
    let preview = preview_import(&sheet, &state.fields);
    let types = preview.mappings.iter().map(|m| m.inferred_type).collect();
    let outcome = commit_import(&state, &sheet, &preview.mappings).unwrap();
    (types, outcome.state)
}

fn column(state: &TableState, title: &str) -> Vec<serde_json::Value> {
    let field = state.fields.iter().find(|f| f.title == title).unwrap();
    state.data.iter().map(|r| r.get(&field.id).clone()).collect()
}

#[test]
fn single_letter_answers_import_as_checkbox() {
    let (types, state) = import_csv("Task,Done\na,Y\nb,N\nc,y\n");
    assert_eq!(types[1], FieldType::Checkbox);
    assert_eq!(column(&state, "Done"), vec![json!(true), json!(false), json!(true)]);
}

#[test]
fn inferred_date_column_commits_dates() {
    let (types, state) = import_csv("Task,When\na,2024-01-15 09:30\nb,2024/2/1\n");
    assert_eq!(types[1], FieldType::Date);
    assert_eq!(
        column(&state, "When"),
        vec![json!("2024-01-15T09:30:00.000Z"), json!("2024-02-01T00:00:00.000Z")]
    );

    // Dates with trailing text the parser rejects stay text instead of becoming nulls.
    let (types, state) = import_csv("Task,When\na,2024-01-15 9:30 AM\nb,2024-02-01 (Thu)\n");
    assert_eq!(types[1], FieldType::Text);
    assert_eq!(
        column(&state, "When"),
        vec![json!("2024-01-15 9:30 AM"), json!("2024-02-01 (Thu)")]
    );
}

#[test]
fn numeric_csv_cells_decode_as_serial_dates() {
    let sheet = parse_spreadsheet(b"Task,Due\na,45292\nb,45323\n", "due.csv", &ImportOptions::default())
        .unwrap();
    let mut preview = preview_import(&sheet, &[]);
    preview.mappings[1].action = MappingAction::CreateNew {
        field_type: FieldType::Date,
        title: "Due".to_string(),
    };
    let outcome = commit_import(&TableState::new_default(), &sheet, &preview.mappings).unwrap();
    assert_eq!(
        column(&outcome.state, "Due"),
        vec![json!("2024-01-01T00:00:00.000Z"), json!("2024-02-01T00:00:00.000Z")]
    );
}
