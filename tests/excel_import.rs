#![cfg(feature = "excel_test_writer")]

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::json;

use multiview_db::ingestion::{
    commit_import, parse_spreadsheet, parse_spreadsheet_from_path, preview_import, ImportOptions,
    SheetSelection,
};
use multiview_db::types::FieldType;
use multiview_db::TableState;

fn tmp_file(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("multiview-db-{name}-{nanos}.xlsx"))
}

fn write_tasks_xlsx(path: &PathBuf) {
    use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

    let mut wb = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    let ws = wb.add_worksheet();
    ws.set_name("Tasks").unwrap();
    ws.write_string(0, 0, "Title").unwrap();
    ws.write_string(0, 1, "Points").unwrap();
    ws.write_string(0, 2, "Due").unwrap();
    ws.write_string(0, 3, "Done").unwrap();

    let rows = [("Write brief", 3.0, "2024-01-05", true), ("Ship", 8.0, "2024-02-15", false)];
    for (i, (title, points, due, done)) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        ws.write_string(r, 0, *title).unwrap();
        ws.write_number(r, 1, *points).unwrap();
        let date = ExcelDateTime::parse_from_str(due).unwrap();
        ws.write_datetime_with_format(r, 2, &date, &date_format).unwrap();
        ws.write_boolean(r, 3, *done).unwrap();
    }

    let other = wb.add_worksheet();
    other.set_name("Notes").unwrap();
    other.write_string(0, 0, "Note").unwrap();
    other.write_string(1, 0, "hello").unwrap();

    wb.save(path).unwrap();
}

#[test]
fn reads_first_sheet_with_typed_cells() {
    let path = tmp_file("tasks");
    write_tasks_xlsx(&path);

    let sheet = parse_spreadsheet_from_path(&path, &ImportOptions::default()).unwrap();
    assert_eq!(sheet.headers, vec!["Title", "Points", "Due", "Done"]);
    assert_eq!(sheet.total_rows, 2);
    assert_eq!(sheet.rows[0][1], json!(3));
    assert_eq!(sheet.rows[0][2], json!("2024-01-05T00:00:00.000Z"));
    assert_eq!(sheet.rows[1][3], json!(false));

    let types: Vec<FieldType> = preview_import(&sheet, &[])
        .mappings
        .iter()
        .map(|m| m.inferred_type)
        .collect();
    assert_eq!(
        types,
        vec![FieldType::Text, FieldType::Number, FieldType::Date, FieldType::Checkbox]
    );
    let _ = std::fs::remove_file(&path);
}

#[test]
fn named_sheet_is_selected() {
    let path = tmp_file("notes");
    write_tasks_xlsx(&path);
    let bytes = std::fs::read(&path).unwrap();

    let opts = ImportOptions {
        sheet: SheetSelection::Named("Notes".to_string()),
        ..Default::default()
    };
    let sheet = parse_spreadsheet(&bytes, "book.xlsx", &opts).unwrap();
    assert_eq!(sheet.headers, vec!["Note"]);
    assert_eq!(sheet.rows[0][0], json!("hello"));

    let missing = ImportOptions {
        sheet: SheetSelection::Named("Nope".to_string()),
        ..Default::default()
    };
    assert!(parse_spreadsheet(&bytes, "book.xlsx", &missing).is_err());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn workbook_commits_into_table() {
    let path = tmp_file("commit");
    write_tasks_xlsx(&path);

    let sheet = parse_spreadsheet_from_path(&path, &ImportOptions::default()).unwrap();
    let state = TableState::new_default();
    let preview = preview_import(&sheet, &state.fields);
    let outcome = commit_import(&state, &sheet, &preview.mappings).unwrap();
    assert_eq!(outcome.records_imported, 2);

    let due = outcome.state.fields.iter().find(|f| f.title == "Due").unwrap();
    assert_eq!(due.field_type, FieldType::Date);
    assert_eq!(outcome.state.data[1].get(&due.id), &json!("2024-02-15T00:00:00.000Z"));
    let _ = std::fs::remove_file(&path);
}
