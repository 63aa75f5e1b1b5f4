//! Workbook read/clean/write tests against real .xlsx files

mod common;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use quicken_clean::core::{CleanSummary, Cleaner, DATE_HEADER, DESCRIPTION_HEADER};
use quicken_clean::excel::{WorkbookReader, WorkbookWriter, DATE_FORMAT};
use quicken_clean::types::{Cell, CellValue, Workbook, Worksheet};
use tempfile::TempDir;

const CURRENCY_FORMAT: &str = "\"$\"#,##0.00";

fn march(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
}

fn number_format(sheet: &Worksheet, row: usize, col: usize) -> Option<&str> {
    sheet.cell(row, col).and_then(|c| c.number_format.as_deref())
}

// ═══════════════════════════════════════════════════════════════════════════
// READER TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_reader_loads_sheets_in_order() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("export.xlsx");
    common::write_export_fixture(&path);

    let workbook = WorkbookReader::new(&path).read().unwrap();
    let names: Vec<&str> = workbook.worksheets.iter().map(|ws| ws.name.as_str()).collect();
    assert_eq!(names, vec!["Transactions", "Notes"]);
    assert_eq!(workbook.worksheets[0].max_row(), 13);
    assert_eq!(workbook.worksheets[1].max_row(), 6);
}

#[test]
fn test_reader_detects_date_formatted_numbers() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("export.xlsx");
    common::write_export_fixture(&path);

    let workbook = WorkbookReader::new(&path).read().unwrap();
    let sheet = &workbook.worksheets[0];

    let first = sheet.cell(6, 1).unwrap();
    assert!(first.is_date());
    assert_eq!(first.value.as_date(), Some(march(1)));

    // Plain numbers stay numbers
    assert_eq!(sheet.value(6, 4), &CellValue::Number(-4.5));
    assert!(!sheet.cell(6, 4).unwrap().is_date());
}

#[test]
fn test_reader_keeps_source_number_formats() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("export.xlsx");
    common::write_export_fixture_with_formats(&path, "m/d/yyyy", Some(CURRENCY_FORMAT));

    let workbook = WorkbookReader::new(&path).read().unwrap();
    let sheet = &workbook.worksheets[0];

    assert!(sheet.cell(6, 1).unwrap().is_date());
    assert_eq!(number_format(sheet, 6, 1), Some("m/d/yyyy"));
    assert_eq!(sheet.value(6, 4), &CellValue::Number(-4.5));
    assert_eq!(number_format(sheet, 6, 4), Some(CURRENCY_FORMAT));
    // Unformatted cells carry no format
    assert_eq!(number_format(sheet, 12, 4), None);
    assert_eq!(number_format(sheet, 6, 3), None);
}

#[test]
fn test_reader_rebases_1904_dates() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("mac.xlsx");
    // 2024-01-01 in the 1904 date system
    common::write_single_date_fixture(&path, 43830.0, "yyyy-mm-dd");
    common::set_date1904(&path);

    let workbook = WorkbookReader::new(&path).read().unwrap();
    let cell = workbook.worksheets[0].cell(1, 1).unwrap();
    assert!(cell.is_date());
    assert_eq!(cell.value.as_date(), NaiveDate::from_ymd_opt(2024, 1, 1));

    // Written back in the 1900 system, the date is unchanged
    let output = temp_dir.path().join("mac-clean.xlsx");
    WorkbookWriter::new(&workbook).write(&output).unwrap();
    let back = WorkbookReader::new(&output).read().unwrap();
    assert_eq!(
        back.worksheets[0].value(1, 1).as_date(),
        NaiveDate::from_ymd_opt(2024, 1, 1)
    );
}

#[test]
fn test_reader_missing_file_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = WorkbookReader::new(temp_dir.path().join("missing.xlsx")).read();
    assert!(result.is_err());
}

#[test]
fn test_reader_rejects_non_spreadsheet() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("notes.xlsx");
    std::fs::write(&path, "not a workbook").unwrap();
    assert!(WorkbookReader::new(&path).read().is_err());
}

// ═══════════════════════════════════════════════════════════════════════════
// WRITER TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_writer_round_trips_values() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("out.xlsx");

    let mut sheet = Worksheet::new("Ledger");
    sheet.set_cell(1, 1, Cell::text("Date"));
    sheet.set_cell(1, 2, Cell::text("Cleared"));
    sheet.set_cell(2, 1, Cell::date(march(15)));
    sheet.set_cell(2, 2, Cell::new(CellValue::Bool(true)));
    sheet.set_cell(3, 3, Cell::number(99.25));
    let mut workbook = Workbook::new();
    workbook.add_worksheet(sheet);

    WorkbookWriter::new(&workbook).write(&path).unwrap();
    let back = WorkbookReader::new(&path).read().unwrap();

    let sheet = back.worksheet("Ledger").unwrap();
    assert_eq!(sheet.max_row(), 3);
    assert_eq!(sheet.value(1, 1).as_text(), Some("Date"));
    assert_eq!(sheet.value(2, 1).as_date(), Some(march(15)));
    assert_eq!(
        sheet.cell(2, 1).unwrap().number_format.as_deref(),
        Some(DATE_FORMAT)
    );
    assert_eq!(sheet.value(2, 2), &CellValue::Bool(true));
    assert_eq!(sheet.value(3, 3), &CellValue::Number(99.25));
}

#[test]
fn test_writer_keeps_formula_text() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("formula.xlsx");

    let mut sheet = Worksheet::new("Sheet1");
    sheet.set_cell(1, 1, Cell::number(21.0));
    sheet.set_cell(1, 2, Cell::number(42.0).with_formula("A1*2"));
    let mut workbook = Workbook::new();
    workbook.add_worksheet(sheet);

    WorkbookWriter::new(&workbook).write(&path).unwrap();
    let back = WorkbookReader::new(&path).read().unwrap();

    let cell = back.worksheets[0].cell(1, 2).unwrap();
    assert_eq!(cell.formula.as_deref(), Some("A1*2"));
}

#[test]
fn test_writer_empty_workbook_sheet() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("empty.xlsx");

    let mut workbook = Workbook::new();
    workbook.add_worksheet(Worksheet::new("Blank"));
    WorkbookWriter::new(&workbook).write(&path).unwrap();

    assert!(path.exists());
    let back = WorkbookReader::new(&path).read().unwrap();
    assert_eq!(back.worksheets.len(), 1);
    assert_eq!(back.worksheets[0].max_row(), 0);
}

// ═══════════════════════════════════════════════════════════════════════════
// FULL PIPELINE
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_clean_export_fixture() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("export.xlsx");
    let output = temp_dir.path().join("export-clean.xlsx");
    common::write_export_fixture(&input);

    let mut workbook = WorkbookReader::new(&input).read().unwrap();
    let summary = Cleaner::default().clean_workbook(&mut workbook);
    assert_eq!(
        summary,
        CleanSummary {
            worksheets: 2,
            rows_trimmed: 4,
            dates_filled: 2,
            descriptions_filled: 2,
        }
    );

    WorkbookWriter::new(&workbook).write(&output).unwrap();
    let cleaned = WorkbookReader::new(&output).read().unwrap();

    let tx = cleaned.worksheet("Transactions").unwrap();
    assert_eq!(tx.max_row(), 5);
    assert_eq!(tx.value(1, 1).as_text(), Some("Date"));

    let dates: Vec<Option<NaiveDate>> = (2..=5).map(|row| tx.value(row, 1).as_date()).collect();
    assert_eq!(
        dates,
        vec![
            Some(march(1)),
            Some(march(1)),
            Some(march(3)),
            Some(march(3)),
        ]
    );

    let descriptions: Vec<Option<&str>> = (2..=5).map(|row| tx.value(row, 3).as_text()).collect();
    assert_eq!(
        descriptions,
        vec![Some("Coffee"), Some("Coffee"), Some("Rent"), Some("Rent")]
    );

    // Account column is not a fill target
    assert_eq!(tx.value(5, 2), &CellValue::Empty);

    let notes = cleaned.worksheet("Notes").unwrap();
    assert_eq!(notes.max_row(), 2);
    assert_eq!(notes.value(1, 1).as_text(), Some("note 5"));
}

#[test]
fn test_clean_keeps_source_formats() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("export.xlsx");
    let output = temp_dir.path().join("export-clean.xlsx");
    common::write_export_fixture_with_formats(&input, "m/d/yyyy", Some(CURRENCY_FORMAT));

    let mut workbook = WorkbookReader::new(&input).read().unwrap();
    Cleaner::default().clean_workbook(&mut workbook);
    WorkbookWriter::new(&workbook).write(&output).unwrap();

    let cleaned = WorkbookReader::new(&output).read().unwrap();
    let tx = cleaned.worksheet("Transactions").unwrap();

    // Rows 3 and 5 were filled and inherit the source date format
    let date_formats: Vec<Option<&str>> = (2..=5).map(|row| number_format(tx, row, 1)).collect();
    assert_eq!(date_formats, vec![Some("m/d/yyyy"); 4]);
    assert_eq!(tx.value(3, 1).as_date(), Some(march(1)));

    let amount_formats: Vec<Option<&str>> = (2..=5).map(|row| number_format(tx, row, 4)).collect();
    assert_eq!(amount_formats, vec![Some(CURRENCY_FORMAT); 4]);
    assert_eq!(tx.value(4, 4), &CellValue::Number(-1200.0));
}

#[test]
fn test_clean_sheet_shorter_than_banner() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("short.xlsx");
    common::write_numbered_fixture(&input, 3);

    let mut workbook = WorkbookReader::new(&input).read().unwrap();
    let summary = Cleaner::default().clean_workbook(&mut workbook);

    assert_eq!(summary.worksheets, 1);
    assert_eq!(summary.rows_trimmed, 0);
    assert_eq!(workbook.worksheets[0].max_row(), 0);
}

#[test]
fn test_clean_is_idempotent_on_fills() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("export.xlsx");
    common::write_export_fixture(&input);

    let mut workbook = WorkbookReader::new(&input).read().unwrap();
    Cleaner::default().clean_workbook(&mut workbook);

    let mut sheet = workbook.worksheets[0].clone();
    let before = sheet.clone();
    assert_eq!(quicken_clean::core::downfill_dates(&mut sheet, DATE_HEADER), 0);
    assert_eq!(
        quicken_clean::core::downfill_descriptions(&mut sheet, DESCRIPTION_HEADER),
        0
    );
    assert_eq!(sheet, before);
}
