//! Fixture workbooks shaped like a personal-finance export.

#![allow(dead_code)]

use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

/// 2024-03-01 as an Excel serial
pub const MARCH_1: f64 = 45352.0;
/// 2024-03-03 as an Excel serial
pub const MARCH_3: f64 = 45354.0;

/// Two sheets:
///
/// "Transactions" (13 rows): 4 banner rows, header `Date | Account | Description | Amount`,
/// four transactions with gaps, two blank rows, then TOTAL INFLOWS / TOTAL OUTFLOWS in column B.
///
/// "Notes" (6 rows): no headers the cleaner recognises and no marker.
pub fn write_export_fixture(path: &Path) {
    write_export_fixture_with_formats(path, "yyyy-mm-dd", None);
}

/// [`write_export_fixture`] with the given date format and, optionally, a format on the amounts.
pub fn write_export_fixture_with_formats(
    path: &Path,
    date_format: &str,
    amount_format: Option<&str>,
) {
    let mut workbook = Workbook::new();
    let date = Format::new().set_num_format(date_format);
    let amount = amount_format.map(|code| Format::new().set_num_format(code));

    let sheet = workbook.add_worksheet();
    sheet.set_name("Transactions").unwrap();
    sheet.write_string(0, 0, "Quicken Export").unwrap();
    sheet.write_string(1, 0, "Transactions - March 2024").unwrap();
    sheet.write_string(3, 0, "Generated 2024-04-01").unwrap();

    sheet.write_string(4, 0, "Date").unwrap();
    sheet.write_string(4, 1, "Account").unwrap();
    sheet.write_string(4, 2, "Description").unwrap();
    sheet.write_string(4, 3, "Amount").unwrap();

    sheet.write_number_with_format(5, 0, MARCH_1, &date).unwrap();
    sheet.write_string(5, 1, "Checking").unwrap();
    sheet.write_string(5, 2, "Coffee").unwrap();
    write_amount(sheet, 5, -4.5, amount.as_ref());

    sheet.write_string(6, 1, "Checking").unwrap();
    write_amount(sheet, 6, -12.0, amount.as_ref());

    sheet.write_number_with_format(7, 0, MARCH_3, &date).unwrap();
    sheet.write_string(7, 1, "Savings").unwrap();
    sheet.write_string(7, 2, "Rent").unwrap();
    write_amount(sheet, 7, -1200.0, amount.as_ref());

    sheet.write_string(8, 2, "  ").unwrap();
    write_amount(sheet, 8, -3.0, amount.as_ref());

    sheet.write_string(11, 1, "TOTAL INFLOWS").unwrap();
    sheet.write_number(11, 3, 100.0).unwrap();
    sheet.write_string(12, 1, "TOTAL OUTFLOWS").unwrap();
    sheet.write_number(12, 3, -1219.5).unwrap();

    let notes = workbook.add_worksheet();
    notes.set_name("Notes").unwrap();
    for row in 0..6u32 {
        notes.write_string(row, 0, format!("note {}", row + 1)).unwrap();
        notes.write_number(row, 1, f64::from(row)).unwrap();
    }

    workbook.save(path).unwrap();
}

fn write_amount(sheet: &mut Worksheet, row: u32, value: f64, format: Option<&Format>) {
    match format {
        Some(format) => sheet.write_number_with_format(row, 3, value, format).unwrap(),
        None => sheet.write_number(row, 3, value).unwrap(),
    };
}

/// A single sheet whose only cells are `count` numbered rows in column A.
pub fn write_numbered_fixture(path: &Path, count: u32) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for row in 0..count {
        sheet.write_number(row, 0, f64::from(row + 1)).unwrap();
    }
    workbook.save(path).unwrap();
}

/// Rewrite a saved workbook so it declares the 1904 date system.
pub fn set_date1904(path: &Path) {
    let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut parts: Vec<(String, Vec<u8>)> = Vec::new();
    for i in 0..archive.len() {
        let mut part = archive.by_index(i).unwrap();
        let mut bytes = Vec::new();
        part.read_to_end(&mut bytes).unwrap();
        parts.push((part.name().to_string(), bytes));
    }
    drop(archive);

    let mut writer = ZipWriter::new(File::create(path).unwrap());
    for (name, bytes) in parts {
        let bytes = if name == "xl/workbook.xml" {
            let xml = String::from_utf8(bytes).unwrap();
            assert!(xml.contains("<workbookPr "), "{xml}");
            xml.replace("<workbookPr ", "<workbookPr date1904=\"1\" ").into_bytes()
        } else {
            bytes
        };
        writer.start_file(name, SimpleFileOptions::default()).unwrap();
        writer.write_all(&bytes).unwrap();
    }
    writer.finish().unwrap();
}

/// A single sheet holding one date-formatted serial at A1.
pub fn write_single_date_fixture(path: &Path, serial: f64, date_format: &str) {
    let mut workbook = Workbook::new();
    let date = Format::new().set_num_format(date_format);
    let sheet = workbook.add_worksheet();
    sheet.write_number_with_format(0, 0, serial, &date).unwrap();
    workbook.save(path).unwrap();
}
