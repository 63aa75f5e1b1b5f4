//! Workbook reader - spreadsheet file → in-memory [`Workbook`]

use crate::error::CleanResult;
use crate::excel::styles::{read_number_formats, SheetFormats};
use crate::types::{excel_serial, Cell, CellValue, Workbook, Worksheet};
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Display format for whole-day dates that carry no format of their own
pub const DATE_FORMAT: &str = "yyyy-mm-dd";
/// Display format for dates with a time part that carry no format of their own
pub const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";
/// Display format for durations that carry no format of their own
pub const DURATION_FORMAT: &str = "[h]:mm:ss";

/// Reads every worksheet of a workbook into memory
pub struct WorkbookReader {
    path: PathBuf,
}

impl WorkbookReader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Load all sheets, in workbook order
    ///
    /// The format is sniffed from the content, so the file extension (and its casing) does not matter.
    /// Dates from 1904-based workbooks are rebased onto the 1900 system.
    pub fn read(&self) -> CleanResult<Workbook> {
        let bytes = std::fs::read(&self.path)?;
        let number_formats = read_number_formats(&bytes)?;
        let mut source = open_workbook_auto_from_rs(Cursor::new(bytes))?;
        let mut workbook = Workbook::new();

        for sheet_name in source.sheet_names() {
            let values = source.worksheet_range(&sheet_name)?;
            // Formula extraction is best-effort; value-only sheets are still usable
            let formulas = source.worksheet_formula(&sheet_name).ok();

            let worksheet = Self::build_worksheet(
                &sheet_name,
                &values,
                formulas.as_ref(),
                number_formats.get(&sheet_name),
            );
            debug!(
                sheet = %sheet_name,
                rows = worksheet.max_row(),
                "loaded worksheet"
            );
            workbook.add_worksheet(worksheet);
        }

        Ok(workbook)
    }

    /// Place range cells at their absolute positions, with their source number formats
    fn build_worksheet(
        name: &str,
        values: &Range<Data>,
        formulas: Option<&Range<String>>,
        formats: Option<&SheetFormats>,
    ) -> Worksheet {
        let mut worksheet = Worksheet::new(name);

        if let Some((row0, col0)) = values.start() {
            for (r, c, data) in values.cells() {
                let (row, col) = (row0 + r as u32, col0 + c as u32);
                let source_format = formats.and_then(|f| f.get(&(row, col)));
                let cell = convert_cell(data, source_format.map(String::as_str));
                // Empty cells are kept only when they carry a format
                if cell.value.is_empty() && cell.number_format.is_none() {
                    continue;
                }
                worksheet.set_cell(row as usize + 1, col as usize + 1, cell);
            }

            // Trailing empty rows inside the used range still count
            let (height, _) = values.get_size();
            let last_row = row0 as usize + height;
            if height > 0 && worksheet.max_row() < last_row {
                worksheet.cell_mut(last_row, 1);
            }
        }

        if let Some(formulas) = formulas {
            if let Some((row0, col0)) = formulas.start() {
                for (r, c, formula) in formulas.cells() {
                    if formula.is_empty() {
                        continue;
                    }
                    let text = formula.strip_prefix('=').unwrap_or(formula);
                    worksheet.cell_mut(row0 as usize + r + 1, col0 as usize + c + 1).formula =
                        Some(text.to_string());
                }
            }
        }

        worksheet
    }
}

/// Convert a calamine value into a cell
///
/// `source_format` is the cell's own number format; without one, dates and durations
/// get an inferred format. Durations become numbers so they never count as dates.
pub(crate) fn convert_cell(data: &Data, source_format: Option<&str>) -> Cell {
    let mut cell = match data {
        Data::Empty => Cell::default(),
        Data::String(s) => Cell::text(s.clone()),
        Data::Float(f) => Cell::number(*f),
        Data::Int(i) => Cell::number(*i as f64),
        Data::Bool(b) => Cell::new(CellValue::Bool(*b)),
        Data::Error(e) => Cell::new(CellValue::Error(e.to_string())),
        Data::DateTime(dt) if dt.is_duration() => {
            Cell::number(dt.as_f64()).with_format(DURATION_FORMAT)
        }
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => {
                let serial = excel_serial(datetime);
                Cell::new(CellValue::DateTime(serial)).with_format(serial_format(serial))
            }
            None => Cell::number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => match parse_iso(s) {
            Some(serial) => Cell::new(CellValue::DateTime(serial)).with_format(serial_format(serial)),
            None => Cell::text(s.clone()),
        },
        Data::DurationIso(s) => Cell::text(s.clone()),
    };

    if let Some(format) = source_format {
        cell.number_format = Some(format.to_string());
    }
    cell
}

fn serial_format(serial: f64) -> &'static str {
    if serial.fract().abs() > 1e-9 {
        DATETIME_FORMAT
    } else {
        DATE_FORMAT
    }
}

/// Parse an ISO 8601 date or date-time string into an Excel serial
fn parse_iso(s: &str) -> Option<f64> {
    let raw = s.trim().trim_end_matches('Z');
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(excel_serial(date.and_time(NaiveTime::MIN)));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(excel_serial)
}
