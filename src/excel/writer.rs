//! Workbook writer - in-memory [`Workbook`] → .xlsx

use crate::error::CleanResult;
use crate::excel::reader::DATE_FORMAT;
use crate::types::{Cell, CellValue, Workbook, Worksheet};
use rust_xlsxwriter::{Format, Formula, Workbook as XlsxWorkbook, Worksheet as XlsxWorksheet};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Writes a workbook to an .xlsx file
pub struct WorkbookWriter<'a> {
    workbook: &'a Workbook,
}

impl<'a> WorkbookWriter<'a> {
    pub fn new(workbook: &'a Workbook) -> Self {
        Self { workbook }
    }

    /// Write every worksheet in order and save to `output_path`
    pub fn write(&self, output_path: &Path) -> CleanResult<()> {
        let mut xlsx = XlsxWorkbook::new();
        // One Format per distinct number-format string
        let mut formats: HashMap<String, Format> = HashMap::new();

        for sheet in &self.workbook.worksheets {
            let worksheet = xlsx.add_worksheet();
            worksheet.set_name(&sheet.name)?;
            Self::write_sheet(worksheet, sheet, &mut formats)?;
            debug!(sheet = %sheet.name, rows = sheet.max_row(), "wrote worksheet");
        }

        xlsx.save(output_path)?;
        Ok(())
    }

    fn write_sheet(
        worksheet: &mut XlsxWorksheet,
        sheet: &Worksheet,
        formats: &mut HashMap<String, Format>,
    ) -> CleanResult<()> {
        for (row_idx, cells) in sheet.rows().enumerate() {
            for (col_idx, cell) in cells.iter().enumerate() {
                let format = Self::format_for(cell, formats);
                Self::write_cell(worksheet, row_idx as u32, col_idx as u16, cell, format)?;
            }
        }
        Ok(())
    }

    /// Number format to apply; dates without one still get a date format
    fn format_for<'f>(cell: &Cell, formats: &'f mut HashMap<String, Format>) -> Option<&'f Format> {
        let pattern = match (&cell.number_format, &cell.value) {
            (Some(pattern), _) => pattern.as_str(),
            (None, CellValue::DateTime(_)) => DATE_FORMAT,
            (None, _) => return None,
        };
        let format: &Format = formats
            .entry(pattern.to_string())
            .or_insert_with(|| Format::new().set_num_format(pattern));
        Some(format)
    }

    fn write_cell(
        worksheet: &mut XlsxWorksheet,
        row: u32,
        col: u16,
        cell: &Cell,
        format: Option<&Format>,
    ) -> CleanResult<()> {
        if let Some(text) = &cell.formula {
            let formula = Formula::new(format!("={}", text)).set_result(cached_result(&cell.value));
            match format {
                Some(format) => worksheet.write_formula_with_format(row, col, formula, format)?,
                None => worksheet.write_formula(row, col, formula)?,
            };
            return Ok(());
        }

        match (&cell.value, format) {
            (CellValue::Empty, Some(format)) => {
                worksheet.write_blank(row, col, format)?;
            }
            (CellValue::Empty, None) => {}
            (CellValue::Text(s), Some(format)) => {
                worksheet.write_string_with_format(row, col, s, format)?;
            }
            (CellValue::Text(s), None) | (CellValue::Error(s), None) => {
                worksheet.write_string(row, col, s)?;
            }
            (CellValue::Error(s), Some(format)) => {
                worksheet.write_string_with_format(row, col, s, format)?;
            }
            (CellValue::Number(n), Some(format)) | (CellValue::DateTime(n), Some(format)) => {
                worksheet.write_number_with_format(row, col, *n, format)?;
            }
            (CellValue::Number(n), None) | (CellValue::DateTime(n), None) => {
                worksheet.write_number(row, col, *n)?;
            }
            (CellValue::Bool(b), Some(format)) => {
                worksheet.write_boolean_with_format(row, col, *b, format)?;
            }
            (CellValue::Bool(b), None) => {
                worksheet.write_boolean(row, col, *b)?;
            }
        }
        Ok(())
    }
}

/// Cached value stored alongside a formula
fn cached_result(value: &CellValue) -> String {
    match value {
        CellValue::Empty => String::new(),
        CellValue::Text(s) | CellValue::Error(s) => s.clone(),
        CellValue::Number(n) | CellValue::DateTime(n) => n.to_string(),
        CellValue::Bool(true) => "TRUE".to_string(),
        CellValue::Bool(false) => "FALSE".to_string(),
    }
}
