use crate::core::downfill::{downfill, FillRule};
use crate::types::{Cell, Workbook, Worksheet};
use tracing::debug;

/// Rows of export banner removed from the top of every sheet
pub const ROWS_TO_DELETE_TOP: usize = 4;
/// Label marking the start of the summary block
pub const TOTAL_INFLOWS_TEXT: &str = "TOTAL INFLOWS";
/// Column B
pub const TOTAL_INFLOWS_COLUMN: usize = 2;
pub const DATE_HEADER: &str = "Date";
pub const DESCRIPTION_HEADER: &str = "Description";

/// Rule constants for a cleaning run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanOptions {
    pub rows_to_delete_top: usize,
    pub marker_text: String,
    pub marker_column: usize,
    pub date_header: String,
    pub description_header: String,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            rows_to_delete_top: ROWS_TO_DELETE_TOP,
            marker_text: TOTAL_INFLOWS_TEXT.to_string(),
            marker_column: TOTAL_INFLOWS_COLUMN,
            date_header: DATE_HEADER.to_string(),
            description_header: DESCRIPTION_HEADER.to_string(),
        }
    }
}

/// What happened to one worksheet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SheetReport {
    pub top_rows_deleted: usize,
    pub rows_trimmed: usize,
    pub dates_filled: usize,
    pub descriptions_filled: usize,
}

/// Totals across every worksheet of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanSummary {
    pub worksheets: usize,
    pub rows_trimmed: usize,
    pub dates_filled: usize,
    pub descriptions_filled: usize,
}

impl CleanSummary {
    fn add(&mut self, report: &SheetReport) {
        self.worksheets += 1;
        self.rows_trimmed += report.rows_trimmed;
        self.dates_filled += report.dates_filled;
        self.descriptions_filled += report.descriptions_filled;
    }
}

/// Runs the four cleaning steps over each worksheet
#[derive(Debug, Clone, Default)]
pub struct Cleaner {
    options: CleanOptions,
}

impl Cleaner {
    #[must_use]
    pub fn new(options: CleanOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CleanOptions {
        &self.options
    }

    /// Clean every worksheet in place
    pub fn clean_workbook(&self, workbook: &mut Workbook) -> CleanSummary {
        let mut summary = CleanSummary::default();
        for worksheet in &mut workbook.worksheets {
            let report = self.clean_worksheet(worksheet);
            summary.add(&report);
        }
        summary
    }

    /// Top-row deletion, trailing trim, then date and description down-fill
    pub fn clean_worksheet(&self, worksheet: &mut Worksheet) -> SheetReport {
        let top_rows_deleted = delete_top_rows(worksheet, self.options.rows_to_delete_top);
        let rows_trimmed = trim_after_marker(
            worksheet,
            self.options.marker_column,
            &self.options.marker_text,
        );
        let dates_filled = downfill_dates(worksheet, &self.options.date_header);
        let descriptions_filled =
            downfill_descriptions(worksheet, &self.options.description_header);

        let report = SheetReport {
            top_rows_deleted,
            rows_trimmed,
            dates_filled,
            descriptions_filled,
        };
        debug!(sheet = %worksheet.name, ?report, "cleaned worksheet");
        report
    }
}

/// Delete the top `n` rows (all rows if the sheet is shorter)
pub fn delete_top_rows(worksheet: &mut Worksheet, n: usize) -> usize {
    if worksheet.max_row() == 0 {
        return 0;
    }
    let amount = n.min(worksheet.max_row());
    worksheet.delete_rows(1, amount)
}

/// Trim the summary block that starts two rows above the "TOTAL INFLOWS" label in column B
pub fn trim_after_total_inflows(worksheet: &mut Worksheet) -> usize {
    trim_after_marker(worksheet, TOTAL_INFLOWS_COLUMN, TOTAL_INFLOWS_TEXT)
}

/// Literal text of a cell; formula cells have none, whatever their cached result
fn literal_text(cell: &Cell) -> Option<&str> {
    if cell.formula.is_some() {
        return None;
    }
    cell.value.as_text()
}

/// Find the first row whose `col` cell is exactly `marker` and delete from two rows above it to the end.
/// Returns the number of rows deleted.
pub fn trim_after_marker(worksheet: &mut Worksheet, col: usize, marker: &str) -> usize {
    let max_row = worksheet.max_row();
    let found = (1..=max_row).find(|&row| {
        worksheet
            .cell(row, col)
            .and_then(literal_text)
            .is_some_and(|text| text == marker)
    });

    let Some(found_row) = found else {
        return 0;
    };

    let start = found_row.saturating_sub(2).max(1);
    if start > max_row {
        return 0;
    }
    worksheet.delete_rows(start, max_row - start + 1)
}

/// 1-based column whose row-1 text matches `name` ignoring case and surrounding whitespace
pub fn find_header_column(worksheet: &Worksheet, name: &str) -> Option<usize> {
    let wanted = name.to_lowercase();
    worksheet
        .rows()
        .next()?
        .iter()
        .position(|cell| {
            literal_text(cell).is_some_and(|text| text.trim().to_lowercase() == wanted)
        })
        .map(|idx| idx + 1)
}

/// Down-fill the date column headed `header`; 0 when the header is missing
pub fn downfill_dates(worksheet: &mut Worksheet, header: &str) -> usize {
    find_header_column(worksheet, header).map_or(0, |col| downfill(worksheet, col, FillRule::Dates))
}

/// Down-fill the description column headed `header`; 0 when the header is missing
pub fn downfill_descriptions(worksheet: &mut Worksheet, header: &str) -> usize {
    find_header_column(worksheet, header)
        .map_or(0, |col| downfill(worksheet, col, FillRule::AnyValue))
}
