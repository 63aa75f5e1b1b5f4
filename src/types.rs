use calamine::{ExcelDateTime, ExcelDateTimeType};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

//==============================================================================
// Cell Values
//==============================================================================

/// Value held by a single worksheet cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Excel serial date/time (days since 1899-12-30, fraction = time of day)
    DateTime(f64),
    /// Error literal such as `#DIV/0!`
    Error(String),
}

impl CellValue {
    /// Build a date value from a calendar date
    pub fn date(date: NaiveDate) -> Self {
        CellValue::DateTime(excel_serial(date.and_time(NaiveTime::MIN)))
    }

    /// Build a date value from a date and time
    pub fn datetime(datetime: NaiveDateTime) -> Self {
        CellValue::DateTime(excel_serial(datetime))
    }

    /// Text content, if this is a string value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Calendar date of a date value
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::DateTime(serial) => {
                ExcelDateTime::new(*serial, ExcelDateTimeType::DateTime, false)
                    .as_datetime()
                    .map(|dt| dt.date())
            }
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

/// Convert a date/time to a 1900-system Excel serial number
///
/// Serials below 61 are one lower than the day count, since Excel counts a 1900-02-29.
pub fn excel_serial(datetime: NaiveDateTime) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)
        .unwrap_or_default()
        .and_time(NaiveTime::MIN);
    let serial = (datetime - epoch).num_milliseconds() as f64 / 86_400_000.0;
    if serial < 61.0 {
        serial - 1.0
    } else {
        serial
    }
}

//==============================================================================
// Cells
//==============================================================================

/// A worksheet cell: value, optional display format, optional formula
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub value: CellValue,
    /// Number-format string applied when the cell is written (e.g. `yyyy-mm-dd`)
    pub number_format: Option<String>,
    /// Formula text without the leading `=`
    pub formula: Option<String>,
}

impl Default for Cell {
    fn default() -> Self {
        Self::new(CellValue::Empty)
    }
}

impl Cell {
    pub fn new(value: CellValue) -> Self {
        Self {
            value,
            number_format: None,
            formula: None,
        }
    }

    pub fn text(s: impl Into<String>) -> Self {
        Self::new(CellValue::Text(s.into()))
    }

    pub fn number(n: f64) -> Self {
        Self::new(CellValue::Number(n))
    }

    pub fn date(date: NaiveDate) -> Self {
        Self::new(CellValue::date(date)).with_format("yyyy-mm-dd")
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.number_format = Some(format.into());
        self
    }

    pub fn with_formula(mut self, formula: impl Into<String>) -> Self {
        self.formula = Some(formula.into());
        self
    }

    /// Empty, or whitespace-only text. Formula cells are never blank.
    pub fn is_blank(&self) -> bool {
        if self.formula.is_some() {
            return false;
        }
        match &self.value {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Holds a usable date (a date-formatted serial or a decoded ISO date).
    /// Durations are read as numbers and never qualify.
    pub fn is_date(&self) -> bool {
        self.formula.is_none() && matches!(self.value, CellValue::DateTime(_))
    }
}

//==============================================================================
// Worksheets
//==============================================================================

/// A named grid of cells, addressed 1-based by (row, column)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Worksheet {
    pub name: String,
    rows: Vec<Vec<Cell>>,
}

impl Worksheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    /// Build a sheet from row-major cells; row 1 is the first inner vector
    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Number of rows, 0 for an empty sheet
    pub fn max_row(&self) -> usize {
        self.rows.len()
    }

    /// Widest row's column count
    pub fn max_column(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Cell at 1-based (row, col); `None` when outside the stored grid
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        if row == 0 || col == 0 {
            return None;
        }
        self.rows.get(row - 1)?.get(col - 1)
    }

    /// Value at 1-based (row, col); cells outside the grid read as empty
    pub fn value(&self, row: usize, col: usize) -> &CellValue {
        const EMPTY: &CellValue = &CellValue::Empty;
        self.cell(row, col).map(|c| &c.value).unwrap_or(EMPTY)
    }

    /// Mutable cell at 1-based (row, col), growing the grid as needed
    ///
    /// # Panics
    /// Panics if `row` or `col` is 0.
    pub fn cell_mut(&mut self, row: usize, col: usize) -> &mut Cell {
        assert!(row >= 1 && col >= 1, "cell coordinates are 1-based");
        if self.rows.len() < row {
            self.rows.resize_with(row, Vec::new);
        }
        let cells = &mut self.rows[row - 1];
        if cells.len() < col {
            cells.resize_with(col, Cell::default);
        }
        &mut cells[col - 1]
    }

    pub fn set_cell(&mut self, row: usize, col: usize, cell: Cell) {
        *self.cell_mut(row, col) = cell;
    }

    /// Delete `amount` rows starting at 1-based `idx`; rows below shift up.
    /// Returns the number of rows actually removed.
    pub fn delete_rows(&mut self, idx: usize, amount: usize) -> usize {
        if idx == 0 || idx > self.rows.len() || amount == 0 {
            return 0;
        }
        let end = (idx - 1 + amount).min(self.rows.len());
        self.rows.drain(idx - 1..end).count()
    }

    /// Rows in order, each as its stored cells (may be shorter than `max_column`)
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }
}

//==============================================================================
// Workbooks
//==============================================================================

/// Ordered collection of worksheets
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Workbook {
    pub worksheets: Vec<Worksheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_worksheet(&mut self, worksheet: Worksheet) {
        self.worksheets.push(worksheet);
    }

    pub fn worksheet(&self, name: &str) -> Option<&Worksheet> {
        self.worksheets.iter().find(|ws| ws.name == name)
    }
}
