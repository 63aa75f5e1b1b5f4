//! Down-fill: copy the last non-blank value of a column into the blank cells below it

use crate::types::{Cell, CellValue, Worksheet};

/// Which cells seed the fill and what is copied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillRule {
    /// Only real dates seed the fill; value and display format are copied.
    /// Other non-blank cells are left alone and keep the previous date.
    Dates,
    /// Any non-blank cell seeds the fill; value (and formula) are copied, format is not
    AnyValue,
}

/// Content remembered from the last seeding cell
#[derive(Debug, Default)]
struct Carry {
    value: Option<CellValue>,
    formula: Option<String>,
    number_format: Option<String>,
}

impl Carry {
    fn remember(&mut self, rule: FillRule, cell: &Cell) {
        self.value = Some(cell.value.clone());
        match rule {
            FillRule::Dates => {
                // A later date without a format keeps the earlier format
                if cell.number_format.is_some() {
                    self.number_format = cell.number_format.clone();
                }
            }
            FillRule::AnyValue => self.formula = cell.formula.clone(),
        }
    }

    fn apply(&self, cell: &mut Cell) -> bool {
        let Some(value) = &self.value else {
            return false;
        };
        cell.value = value.clone();
        if self.formula.is_some() {
            cell.formula = self.formula.clone();
        }
        if self.number_format.is_some() {
            cell.number_format = self.number_format.clone();
        }
        true
    }
}

/// Down-fill column `col` from row 2 to the last row. Returns the number of cells filled.
pub fn downfill(worksheet: &mut Worksheet, col: usize, rule: FillRule) -> usize {
    let mut carry = Carry::default();
    let mut filled = 0;

    for row in 2..=worksheet.max_row() {
        let seeds = match worksheet.cell(row, col) {
            Some(cell) => match rule {
                FillRule::Dates => cell.is_date(),
                FillRule::AnyValue => !cell.is_blank(),
            },
            None => false,
        };

        if seeds {
            if let Some(cell) = worksheet.cell(row, col) {
                carry.remember(rule, cell);
            }
            continue;
        }

        let blank = worksheet.cell(row, col).map_or(true, Cell::is_blank);
        if blank && carry.apply(worksheet.cell_mut(row, col)) {
            filled += 1;
        }
    }

    filled
}
