//! Spreadsheet I/O
//!
//! - Read: any workbook calamine understands (.xlsx, .xlsm, .xlsb, .xls, .ods);
//!   xlsx number formats come from the package's style parts
//! - Write: .xlsx via rust_xlsxwriter

mod reader;
mod styles;
mod writer;

pub use reader::{WorkbookReader, DATETIME_FORMAT, DATE_FORMAT, DURATION_FORMAT};
pub use writer::WorkbookWriter;
