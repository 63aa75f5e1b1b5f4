//! quicken-clean - tidy personal-finance spreadsheet exports
//!
//! Each worksheet of an export goes through four steps:
//!
//! 1. The export banner (top four rows) is removed
//! 2. The summary block starting two rows above `TOTAL INFLOWS` in column B is trimmed
//! 3. Blank cells under the `Date` header are filled with the last real date above them
//! 4. Blank cells under the `Description` header are filled with the last value above them
//!
//! A small static file server (`quicken-server`) publishes the index page and
//! the workbooks.
//!
//! # Example
//!
//! ```no_run
//! use quicken_clean::core::Cleaner;
//! use quicken_clean::excel::{WorkbookReader, WorkbookWriter};
//! use std::path::Path;
//!
//! let mut workbook = WorkbookReader::new("march.xlsx").read()?;
//! let summary = Cleaner::default().clean_workbook(&mut workbook);
//! WorkbookWriter::new(&workbook).write(Path::new("march-clean.xlsx"))?;
//!
//! println!("Filled {} dates", summary.dates_filled);
//! # Ok::<(), quicken_clean::error::CleanError>(())
//! ```

pub mod cli;
pub mod core;
pub mod error;
pub mod excel;
pub mod serve;
pub mod types;

// Re-export commonly used types
pub use error::{CleanError, CleanResult};
pub use types::{Cell, CellValue, Workbook, Worksheet};
