//! Cleaning rules for personal-finance exports

pub mod cleaner;
pub mod downfill;

pub use cleaner::{
    delete_top_rows, downfill_dates, downfill_descriptions, find_header_column,
    trim_after_marker, trim_after_total_inflows, CleanOptions, CleanSummary, Cleaner,
    SheetReport, DATE_HEADER, DESCRIPTION_HEADER, ROWS_TO_DELETE_TOP, TOTAL_INFLOWS_TEXT,
};
pub use downfill::{downfill, FillRule};
