use crate::core::{CleanSummary, Cleaner, ROWS_TO_DELETE_TOP, TOTAL_INFLOWS_TEXT};
use crate::error::{CleanError, CleanResult};
use crate::excel::{WorkbookReader, WorkbookWriter};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Extension every cleaned file is written with
const OUTPUT_EXTENSION: &str = "xlsx";

/// `<dir>/<stem>-clean.<ext>`; `ext` is kept only when it is already xlsx (any casing)
pub fn output_path(input: &Path) -> CleanResult<PathBuf> {
    let stem = input
        .file_stem()
        .ok_or_else(|| CleanError::InvalidPath(format!("{} has no file name", input.display())))?;

    let extension = match input.extension() {
        Some(ext) if ext.eq_ignore_ascii_case(OUTPUT_EXTENSION) => ext.to_os_string(),
        _ => OUTPUT_EXTENSION.into(),
    };

    let mut file_name = stem.to_os_string();
    file_name.push("-clean.");
    file_name.push(extension);
    Ok(input.with_file_name(file_name))
}

/// Execute the clean command: load, clean every worksheet, save next to the input
pub fn clean(input: PathBuf) -> CleanResult<CleanSummary> {
    let output = output_path(&input)?;

    info!(input = %input.display(), "loading workbook");
    let mut workbook = WorkbookReader::new(&input).read()?;

    let summary = Cleaner::default().clean_workbook(&mut workbook);

    WorkbookWriter::new(&workbook).write(&output)?;
    info!(output = %output.display(), "saved workbook");

    print_summary(&output, &summary);
    Ok(summary)
}

fn print_summary(output: &Path, summary: &CleanSummary) {
    println!(
        "{} {}",
        "✅ Saved cleaned file:".bold().green(),
        output.display()
    );
    println!("   Deleted top {} rows per worksheet", ROWS_TO_DELETE_TOP);
    println!(
        "   Trimmed {} rows total after '{}' rule",
        summary.rows_trimmed,
        TOTAL_INFLOWS_TEXT
    );
    println!(
        "   Filled {} blank date cells across {} worksheet(s)",
        summary.dates_filled,
        summary.worksheets
    );
    println!(
        "   Filled {} blank description cells across {} worksheet(s)",
        summary.descriptions_filled,
        summary.worksheets
    );
}
