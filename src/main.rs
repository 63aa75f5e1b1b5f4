use clap::Parser;
use quicken_clean::cli;
use quicken_clean::error::CleanResult;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quicken-clean")]
#[command(about = "Clean Quicken XLSX exports: drop top rows, trim after TOTAL INFLOWS, down-fill dates and descriptions.")]
#[command(long_about = "quicken-clean - tidy a personal-finance spreadsheet export

Per worksheet:
  1. Delete the top four rows (export banner)
  2. Find \"TOTAL INFLOWS\" in column B (exact, case-sensitive) and delete
     from two rows above it to the end of the sheet
  3. Down-fill blank cells under the \"Date\" header with the last real date
  4. Down-fill blank cells under the \"Description\" header with the last value

OUTPUT:
  <input-stem>-clean.xlsx next to the input file

EXAMPLE:
  quicken-clean -i exports/march.xlsx   # writes exports/march-clean.xlsx

Set RUST_LOG=quicken_clean=debug for per-worksheet details.")]
#[command(version)]
struct Cli {
    /// Input workbook (.xlsx, .xlsm, .xlsb, .xls, .ods)
    #[arg(short, long)]
    input: PathBuf,
}

fn main() -> CleanResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quicken_clean=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    cli::clean(cli.input)?;
    Ok(())
}
