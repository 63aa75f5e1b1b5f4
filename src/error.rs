use thiserror::Error;

pub type CleanResult<T> = Result<T, CleanError>;

#[derive(Error, Debug)]
pub enum CleanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read workbook: {0}")]
    Read(#[from] calamine::Error),

    #[error("Failed to open xlsx package: {0}")]
    Package(#[from] zip::result::ZipError),

    #[error("Failed to parse cell styles: {0}")]
    Styles(#[from] quick_xml::Error),

    #[error("Failed to write workbook: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}
