use crate::browser::BrowserError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid search criteria: {0}")]
    InvalidCriteria(String),

    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<printpdf::Error> for AppError {
    fn from(e: printpdf::Error) -> Self {
        AppError::Pdf(e.to_string())
    }
}

impl From<csv::IntoInnerError<csv::Writer<Vec<u8>>>> for AppError {
    fn from(e: csv::IntoInnerError<csv::Writer<Vec<u8>>>) -> Self {
        AppError::Io(e.into_error())
    }
}
