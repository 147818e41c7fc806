use common::validation::ValidationErrors;
use thiserror::Error;

/// Why a submission could not be exported.
///
/// Only `Validation` is shown to the user in detail; every other variant is
/// logged and reported as a generic failure.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("export task did not complete: {0}")]
    Blocking(#[from] actix_web::error::BlockingError),
}

/// A single adapter failing to send a single file.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("{0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("FTP error: {0}")]
    Ftp(#[from] suppaftp::FtpError),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upload rejected ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("authentication failed: {0}")]
    Auth(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} must be a port number, got {value:?}")]
    InvalidPort { name: &'static str, value: String },
}
