//! Optional transmission of finished export files.
//!
//! Each adapter is switched on by its own `EXPORT_TO_*` flag. The local files
//! are already on disk when uploads run, so a failing adapter only produces a
//! failed [`UploadReport`]; it never undoes the export.
//!
//! Adapters:
//! - `ftp`: `STOR` into `FTP_REMOTE_DIR`, creating missing directories.
//! - `gdrive`: service-account upload to a Google Drive folder.
//! - `gas_webapp`: base64 JSON POST to a Google Apps Script web app.

use crate::config::ExportConfig;
use crate::error::UploadError;
use common::requests::UploadReport;
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;

mod ftp;
mod gas_webapp;
mod gdrive;

pub use ftp::FtpUploader;
pub use gas_webapp::GasWebAppUploader;
pub use gdrive::GDriveUploader;

/// Connection and request timeout shared by every adapter.
pub(crate) const UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);

pub trait Uploader: Send + Sync {
    /// Name shown to the user, e.g. `FTP`.
    fn name(&self) -> &'static str;

    /// Makes exactly one attempt to send the file at `path`.
    fn upload(&self, path: &Path) -> Result<(), UploadError>;
}

/// Instantiates only the adapters enabled in `config`.
pub fn uploaders_from_config(config: &ExportConfig) -> Vec<Box<dyn Uploader>> {
    let mut uploaders: Vec<Box<dyn Uploader>> = Vec::new();
    if config.export_to_ftp {
        uploaders.push(Box::new(FtpUploader::new(config.ftp.clone())));
    }
    if config.export_to_gdrive {
        uploaders.push(Box::new(GDriveUploader::new(config.gdrive.clone())));
    }
    if config.export_to_gas_webapp {
        uploaders.push(Box::new(GasWebAppUploader::new(config.gas_webapp.clone())));
    }
    uploaders
}

/// Sends every file through every adapter, one attempt each.
pub fn run_uploads(uploaders: &[Box<dyn Uploader>], files: &[PathBuf]) -> Vec<UploadReport> {
    let mut reports = Vec::with_capacity(uploaders.len() * files.len());
    for uploader in uploaders {
        for path in files {
            let file = file_name(path);
            let report = match uploader.upload(path) {
                Ok(()) => {
                    info!("Uploaded {} to {}", file, uploader.name());
                    UploadReport {
                        target: uploader.name().to_string(),
                        file,
                        ok: true,
                        message: "uploaded".to_string(),
                    }
                }
                Err(e) => {
                    warn!("{} upload of {} failed: {}", uploader.name(), file, e);
                    UploadReport {
                        target: uploader.name().to_string(),
                        file,
                        ok: false,
                        message: format!("{} upload failed: {}", uploader.name(), e),
                    }
                }
            };
            reports.push(report);
        }
    }
    reports
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
