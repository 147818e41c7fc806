//! The validate → export → store → upload routine behind the submit endpoint.
//!
//! `export_submission` is synchronous and takes its configuration, clock and
//! adapters as arguments; the HTTP handler runs it on the blocking pool.

pub mod documents;
pub mod storage;

use crate::config::ExportConfig;
use crate::error::ExportError;
use crate::uploads::{run_uploads, Uploader};
use chrono::{DateTime, Utc};
use common::model::submission::Submission;
use common::requests::UploadReport;
use common::validation::validate;
use log::{info, warn};
use std::path::PathBuf;

#[derive(Debug)]
pub struct ExportOutcome {
    /// Return file first, then damage file.
    pub files: Vec<PathBuf>,
    pub uploads: Vec<UploadReport>,
}

impl ExportOutcome {
    pub fn file_names(&self) -> Vec<String> {
        self.files
            .iter()
            .map(|p| crate::uploads::file_name(p))
            .collect()
    }

    /// Adapters that delivered every file, in the order they ran.
    pub fn sent_targets(&self) -> Vec<String> {
        let mut targets: Vec<String> = Vec::new();
        for report in &self.uploads {
            if !targets.contains(&report.target) {
                targets.push(report.target.clone());
            }
        }
        targets.retain(|t| {
            self.uploads
                .iter()
                .filter(|r| &r.target == t)
                .all(|r| r.ok)
        });
        targets
    }

    /// Banner text shown after a successful export.
    pub fn summary(&self) -> String {
        let files = self.file_names().join(", ");
        let sent = self.sent_targets();
        if sent.is_empty() {
            format!("Files {} have been exported successfully and saved locally.", files)
        } else {
            format!(
                "Files {} have been exported successfully and sent to {}.",
                files,
                sent.join(", ")
            )
        }
    }
}

/// Runs one complete export for `submission` at instant `now`.
///
/// Nothing is written unless the whole submission is valid. Upload failures
/// are reported in the outcome and never turn the export into an error.
pub fn export_submission(
    config: &ExportConfig,
    submission: &Submission,
    now: DateTime<Utc>,
    uploaders: &[Box<dyn Uploader>],
) -> Result<ExportOutcome, ExportError> {
    let submission = submission.normalized();
    if let Err(errors) = validate(&submission) {
        warn!("Rejected submission with {} validation error(s)", errors.len());
        return Err(errors.into());
    }

    let docs = documents::build_documents(&submission, now)?;
    let files = storage::write_documents(&config.exports_dir, now, &docs)?;
    info!(
        "Exported {} row(s) from {} to {}",
        submission.rows.len(),
        submission.created_by,
        files
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let uploads = run_uploads(uploaders, &files);
    Ok(ExportOutcome { files, uploads })
}
