use serde::{Deserialize, Serialize};

/// Outcome of one adapter trying to send one exported file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReport {
    /// Adapter display name, e.g. `FTP` or `Google Drive`.
    pub target: String,
    /// Base name of the file that was sent.
    pub file: String,
    pub ok: bool,
    pub message: String,
}

/// Body returned by `POST /api/returns/submit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmitResponse {
    /// Both CSV files were written locally. Upload results are informational.
    Exported {
        files: Vec<String>,
        uploads: Vec<UploadReport>,
        message: String,
    },
    /// The submission was rejected; nothing was written.
    Invalid { errors: Vec<String> },
    /// The files could not be written.
    Failed { message: String },
}
