//! Posts the file to a Google Apps Script web app (`DRIVE_WEBAPP_URL`).
//!
//! The script receives `{token, filename, mimetype, content_b64}` and is
//! expected to answer `200 OK`; any other status counts as a failure.

use super::{file_name, Uploader, UPLOAD_TIMEOUT};
use crate::config::GasWebAppConfig;
use crate::error::UploadError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use log::debug;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Serialize;
use std::fs;
use std::path::Path;

const BODY_EXCERPT_CHARS: usize = 300;

#[derive(Serialize, Debug, PartialEq)]
struct UploadPayload<'a> {
    token: &'a str,
    filename: String,
    mimetype: &'static str,
    content_b64: String,
}

pub struct GasWebAppUploader {
    config: GasWebAppConfig,
}

impl GasWebAppUploader {
    pub fn new(config: GasWebAppConfig) -> Self {
        Self { config }
    }

    fn payload(&self, filename: String, bytes: &[u8]) -> UploadPayload<'_> {
        UploadPayload {
            token: &self.config.token,
            filename,
            mimetype: "text/csv",
            content_b64: BASE64.encode(bytes),
        }
    }
}

impl Uploader for GasWebAppUploader {
    fn name(&self) -> &'static str {
        "Google Apps Script"
    }

    fn upload(&self, path: &Path) -> Result<(), UploadError> {
        if self.config.url.is_empty() || self.config.token.is_empty() {
            return Err(UploadError::Config(
                "Missing DRIVE_WEBAPP_URL or DRIVE_UPLOAD_TOKEN".to_string(),
            ));
        }
        let bytes = fs::read(path)?;
        let payload = self.payload(file_name(path), &bytes);

        let client = Client::builder().timeout(UPLOAD_TIMEOUT).build()?;
        let resp = client.post(&self.config.url).json(&payload).send()?;
        let status = resp.status();
        debug!("Apps Script answered {}", status);
        if status != StatusCode::OK {
            let body = resp.text().unwrap_or_default();
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                body: excerpt(&body),
            });
        }
        Ok(())
    }
}

fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}
