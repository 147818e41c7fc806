//! Google Drive upload with a service-account key.
//!
//! Flow: sign an RS256 JWT with the key's private key, exchange it at the
//! key's `token_uri` for an access token, then send a `multipart/related`
//! request (JSON metadata + file bytes) to the Drive v3 upload endpoint.

use super::{file_name, Uploader, UPLOAD_TIMEOUT};
use crate::config::GDriveConfig;
use crate::error::UploadError;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use log::debug;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use uuid::Uuid;

const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive.file";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const UPLOAD_URL: &str = "https://www.googleapis.com/upload/drive/v3/files?uploadType=multipart";
const JWT_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const TOKEN_LIFETIME_SECS: i64 = 3600;

#[derive(Deserialize, Debug)]
struct ServiceAccountKey {
    client_email: String,
    private_key: String,
    #[serde(default = "default_token_uri")]
    token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Serialize)]
struct FileMetadata<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    parents: Vec<&'a str>,
}

pub struct GDriveUploader {
    config: GDriveConfig,
}

impl GDriveUploader {
    pub fn new(config: GDriveConfig) -> Self {
        Self { config }
    }

    fn load_key(&self) -> Result<ServiceAccountKey, UploadError> {
        let path = self
            .config
            .service_account_json
            .as_ref()
            .filter(|p| p.exists())
            .ok_or_else(|| {
                UploadError::Config(
                    "Service account JSON missing (GDRIVE_SERVICE_ACCOUNT_JSON).".to_string(),
                )
            })?;
        let raw = fs::read(path)?;
        serde_json::from_slice(&raw)
            .map_err(|e| UploadError::Config(format!("Invalid service account JSON: {}", e)))
    }

    fn access_token(&self, client: &Client, key: &ServiceAccountKey) -> Result<String, UploadError> {
        let iat = Utc::now().timestamp();
        let claims = Claims {
            iss: &key.client_email,
            scope: DRIVE_SCOPE,
            aud: &key.token_uri,
            iat,
            exp: iat + TOKEN_LIFETIME_SECS,
        };
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| UploadError::Auth(format!("unusable private key: {}", e)))?;
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &signing_key)
            .map_err(|e| UploadError::Auth(e.to_string()))?;

        let resp = client
            .post(&key.token_uri)
            .form(&[("grant_type", JWT_GRANT_TYPE), ("assertion", assertion.as_str())])
            .send()?;
        let status = resp.status();
        debug!("Token endpoint answered {}", status);
        if !status.is_success() {
            return Err(UploadError::Auth(format!(
                "token request returned {}",
                status
            )));
        }
        Ok(resp.json::<TokenResponse>()?.access_token)
    }
}

impl Uploader for GDriveUploader {
    fn name(&self) -> &'static str {
        "Google Drive"
    }

    fn upload(&self, path: &Path) -> Result<(), UploadError> {
        let key = self.load_key()?;
        let bytes = fs::read(path)?;
        let client = Client::builder().timeout(UPLOAD_TIMEOUT).build()?;
        let token = self.access_token(&client, &key)?;

        let boundary = format!("csv-upload-{}", Uuid::new_v4().simple());
        let body = multipart_body(
            &boundary,
            &file_name(path),
            self.config.folder_id.as_deref(),
            &bytes,
        )?;
        let resp = client
            .post(UPLOAD_URL)
            .bearer_auth(token)
            .header(
                CONTENT_TYPE,
                format!("multipart/related; boundary={}", boundary),
            )
            .body(body)
            .send()?;
        let status = resp.status();
        debug!("Drive upload answered {}", status);
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                body: body.chars().take(300).collect(),
            });
        }
        Ok(())
    }
}

fn multipart_body(
    boundary: &str,
    name: &str,
    folder_id: Option<&str>,
    content: &[u8],
) -> Result<Vec<u8>, UploadError> {
    let metadata = FileMetadata {
        name,
        parents: folder_id.into_iter().collect(),
    };
    let metadata = serde_json::to_string(&metadata)
        .map_err(|e| UploadError::Config(format!("metadata encoding failed: {}", e)))?;

    let mut body = Vec::with_capacity(content.len() + metadata.len() + 256);
    body.extend_from_slice(
        format!(
            "--{b}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{m}\r\n--{b}\r\nContent-Type: text/csv\r\n\r\n",
            b = boundary,
            m = metadata
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn multipart_body_wraps_metadata_and_content() {
        let body = multipart_body("XyZ", "STORE_RETURN250101000000.CSV", Some("folder-1"), b"a,b")
            .unwrap();
        let text = String::from_utf8(body).unwrap();
        assert_eq!(
            text,
            "--XyZ\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n\
             {\"name\":\"STORE_RETURN250101000000.CSV\",\"parents\":[\"folder-1\"]}\r\n\
             --XyZ\r\nContent-Type: text/csv\r\n\r\na,b\r\n--XyZ--\r\n"
        );
    }

    #[test]
    fn metadata_omits_parents_without_folder() {
        let body = multipart_body("b", "F.CSV", None, b"").unwrap();
        let text = String::from_utf8(body).unwrap();
        assert!(text.contains("{\"name\":\"F.CSV\"}"));
    }

    #[test]
    fn missing_key_file_is_a_config_error() {
        let uploader = GDriveUploader::new(GDriveConfig {
            service_account_json: Some(PathBuf::from("/nonexistent/key.json")),
            folder_id: None,
        });
        assert!(matches!(
            uploader.upload(Path::new("F.CSV")),
            Err(UploadError::Config(_))
        ));

        let uploader = GDriveUploader::new(GDriveConfig {
            service_account_json: None,
            folder_id: None,
        });
        assert!(matches!(uploader.load_key(), Err(UploadError::Config(_))));
    }

    #[test]
    fn malformed_key_file_is_a_config_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let key = dir.path().join("key.json");
        fs::write(&key, "{\"client_email\": 1}").unwrap();
        let uploader = GDriveUploader::new(GDriveConfig {
            service_account_json: Some(key),
            folder_id: None,
        });
        assert!(matches!(uploader.load_key(), Err(UploadError::Config(_))));
    }

    #[test]
    fn key_without_token_uri_uses_google_default() {
        let key: ServiceAccountKey = serde_json::from_str(
            r#"{"client_email": "svc@example.iam.gserviceaccount.com", "private_key": "pem"}"#,
        )
        .unwrap();
        assert_eq!(key.token_uri, DEFAULT_TOKEN_URI);
    }
}
