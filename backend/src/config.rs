//! Process-wide settings, read once at startup.
//!
//! `AppConfig::from_env` loads `.env` (if present) and then reads the process
//! environment. All parsing goes through `from_lookup`, which takes any
//! key → value function, so tests build configurations without touching the
//! real environment. The resulting value is immutable and is handed to the
//! request handlers as `web::Data<AppConfig>`.

use crate::error::ConfigError;
use std::path::PathBuf;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_FTP_PORT: u16 = 21;
const DEFAULT_EXPORTS_DIR: &str = "exports";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Open the default browser on the form once the server is up.
    pub open_browser: bool,
    pub export: ExportConfig,
}

/// Everything the export routine needs: where to write and where to send.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub exports_dir: PathBuf,
    pub export_to_ftp: bool,
    pub export_to_gdrive: bool,
    pub export_to_gas_webapp: bool,
    pub ftp: FtpConfig,
    pub gdrive: GDriveConfig,
    pub gas_webapp: GasWebAppConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub remote_dir: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GDriveConfig {
    /// Path to the service-account JSON key.
    pub service_account_json: Option<PathBuf>,
    pub folder_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasWebAppConfig {
    pub url: String,
    pub token: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let flag = |key: &str, default: bool| text(key).map_or(default, |v| parse_bool(&v));
        let port = |key: &'static str, default: u16| match text(key) {
            None => Ok(default),
            Some(v) => v.parse::<u16>().map_err(|_| ConfigError::InvalidPort {
                name: key,
                value: v,
            }),
        };

        Ok(AppConfig {
            host: text("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: port("PORT", DEFAULT_PORT)?,
            open_browser: flag("OPEN_BROWSER", true),
            export: ExportConfig {
                exports_dir: text("EXPORTS_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORTS_DIR)),
                export_to_ftp: flag("EXPORT_TO_FTP", false),
                export_to_gdrive: flag("EXPORT_TO_GDRIVE", false),
                export_to_gas_webapp: flag("EXPORT_TO_GAS_WEBAPP", false),
                ftp: FtpConfig {
                    host: text("FTP_HOST").unwrap_or_default(),
                    port: port("FTP_PORT", DEFAULT_FTP_PORT)?,
                    user: text("FTP_USER").unwrap_or_default(),
                    password: text("FTP_PASS").unwrap_or_default(),
                    remote_dir: text("FTP_REMOTE_DIR").unwrap_or_else(|| "/".to_string()),
                },
                gdrive: GDriveConfig {
                    service_account_json: text("GDRIVE_SERVICE_ACCOUNT_JSON").map(PathBuf::from),
                    folder_id: text("GDRIVE_FOLDER_ID"),
                },
                gas_webapp: GasWebAppConfig {
                    url: text("DRIVE_WEBAPP_URL").unwrap_or_default(),
                    token: text("DRIVE_UPLOAD_TOKEN").unwrap_or_default(),
                },
            },
        })
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// `1`, `true`, `yes` and `on` (any case) are true; everything else is false.
pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_disable_every_upload() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8000);
        assert!(config.open_browser);
        assert_eq!(config.export.exports_dir, PathBuf::from("exports"));
        assert!(!config.export.export_to_ftp);
        assert!(!config.export.export_to_gdrive);
        assert!(!config.export.export_to_gas_webapp);
        assert_eq!(config.export.ftp.port, 21);
        assert_eq!(config.export.ftp.remote_dir, "/");
        assert_eq!(config.export.gdrive.service_account_json, None);
        assert_eq!(config.url(), "http://127.0.0.1:8000");
    }

    #[test]
    fn reads_toggles_and_adapter_settings() {
        let config = config_from(&[
            ("EXPORT_TO_FTP", " Yes "),
            ("EXPORT_TO_GDRIVE", "off"),
            ("EXPORT_TO_GAS_WEBAPP", "1"),
            ("FTP_HOST", "ftp.example.com"),
            ("FTP_PORT", "2121"),
            ("FTP_USER", "store"),
            ("FTP_PASS", "secret"),
            ("FTP_REMOTE_DIR", "/returns/in"),
            ("GDRIVE_FOLDER_ID", "folder-1"),
            ("DRIVE_WEBAPP_URL", "https://script.example.com/exec"),
            ("DRIVE_UPLOAD_TOKEN", "tok"),
            ("EXPORTS_DIR", "/var/exports"),
            ("OPEN_BROWSER", "false"),
        ])
        .unwrap();

        assert!(config.export.export_to_ftp);
        assert!(!config.export.export_to_gdrive);
        assert!(config.export.export_to_gas_webapp);
        assert!(!config.open_browser);
        assert_eq!(
            config.export.ftp,
            FtpConfig {
                host: "ftp.example.com".into(),
                port: 2121,
                user: "store".into(),
                password: "secret".into(),
                remote_dir: "/returns/in".into(),
            }
        );
        assert_eq!(config.export.gdrive.folder_id.as_deref(), Some("folder-1"));
        assert_eq!(config.export.gas_webapp.token, "tok");
        assert_eq!(config.export.exports_dir, PathBuf::from("/var/exports"));
    }

    #[test]
    fn blank_port_falls_back_to_default() {
        let config = config_from(&[("FTP_PORT", "  ")]).unwrap();
        assert_eq!(config.export.ftp.port, 21);
    }

    #[test]
    fn rejects_non_numeric_port() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { name: "PORT", .. }));
    }

    #[test]
    fn parse_bool_is_strict_about_unknown_words() {
        for v in ["1", "TRUE", "yes", "On"] {
            assert!(parse_bool(v), "{v}");
        }
        for v in ["0", "false", "no", "enabled", ""] {
            assert!(!parse_bool(v), "{v}");
        }
    }
}
