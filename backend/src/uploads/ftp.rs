use super::{file_name, Uploader, UPLOAD_TIMEOUT};
use crate::config::FtpConfig;
use crate::error::UploadError;
use log::debug;
use std::fs::File;
use std::io;
use std::net::ToSocketAddrs;
use std::path::Path;
use suppaftp::types::FileType;
use suppaftp::{FtpError, FtpStream};

pub struct FtpUploader {
    config: FtpConfig,
}

impl FtpUploader {
    pub fn new(config: FtpConfig) -> Self {
        Self { config }
    }

    fn check_config(&self) -> Result<(), UploadError> {
        if self.config.host.is_empty() || self.config.user.is_empty() {
            return Err(UploadError::Config(
                "FTP credentials missing (FTP_HOST / FTP_USER).".to_string(),
            ));
        }
        Ok(())
    }

    fn connect(&self) -> Result<FtpStream, UploadError> {
        let addr = (self.config.host.as_str(), self.config.port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| {
                UploadError::Config(format!("FTP host {} did not resolve", self.config.host))
            })?;
        let mut ftp = FtpStream::connect_timeout(addr, UPLOAD_TIMEOUT)?;
        ftp.get_ref().set_read_timeout(Some(UPLOAD_TIMEOUT))?;
        ftp.get_ref().set_write_timeout(Some(UPLOAD_TIMEOUT))?;
        ftp.login(&self.config.user, &self.config.password)?;
        ftp.transfer_type(FileType::Binary)?;
        Ok(ftp)
    }

    /// Walks into `remote_dir` one segment at a time, creating what is missing.
    fn enter_remote_dir(&self, ftp: &mut FtpStream) -> Result<(), UploadError> {
        for part in remote_segments(&self.config.remote_dir) {
            match ftp.mkdir(part) {
                Ok(()) => debug!("Created FTP directory {}", part),
                // 5xx here almost always means the directory already exists.
                Err(FtpError::UnexpectedResponse(resp)) => {
                    debug!("FTP mkdir {} answered {:?}", part, resp.status)
                }
                Err(e) => return Err(e.into()),
            }
            ftp.cwd(part)?;
        }
        Ok(())
    }

    /// `STOR`s `file` over a passive data connection bounded by the same timeout.
    fn store(&self, ftp: &mut FtpStream, name: &str, file: &mut File) -> Result<(), UploadError> {
        let mut stream = ftp.put_with_stream(name)?;
        stream.get_ref().set_write_timeout(Some(UPLOAD_TIMEOUT))?;
        io::copy(file, &mut stream)?;
        ftp.finalize_put_stream(stream)?;
        Ok(())
    }
}

impl Uploader for FtpUploader {
    fn name(&self) -> &'static str {
        "FTP"
    }

    fn upload(&self, path: &Path) -> Result<(), UploadError> {
        self.check_config()?;
        let mut file = File::open(path)?;
        let mut ftp = self.connect()?;
        self.enter_remote_dir(&mut ftp)?;
        self.store(&mut ftp, &file_name(path), &mut file)?;
        let _ = ftp.quit();
        Ok(())
    }
}

fn remote_segments(remote_dir: &str) -> impl Iterator<Item = &str> {
    remote_dir.split('/').filter(|p| !p.trim().is_empty())
}
