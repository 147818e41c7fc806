//! Writes finished CSV documents under `exports/<YYYYMMDD>/`.

use crate::error::ExportError;
use crate::export::documents::CsvDocument;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempPath};

pub fn date_folder(root: &Path, now: DateTime<Utc>) -> PathBuf {
    root.join(now.format("%Y%m%d").to_string())
}

/// Creates the folder for `now` if needed. Safe to call concurrently.
pub fn ensure_date_folder(root: &Path, now: DateTime<Utc>) -> io::Result<PathBuf> {
    let folder = date_folder(root, now);
    fs::create_dir_all(&folder)?;
    Ok(folder)
}

/// Writes every document or none of them.
///
/// All documents are staged as temporary siblings first, then renamed into
/// place. If a later rename fails, the ones already placed are removed, and
/// any same-second file they replaced is put back.
pub fn write_documents(
    root: &Path,
    now: DateTime<Utc>,
    documents: &[CsvDocument],
) -> Result<Vec<PathBuf>, ExportError> {
    let folder = ensure_date_folder(root, now)?;
    let staged = documents
        .iter()
        .map(|doc| stage_document(&folder, doc))
        .collect::<io::Result<Vec<_>>>()?;

    let mut placed: Vec<Placed> = Vec::with_capacity(staged.len());
    for (doc, tmp) in documents.iter().zip(staged) {
        match place_document(&folder, doc, tmp) {
            Ok(entry) => placed.push(entry),
            Err(e) => {
                for entry in placed.into_iter().rev() {
                    entry.undo();
                }
                return Err(e.into());
            }
        }
    }
    Ok(placed.into_iter().map(|entry| entry.path).collect())
}

fn stage_document(folder: &Path, doc: &CsvDocument) -> io::Result<NamedTempFile> {
    let mut tmp = NamedTempFile::new_in(folder)?;
    tmp.write_all(&doc.bytes)?;
    tmp.flush()?;
    Ok(tmp)
}

/// A document renamed into place, with the file it replaced if there was one.
struct Placed {
    path: PathBuf,
    previous: Option<TempPath>,
}

impl Placed {
    fn undo(self) {
        match self.previous {
            Some(previous) => {
                if let Err(e) = previous.persist(&self.path) {
                    warn!("Could not restore {}: {}", self.path.display(), e.error);
                }
            }
            None => {
                let _ = fs::remove_file(&self.path);
            }
        }
    }
}

fn place_document(folder: &Path, doc: &CsvDocument, tmp: NamedTempFile) -> io::Result<Placed> {
    let path = folder.join(&doc.file_name);
    // Same-second exports share a name; the later one replaces the earlier.
    let previous = if path.is_file() {
        let backup = NamedTempFile::new_in(folder)?.into_temp_path();
        fs::rename(&path, &backup)?;
        Some(backup)
    } else {
        None
    };

    let placed = Placed { path, previous };
    if let Err(e) = tmp.persist(&placed.path) {
        placed.undo();
        return Err(e.error);
    }
    debug!("Wrote {:?} export {}", doc.kind, placed.path.display());
    Ok(placed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::documents::ExportKind;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 58).unwrap()
    }

    fn doc(kind: ExportKind, body: &str) -> CsvDocument {
        CsvDocument {
            kind,
            file_name: kind.file_name(now()),
            bytes: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn writes_into_date_partitioned_folder() {
        let dir = TempDir::new().unwrap();
        let docs = [doc(ExportKind::Return, "a"), doc(ExportKind::Damage, "b")];

        let paths = write_documents(dir.path(), now(), &docs).unwrap();

        let folder = dir.path().join("20251231");
        assert_eq!(
            paths,
            vec![
                folder.join("STORE_RETURN251231235958.CSV"),
                folder.join("STORE_RET_DAMAGE251231235958.CSV"),
            ]
        );
        assert_eq!(fs::read_to_string(&paths[0]).unwrap(), "a");
        assert_eq!(fs::read_to_string(&paths[1]).unwrap(), "b");
        assert_eq!(fs::read_dir(&folder).unwrap().count(), 2);
    }

    #[test]
    fn existing_folder_is_reused() {
        let dir = TempDir::new().unwrap();
        let first = ensure_date_folder(dir.path(), now()).unwrap();
        let second = ensure_date_folder(dir.path(), now()).unwrap();
        assert_eq!(first, second);
        assert!(second.is_dir());
    }

    #[test]
    fn same_second_export_replaces_previous_file() {
        let dir = TempDir::new().unwrap();
        write_documents(dir.path(), now(), &[doc(ExportKind::Return, "first")]).unwrap();
        let paths =
            write_documents(dir.path(), now(), &[doc(ExportKind::Return, "second")]).unwrap();
        assert_eq!(fs::read_to_string(&paths[0]).unwrap(), "second");
    }

    #[test]
    fn unusable_root_is_a_storage_error() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("not-a-dir");
        fs::write(&root, "occupied").unwrap();

        let err = write_documents(&root, now(), &[doc(ExportKind::Return, "a")]).unwrap_err();
        assert!(matches!(err, ExportError::Storage(_)));
    }

    #[test]
    fn failed_second_write_removes_the_first() {
        let dir = TempDir::new().unwrap();
        let folder = ensure_date_folder(dir.path(), now()).unwrap();
        // A directory squatting on the damage file name makes its rename fail.
        let blocker = folder.join(ExportKind::Damage.file_name(now()));
        fs::create_dir(&blocker).unwrap();
        fs::write(blocker.join("keep"), "x").unwrap();

        let docs = [doc(ExportKind::Return, "a"), doc(ExportKind::Damage, "b")];
        let err = write_documents(dir.path(), now(), &docs).unwrap_err();

        assert!(matches!(err, ExportError::Storage(_)));
        assert!(!folder.join(ExportKind::Return.file_name(now())).exists());
    }

    #[test]
    fn failed_rewrite_keeps_the_earlier_same_second_export() {
        let dir = TempDir::new().unwrap();
        let first = write_documents(dir.path(), now(), &[doc(ExportKind::Return, "first")]).unwrap();

        let folder = date_folder(dir.path(), now());
        let blocker = folder.join(ExportKind::Damage.file_name(now()));
        fs::create_dir(&blocker).unwrap();
        fs::write(blocker.join("keep"), "x").unwrap();

        let docs = [doc(ExportKind::Return, "second"), doc(ExportKind::Damage, "b")];
        let err = write_documents(dir.path(), now(), &docs).unwrap_err();

        assert!(matches!(err, ExportError::Storage(_)));
        assert_eq!(fs::read_to_string(&first[0]).unwrap(), "first");
        // Only the two entries from the setup remain; no stray temp files.
        assert_eq!(fs::read_dir(&folder).unwrap().count(), 2);
    }
}
