use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::info;

use crate::error::{Result, ZotsiftError};
use crate::source::SqliteRowSource;

const SIDECAR_SUFFIXES: [&str; 2] = ["-journal", "-wal"];
const DEFAULT_FILE_NAME: &str = "zotero.sqlite";

/// Private copy of a Zotero database. Zotero holds an exclusive lock on its
/// database while running, so reads go against this copy. The copy is removed
/// when the snapshot is dropped.
#[derive(Debug)]
pub struct DatabaseSnapshot {
    path: PathBuf,
    _dir: TempDir,
}

impl DatabaseSnapshot {
    pub fn capture(source: &Path) -> Result<Self> {
        if !source.is_file() {
            return Err(ZotsiftError::NotFound(format!(
                "zotero database {}",
                source.display()
            )));
        }

        let dir = tempfile::Builder::new().prefix("zotsift-").tempdir()?;
        let file_name = source
            .file_name()
            .map_or_else(|| DEFAULT_FILE_NAME.into(), ToOwned::to_owned);
        let path = dir.path().join(&file_name);
        fs::copy(source, &path)?;

        for suffix in SIDECAR_SUFFIXES {
            let sidecar = with_suffix(source, suffix);
            if sidecar.is_file() {
                fs::copy(&sidecar, with_suffix(&path, suffix))?;
            }
        }

        info!(
            source = %source.display(),
            snapshot = %path.display(),
            "captured database snapshot"
        );
        Ok(Self { path, _dir: dir })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn open(&self) -> Result<SqliteRowSource> {
        SqliteRowSource::open(&self.path)
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(suffix);
    PathBuf::from(os)
}
