//! Scoped on-disk staging for uploads.
//!
//! Every upload is written to its own uniquely named file under the upload directory. The file
//! lives exactly as long as the [`StagedUpload`] handle, so dropping the handle at the end of a
//! request removes it on the success and failure paths alike.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Directory that receives staged uploads.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Create a store rooted at `dir`. The directory is created lazily on first use.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory where uploads are staged.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `data` to a fresh file whose name ends with the sanitized `file_name`.
    ///
    /// Performs blocking filesystem I/O; async callers should run this on the blocking pool.
    pub fn stage(&self, file_name: &str, data: &[u8]) -> io::Result<StagedUpload> {
        std::fs::create_dir_all(&self.dir)?;
        let mut file = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(&format!("-{file_name}"))
            .tempfile_in(&self.dir)?;
        file.write_all(data)?;
        file.flush()?;
        tracing::debug!(path = %file.path().display(), bytes = data.len(), "Staged upload");
        Ok(StagedUpload { file })
    }
}

/// Handle to a staged upload; the file is deleted when this is dropped.
#[derive(Debug)]
pub struct StagedUpload {
    file: NamedTempFile,
}

impl StagedUpload {
    /// Location of the staged file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
