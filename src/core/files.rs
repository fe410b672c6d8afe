use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Filesystem primitives the rename engine needs.
pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;
    /// A path in `dir` that no existing file occupies, carrying `extension`.
    fn temp_path(&self, dir: &Path, extension: Option<&str>) -> PathBuf;
}

/// Local filesystem implementation
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFs {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        fs::rename(from, to).map_err(|e| {
            Error::internal_io(
                e.to_string(),
                Some(format!("rename {} -> {}", from.display(), to.display())),
            )
        })
    }

    fn temp_path(&self, dir: &Path, extension: Option<&str>) -> PathBuf {
        loop {
            let stem = format!("temp_{}", uuid::Uuid::new_v4().simple());
            let name = match extension {
                Some(ext) => format!("{}.{}", stem, ext),
                None => stem,
            };
            let candidate = dir.join(name);
            if !candidate.exists() {
                return candidate;
            }
        }
    }
}

/// Read a file to string, mapping a missing file to a descriptive IO error.
pub fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::internal_io(
                format!("File not found: {}", path.display()),
                Some("read file".to_string()),
            )
        } else {
            Error::internal_io(e.to_string(), Some("read file".to_string()))
        }
    })
}

/// Atomic write: write to a sibling temp file, then rename over the target.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let parent = path.parent().ok_or_else(|| {
        Error::internal_io(
            format!("Invalid path: {}", path.display()),
            Some("write file".to_string()),
        )
    })?;

    let filename = path.file_name().ok_or_else(|| {
        Error::internal_io(
            format!("Invalid path: {}", path.display()),
            Some("write file".to_string()),
        )
    })?;

    let tmp_path = parent.join(format!("{}.tmp", filename.to_string_lossy()));

    fs::write(&tmp_path, content)
        .map_err(|e| Error::internal_io(e.to_string(), Some("write temp file".to_string())))?;

    fs::rename(&tmp_path, path)
        .map_err(|e| Error::internal_io(e.to_string(), Some("rename temp file".to_string())))?;

    Ok(())
}
