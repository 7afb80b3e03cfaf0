use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::age::FileTimes;
use crate::error::{PruneError, Result};

/// Filesystem queries the pruner needs.
///
/// Listings return direct children only. Symbolic links are never followed:
/// a link to a directory is reported by [`FileSystem::list_files`], not by
/// [`FileSystem::list_directories`].
pub trait FileSystem {
    /// Direct non-directory children of `dir`.
    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>>;

    /// Direct subdirectories of `dir`.
    fn list_directories(&self, dir: &Path) -> Result<Vec<PathBuf>>;

    /// Creation time, modification time, and size of `file`.
    fn file_times(&self, file: &Path) -> Result<FileTimes>;

    /// Clear the read-only attribute of `dir` so it can be removed.
    fn clear_readonly(&self, dir: &Path) -> Result<()>;
}

/// [`FileSystem`] backed by the real filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdFileSystem;

impl StdFileSystem {
    fn children(&self, dir: &Path, want_dirs: bool) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|err| PruneError::IoError {
                path: err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| dir.to_path_buf()),
                source: err.into(),
            })?;

            if entry.file_type().is_dir() == want_dirs {
                paths.push(entry.into_path());
            }
        }

        Ok(paths)
    }
}

impl FileSystem for StdFileSystem {
    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        self.children(dir, false)
    }

    fn list_directories(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        self.children(dir, true)
    }

    fn file_times(&self, file: &Path) -> Result<FileTimes> {
        let io_error = |source| PruneError::IoError {
            path: file.to_path_buf(),
            source,
        };

        let metadata = fs::symlink_metadata(file).map_err(io_error)?;
        let modified = metadata.modified().map_err(io_error)?;

        Ok(FileTimes {
            // Not every platform/filesystem records a birth time
            created: metadata.created().ok(),
            modified,
            len: metadata.len(),
        })
    }

    fn clear_readonly(&self, dir: &Path) -> Result<()> {
        let io_error = |source| PruneError::IoError {
            path: dir.to_path_buf(),
            source,
        };

        let mut permissions = fs::symlink_metadata(dir).map_err(io_error)?.permissions();

        // Only the owner's write bit matters for the owner removing entries.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            if permissions.mode() & 0o200 != 0 {
                return Ok(());
            }
            permissions.set_mode(permissions.mode() | 0o200);
        }

        #[cfg(not(unix))]
        {
            if !permissions.readonly() {
                return Ok(());
            }
            permissions.set_readonly(false);
        }

        fs::set_permissions(dir, permissions).map_err(io_error)
    }
}
