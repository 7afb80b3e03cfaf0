//! Recoverable deletion into a FreeDesktop.org style trash directory.
//!
//! Each trashed item is moved to `<trash>/files/<name>` and described by
//! `<trash>/info/<name>.trashinfo`, which records the original location and
//! the deletion date so a file manager can restore it. The info file is
//! created with `create_new` first, which reserves the name against
//! concurrent trashers; the item is moved only after its info file exists.

use std::ffi::{OsStr, OsString};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use crate::error::{PruneError, Result};

const INFO_EXTENSION: &str = ".trashinfo";
const DELETION_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A trash directory on the local volume.
#[derive(Debug, Clone)]
pub struct TrashRemover {
    home: PathBuf,
}

impl TrashRemover {
    /// Use `home` as the trash directory (it will contain `files/` and
    /// `info/`).
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// Locate the user's trash: `$XDG_DATA_HOME/Trash`, falling back to
    /// `~/.local/share/Trash`.
    pub fn from_env() -> Result<Self> {
        Self::locate(std::env::var_os("XDG_DATA_HOME"), home::home_dir())
    }

    /// Resolve the trash from an `XDG_DATA_HOME` value and a home directory.
    /// A relative `XDG_DATA_HOME` is ignored.
    pub(crate) fn locate(data_home: Option<OsString>, home: Option<PathBuf>) -> Result<Self> {
        let data_home = data_home
            .map(PathBuf::from)
            .filter(|path| path.is_absolute())
            .or_else(|| home.map(|home| home.join(".local").join("share")))
            .ok_or_else(|| {
                PruneError::TrashUnavailable("could not determine the home directory".to_string())
            })?;

        Ok(Self::new(data_home.join("Trash")))
    }

    /// Whether items under `root` can be moved into this trash, i.e. both
    /// live on the same volume. The trash does not need to exist yet; its
    /// nearest existing ancestor decides.
    pub fn accepts(&self, root: &Path) -> bool {
        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;

            let Ok(root_meta) = fs::metadata(root) else {
                return false;
            };
            self.home
                .ancestors()
                .find_map(|dir| fs::metadata(dir).ok())
                .is_some_and(|trash_meta| trash_meta.dev() == root_meta.dev())
        }

        #[cfg(not(unix))]
        {
            root.exists()
        }
    }

    /// The trash directory itself.
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Where trashed items are stored.
    pub fn files_dir(&self) -> PathBuf {
        self.home.join("files")
    }

    /// Where `.trashinfo` records are stored.
    pub fn info_dir(&self) -> PathBuf {
        self.home.join("info")
    }

    /// Move `path` (file or directory) into the trash and return its new
    /// location.
    pub fn trash(&self, path: &Path) -> Result<PathBuf> {
        let trash_error = |source| PruneError::TrashError {
            path: path.to_path_buf(),
            source,
        };

        let original = std::path::absolute(path).map_err(trash_error)?;
        let file_name = original.file_name().ok_or_else(|| {
            trash_error(io::Error::new(
                io::ErrorKind::InvalidInput,
                "path has no file name",
            ))
        })?;

        let files_dir = self.files_dir();
        let info_dir = self.info_dir();
        for dir in [&files_dir, &info_dir] {
            fs::create_dir_all(dir).map_err(|source| PruneError::IoError {
                path: dir.clone(),
                source,
            })?;
        }

        let (name, mut info_file) = reserve_name(&files_dir, &info_dir, file_name)?;
        let info_path = info_dir.join(info_file_name(&name));

        let record = format!(
            "[Trash Info]\nPath={}\nDeletionDate={}\n",
            encode_path(&original),
            chrono::Local::now().format(DELETION_DATE_FORMAT)
        );
        if let Err(source) = info_file.write_all(record.as_bytes()) {
            let _ = fs::remove_file(&info_path);
            return Err(PruneError::IoError {
                path: info_path,
                source,
            });
        }
        drop(info_file);

        let destination = files_dir.join(&name);
        if let Err(source) = fs::rename(&original, &destination) {
            let _ = fs::remove_file(&info_path);
            return Err(trash_error(source));
        }

        Ok(destination)
    }
}

/// Pick a name that is free in both `files/` and `info/`, creating its info
/// file.
fn reserve_name(files_dir: &Path, info_dir: &Path, file_name: &OsStr) -> Result<(OsString, File)> {
    let mut attempt: u64 = 0;
    loop {
        let mut name = file_name.to_os_string();
        if attempt > 0 {
            name.push(format!(".{attempt}"));
        }
        attempt += 1;

        if fs::symlink_metadata(files_dir.join(&name)).is_ok() {
            continue;
        }

        let info_path = info_dir.join(info_file_name(&name));
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&info_path)
        {
            Ok(file) => return Ok((name, file)),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(source) => {
                return Err(PruneError::IoError {
                    path: info_path,
                    source,
                });
            }
        }
    }
}

fn info_file_name(name: &OsStr) -> OsString {
    let mut info = name.to_os_string();
    info.push(INFO_EXTENSION);
    info
}

/// Percent-encode an absolute path for the `Path=` key, keeping separators.
fn encode_path(path: &Path) -> String {
    let mut encoded = String::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => {
                encoded.push('/');
                encoded.push_str(&urlencoding::encode(&part.to_string_lossy()));
            }
            Component::Prefix(prefix) => {
                encoded.push_str(&prefix.as_os_str().to_string_lossy());
            }
            Component::RootDir | Component::CurDir | Component::ParentDir => {}
        }
    }

    if encoded.is_empty() {
        encoded.push('/');
    }
    encoded
}
