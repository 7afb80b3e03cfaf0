#![allow(dead_code)]

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};
use std::time::{Duration, SystemTime};
use std::{env, fs};

use dir_prune::prune::FixedClock;
use filetime::FileTime;
use tempfile::TempDir;

pub const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Global mutex to ensure only one test manipulates HOME/XDG_DATA_HOME at a time.
static HOME_MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

/// RAII guard that redirects HOME and XDG_DATA_HOME to a temporary directory.
///
/// While the guard is alive the trash resolves inside the sandbox, so tests
/// never move anything into the developer's real trash.
pub struct TempHomeGuard {
    _lock: MutexGuard<'static, ()>,
    temp_home: TempDir,
    prev_home: Option<OsString>,
    prev_data_home: Option<OsString>,
}

impl TempHomeGuard {
    /// Create a new guard with a fresh temporary home directory.
    pub fn new() -> Self {
        let lock = HOME_MUTEX
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let temp_home = TempDir::new().expect("failed to create temporary HOME");
        let home_path = temp_home.path();
        let data_home = home_path.join(".local/share");
        fs::create_dir_all(&data_home).expect("failed to create temporary XDG_DATA_HOME");

        let prev_home = env::var_os("HOME");
        let prev_data_home = env::var_os("XDG_DATA_HOME");

        // SAFETY: we hold HOME_MUTEX, ensuring no other thread mutates the
        // environment while we redirect HOME/XDG_DATA_HOME for the test.
        unsafe {
            env::set_var("HOME", home_path);
            env::set_var("XDG_DATA_HOME", &data_home);
        }

        Self {
            _lock: lock,
            temp_home,
            prev_home,
            prev_data_home,
        }
    }

    /// Path to the temporary HOME directory.
    pub fn home(&self) -> &Path {
        self.temp_home.path()
    }

    /// Path to the trash directory inside the temporary XDG_DATA_HOME.
    pub fn trash_dir(&self) -> PathBuf {
        self.temp_home.path().join(".local/share/Trash")
    }
}

impl Drop for TempHomeGuard {
    fn drop(&mut self) {
        // SAFETY: guarded by HOME_MUTEX; we restore the environment to its
        // previous state before releasing the lock.
        unsafe {
            match self.prev_home.as_ref() {
                Some(prev) => env::set_var("HOME", prev),
                None => env::remove_var("HOME"),
            }
            match self.prev_data_home.as_ref() {
                Some(prev) => env::set_var("XDG_DATA_HOME", prev),
                None => env::remove_var("XDG_DATA_HOME"),
            }
        }
    }
}

/// A clock far enough ahead that freshly written files are `days` old.
pub fn clock_ahead(days: u32) -> FixedClock {
    FixedClock(SystemTime::now() + days * DAY)
}

/// Write a file and set its modification time `days_old` days before `clock`.
pub fn write_aged(path: &Path, contents: &str, clock: &FixedClock, days_old: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("failed to create parent directory");
    }
    fs::write(path, contents).expect("failed to write file");
    let mtime = clock.0 - days_old * DAY;
    filetime::set_file_mtime(path, FileTime::from_system_time(mtime))
        .expect("failed to set mtime");
}
