//! Advisory per-domain lock manager.
//!
//! The lock is a zero-byte marker file at `<domain-file-path>.lock`.
//! Exclusive creation of that file is the sole point of mutual exclusion;
//! existence plus mtime is the entire protocol surface. The protocol is
//! cooperative: a writer that skips the lock can still corrupt the domain
//! file, which is an accepted trade-off of the single-host design.

use crate::config::LockSettings;
use crate::{Error, Result};
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

/// Suffix appended to a domain file path to form its lock path.
pub const LOCK_SUFFIX: &str = ".lock";

/// Returns the lock file path for a domain file.
#[must_use]
pub fn lock_path(target: &Path) -> PathBuf {
    let mut raw = target.as_os_str().to_os_string();
    raw.push(LOCK_SUFFIX);
    PathBuf::from(raw)
}

/// Held lock on one domain file. Removes the marker file on drop, so the
/// lock is released on every exit path, panics included.
struct LockGuard {
    path: PathBuf,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        // The file being gone already (e.g. a racing stale-lock sweep) is
        // not an error: absence is the steady state.
        let _ = fs::remove_file(&self.path);
    }
}

/// Runs `f` while holding the advisory lock for `target`.
///
/// No other cooperating process can be inside its own `with_lock` for the
/// same path concurrently. The lock is released when `f` returns or
/// unwinds; on acquisition timeout `f` is never entered.
///
/// # Errors
///
/// Returns `Error::LockTimeout` if the lock stays contended past
/// `settings.acquire_timeout`, or `Error::OperationFailed` on I/O errors
/// while creating the marker file.
pub fn with_lock<T>(
    target: &Path,
    settings: &LockSettings,
    f: impl FnOnce() -> Result<T>,
) -> Result<T> {
    let _guard = acquire(target, settings)?;
    f()
}

fn acquire(target: &Path, settings: &LockSettings) -> Result<LockGuard> {
    let lock_path = lock_path(target);
    let deadline = Instant::now() + settings.acquire_timeout;

    loop {
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock_path)
        {
            Ok(_) => return Ok(LockGuard { path: lock_path }),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                if is_stale(&lock_path, settings.stale_after) {
                    // The holder likely crashed. Deleting is advisory
                    // cleanup, not ownership: loop back to the exclusive
                    // create, which stays the only real exclusion point.
                    tracing::warn!(lock = %lock_path.display(), "removing stale lock file");
                    let _ = fs::remove_file(&lock_path);
                    continue;
                }
                if Instant::now() >= deadline {
                    return Err(Error::LockTimeout { lock_path });
                }
                tracing::debug!(lock = %lock_path.display(), "lock contended, polling");
                std::thread::sleep(settings.poll_interval);
            },
            Err(e) => {
                return Err(Error::OperationFailed {
                    operation: "create_lock_file".to_string(),
                    cause: e.to_string(),
                });
            },
        }
    }
}

/// Returns true if the lock file's mtime is older than the staleness window.
///
/// Metadata errors read as "not stale": if the file vanished between the
/// failed create and this check, the next create attempt settles it.
fn is_stale(path: &Path, stale_after: Duration) -> bool {
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .ok()
        .and_then(|mtime| SystemTime::now().duration_since(mtime).ok())
        .is_some_and(|age| age > stale_after)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fast_settings() -> LockSettings {
        LockSettings {
            stale_after: Duration::from_secs(30),
            poll_interval: Duration::from_millis(5),
            acquire_timeout: Duration::from_millis(100),
        }
    }

    #[test]
    fn test_lock_released_on_success() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("cli.jsonl");

        with_lock(&target, &fast_settings(), || Ok(())).unwrap();
        assert!(!lock_path(&target).exists());
    }

    #[test]
    fn test_lock_released_on_error() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("cli.jsonl");

        let result: Result<()> = with_lock(&target, &fast_settings(), || {
            Err(Error::InvalidInput("boom".to_string()))
        });
        assert!(result.is_err());
        assert!(!lock_path(&target).exists());
    }

    #[test]
    fn test_contended_lock_times_out() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("cli.jsonl");

        // A fresh foreign lock file stands in for another live process.
        fs::write(lock_path(&target), b"").unwrap();

        let result = with_lock(&target, &fast_settings(), || Ok(()));
        match result {
            Err(Error::LockTimeout { lock_path: p }) => {
                assert_eq!(p, lock_path(&target));
            },
            other => panic!("expected LockTimeout, got {other:?}"),
        }
        // The foreign lock is left in place for its (presumed) holder.
        assert!(lock_path(&target).exists());
    }

    #[test]
    fn test_stale_lock_is_reclaimed() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("cli.jsonl");
        fs::write(lock_path(&target), b"").unwrap();

        let settings = LockSettings {
            stale_after: Duration::ZERO,
            ..fast_settings()
        };
        // mtime is now, but the zero staleness window makes any age stale.
        std::thread::sleep(Duration::from_millis(10));
        with_lock(&target, &settings, || Ok(())).unwrap();
        assert!(!lock_path(&target).exists());
    }

    #[test]
    fn test_lock_path_appends_suffix() {
        let p = lock_path(Path::new("/data/api.jsonl"));
        assert_eq!(p, PathBuf::from("/data/api.jsonl.lock"));
    }
}
