//! On-disk cache implementation.
//!
//! Every bucket is a subdirectory of the cache root and every entry a file
//! inside it. An entry file starts with its etag, length-prefixed, followed by
//! the payload:
//!
//! ```text
//! [etag_len: u32 LE][etag bytes][payload bytes]
//! ```
//!
//! The root carries a `VERSION` file. Opening the cache with a different
//! version string removes everything below the root first, so entries written
//! by another build are never read back.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::{Cache, CacheBucket};

const VERSION_FILE: &str = "VERSION";

/// File-backed [`Cache`].
///
/// ```text
/// {root}/
/// +-- VERSION
/// +-- handlers/
///     +-- definitions
/// ```
///
/// An optional time-to-live bounds how long an entry stays valid after it
/// was written; past that age a read misses and the next write replaces it.
pub struct FileCache {
    root: PathBuf,
    ttl: Option<Duration>,
}

impl FileCache {
    /// Open the cache at `root`, wiping it if its `VERSION` differs from `version`.
    ///
    /// Failures while validating or creating the directory are logged and
    /// otherwise ignored; the cache then behaves as if empty.
    #[must_use]
    pub fn new(root: PathBuf, version: &str) -> Self {
        validate_version(&root, version);
        Self { root, ttl: None }
    }

    /// Expire entries older than `ttl`.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Cache root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Cache for FileCache {
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket> {
        Box::new(FileCacheBucket {
            dir: self.root.join(name),
            ttl: self.ttl,
        })
    }
}

struct FileCacheBucket {
    dir: PathBuf,
    ttl: Option<Duration>,
}

impl FileCacheBucket {
    fn expired(&self, file: &File) -> bool {
        let Some(ttl) = self.ttl else {
            return false;
        };
        let age = file
            .metadata()
            .and_then(|meta| meta.modified())
            .ok()
            .and_then(|modified| SystemTime::now().duration_since(modified).ok());
        // An mtime in the future counts as fresh.
        age.is_some_and(|age| age > ttl)
    }
}

impl CacheBucket for FileCacheBucket {
    fn get(&self, key: &str, etag: &str) -> Option<Vec<u8>> {
        let path = self.dir.join(key);
        let mut file = File::open(&path).ok()?;

        if self.expired(&file) {
            tracing::debug!(path = %path.display(), "cache entry expired");
            return None;
        }

        let mut len_buf = [0u8; 4];
        file.read_exact(&mut len_buf).ok()?;
        let etag_len = usize::try_from(u32::from_le_bytes(len_buf)).ok()?;

        let mut stored_etag = vec![0u8; etag_len];
        file.read_exact(&mut stored_etag).ok()?;
        if !etag.is_empty() && stored_etag != etag.as_bytes() {
            return None;
        }

        let mut payload = Vec::new();
        file.read_to_end(&mut payload).ok()?;
        Some(payload)
    }

    fn set(&self, key: &str, etag: &str, value: &[u8]) {
        let path = self.dir.join(key);
        let Some(parent) = path.parent() else {
            return;
        };
        if let Err(e) = fs::create_dir_all(parent) {
            tracing::warn!(path = %parent.display(), error = %e, "failed to create cache bucket");
            return;
        }

        let Ok(etag_len) = u32::try_from(etag.len()) else {
            return;
        };
        let mut buf = Vec::with_capacity(4 + etag.len() + value.len());
        buf.extend_from_slice(&etag_len.to_le_bytes());
        buf.extend_from_slice(etag.as_bytes());
        buf.extend_from_slice(value);

        if let Err(e) = fs::write(&path, &buf) {
            tracing::warn!(path = %path.display(), error = %e, "failed to write cache entry");
        }
    }
}

fn validate_version(root: &Path, version: &str) {
    let version_file = root.join(VERSION_FILE);

    match fs::read_to_string(&version_file) {
        Ok(stored) if stored == version => {
            tracing::debug!(version, "cache version matches");
            return;
        }
        Ok(stored) => {
            tracing::info!(stored = %stored, current = version, "cache version changed, wiping cache");
        }
        Err(_) => {
            tracing::info!(root = %root.display(), "initializing cache");
        }
    }

    if root.exists()
        && let Err(e) = fs::remove_dir_all(root)
    {
        tracing::warn!("failed to remove cache directory: {e}");
    }
    if let Err(e) = fs::create_dir_all(root) {
        tracing::warn!("failed to create cache directory: {e}");
        return;
    }
    if let Err(e) = fs::write(&version_file, version) {
        tracing::warn!("failed to write cache VERSION file: {e}");
    }
}
