// ABOUTME: File-backed cache: one file per key in a directory, expiry judged by modification time.
// ABOUTME: Writes go through a temporary file and rename so readers never see partial entries.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use shopscout_core::{Cache, ScoutError};
use tracing::trace;

pub struct DiskCache {
    dir: PathBuf,
}

impl DiskCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(key)))
    }
}

/// Maps a cache key to a file name. Characters outside `[A-Za-z0-9_-]` are
/// hex-escaped so distinct keys never share a file.
fn file_stem(key: &str) -> String {
    let mut stem = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' | b'-' => stem.push(byte as char),
            other => stem.push_str(&format!("%{other:02X}")),
        }
    }
    stem
}

impl Cache for DiskCache {
    fn load(&self, key: &str, max_age: Duration) -> Option<String> {
        let path = self.entry_path(key);
        let modified = fs::metadata(&path).and_then(|m| m.modified()).ok()?;
        // A modification time in the future counts as brand new.
        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO);
        if age >= max_age {
            trace!(key, age_secs = age.as_secs(), "cache entry expired");
            return None;
        }
        fs::read_to_string(&path).ok()
    }

    fn store(&self, key: &str, value: &str) -> Result<(), ScoutError> {
        fs::create_dir_all(&self.dir).map_err(|e| ScoutError::cache(key, e))?;
        let path = self.entry_path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|e| ScoutError::cache(key, e))?;
        fs::rename(&tmp, &path).map_err(|e| ScoutError::cache(key, e))?;
        Ok(())
    }
}
