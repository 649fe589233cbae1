//! The content-addressed repodata cache itself.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use log::{debug, warn};
use tempfile::NamedTempFile;

use crate::config::CacheConfig;
use crate::error::Error;

/// A content-addressed, LRU-by-mtime cache of repodata payloads.
///
/// Entries live at `<root>/<first-hex-char>/<rest-of-checksum>`; the
/// checksum *is* the filename, so no separate metadata is ever needed to
/// know whether an entry is stale: [`RepoCache::lookup`] trusts the caller
/// to compare the stream against the checksum it asked for.
#[derive(Clone, Debug)]
pub struct RepoCache {
    config: CacheConfig,
}

impl RepoCache {
    /// Creates a [`RepoCache`] from the given configuration.
    pub fn new(config: CacheConfig) -> Self {
        Self { config }
    }

    /// Returns the path an entry with `hex_digest` would live at, creating
    /// no directories or files.
    fn entry_path(&self, hex_digest: &str) -> PathBuf {
        let (first, rest) = hex_digest.split_at(1);
        self.config.root.join(first).join(rest)
    }

    /// Looks up a cache entry by its hex-encoded content digest.
    ///
    /// On a hit, the entry's mtime is bumped to now (an LRU touch) before
    /// the open file handle is returned; on a miss, returns `Ok(None)`.
    pub fn lookup(&self, hex_digest: &str) -> Result<Option<File>, Error> {
        let path = self.entry_path(hex_digest);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("cache miss for {hex_digest}");
                return Ok(None);
            }
            Err(source) => {
                return Err(Error::IoPath {
                    path,
                    context: "opening cache entry",
                    source,
                });
            }
        };

        if let Err(source) = file.set_modified(SystemTime::now()) {
            warn!("failed to touch mtime of cache entry {path:?}: {source}");
        }
        debug!("cache hit for {hex_digest}");
        Ok(Some(file))
    }

    /// Inserts `reader`'s content into the cache under `hex_digest`.
    ///
    /// Writes to a sibling temporary file in the same directory, then
    /// atomically links it into place; an existing entry at the destination
    /// wins and the temp file is discarded silently (another process, or an
    /// earlier call, already populated it with the same content). If a
    /// *directory* occupies the destination (an artifact of an older cache
    /// layout), it is removed and the insert retried once.
    pub fn insert(&self, hex_digest: &str, mut reader: impl Read) -> Result<(), Error> {
        let path = self.entry_path(hex_digest);
        let dir = path.parent().expect("entry_path always has a parent");
        fs::create_dir_all(dir).map_err(|source| Error::IoPath {
            path: dir.to_path_buf(),
            context: "creating cache directory",
            source,
        })?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(|source| Error::IoPath {
            path: dir.to_path_buf(),
            context: "creating temporary cache file",
            source,
        })?;
        io::copy(&mut reader, &mut tmp).map_err(|source| Error::IoPath {
            path: tmp.path().to_path_buf(),
            context: "writing temporary cache file",
            source,
        })?;
        tmp.as_file().sync_all().map_err(|source| Error::IoPath {
            path: tmp.path().to_path_buf(),
            context: "fsyncing temporary cache file",
            source,
        })?;

        match tmp.persist_noclobber(&path) {
            Ok(_) => Ok(()),
            Err(err) if path.is_dir() => {
                warn!("removing legacy directory at cache entry path {path:?}");
                fs::remove_dir_all(&path).map_err(|source| Error::IoPath {
                    path: path.clone(),
                    context: "removing legacy cache directory",
                    source,
                })?;
                err.file.persist_noclobber(&path).map_err(|err| Error::IoPath {
                    path,
                    context: "persisting cache entry after removing legacy directory",
                    source: err.error,
                })?;
                Ok(())
            }
            Err(_) => {
                // Destination already exists: another writer beat us to it.
                debug!("cache entry {hex_digest} already present, discarding new write");
                Ok(())
            }
        }
    }

    /// Walks the cache root and deletes every regular file whose mtime is
    /// older than `now - expiry`.
    ///
    /// An `expiry` of zero expires everything. Deletion races with another
    /// process's concurrent insert or sweep are tolerated: an `ENOENT` on
    /// `remove_file` is swallowed rather than propagated.
    pub fn sweep(&self) -> Result<usize, Error> {
        let cutoff = SystemTime::now()
            .checked_sub(self.config.expiry)
            .unwrap_or(SystemTime::UNIX_EPOCH);

        let mut swept = 0;
        let Ok(top_entries) = fs::read_dir(&self.config.root) else {
            // Nothing has ever been cached; sweeping an absent root is a no-op.
            return Ok(0);
        };

        for top_entry in top_entries {
            let top_entry = top_entry.map_err(|source| Error::IoPath {
                path: self.config.root.clone(),
                context: "reading cache directory entry",
                source,
            })?;
            if !top_entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                continue;
            }
            swept += sweep_shard(&top_entry.path(), cutoff)?;
        }

        debug!("cache sweep removed {swept} expired entries");
        Ok(swept)
    }
}

/// Sweeps a single first-hex-char shard directory, returning the number of
/// entries it removed.
fn sweep_shard(shard: &Path, cutoff: SystemTime) -> Result<usize, Error> {
    let mut swept = 0;
    let entries = fs::read_dir(shard).map_err(|source| Error::IoPath {
        path: shard.to_path_buf(),
        context: "reading cache shard directory",
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| Error::IoPath {
            path: shard.to_path_buf(),
            context: "reading cache shard entry",
            source,
        })?;
        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(_) => continue,
        };
        if !metadata.is_file() {
            continue;
        }
        let Ok(modified) = metadata.modified() else {
            continue;
        };
        if modified >= cutoff {
            continue;
        }
        match fs::remove_file(entry.path()) {
            Ok(()) => swept += 1,
            Err(source) if source.kind() == io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(Error::IoPath {
                    path: entry.path(),
                    context: "removing expired cache entry",
                    source,
                });
            }
        }
    }
    Ok(swept)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::time::Duration;

    use tempfile::tempdir;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn insert_then_lookup_round_trips() -> TestResult {
        let dir = tempdir()?;
        let cache = RepoCache::new(CacheConfig::at(dir.path(), Duration::from_secs(604_800)));

        cache.insert("abc123", Cursor::new(b"payload"))?;
        let mut found = cache.lookup("abc123")?.expect("entry should be present");
        let mut contents = String::new();
        found.read_to_string(&mut contents)?;
        assert_eq!(contents, "payload");
        Ok(())
    }

    #[test]
    fn lookup_miss_returns_none() -> TestResult {
        let dir = tempdir()?;
        let cache = RepoCache::new(CacheConfig::at(dir.path(), Duration::from_secs(604_800)));
        assert!(cache.lookup("doesnotexist")?.is_none());
        Ok(())
    }

    #[test]
    fn insert_is_idempotent_on_existing_entry() -> TestResult {
        let dir = tempdir()?;
        let cache = RepoCache::new(CacheConfig::at(dir.path(), Duration::from_secs(604_800)));
        cache.insert("abc123", Cursor::new(b"first"))?;
        cache.insert("abc123", Cursor::new(b"second"))?;
        let mut found = cache.lookup("abc123")?.expect("entry should be present");
        let mut contents = String::new();
        found.read_to_string(&mut contents)?;
        assert_eq!(contents, "first", "existing entry must win over a concurrent write");
        Ok(())
    }

    #[test]
    fn sweep_removes_only_expired_entries() -> TestResult {
        let dir = tempdir()?;
        let cache = RepoCache::new(CacheConfig::at(dir.path(), Duration::from_secs(604_800)));
        cache.insert("freshentry00", Cursor::new(b"x"))?;

        let swept = cache.sweep()?;
        assert_eq!(swept, 0, "a freshly-inserted entry is not expired");
        assert!(cache.lookup("freshentry00")?.is_some());
        Ok(())
    }

    #[test]
    fn zero_expiry_expires_everything() -> TestResult {
        let dir = tempdir()?;
        let cache = RepoCache::new(CacheConfig::at(dir.path(), Duration::ZERO));
        cache.insert("abc123", Cursor::new(b"payload"))?;

        let swept = cache.sweep()?;
        assert_eq!(swept, 1);
        assert!(cache.lookup("abc123")?.is_none());
        Ok(())
    }

    #[test]
    fn sweep_on_empty_cache_root_is_a_no_op() -> TestResult {
        let dir = tempdir()?;
        let cache = RepoCache::new(CacheConfig::at(dir.path().join("never-created"), Duration::from_secs(604_800)));
        assert_eq!(cache.sweep()?, 0);
        Ok(())
    }
}
