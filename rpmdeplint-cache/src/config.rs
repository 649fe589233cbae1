//! Cache root and expiry configuration.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::Error;

/// Default expiry: one week, matching spec.md's default `RPMDEPLINT_EXPIRY_SECONDS`.
const DEFAULT_EXPIRY_SECONDS: u64 = 604_800;

/// Cache root and expiry, read once at startup.
#[derive(Clone, Debug)]
pub struct CacheConfig {
    /// Cache root directory (created on first use if missing).
    pub root: PathBuf,
    /// Entries with an mtime older than `now - expiry` are swept.
    ///
    /// A value of `Duration::ZERO` (from `RPMDEPLINT_EXPIRY_SECONDS=0`) means
    /// every entry is expired on the next sweep, per spec.md's resolution of
    /// its own open question about that variable's edge-case meaning.
    pub expiry: Duration,
}

impl CacheConfig {
    /// Builds a [`CacheConfig`] from `$XDG_CACHE_HOME`/`$HOME` and
    /// `$RPMDEPLINT_EXPIRY_SECONDS`, falling back to `~/.cache/rpmdeplint`
    /// and a one-week expiry respectively.
    pub fn from_env() -> Result<Self, Error> {
        let root = match env::var_os("XDG_CACHE_HOME").filter(|v| !v.is_empty()) {
            Some(xdg) => PathBuf::from(xdg).join("rpmdeplint"),
            None => {
                let home = env::var_os("HOME").ok_or(Error::NoHomeDirectory)?;
                PathBuf::from(home).join(".cache").join("rpmdeplint")
            }
        };

        let expiry = match env::var("RPMDEPLINT_EXPIRY_SECONDS") {
            Ok(value) => value
                .parse()
                .map(Duration::from_secs)
                .unwrap_or(Duration::from_secs(DEFAULT_EXPIRY_SECONDS)),
            Err(_) => Duration::from_secs(DEFAULT_EXPIRY_SECONDS),
        };

        Ok(Self { root, expiry })
    }

    /// Builds a [`CacheConfig`] rooted at an explicit directory, e.g. for
    /// tests that want an isolated `tempfile::TempDir`.
    pub fn at(root: impl Into<PathBuf>, expiry: Duration) -> Self {
        Self {
            root: root.into(),
            expiry,
        }
    }
}
