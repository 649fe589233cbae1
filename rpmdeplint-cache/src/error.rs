//! Error handling for rpmdeplint-cache.

use std::io;
use std::path::PathBuf;

/// Error returned by a [`crate::RepoCache`] operation.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O operation on a specific path failed.
    #[error("failed {context} at {path:?}")]
    IoPath {
        /// Path the failing operation concerned.
        path: PathBuf,
        /// Short description of what was being attempted.
        context: &'static str,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// `$HOME` is unset and no `$XDG_CACHE_HOME` override was given, so the
    /// default cache root cannot be determined.
    #[error("cannot determine cache directory: $HOME is not set")]
    NoHomeDirectory,
}
