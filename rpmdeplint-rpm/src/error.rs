//! Error handling for rpmdeplint-rpm.

use std::path::PathBuf;

/// Error returned while reading or comparing an RPM header's file table.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A path given as a PUT, or fetched as a conflict candidate, did not
    /// parse as an RPM package.
    #[error("Failed to read package: {path}: not a rpm")]
    Unreadable {
        /// Path that failed to parse.
        path: PathBuf,
        /// Underlying parser error.
        #[source]
        source: rpm::Error,
    },

    /// An I/O error occurred opening the package file itself (as opposed to
    /// a parse error in its contents).
    #[error("failed to open {path}: {source}")]
    Io {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
