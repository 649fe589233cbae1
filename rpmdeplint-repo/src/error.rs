//! Error handling for rpmdeplint-repo.

use std::io;
use std::path::PathBuf;

/// Error returned while loading a repo's metadata or packages.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// `repomd.xml` (or a payload it names) could not be fetched or read.
    #[error("Failed to download repodata for {repo}: {reason}")]
    RepoDownload {
        /// The repo's display representation (`name`).
        repo: String,
        /// Short, human-readable reason.
        reason: String,
    },

    /// A candidate package's bytes could not be fetched for a file
    /// comparison in `find_conflicts`.
    #[error("Failed to download package {location}: {reason}")]
    PackageDownload {
        /// The package's `<location>` href.
        location: String,
        /// Short, human-readable reason.
        reason: String,
    },

    /// `repomd.xml`, `primary.xml` or `filelists.xml` was present but did
    /// not parse.
    #[error("failed to parse repodata for {repo}: {source}")]
    Parse {
        /// The repo's display representation.
        repo: String,
        /// Underlying metadata parse error.
        #[source]
        source: rpmrepo_metadata::MetadataError,
    },

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

    /// A yum config file (`/etc/yum.conf`, a `.repo` file) referenced a
    /// section with none of `baseurl`/`metalink`/`mirrorlist`, or more than
    /// one.
    #[error("repo section {section:?} in {path:?} must set exactly one of baseurl, metalink, mirrorlist")]
    InvalidRepoSection {
        /// Path of the offending config file.
        path: PathBuf,
        /// `[section]` name.
        section: String,
    },

    /// A yum config file was present but not valid INI syntax.
    #[error("failed to parse {path:?}: {source}")]
    IniParse {
        /// Path of the offending config file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: ini::ParseError,
    },

    /// The repo cache rejected a write or read.
    #[error(transparent)]
    Cache(#[from] rpmdeplint_cache::Error),
}
