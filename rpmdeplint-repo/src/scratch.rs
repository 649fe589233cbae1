//! Materializes a `repodata/` directory on disk so both local and remote
//! repos can be handed to `rpmrepo_metadata::Repository::load_from_directory`
//! through the same code path.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Error;

/// A `repodata/` directory built for one repo load, backed by a scratch
/// directory that is removed when dropped.
///
/// For a local repo this simply points at the existing directory; for a
/// remote repo it is a [`tempfile::TempDir`] populated by
/// [`crate::loader::RepoLoader`] with `repomd.xml` plus whichever payload
/// files it named, fetched through [`rpmdeplint_cache::RepoCache`].
pub enum RepoRoot {
    /// An existing on-disk directory, owned by the caller.
    Borrowed(PathBuf),
    /// A scratch directory populated for this load, removed on drop.
    Scratch(tempfile::TempDir),
}

impl RepoRoot {
    /// The directory `Repository::load_from_directory` should be pointed at.
    pub fn path(&self) -> &Path {
        match self {
            RepoRoot::Borrowed(path) => path,
            RepoRoot::Scratch(dir) => dir.path(),
        }
    }

    /// Creates a fresh scratch directory with an empty `repodata/` subdir.
    pub fn new_scratch() -> Result<Self, Error> {
        let dir = tempfile::tempdir().map_err(|source| Error::IoPath {
            path: std::env::temp_dir(),
            context: "creating scratch repodata directory",
            source,
        })?;
        fs::create_dir_all(dir.path().join("repodata")).map_err(|source| Error::IoPath {
            path: dir.path().join("repodata"),
            context: "creating scratch repodata subdirectory",
            source,
        })?;
        Ok(RepoRoot::Scratch(dir))
    }

    /// Writes `contents` to `repodata/<relative>` inside this root, creating
    /// any intermediate directories `location_href` implies (filelists are
    /// sometimes nested, e.g. under a `repodata/` alias directory).
    pub fn write(&self, relative: &Path, contents: &[u8]) -> Result<(), Error> {
        let dest = self.path().join(relative);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|source| Error::IoPath {
                path: parent.to_path_buf(),
                context: "creating scratch repodata subdirectory",
                source,
            })?;
        }
        fs::write(&dest, contents).map_err(|source| Error::IoPath {
            path: dest,
            context: "writing scratch repodata file",
            source,
        })
    }
}
