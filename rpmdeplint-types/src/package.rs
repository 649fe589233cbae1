//! The immutable package record that `rpmdeplint-solve` pools and that
//! `rpmdeplint-rpm`'s file-conflict check reads file entries for.

use std::path::PathBuf;

use crate::nevra::Nevra;
use crate::relation::Relation;

/// The pseudo-repo identifier used for packages supplied directly on the
/// command line (PUTs), as opposed to ones discovered from a configured repo.
pub const COMMANDLINE_REPO_ID: &str = "@commandline";

/// Where a [`Package`] record came from.
///
/// PUTs (`Commandline`) are read directly off disk and never touch
/// `rpmdeplint-cache`; repo packages carry enough information (`xml_base`,
/// `checksum`) for `rpmdeplint-repo`/`rpmdeplint-cache` to fetch and verify
/// them on demand.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Source {
    /// A package under test, given directly as a file path.
    Commandline {
        /// Path to the `.rpm` file on disk.
        path: PathBuf,
    },
    /// A package discovered in a configured repository.
    Repo {
        /// The owning [`crate::Repo`]'s name.
        repo_id: String,
        /// The `<location href="...">` from the repo's primary.xml, relative
        /// to the repo's effective base (see `xml_base`).
        location: String,
        /// The `xml:base` attribute override on this package's `<location>`
        /// element, if present; otherwise the repo's own baseurl applies.
        xml_base: Option<String>,
        /// Checksum from primary.xml, used to validate cache hits and fresh
        /// downloads alike.
        checksum: Checksum,
    },
}

/// A named content digest, as carried in repo metadata.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Checksum {
    /// Algorithm name as it appears in primary.xml (`sha256`, `sha1`, ...).
    pub algorithm: String,
    /// Lowercase hex digest.
    pub hex_digest: String,
}

/// An immutable package record.
///
/// Constructed once at ingestion time (from a PUT's RPM header or from a
/// repo's primary.xml/filelists.xml entries) and never mutated afterwards.
///
/// `file_provides` carries only the bare paths this package owns, eagerly,
/// so the pool can answer "who provides /path" (both for `Requires: /path`
/// resolution and for enumerating file-conflict candidates) without ever
/// opening a package. The *detailed* per-file metadata a conflict actually
/// gets compared on (mode, owner, group, content digest) is a second pass
/// that only the conflict check needs, so it stays out of this type and is
/// read lazily through `rpmdeplint-rpm`'s inspector instead.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Package {
    /// Name-Epoch-Version-Release-Arch.
    pub nevra: Nevra,
    /// Where this package came from.
    pub source: Source,
    /// `Requires:` relations.
    pub requires: Vec<Relation>,
    /// `Provides:` relations (always includes an implicit self-provide of
    /// `name = evr`, added by whichever crate constructs this record).
    pub provides: Vec<Relation>,
    /// `Obsoletes:` relations.
    pub obsoletes: Vec<Relation>,
    /// `Conflicts:` relations.
    pub conflicts: Vec<Relation>,
    /// Absolute paths this package's file table owns.
    pub file_provides: Vec<String>,
}

impl Package {
    /// Returns `true` if this package is a command-line PUT rather than one
    /// discovered from a configured repo.
    pub fn is_put(&self) -> bool {
        matches!(self.source, Source::Commandline { .. })
    }

    /// The originating repo identifier, `@commandline` for PUTs.
    pub fn repo_id(&self) -> &str {
        match &self.source {
            Source::Commandline { .. } => COMMANDLINE_REPO_ID,
            Source::Repo { repo_id, .. } => repo_id,
        }
    }
}
