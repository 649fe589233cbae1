//! Error handling for rpmdeplint-types.

/// Error returned while parsing or validating a core rpmdeplint data type.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A NEVRA string did not match `name-[epoch:]version-release.arch`.
    #[error("invalid NEVRA string: {0:?}")]
    InvalidNevra(String),

    /// A dependency relation string could not be parsed.
    #[error("invalid dependency relation: {0:?}")]
    InvalidRelation(String),

    /// An architecture name is not present in the canonical arch table.
    #[error("unknown architecture: {0:?}")]
    UnknownArchitecture(String),

    /// A `--repo NAME,PATH` argument was missing its comma-separated name.
    #[error("repo {0:?} is not in the form NAME,PATH")]
    InvalidRepoSpec(String),
}
