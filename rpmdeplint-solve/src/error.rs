//! Error handling for rpmdeplint-solve.

/// Error returned by a [`crate::SolverPool`] or [`crate::DependencyAnalyzer`] operation.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A solve job failed outright (as opposed to returning a list of
    /// [`rpmdeplint_types::Problem`]s to report): the selector named no
    /// known package, or the underlying solver was cancelled.
    #[error("failed to solve dependencies: {0}")]
    Unsolvable(String),

    /// A PUT's file table could not be read for the conflict check.
    #[error(transparent)]
    Rpm(#[from] rpmdeplint_rpm::Error),

    /// A repo-provided conflict candidate's bytes could not be fetched.
    #[error(transparent)]
    Repo(#[from] rpmdeplint_repo::Error),

    /// A conflict candidate's bytes could not be buffered to a temporary
    /// file for [`rpmdeplint_rpm::RpmFileInspector`] to read.
    #[error("failed to buffer downloaded package: {0}")]
    Io(#[from] std::io::Error),

    /// The solver produced a transaction step type this version of
    /// rpmdeplint doesn't know how to interpret. This is a programming
    /// error, not a user-facing defect, and is never part of the stable
    /// diagnostic contract.
    #[error("unrecognised transaction step type: {0}")]
    UnrecognisedStep(String),
}
