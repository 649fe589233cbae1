//! The top-level CLI error, and its mapping onto the stable exit-code
//! contract (§7 of the design: 1 = operational failure, 2 = usage error).

/// Any failure `rpmdeplint`'s dispatcher can produce.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A PUT failed to parse as an RPM, or its file table could not be read.
    #[error(transparent)]
    Rpm(#[from] rpmdeplint_rpm::Error),

    /// Repodata or a candidate package's bytes failed to download, or a yum
    /// config file under `/etc/yum.repos.d/` was malformed.
    #[error(transparent)]
    Repo(#[from] rpmdeplint_repo::Error),

    /// The repo cache could not be read, written or configured.
    #[error(transparent)]
    Cache(#[from] rpmdeplint_cache::Error),

    /// A solve job failed outright, or a conflict candidate's bytes could
    /// not be buffered for comparison.
    #[error(transparent)]
    Solve(#[from] rpmdeplint_solve::Error),

    /// Bad CLI input: a malformed `--repo` value, or an unusable/ambiguous
    /// `--arch` selection.
    #[error("{0}")]
    Usage(String),

    /// Man page generation failed.
    #[error("failed to write man page: {0}")]
    Man(#[from] std::io::Error),
}

impl Error {
    /// The process exit code this error should produce.
    ///
    /// Everything except [`Error::Usage`] is an operational failure (exit 1);
    /// defects found by a check are reported separately, via
    /// [`crate::commands::CheckOutcome`], not through this error type.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Usage(_) => 2,
            _ => 1,
        }
    }
}
