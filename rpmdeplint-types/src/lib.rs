//! Shared data model for rpmdeplint.
//!
//! This crate has no I/O: it defines the NEVRA/EVR/relation/package/repo/job
//! types that `rpmdeplint-cache`, `rpmdeplint-repo`, `rpmdeplint-rpm` and
//! `rpmdeplint-solve` all build on, so that those crates can agree on
//! package identity without depending on one another's internals.

#![forbid(unsafe_code)]

mod arch;
mod error;
mod evr;
mod job;
mod nevra;
mod package;
mod problem;
mod relation;
mod repo;

pub use arch::{Arch, CanonicalArch};
pub use error::Error;
pub use evr::{rpmvercmp, Evr};
pub use job::{Job, JobAction};
pub use nevra::Nevra;
pub use package::{Checksum, Package, Source, COMMANDLINE_REPO_ID};
pub use problem::Problem;
pub use relation::{Relation, RelationFlags};
pub use repo::{Repo, RepoLocation};

/// Convenience alias used throughout this crate's public functions.
pub type Result<T> = std::result::Result<T, Error>;
