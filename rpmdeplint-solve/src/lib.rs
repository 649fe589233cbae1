//! SAT-based dependency and conflict reasoning for rpmdeplint, built on
//! [`resolvo`].
//!
//! [`SolverPool`] interns every repo package and PUT into one `resolvo`
//! instance (via [`provider::RpmDependencyProvider`], generalizing the same
//! `DependencyProvider` pattern ALPM-based tooling uses for its own solver);
//! [`DependencyAnalyzer`] drives it through the four checks spec'd for this
//! tool, accumulating per-PUT results into a [`DependencySet`].

#![forbid(unsafe_code)]

mod analyzer;
mod dependency_set;
mod error;
mod pool;
mod provider;
mod types;
mod utils;

pub use analyzer::DependencyAnalyzer;
pub use dependency_set::{DependencySet, PackageResult};
pub use error::Error;
pub use pool::{SolveOutcome, SolverPool, SolverPoolBuilder, INSTALLONLY_NAMES};
