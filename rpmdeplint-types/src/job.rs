//! Jobs: the install/erase/update/multiversion directives the solver pool is
//! asked to satisfy.

use crate::nevra::Nevra;

/// What a [`Job`] asks the solver to do with its selected package(s).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum JobAction {
    /// Install the selected package and its dependency closure.
    Install,
    /// Remove the selected package.
    Erase,
    /// Install the selected package, replacing any installed package it
    /// obsoletes or that shares its name.
    Update,
    /// Install the selected package alongside any existing version rather
    /// than replacing it (used for the kernel-family installonly packages).
    Multiversion,
}

/// A single unit of solver work: select some package(s), then do `action`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Job {
    /// The package(s) this job selects, identified by NEVRA.
    pub selector: Vec<Nevra>,
    /// What to do with the selection.
    pub action: JobAction,
}

impl Job {
    /// Creates a job selecting a single package.
    pub fn single(nevra: Nevra, action: JobAction) -> Self {
        Self {
            selector: vec![nevra],
            action,
        }
    }
}
