//! The solver pool: every repo package and PUT interned into one
//! [`resolvo`] instance, ready to be driven through dependency/conflict jobs.

use std::collections::HashSet;
use std::sync::Arc;

use resolvo::{ConditionalRequirement, Problem, Requirement, UnsolvableOrCancelled};
use rpmdeplint_types::{Arch, Job, JobAction, Nevra, Package, Problem as Diagnostic, Relation, RelationFlags};

use crate::error::Error;
use crate::provider::RpmDependencyProvider;
use crate::types::MatchSpec;

/// Package names (and `installonlypkg(...)` provide markers) RPM treats as
/// "installonly": multiple versions may be installed side by side rather
/// than the newest replacing the rest. Kernels are the canonical case.
///
/// This mirrors the hard-coded list `yum`/`dnf` ship (`installonlypkgs` in
/// their default configuration), since rpmdeplint has no config file of its
/// own to read it from.
pub const INSTALLONLY_NAMES: &[&str] = &[
    "kernel",
    "kernel-PAE",
    "installonlypkg(kernel)",
    "installonlypkg(kernel-module)",
    "installonlypkg(vm)",
    "kernel-bigmem",
    "kernel-enterprise",
    "kernel-smp",
    "kernel-modules",
    "kernel-debug",
    "kernel-unsupported",
    "kernel-source",
    "kernel-devel",
    "kernel-PAE-debug",
];

/// The result of driving the pool through a set of [`Job`]s.
#[derive(Clone, Debug)]
pub enum SolveOutcome {
    /// A full transaction was found; these are the packages it selects.
    Installed(Vec<Arc<Package>>),
    /// No transaction satisfies the jobs; these are the diagnostics to report.
    Problems(Vec<Diagnostic>),
}

/// Accumulates repo packages and PUTs before they're frozen into a
/// read-only [`SolverPool`].
///
/// Repo packages whose architecture is neither `noarch` nor
/// [`Arch::canonical`]-compatible with the configured test arch are silently
/// dropped here rather than interned: they could never be selected anyway,
/// and excluding them up front keeps "nothing provides" diagnostics free of
/// candidates the real tool would never have considered.
#[derive(Debug)]
pub struct SolverPoolBuilder {
    provider: RpmDependencyProvider,
    installonly_names: HashSet<String>,
    repo_packages: Vec<Arc<Package>>,
    puts: Vec<Arc<Package>>,
    test_arch: Arch,
}

impl SolverPoolBuilder {
    /// Creates a builder for the given test architecture.
    pub fn new(test_arch: Arch) -> Self {
        Self {
            provider: RpmDependencyProvider::new(),
            installonly_names: INSTALLONLY_NAMES.iter().map(|&s| s.to_string()).collect(),
            repo_packages: Vec::new(),
            puts: Vec::new(),
            test_arch,
        }
    }

    /// Adds packages discovered from a configured repo, filtering out any
    /// whose architecture is incompatible with the test arch.
    pub fn add_repo_packages(&mut self, packages: impl IntoIterator<Item = Package>) {
        for pkg in packages {
            let arch = Arch::new(pkg.nevra.arch.clone());
            if !arch.is_noarch() && arch.canonical() != self.test_arch.canonical() {
                continue;
            }
            let pkg = Arc::new(pkg);
            self.repo_packages.push(pkg.clone());
            self.provider.add_packages([pkg], &self.installonly_names);
        }
    }

    /// Adds packages under test. Their architecture is never filtered: a PUT
    /// named explicitly on the command line is always a candidate, even if
    /// it mismatches the test arch (that mismatch is itself diagnosable
    /// elsewhere, not silently dropped).
    pub fn add_puts(&mut self, packages: impl IntoIterator<Item = Package>) {
        for pkg in packages {
            let pkg = Arc::new(pkg);
            self.puts.push(pkg.clone());
            self.provider.add_packages([pkg], &self.installonly_names);
        }
    }

    /// Freezes the pool. Per §3 of the design, the pool is read-only from
    /// this point on; no further packages may be added.
    pub fn finalize(self) -> SolverPool {
        SolverPool {
            solver: resolvo::Solver::new(self.provider),
            repo_packages: self.repo_packages,
            puts: self.puts,
            test_arch: self.test_arch,
        }
    }
}

/// A read-only pool of interned packages, ready to be driven through jobs.
#[derive(Debug)]
pub struct SolverPool {
    solver: resolvo::Solver<RpmDependencyProvider>,
    repo_packages: Vec<Arc<Package>>,
    puts: Vec<Arc<Package>>,
    test_arch: Arch,
}

impl SolverPool {
    /// Every arch-compatible repo package, in load order.
    pub fn packages(&self) -> &[Arc<Package>] {
        &self.repo_packages
    }

    /// Every package under test, in the order given on the command line.
    pub fn puts(&self) -> &[Arc<Package>] {
        &self.puts
    }

    /// The architecture this pool was built to test against.
    pub fn test_arch(&self) -> &Arch {
        &self.test_arch
    }

    /// Every real package whose file table includes `path`.
    pub fn owners_of_file(&self, path: &str) -> Vec<&Arc<Package>> {
        self.solver.provider().owners_of_file(path)
    }

    /// Drives the pool through `jobs`, returning either a resolved
    /// transaction or the diagnostics explaining why none exists.
    ///
    /// `JobAction::Install`/`Multiversion` both become an exact-identity
    /// requirement (installonly exclusivity is already handled by how
    /// [`RpmDependencyProvider`] interns each instance, so the two actions
    /// need no different treatment here); `Update` becomes a `>=` bare-name
    /// requirement, letting the solver float the selection up to a newer
    /// candidate if one exists; `Erase` excludes its selector from every
    /// candidate set for the duration of this solve only.
    pub fn solve(&mut self, jobs: &[Job]) -> Result<SolveOutcome, Error> {
        let mut requirements = Vec::new();
        let mut exact_targets: Vec<Arc<Package>> = Vec::new();
        let mut excluded_nevras: Vec<Nevra> = Vec::new();

        for job in jobs {
            match job.action {
                JobAction::Install | JobAction::Multiversion => {
                    for nevra in &job.selector {
                        let provider = self.solver.provider();
                        let Some(identity_id) = provider.identity_of(nevra) else {
                            return Err(Error::Unsolvable(format!("{nevra} is not a known package")));
                        };
                        let spec = MatchSpec::exact(nevra.name.clone(), nevra.evr.clone());
                        let version_set = provider.intern_match_spec(identity_id, spec);
                        requirements.push(ConditionalRequirement {
                            requirement: Requirement::Single(version_set),
                            condition: None,
                        });
                        if let Some(pkg) = provider.package_by_nevra(nevra) {
                            exact_targets.push(pkg.clone());
                        }
                    }
                }
                JobAction::Update => {
                    for nevra in &job.selector {
                        let provider = self.solver.provider();
                        let name_id = provider.intern_name(nevra.name.clone());
                        let spec = MatchSpec::from_relation(Relation::versioned(
                            nevra.name.clone(),
                            RelationFlags::Ge,
                            nevra.evr.clone(),
                        ));
                        let version_set = provider.intern_match_spec(name_id, spec);
                        requirements.push(ConditionalRequirement {
                            requirement: Requirement::Single(version_set),
                            condition: None,
                        });
                    }
                }
                JobAction::Erase => excluded_nevras.extend(job.selector.iter().cloned()),
            }
        }

        let excluded_ids: HashSet<_> = excluded_nevras
            .iter()
            .filter_map(|nevra| self.solver.provider().solvable_of(nevra))
            .collect();
        self.solver.provider().set_excluded(excluded_ids);

        let problem = Problem::new().requirements(requirements);
        let raw_solution = self.solver.solve(problem);
        self.solver.provider().clear_excluded();

        match raw_solution {
            Ok(solvables) => {
                let provider = self.solver.provider();
                Ok(SolveOutcome::Installed(
                    solvables
                        .into_iter()
                        .filter_map(|solvable| provider.package(solvable).cloned())
                        .collect(),
                ))
            }
            Err(UnsolvableOrCancelled::Unsolvable(unsat)) => {
                let excluded: HashSet<Nevra> = excluded_nevras.into_iter().collect();
                let mut problems = self.direct_missing_requires(&exact_targets, &excluded);
                if problems.is_empty() {
                    problems = unsat
                        .display_user_friendly(&self.solver)
                        .to_string()
                        .lines()
                        .filter(|line| !line.trim().is_empty())
                        .map(|line| Diagnostic::new(line.trim_start_matches("- ").to_string()))
                        .collect();
                }
                Ok(SolveOutcome::Problems(problems))
            }
            Err(UnsolvableOrCancelled::Cancelled(_)) => {
                Err(Error::Unsolvable("solve was cancelled".to_string()))
            }
        }
    }

    /// The common, single-level case behind most "nothing provides"
    /// diagnostics: one of the jobs' own exact targets has a `Requires:`
    /// that literally nothing in the (excluded-filtered) pool satisfies.
    /// `resolvo`'s own unsat formatter is the fallback for anything deeper
    /// (a transitive chain, or a genuine version clash between dependents).
    fn direct_missing_requires(&self, targets: &[Arc<Package>], excluded: &HashSet<Nevra>) -> Vec<Diagnostic> {
        let provider = self.solver.provider();
        let mut problems: Vec<Diagnostic> = targets
            .iter()
            .flat_map(|pkg| pkg.requires.iter().map(move |req| (pkg, req)))
            .filter(|(_, req)| !req.name.starts_with(crate::provider::RPMLIB_PREFIX))
            .filter(|(_, req)| !provider.satisfies(req, excluded))
            .map(|(pkg, req)| Diagnostic::new(format!("nothing provides {req} needed by {}", pkg.nevra)))
            .collect();
        problems.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        problems.dedup();
        problems
    }
}
