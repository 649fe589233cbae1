//! The four-check orchestrator: `try_to_install_all`, `find_repoclosure_problems`,
//! `find_conflicts`, `find_upgrade_problems`.

use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::sync::Arc;

use log::warn;
use rpmdeplint_cache::RepoCache;
use rpmdeplint_repo::RepoLoader;
use rpmdeplint_rpm::{FileEntry, RpmFileInspector};
use rpmdeplint_types::{Arch, Job, JobAction, Nevra, Package, Problem, Repo, Source};

use crate::error::Error;
use crate::pool::{SolveOutcome, SolverPool, INSTALLONLY_NAMES};

/// Orchestrates the four defect checks over one [`SolverPool`].
///
/// Owns the pool plus whatever `find_conflicts` needs to fetch a repo
/// candidate's bytes on demand: the configured [`Repo`]s (keyed by name, the
/// same string used as a [`Package::repo_id`]), the [`RepoLoader`] that knows
/// how to download them, and the [`RepoCache`] that makes repeat downloads
/// free.
pub struct DependencyAnalyzer {
    pool: SolverPool,
    repos: HashMap<String, Repo>,
    loader: RepoLoader,
    cache: RepoCache,
    inspector: RpmFileInspector,
}

impl DependencyAnalyzer {
    /// Creates an analyzer over an already-populated, finalized pool.
    pub fn new(pool: SolverPool, repos: Vec<Repo>, loader: RepoLoader, cache: RepoCache) -> Self {
        Self {
            pool,
            repos: repos.into_iter().map(|repo| (repo.name.clone(), repo)).collect(),
            loader,
            cache,
            inspector: RpmFileInspector::new(),
        }
    }

    /// The pool this analyzer is driving, for callers that need to read it
    /// directly (e.g. `list-deps`'s transitive-dependency listing).
    pub fn pool(&self) -> &SolverPool {
        &self.pool
    }

    /// §4.4.1: installs every PUT in input order, recording either its
    /// transitive dependency closure or the problems that blocked it.
    ///
    /// Returns `(ok, set)` where `ok` is `true` exactly when no PUT reported
    /// any problem.
    pub fn try_to_install_all(&mut self) -> Result<(bool, crate::DependencySet), Error> {
        let mut set = crate::DependencySet::new();
        let puts: Vec<Arc<Package>> = self.pool.puts().to_vec();

        for put in &puts {
            let job = Job::single(put.nevra.clone(), JobAction::Install);
            match self.pool.solve(std::slice::from_ref(&job))? {
                SolveOutcome::Installed(installs) => {
                    let deps = installs.into_iter().map(|pkg| pkg.nevra.clone()).collect();
                    set.add(put.nevra.clone(), deps, Vec::new());
                }
                SolveOutcome::Problems(problems) => {
                    set.add(put.nevra.clone(), Vec::new(), problems);
                }
            }
        }

        let ok = set.overall_problems().is_empty();
        Ok((ok, set))
    }

    /// §4.4.2: existing repo packages whose dependencies become unsatisfiable
    /// once the PUTs are layered on top.
    pub fn find_repoclosure_problems(&mut self) -> Result<Vec<Problem>, Error> {
        let repo_packages: Vec<Arc<Package>> = self.pool.packages().to_vec();
        let puts: Vec<Arc<Package>> = self.pool.puts().to_vec();

        let obsoleted = compute_obsoleted(&puts, &repo_packages);
        let existing_obsoleted = compute_obsoleted(&repo_packages, &repo_packages);

        let mut problems = Vec::new();
        for s in &repo_packages {
            if obsoleted.contains(&s.nevra) || existing_obsoleted.contains(&s.nevra) {
                continue;
            }
            let arch = Arch::new(s.nevra.arch.clone());
            if !arch.is_noarch() && arch.canonical().is_none() {
                continue;
            }

            let full_jobs = erase_jobs(&s.nevra, obsoleted.iter().chain(existing_obsoleted.iter()));
            if let SolveOutcome::Problems(full_problems) = self.pool.solve(&full_jobs)? {
                let reduced_jobs = erase_jobs(&s.nevra, existing_obsoleted.iter());
                match self.pool.solve(&reduced_jobs)? {
                    SolveOutcome::Problems(reduced_problems) => {
                        for problem in reduced_problems {
                            warn!("Ignoring pre-existing repoclosure problem: {problem}");
                        }
                    }
                    SolveOutcome::Installed(_) => problems.extend(full_problems),
                }
            }
        }

        problems.sort();
        problems.dedup();
        Ok(problems)
    }

    /// §4.4.3: pairs of co-installable packages that own the same path with
    /// differing content/metadata and no explicit `Conflicts:`.
    pub fn find_conflicts(&mut self) -> Result<Vec<Problem>, Error> {
        let mut problems = Vec::new();
        let puts: Vec<Arc<Package>> = self.pool.puts().to_vec();

        for put in &puts {
            let Source::Commandline { path } = &put.source else {
                continue;
            };
            let put_entries = self.inspector.file_entries(path)?;

            for entry in &put_entries {
                let mut candidates: Vec<Arc<Package>> = self
                    .pool
                    .owners_of_file(&entry.path)
                    .into_iter()
                    .filter(|candidate| candidate.nevra != put.nevra)
                    .cloned()
                    .collect();
                candidates.sort_by(|a, b| a.nevra.cmp(&b.nevra));

                for candidate in candidates {
                    let solo_put = self
                        .pool
                        .solve(&[Job::single(put.nevra.clone(), JobAction::Install)])?;
                    let solo_candidate = self
                        .pool
                        .solve(&[Job::single(candidate.nevra.clone(), JobAction::Install)])?;
                    if matches!(solo_put, SolveOutcome::Problems(_)) || matches!(solo_candidate, SolveOutcome::Problems(_)) {
                        warn!(
                            "pre-existing dependency problem, skipping conflict check between {} and {}",
                            put.nevra, candidate.nevra
                        );
                        continue;
                    }

                    let joint = self.pool.solve(&[
                        Job::single(put.nevra.clone(), JobAction::Install),
                        Job::single(candidate.nevra.clone(), JobAction::Install),
                    ])?;
                    if matches!(joint, SolveOutcome::Problems(_)) {
                        // Explicit Conflicts between the two suppress the report.
                        continue;
                    }

                    let Some(candidate_entry) = self.candidate_file_entry(&candidate, &entry.path)? else {
                        continue;
                    };

                    if entry.file_equal(&candidate_entry) {
                        continue;
                    }
                    if entry.multilib_exempt(&candidate_entry) {
                        continue;
                    }

                    problems.push(Problem::new(format!(
                        "{} provides {} which is also provided by {}",
                        put.nevra, entry.path, candidate.nevra
                    )));
                    // Short-circuit: the first reported conflict for (put, file)
                    // is enough, per §4.4.3's dedup/ordering rule.
                    break;
                }
            }
        }

        problems.sort();
        problems.dedup();
        Ok(problems)
    }

    /// §4.4.4: PUTs that some already-present repo package would upgrade or
    /// obsolete.
    ///
    /// Rather than modelling a literal `distupgrade` transaction with
    /// `ALLOW_UNINSTALL`, this computes the same outcome directly: a PUT is
    /// upgraded if a same-(name, arch) repo package with a higher EVR exists,
    /// and obsoleted if some repo package's `Obsoletes:` matches it. Both
    /// conditions are mutually exclusive outcomes of the same distupgrade
    /// solve the spec describes, so computing them directly is equivalent
    /// without needing the solver's own transaction-step introspection.
    pub fn find_upgrade_problems(&mut self) -> Result<Vec<Problem>, Error> {
        let repo_packages: Vec<Arc<Package>> = self.pool.packages().to_vec();
        let puts: Vec<Arc<Package>> = self.pool.puts().to_vec();

        let mut problems = Vec::new();
        for put in &puts {
            match upgrade_step(put, &repo_packages) {
                Some(UpgradeStep::Upgraded(other)) => {
                    problems.push(Problem::new(format!(
                        "{} would be upgraded by {} from repo {}",
                        put.nevra,
                        other.nevra,
                        other.repo_id()
                    )));
                }
                Some(UpgradeStep::Obsoleted(other)) => {
                    problems.push(Problem::new(format!(
                        "{} would be obsoleted by {} from repo {}",
                        put.nevra,
                        other.nevra,
                        other.repo_id()
                    )));
                }
                None => {}
            }
        }

        problems.sort();
        problems.dedup();
        Ok(problems)
    }

    /// Reads the file table entry for `path` out of `candidate`'s bytes,
    /// downloading and buffering a repo-provided candidate to a scratch file
    /// first (a PUT is already local and needs no such buffering).
    fn candidate_file_entry(&self, candidate: &Package, path: &str) -> Result<Option<FileEntry>, Error> {
        match &candidate.source {
            Source::Commandline { path: local } => Ok(self.inspector.file_entry(local, path)?),
            Source::Repo { repo_id, .. } => {
                let repo = self
                    .repos
                    .get(repo_id)
                    .expect("every repo package's repo_id names a configured repo");
                let bytes = self.loader.download_package(repo, candidate, &self.cache)?;
                let mut scratch = tempfile::NamedTempFile::new()?;
                scratch.write_all(&bytes)?;
                Ok(self.inspector.file_entry(scratch.path(), path)?)
            }
        }
    }
}

/// The outcome `find_upgrade_problems` computes for a single PUT.
enum UpgradeStep<'a> {
    Upgraded(&'a Arc<Package>),
    Obsoleted(&'a Arc<Package>),
}

/// Finds the best-evidenced upgrade/obsolete verdict for `put` among
/// `repo_packages`, preferring a same-name upgrade over an obsoleting rename
/// when (pathologically) both apply, since an upgrade is the more specific
/// and more common case.
///
/// A same-name upgrade is only considered when `put` isn't installonly: the
/// pool-wide multiversion job that governs installonly packages (§4.3) lets
/// e.g. `kernel-core-0.2` and a repo `kernel-core-0.3` coexist, so the real
/// distupgrade this check models would resolve to IGNORE rather than
/// UPGRADED for it. An explicit `Obsoletes:` is a real replacement either
/// way, so that branch is never gated on installonly status.
fn upgrade_step<'a>(put: &Package, repo_packages: &'a [Arc<Package>]) -> Option<UpgradeStep<'a>> {
    if !is_installonly(put) {
        let upgrader = repo_packages.iter().find(|q| {
            q.nevra.name == put.nevra.name && q.nevra.arch == put.nevra.arch && q.nevra.evr > put.nevra.evr
        });
        if let Some(upgrader) = upgrader {
            return Some(UpgradeStep::Upgraded(upgrader));
        }
    }

    repo_packages
        .iter()
        .find(|q| q.obsoletes.iter().any(|rel| rel.name == put.nevra.name && rel.matches_evr(&put.nevra.evr)))
        .map(UpgradeStep::Obsoleted)
}

/// Returns `true` if `pkg` is treated as installonly: named directly, or
/// carrying one of the `installonlypkg(...)` virtual provides, per
/// [`INSTALLONLY_NAMES`] (the same check `RpmDependencyProvider::add_packages`
/// uses to decide whether to intern a unique per-instance identity).
fn is_installonly(pkg: &Package) -> bool {
    INSTALLONLY_NAMES.contains(&pkg.nevra.name.as_str())
        || pkg.provides.iter().any(|p| INSTALLONLY_NAMES.contains(&p.name.as_str()))
}

/// Computes the set of NEVRAs that should be ignored when checking repo
/// closure because `sources` already supersede them: a same-(name, arch)
/// package with a lower EVR, or anything matched by an explicit `Obsoletes:`.
fn compute_obsoleted(sources: &[Arc<Package>], pool_packages: &[Arc<Package>]) -> HashSet<Nevra> {
    let mut obsoleted = HashSet::new();
    for source in sources {
        for candidate in pool_packages {
            if candidate.nevra == source.nevra {
                continue;
            }
            if candidate.nevra.name == source.nevra.name
                && candidate.nevra.arch == source.nevra.arch
                && candidate.nevra.evr < source.nevra.evr
            {
                obsoleted.insert(candidate.nevra.clone());
            }
        }
        for relation in &source.obsoletes {
            for candidate in pool_packages {
                if candidate.nevra.name == relation.name && relation.matches_evr(&candidate.nevra.evr) {
                    obsoleted.insert(candidate.nevra.clone());
                }
            }
        }
    }
    obsoleted
}

/// Builds the `[INSTALL s, ERASE *nevras]` job list `find_repoclosure_problems`
/// submits for a single candidate.
fn erase_jobs<'a>(s: &Nevra, nevras: impl Iterator<Item = &'a Nevra>) -> Vec<Job> {
    let mut jobs = vec![Job::single(s.clone(), JobAction::Install)];
    jobs.extend(nevras.map(|nevra| Job::single(nevra.clone(), JobAction::Erase)));
    jobs
}

#[cfg(test)]
mod tests {
    use rpmdeplint_types::{Evr, RelationFlags};

    use super::*;

    fn pkg(name: &str, version: &str, arch: &str) -> Arc<Package> {
        Arc::new(Package {
            nevra: Nevra::new(name, Evr::new(0, version, "1"), arch),
            source: Source::Repo {
                repo_id: "base".to_string(),
                location: format!("{name}.rpm"),
                xml_base: None,
                checksum: rpmdeplint_types::Checksum {
                    algorithm: "sha256".to_string(),
                    hex_digest: "deadbeef".to_string(),
                },
            },
            requires: Vec::new(),
            provides: Vec::new(),
            obsoletes: Vec::new(),
            conflicts: Vec::new(),
            file_provides: Vec::new(),
        })
    }

    #[test]
    fn compute_obsoleted_flags_lower_evr_same_name_arch() {
        let newer = pkg("a", "5.0", "i386");
        let older = pkg("a", "4.0", "i386");
        let obsoleted = compute_obsoleted(&[newer], &[older.clone()]);
        assert!(obsoleted.contains(&older.nevra));
    }

    #[test]
    fn compute_obsoleted_ignores_different_arch() {
        let newer = pkg("a", "5.0", "x86_64");
        let older = pkg("a", "4.0", "i386");
        let obsoleted = compute_obsoleted(&[newer], &[older.clone()]);
        assert!(!obsoleted.contains(&older.nevra));
    }

    #[test]
    fn compute_obsoleted_follows_explicit_obsoletes_relation() {
        let mut renamer = pkg("libfoo", "5.0", "i386");
        Arc::get_mut(&mut renamer).unwrap().obsoletes = vec![rpmdeplint_types::Relation::versioned(
            "foolib",
            RelationFlags::Lt,
            Evr::new(0, "5.0", "1"),
        )];
        let old_name = pkg("foolib", "4.0", "i386");
        let obsoleted = compute_obsoleted(&[renamer], &[old_name.clone()]);
        assert!(obsoleted.contains(&old_name.nevra));
    }

    #[test]
    fn upgrade_step_prefers_same_name_arch_higher_evr() {
        let put = pkg("a", "4.0", "i386");
        let newer = pkg("a", "5.0", "i386");
        let step = upgrade_step(&put, std::slice::from_ref(&newer));
        assert!(matches!(step, Some(UpgradeStep::Upgraded(_))));
    }

    #[test]
    fn upgrade_step_is_none_when_nothing_supersedes() {
        let put = pkg("a", "5.0", "i386");
        let older = pkg("a", "4.0", "i386");
        assert!(upgrade_step(&put, std::slice::from_ref(&older)).is_none());
    }

    #[test]
    fn upgrade_step_exempts_installonly_siblings() {
        let mut put = pkg("kernel-core", "0.2", "i386");
        Arc::get_mut(&mut put).unwrap().provides =
            vec![rpmdeplint_types::Relation::unversioned("installonlypkg(kernel)")];
        let mut newer = pkg("kernel-core", "0.3", "i386");
        Arc::get_mut(&mut newer).unwrap().provides =
            vec![rpmdeplint_types::Relation::unversioned("installonlypkg(kernel)")];

        assert!(
            upgrade_step(&put, std::slice::from_ref(&newer)).is_none(),
            "installonly siblings coexist; a higher-EVR build must not be reported as an upgrade"
        );
    }
}
