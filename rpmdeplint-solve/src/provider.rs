//! Dependency provider for RPM packages.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

use resolvo::utils::Pool;
use resolvo::{
    Candidates, Condition, ConditionId, ConditionalRequirement, Dependencies, DependencyProvider,
    HintDependenciesAvailable, Interner, KnownDependencies, NameId, Requirement, SolvableId,
    SolverCache, StringId, VersionSetId, VersionSetUnionId,
};
use rpmdeplint_types::{Nevra, Package};

use crate::types::{MatchSpec, PackageRecord, RelationName};

/// The prefix marking an `rpmlib()` pseudo-provide.
///
/// `rpmlib()` requires declare a minimum RPM *format* feature (e.g.
/// `rpmlib(CompressedFileNames)`), never a real package; nothing in the
/// pool ever provides one, so every PUT would otherwise be unconditionally
/// unsatisfiable. Per §4.4.2 of the design, these are skipped wherever
/// requires are translated into solver requirements.
pub(crate) const RPMLIB_PREFIX: &str = "rpmlib(";

/// Dependency provider for **RPM** packages, built on [`resolvo`].
///
/// Generalizes the same `DependencyProvider` pattern ALPM-based tooling uses
/// for its own SAT solver: RPM relations become [`MatchSpec`] version sets
/// over a [`PackageRecord`], and `Provides:` entries (including installonly
/// bare-name pointers) are registered as [`PackageRecord::Virtual`]
/// solvables that simply redirect to their provider's exact identity.
pub struct RpmDependencyProvider {
    pub(crate) pool: Pool<MatchSpec, RelationName>,
    pub(crate) records: HashMap<NameId, Candidates>,
    /// Real packages, keyed by the [`SolvableId`] they were interned under.
    by_solvable: HashMap<SolvableId, Arc<Package>>,
    /// Where a package's own identity (for installonly packages, its unique
    /// [`RelationName::Instance`]; otherwise its plain [`RelationName::Name`])
    /// was interned, so [`PackageRecord::Virtual`] pointers and job
    /// selectors can find it.
    identity: HashMap<Nevra, NameId>,
    /// The exact [`SolvableId`] a package instance was interned under, keyed
    /// by its own NEVRA (distinct from `identity`, which for an installonly
    /// package's bare name may hold several candidates).
    by_nevra: HashMap<Nevra, SolvableId>,
    /// Solvables excluded from the current solve only (an `ERASE` job);
    /// see [`Self::set_excluded`].
    excluded: RefCell<HashSet<SolvableId>>,
}

impl RpmDependencyProvider {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self {
            pool: Pool::default(),
            records: HashMap::new(),
            by_solvable: HashMap::new(),
            identity: HashMap::new(),
            by_nevra: HashMap::new(),
            excluded: RefCell::new(HashSet::new()),
        }
    }

    /// Adds packages to the pool, registering each under its own identity
    /// name (or a unique per-instance identity if it is installonly, per
    /// `installonly_names`) plus one virtual solvable per `Provides:`.
    pub fn add_packages(
        &mut self,
        packages: impl IntoIterator<Item = Arc<Package>>,
        installonly_names: &HashSet<String>,
    ) {
        for pkg in packages {
            let is_installonly = installonly_names.contains(&pkg.nevra.name)
                || pkg
                    .provides
                    .iter()
                    .any(|p| installonly_names.contains(&p.name));

            let identity_name = if is_installonly {
                RelationName::Instance(pkg.nevra.clone())
            } else {
                RelationName::Name(pkg.nevra.name.clone())
            };
            let identity_id = self.pool.intern_package_name(identity_name);
            let solvable = self
                .pool
                .intern_solvable(identity_id, PackageRecord::Real(pkg.clone()));
            self.records
                .entry(identity_id)
                .or_default()
                .candidates
                .push(solvable);
            self.by_solvable.insert(solvable, pkg.clone());
            self.identity.insert(pkg.nevra.clone(), identity_id);
            self.by_nevra.insert(pkg.nevra.clone(), solvable);

            if is_installonly {
                // Sibling installonly builds must not exclude one another, but a
                // bare `Requires: kernel >= ...` from an unrelated package still
                // needs to find them, so each instance also gets a virtual
                // pointer under the ordinary bare-name identity.
                let bare_id = self
                    .pool
                    .intern_package_name(RelationName::Name(pkg.nevra.name.clone()));
                let pointer = self.pool.intern_solvable(
                    bare_id,
                    PackageRecord::Virtual {
                        relation_evr: Some(pkg.nevra.evr.clone()),
                        provider: pkg.clone(),
                    },
                );
                self.records
                    .entry(bare_id)
                    .or_default()
                    .candidates
                    .push(pointer);
            }

            for provide in &pkg.provides {
                if provide.name == pkg.nevra.name {
                    // The implicit self-provide; the identity record already
                    // serves this role, a pointer back to itself is redundant.
                    continue;
                }
                let provide_id = self
                    .pool
                    .intern_package_name(RelationName::Name(provide.name.clone()));
                let pointer = self.pool.intern_solvable(
                    provide_id,
                    PackageRecord::Virtual {
                        relation_evr: provide.evr.clone(),
                        provider: pkg.clone(),
                    },
                );
                self.records
                    .entry(provide_id)
                    .or_default()
                    .candidates
                    .push(pointer);
            }

            for path in &pkg.file_provides {
                let path_id = self
                    .pool
                    .intern_package_name(RelationName::Name(path.clone()));
                let pointer = self.pool.intern_solvable(
                    path_id,
                    PackageRecord::Virtual {
                        relation_evr: None,
                        provider: pkg.clone(),
                    },
                );
                self.records
                    .entry(path_id)
                    .or_default()
                    .candidates
                    .push(pointer);
            }
        }

        // Every package is already loaded up front, so every name we know
        // about has its full candidate set.
        for candidates in self.records.values_mut() {
            candidates.hint_dependencies_available = HintDependenciesAvailable::All;
        }
    }

    /// Returns the [`NameId`] a package's own identity was interned under.
    pub fn identity_of(&self, nevra: &Nevra) -> Option<NameId> {
        self.identity.get(nevra).copied()
    }

    /// Returns the package a [`SolvableId`] stands for, if it is real.
    pub fn package(&self, solvable: SolvableId) -> Option<&Arc<Package>> {
        self.by_solvable.get(&solvable)
    }

    /// Interns a [`RelationName::Name`] lookup key, e.g. for a job selector
    /// or a file path.
    pub fn intern_name(&self, name: impl Into<String>) -> NameId {
        self.pool.intern_package_name(RelationName::Name(name.into()))
    }

    /// Interns a [`MatchSpec`] under `name_id`.
    pub fn intern_match_spec(&self, name_id: NameId, spec: MatchSpec) -> VersionSetId {
        self.pool.intern_version_set(name_id, spec)
    }

    /// Returns `true` if some non-excluded candidate under `relation`'s name
    /// satisfies it — the structural check behind the "nothing provides"
    /// diagnostic, independent of whatever the solver itself chose.
    pub fn satisfies(&self, relation: &rpmdeplint_types::Relation, excluded: &HashSet<Nevra>) -> bool {
        let name_id = self.intern_name(relation.name.clone());
        let Some(candidates) = self.records.get(&name_id) else {
            return false;
        };
        let spec = MatchSpec::from_relation(relation.clone());
        candidates.candidates.iter().any(|&solvable| {
            let record = &self.pool.resolve_solvable(solvable).record;
            let provider_nevra = match record {
                PackageRecord::Real(pkg) => &pkg.nevra,
                PackageRecord::Virtual { provider, .. } => &provider.nevra,
            };
            !excluded.contains(provider_nevra) && spec.matches(record)
        })
    }

    /// Returns every real package whose file table includes `path`, per each
    /// package's [`Package::file_provides`] list.
    pub fn owners_of_file<'a>(&'a self, path: &str) -> Vec<&'a Arc<Package>> {
        self.by_solvable
            .values()
            .filter(|pkg| pkg.file_provides.iter().any(|f| f == path))
            .collect()
    }

    /// Sets the solvables that must be treated as absent for the duration of
    /// the next solve (an `ERASE` job): [`DependencyProvider::get_candidates`]
    /// and [`DependencyProvider::filter_candidates`] both consult this set.
    /// Single-threaded use only, matching the rest of the pool.
    pub fn set_excluded(&self, excluded: HashSet<SolvableId>) {
        *self.excluded.borrow_mut() = excluded;
    }

    /// Clears the excluded set after a solve completes.
    pub fn clear_excluded(&self) {
        self.excluded.borrow_mut().clear();
    }

    /// Returns the [`SolvableId`] a specific package instance was interned
    /// under, for building the exclusion set from a list of [`Nevra`]s.
    pub fn solvable_of(&self, nevra: &Nevra) -> Option<SolvableId> {
        self.by_nevra.get(nevra).copied()
    }

    /// Returns the package a specific NEVRA names, if it was interned.
    pub fn package_by_nevra(&self, nevra: &Nevra) -> Option<&Arc<Package>> {
        self.by_nevra.get(nevra).and_then(|solvable| self.by_solvable.get(solvable))
    }
}

impl Default for RpmDependencyProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl Interner for RpmDependencyProvider {
    fn display_solvable(&self, solvable: SolvableId) -> impl Display + '_ {
        &self.pool.resolve_solvable(solvable).record
    }

    fn display_name(&self, name: NameId) -> impl Display + '_ {
        self.pool.resolve_package_name(name)
    }

    fn display_version_set(&self, version_set: VersionSetId) -> impl Display + '_ {
        self.pool.resolve_version_set(version_set)
    }

    fn display_string(&self, string_id: StringId) -> impl Display + '_ {
        self.pool.resolve_string(string_id)
    }

    fn version_set_name(&self, version_set: VersionSetId) -> NameId {
        self.pool.resolve_version_set_package_name(version_set)
    }

    fn solvable_name(&self, solvable: SolvableId) -> NameId {
        self.pool.resolve_solvable(solvable).name
    }

    fn version_sets_in_union(
        &self,
        version_set_union: VersionSetUnionId,
    ) -> impl Iterator<Item = VersionSetId> {
        self.pool.resolve_version_set_union(version_set_union)
    }

    fn resolve_condition(&self, condition: ConditionId) -> Condition {
        self.pool.resolve_condition(condition).clone()
    }
}

impl DependencyProvider for RpmDependencyProvider {
    async fn filter_candidates(
        &self,
        candidates: &[SolvableId],
        version_set: VersionSetId,
        inverse: bool,
    ) -> Vec<SolvableId> {
        let spec = self.pool.resolve_version_set(version_set);
        let excluded = self.excluded.borrow();
        candidates
            .iter()
            .copied()
            .filter(|&solvable| !excluded.contains(&solvable))
            .filter(|&solvable| spec.matches(&self.pool.resolve_solvable(solvable).record) ^ inverse)
            .collect()
    }

    async fn get_candidates(&self, name: NameId) -> Option<Candidates> {
        let mut candidates = self.records.get(&name).cloned()?;
        let excluded = self.excluded.borrow();
        if !excluded.is_empty() {
            candidates.candidates.retain(|s| !excluded.contains(s));
        }
        Some(candidates)
    }

    async fn sort_candidates(&self, _solver: &SolverCache<Self>, solvables: &mut [SolvableId]) {
        crate::utils::sort_candidates(&self.pool, solvables);
    }

    async fn get_dependencies(&self, solvable: SolvableId) -> Dependencies {
        let mut known = KnownDependencies::default();
        let candidate = self.pool.resolve_solvable(solvable);

        match candidate.record.clone() {
            PackageRecord::Real(pkg) => {
                for req in &pkg.requires {
                    if req.name.starts_with(RPMLIB_PREFIX) {
                        continue;
                    }
                    let name_id = self
                        .pool
                        .intern_package_name(RelationName::Name(req.name.clone()));
                    let spec = MatchSpec::from_relation(req.clone());
                    let version_set = self.pool.intern_version_set(name_id, spec);
                    known.requirements.push(ConditionalRequirement {
                        requirement: Requirement::Single(version_set),
                        condition: None,
                    });
                }

                for conflict in &pkg.conflicts {
                    let name_id = self
                        .pool
                        .intern_package_name(RelationName::Name(conflict.name.clone()));
                    let spec = MatchSpec::from_conflict(conflict.clone());
                    let version_set = self.pool.intern_version_set(name_id, spec);
                    known.constrains.push(version_set);
                }
            }
            PackageRecord::Virtual { provider, .. } => {
                let Some(&identity_id) = self.identity.get(&provider.nevra) else {
                    let reason = self
                        .pool
                        .intern_string(format!("missing identity for provider {}", provider.nevra));
                    return Dependencies::Unknown(reason);
                };
                let spec = MatchSpec::exact(provider.nevra.name.clone(), provider.nevra.evr.clone());
                let version_set = self.pool.intern_version_set(identity_id, spec);
                known.requirements.push(ConditionalRequirement {
                    requirement: Requirement::Single(version_set),
                    condition: None,
                });
            }
        }

        Dependencies::Known(known)
    }
}

impl Debug for RpmDependencyProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpmDependencyProvider").finish_non_exhaustive()
    }
}
