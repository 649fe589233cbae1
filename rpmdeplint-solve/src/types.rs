//! Types specific to interning RPM packages into the solver pool.

use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

use resolvo::utils::VersionSet;
use rpmdeplint_types::{Evr, Nevra, Package, Relation, RelationFlags};

/// The name a solvable is interned under.
///
/// Candidates sharing a [`RelationName`] are mutually exclusive to the
/// solver (choosing two of them at once is never valid) — which is exactly
/// what we want for two versions of the same package, but not for two
/// installonly kernel builds. [`RelationName::Instance`] gives every
/// installonly package its own exclusivity group of one, so sibling
/// versions never compete with each other; [`crate::provider::RpmDependencyProvider`]
/// additionally registers a [`PackageRecord::Virtual`] pointer for each
/// installonly instance under the plain [`RelationName::Name`], so that
/// `Requires: kernel >= ...` from an unrelated package still resolves.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum RelationName {
    /// A package name, a `Provides:` capability string, or an absolute file
    /// path (file-provides share the same namespace as capability names).
    Name(String),
    /// The unique identity of a single installonly package build.
    Instance(Nevra),
}

impl Display for RelationName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RelationName::Name(name) => write!(f, "{name}"),
            RelationName::Instance(nevra) => write!(f, "{nevra}"),
        }
    }
}

/// A solvable's payload: either a real package, or a virtual pointer
/// standing in for a `Provides:` relation or an installonly package's
/// bare-name identity.
///
/// Resolving a [`PackageRecord::Virtual`] simply requires its `provider`'s
/// own identity record — mirroring how ALPM-style soname/virtual-component
/// solvables "depend" on whichever real package actually provides them.
#[derive(Clone, Debug)]
pub enum PackageRecord {
    /// A real package: a PUT or a package discovered from a repo.
    Real(Arc<Package>),
    /// A stand-in for a capability (`Provides:`) or an installonly bare
    /// name, which resolves by requiring its `provider`'s exact identity.
    Virtual {
        /// The EVR this provide relation carries, if versioned (`None` for
        /// an unversioned `Provides:` or a file-provides path).
        relation_evr: Option<Evr>,
        /// The real package this virtual entry stands in for.
        provider: Arc<Package>,
    },
}

impl PackageRecord {
    /// The EVR this record should be matched against by a [`MatchSpec`].
    pub fn evr(&self) -> Option<&Evr> {
        match self {
            PackageRecord::Real(pkg) => Some(&pkg.nevra.evr),
            PackageRecord::Virtual { relation_evr, .. } => relation_evr.as_ref(),
        }
    }

    /// Returns the underlying package if this is a [`PackageRecord::Real`].
    pub fn as_real(&self) -> Option<&Arc<Package>> {
        match self {
            PackageRecord::Real(pkg) => Some(pkg),
            PackageRecord::Virtual { .. } => None,
        }
    }

    /// Returns `true` if this record is a [`PackageRecord::Virtual`] pointer.
    pub fn is_virtual(&self) -> bool {
        matches!(self, PackageRecord::Virtual { .. })
    }
}

impl Display for PackageRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PackageRecord::Real(pkg) => write!(f, "{}", pkg.nevra),
            PackageRecord::Virtual { provider, .. } => {
                write!(f, "provided by {}", provider.nevra)
            }
        }
    }
}

/// Match criteria for filtering candidates under a [`RelationName`],
/// generalizing RPM's `Requires`/`Conflicts` version comparison flags into
/// resolvo's [`VersionSet`] abstraction.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct MatchSpec {
    /// The relation to match against; `None` matches any candidate under
    /// the name unconditionally (used for exact-identity pointers whose
    /// target NameId has exactly one candidate anyway).
    relation: Option<Relation>,
    /// If `true`, invert the match: this spec represents a `Conflicts:`.
    conflict: bool,
}

impl MatchSpec {
    /// Matches any candidate, regardless of version.
    pub fn any() -> Self {
        Self {
            relation: None,
            conflict: false,
        }
    }

    /// Matches candidates satisfying `relation` (a `Requires:`/`Obsoletes:`).
    pub fn from_relation(relation: Relation) -> Self {
        Self {
            relation: Some(relation),
            conflict: false,
        }
    }

    /// Matches candidates that do *not* satisfy `relation` (a `Conflicts:`).
    pub fn from_conflict(relation: Relation) -> Self {
        Self {
            relation: Some(relation),
            conflict: true,
        }
    }

    /// Matches exactly one EVR (used when a [`PackageRecord::Virtual`]
    /// redirects to its provider's precise version).
    pub fn exact(name: impl Into<String>, evr: Evr) -> Self {
        Self {
            relation: Some(Relation::versioned(name, RelationFlags::Eq, evr)),
            conflict: false,
        }
    }

    /// Returns `true` if `record` satisfies this spec.
    pub fn matches(&self, record: &PackageRecord) -> bool {
        let matches = match &self.relation {
            None => true,
            Some(relation) => match record.evr() {
                Some(evr) => relation.matches_evr(evr),
                // An unversioned relation is satisfied by a versionless
                // virtual (a bare Provides: with no EVR attached).
                None => relation.evr.is_none(),
            },
        };
        matches ^ self.conflict
    }
}

impl Display for MatchSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let invert = if self.conflict { "not " } else { "" };
        match &self.relation {
            Some(relation) => write!(f, "{invert}{relation}"),
            None => write!(f, "{invert}<any version>"),
        }
    }
}

impl VersionSet for MatchSpec {
    type V = PackageRecord;
}
