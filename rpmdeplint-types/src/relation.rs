//! Dependency relations: the `Requires`/`Provides`/`Obsoletes`/`Conflicts`
//! entries that make up a package's dependency graph edges.

use std::fmt::{self, Display, Formatter};

use crate::evr::Evr;

/// The comparison operator carried by a versioned dependency relation.
///
/// `Any` means the relation names only a capability (e.g. a bare `Provides:
/// libfoo.so()(64bit)`) with no version constraint attached.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, strum::Display)]
pub enum RelationFlags {
    /// No version comparison; the relation is satisfied by any EVR.
    #[strum(serialize = "")]
    Any,
    /// `=`
    #[strum(serialize = "=")]
    Eq,
    /// `<`
    #[strum(serialize = "<")]
    Lt,
    /// `<=`
    #[strum(serialize = "<=")]
    Le,
    /// `>`
    #[strum(serialize = ">")]
    Gt,
    /// `>=`
    #[strum(serialize = ">=")]
    Ge,
}

/// A single dependency relation, e.g. `Requires: libfoo >= 1.2-3` or a bare
/// `Provides: libfoo.so()(64bit)`.
///
/// The same type is used for `Requires`, `Provides`, `Obsoletes` and
/// `Conflicts` entries; the field name on [`crate::Package`] is what
/// distinguishes their role.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Relation {
    /// The capability or package name this relation refers to.
    pub name: String,
    /// The comparison operator, or [`RelationFlags::Any`] if unversioned.
    pub flags: RelationFlags,
    /// The EVR to compare against, present whenever `flags != Any`.
    pub evr: Option<Evr>,
}

impl Relation {
    /// Creates an unversioned relation naming only a capability.
    pub fn unversioned(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flags: RelationFlags::Any,
            evr: None,
        }
    }

    /// Creates a versioned relation.
    pub fn versioned(name: impl Into<String>, flags: RelationFlags, evr: Evr) -> Self {
        Self {
            name: name.into(),
            flags,
            evr: Some(evr),
        }
    }

    /// Returns `true` if `candidate_evr` satisfies this relation's version
    /// constraint (always `true` for an unversioned relation).
    pub fn matches_evr(&self, candidate_evr: &Evr) -> bool {
        let Some(evr) = &self.evr else {
            return true;
        };
        match self.flags {
            RelationFlags::Any => true,
            RelationFlags::Eq => candidate_evr == evr,
            RelationFlags::Lt => candidate_evr < evr,
            RelationFlags::Le => candidate_evr <= evr,
            RelationFlags::Gt => candidate_evr > evr,
            RelationFlags::Ge => candidate_evr >= evr,
        }
    }
}

impl Display for Relation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match (&self.flags, &self.evr) {
            (RelationFlags::Any, _) | (_, None) => write!(f, "{}", self.name),
            (flags, Some(evr)) => write!(f, "{} {flags} {evr}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unversioned_relation_matches_anything() {
        let rel = Relation::unversioned("libfoo.so()(64bit)");
        assert!(rel.matches_evr(&Evr::new(0, "1.0", "1")));
    }

    #[test]
    fn ge_relation_matches_equal_and_greater() {
        let rel = Relation::versioned("libfoo", RelationFlags::Ge, Evr::new(0, "1.2", "3"));
        assert!(rel.matches_evr(&Evr::new(0, "1.2", "3")));
        assert!(rel.matches_evr(&Evr::new(0, "1.3", "1")));
        assert!(!rel.matches_evr(&Evr::new(0, "1.1", "1")));
    }

    #[test]
    fn display_renders_versioned_relation() {
        let rel = Relation::versioned("libfoo", RelationFlags::Ge, Evr::new(1, "1.2", "3"));
        assert_eq!(rel.to_string(), "libfoo >= 1:1.2-3");
    }

    #[test]
    fn display_renders_unversioned_relation() {
        assert_eq!(Relation::unversioned("libfoo").to_string(), "libfoo");
    }
}
