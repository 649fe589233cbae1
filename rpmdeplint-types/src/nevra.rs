//! Name-Epoch-Version-Release-Arch package identifiers.

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::error::Error;
use crate::evr::Evr;

/// A fully-qualified package identifier: `name-[epoch:]version-release.arch`.
///
/// This is the identity rpmdeplint uses to distinguish solvables from one
/// another; two packages with the same NEVRA are considered the same
/// candidate even if they came from different repos (the repo that "wins" is
/// an artifact of pool ordering, not identity).
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Nevra {
    /// Package name.
    pub name: String,
    /// Epoch-version-release.
    pub evr: Evr,
    /// Architecture string, e.g. `x86_64` or `noarch`.
    pub arch: String,
}

impl Nevra {
    /// Creates a new [`Nevra`].
    pub fn new(name: impl Into<String>, evr: Evr, arch: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            evr,
            arch: arch.into(),
        }
    }
}

impl Display for Nevra {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}.{}", self.name, self.evr, self.arch)
    }
}

impl PartialOrd for Nevra {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Nevra {
    /// Orders by canonical string form, which is what every sorted
    /// diagnostic view (`DependencySet::packages`, `overall_problems`, ...)
    /// is actually meant to be stable by, rather than by field order.
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_string().cmp(&other.to_string())
    }
}

impl FromStr for Nevra {
    type Err = Error;

    /// Parses the canonical `name-[epoch:]version-release.arch` form.
    ///
    /// The name may itself contain hyphens, so parsing works from the right:
    /// the arch is the final `.`-delimited component, then release, then
    /// version (with an optional `epoch:` prefix), with whatever remains
    /// being the name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (rest, arch) = s
            .rsplit_once('.')
            .ok_or_else(|| Error::InvalidNevra(s.to_string()))?;
        let (rest, release) = rest
            .rsplit_once('-')
            .ok_or_else(|| Error::InvalidNevra(s.to_string()))?;
        let (name, version_part) = rest
            .rsplit_once('-')
            .ok_or_else(|| Error::InvalidNevra(s.to_string()))?;

        let (epoch, version) = match version_part.split_once(':') {
            Some((epoch, version)) => (
                epoch
                    .parse()
                    .map_err(|_| Error::InvalidNevra(s.to_string()))?,
                version,
            ),
            None => (0, version_part),
        };

        if name.is_empty() || version.is_empty() || release.is_empty() || arch.is_empty() {
            return Err(Error::InvalidNevra(s.to_string()));
        }

        Ok(Nevra {
            name: name.to_string(),
            evr: Evr::new(epoch, version, release),
            arch: arch.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_simple_nevra() {
        let nevra: Nevra = "bash-5.1.8-2.el9.x86_64".parse().unwrap();
        assert_eq!(nevra.name, "bash");
        assert_eq!(nevra.evr, Evr::new(0, "5.1.8", "2.el9"));
        assert_eq!(nevra.arch, "x86_64");
        assert_eq!(nevra.to_string(), "bash-5.1.8-2.el9.x86_64");
    }

    #[test]
    fn round_trips_with_epoch() {
        let nevra: Nevra = "foo-1:2.0-3.fc40.noarch".parse().unwrap();
        assert_eq!(nevra.evr, Evr::new(1, "2.0", "3.fc40"));
        assert_eq!(nevra.to_string(), "foo-1:2.0-3.fc40.noarch");
    }

    #[test]
    fn name_may_contain_hyphens() {
        let nevra: Nevra = "nss-util-3.90.0-1.el9.x86_64".parse().unwrap();
        assert_eq!(nevra.name, "nss-util");
        assert_eq!(nevra.evr, Evr::new(0, "3.90.0", "1.el9"));
    }

    #[test]
    fn rejects_strings_with_no_arch() {
        assert!("bash-5.1.8-2.el9".parse::<Nevra>().is_err());
    }

    #[test]
    fn rejects_strings_with_too_few_components() {
        assert!("bash.x86_64".parse::<Nevra>().is_err());
    }

    #[test]
    fn sorts_by_canonical_string_form() {
        let a: Nevra = "a-5.0-1.i386".parse().unwrap();
        let b: Nevra = "b-0.1-1.i386".parse().unwrap();
        let mut nevras = vec![b.clone(), a.clone()];
        nevras.sort();
        assert_eq!(nevras, vec![a, b]);
    }
}
