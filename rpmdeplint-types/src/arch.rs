//! CPU architecture compatibility, used both by the solver pool (to decide which
//! existing repo packages are even candidates for a run) and by the CLI's
//! `--arch` auto-detection (see `find_repoclosure_problems`/§6 of the design).

use std::fmt::{self, Display, Formatter};

/// An RPM package architecture, e.g. `x86_64`, `i686`, `noarch`.
///
/// Interned as a plain `String` rather than an enum: RPM architectures are an
/// open set (every cross-compilation target is technically valid), unlike the
/// closed, hand-maintained [`CanonicalArch`] table used for compatibility
/// checks.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Arch(String);

impl Arch {
    /// Creates a new [`Arch`] from any string.
    pub fn new(arch: impl Into<String>) -> Self {
        Self(arch.into())
    }

    /// Returns `true` if this is the special `noarch` architecture, which is
    /// universally installable regardless of the pool's configured test arch.
    pub fn is_noarch(&self) -> bool {
        self.0 == "noarch"
    }

    /// Returns the canonical arch family this architecture maps to, if the
    /// table has an entry for it.
    pub fn canonical(&self) -> Option<CanonicalArch> {
        canonical_arch_table(&self.0)
    }
}

impl Display for Arch {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Arch {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A canonical architecture family, as used to determine `--arch`
/// auto-detection and pairwise PUT arch compatibility.
///
/// Two [`Arch`]es are compatible exactly when [`Arch::canonical`] returns the
/// same [`CanonicalArch`] for both (or either is `noarch`, which is handled
/// separately since `noarch` never participates in the canonical mapping).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum CanonicalArch {
    /// `x86_64`, and every 32-bit x86 variant (`i386`..`i686`, `athlon`, `geode`).
    X86_64,
    /// `ia64`.
    Ia64,
    /// Soft-float ARM: highest available of `armv5tel`..`armv7l`.
    Armv7l,
    /// Hard-float ARM (`arm-hard`): `armv7hnl`.
    Armv7hnl,
    /// The sparc family, canonicalized to `sparc64v`.
    Sparc64v,
    /// The ppc family, canonicalized to `ppc64p7`.
    Ppc64p7,
    /// The s390 family, canonicalized to `s390x`.
    S390x,
    /// The sh family, canonicalized to `sh4a`.
    Sh4a,
}

/// Maps a concrete architecture name to its [`CanonicalArch`] family.
///
/// `noarch` deliberately has no entry: it never participates in arch
/// compatibility checks (callers must special-case it before consulting this
/// table, per §6 of the design).
fn canonical_arch_table(arch: &str) -> Option<CanonicalArch> {
    use CanonicalArch::*;
    Some(match arch {
        "x86_64" | "amd64" | "i386" | "i486" | "i586" | "i686" | "athlon" | "geode" => X86_64,
        "ia64" => Ia64,
        "armv7hl" | "armv7hcnl" | "armv7hnl" | "armv6hl" => Armv7hnl,
        "armv5tel" | "armv5tejl" | "armv6l" | "armv7l" | "armv7nl" => Armv7l,
        "sparc" | "sparcv8" | "sparcv9" | "sparcv9v" | "sparc64" | "sparc64v" => Sparc64v,
        "ppc" | "ppc64" | "ppc64le" | "ppc64p7" | "ppc64pseries" | "ppc64iseries" => Ppc64p7,
        "s390" | "s390x" => S390x,
        "sh3" | "sh4" | "sh4a" => Sh4a,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("x86_64", CanonicalArch::X86_64)]
    #[case("i686", CanonicalArch::X86_64)]
    #[case("ia64", CanonicalArch::Ia64)]
    #[case("armv7hl", CanonicalArch::Armv7hnl)]
    #[case("armv5tel", CanonicalArch::Armv7l)]
    #[case("sparcv9", CanonicalArch::Sparc64v)]
    #[case("ppc64le", CanonicalArch::Ppc64p7)]
    #[case("s390", CanonicalArch::S390x)]
    #[case("sh3", CanonicalArch::Sh4a)]
    fn canonical_arch_matches(#[case] arch: &str, #[case] expected: CanonicalArch) {
        assert_eq!(Arch::new(arch).canonical(), Some(expected));
    }

    #[test]
    fn noarch_has_no_canonical_family() {
        assert_eq!(Arch::new("noarch").canonical(), None);
        assert!(Arch::new("noarch").is_noarch());
    }

    #[test]
    fn incompatible_arches_have_different_canonical_families() {
        assert_ne!(Arch::new("x86_64").canonical(), Arch::new("armv7hl").canonical());
    }
}
