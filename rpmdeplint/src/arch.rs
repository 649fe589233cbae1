//! `--arch` auto-detection: mapping the PUTs' own architectures through the
//! canonical arch table when no explicit `--arch` is given (§6 of the design).

use rpmdeplint_types::{Arch, CanonicalArch, Package};

use crate::error::Error;

/// Determines the architecture to test against.
///
/// If `explicit` is given, it wins outright. Otherwise, every non-`noarch`
/// PUT architecture is mapped through [`Arch::canonical`]; if none remain
/// (every PUT is `noarch`) or more than one distinct canonical family is
/// found, `--arch` is required and this is a usage error.
pub fn determine_test_arch(puts: &[Package], explicit: Option<String>) -> Result<Arch, Error> {
    if let Some(arch) = explicit {
        return Ok(Arch::new(arch));
    }

    let mut families: Vec<(CanonicalArch, &str)> = Vec::new();
    for put in puts {
        let arch = Arch::new(put.nevra.arch.clone());
        if arch.is_noarch() {
            continue;
        }
        let Some(canonical) = arch.canonical() else {
            continue;
        };
        if !families.iter().any(|(seen, _)| *seen == canonical) {
            families.push((canonical, put.nevra.arch.as_str()));
        }
    }

    match families.as_slice() {
        [] => Err(Error::Usage(
            "no --arch given and every package under test is noarch; --arch is required".to_string(),
        )),
        [(family, _)] => Ok(Arch::new(family.to_string())),
        _ => {
            let names = families
                .iter()
                .map(|(_, name)| *name)
                .collect::<Vec<_>>()
                .join(", ");
            Err(Error::Usage(format!(
                "packages under test have incompatible architectures: {names}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use rpmdeplint_types::{Evr, Nevra, Source};

    use super::*;

    fn put(name: &str, arch: &str) -> Package {
        Package {
            nevra: Nevra::new(name, Evr::new(0, "1.0", "1"), arch),
            source: Source::Commandline {
                path: format!("{name}.rpm").into(),
            },
            requires: Vec::new(),
            provides: Vec::new(),
            obsoletes: Vec::new(),
            conflicts: Vec::new(),
            file_provides: Vec::new(),
        }
    }

    #[test]
    fn explicit_arch_always_wins() {
        let arch = determine_test_arch(&[put("a", "noarch")], Some("s390x".to_string())).unwrap();
        assert_eq!(arch, Arch::new("s390x"));
    }

    #[test]
    fn single_canonical_family_is_used() {
        let puts = [put("a", "i686"), put("b", "x86_64")];
        let arch = determine_test_arch(&puts, None).unwrap();
        assert_eq!(arch, Arch::new("x86_64"));
    }

    #[test]
    fn noarch_only_puts_require_explicit_arch() {
        let err = determine_test_arch(&[put("a", "noarch")], None).unwrap_err();
        assert!(matches!(err, Error::Usage(_)));
    }

    #[test]
    fn incompatible_canonical_families_are_a_usage_error() {
        let puts = [put("a", "x86_64"), put("b", "s390x")];
        let err = determine_test_arch(&puts, None).unwrap_err();
        assert!(matches!(err, Error::Usage(_)));
    }

    #[test]
    fn noarch_puts_are_ignored_alongside_a_concrete_arch() {
        let puts = [put("a", "noarch"), put("b", "ppc64le")];
        let arch = determine_test_arch(&puts, None).unwrap();
        assert_eq!(arch, Arch::new("ppc64p7"));
    }
}
