//! Reads a package under test into a full `rpmdeplint-types::Package` record.
//!
//! A repo package's `Requires`/`Provides`/`Obsoletes`/`Conflicts` arrive
//! pre-parsed from `primary.xml` (`rpmdeplint-repo::convert`); a PUT has no
//! such metadata file, so this module reads the same relations straight off
//! the RPM header, via the same crate [`crate::inspector::RpmFileInspector`]
//! already depends on for file tables.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rpm::{Dependency, DependencyFlags, PackageMetadata};
use rpmdeplint_types::{Evr, Nevra, Package, Relation, RelationFlags, Source};

use crate::error::Error;

/// Reads `path` as an RPM package under test and converts its header into a
/// [`Package`] attributed to [`rpmdeplint_types::Source::Commandline`].
pub fn read_put(path: &Path) -> Result<Package, Error> {
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let metadata =
        PackageMetadata::parse(&mut BufReader::new(file)).map_err(|source| Error::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

    let unreadable = |source| Error::Unreadable {
        path: path.to_path_buf(),
        source,
    };

    let name = metadata.get_name().map_err(unreadable)?.to_string();
    let version = metadata.get_version().map_err(unreadable)?.to_string();
    let release = metadata.get_release().map_err(unreadable)?.to_string();
    let epoch = metadata.get_epoch().unwrap_or(0);
    let arch = metadata.get_arch().map_err(unreadable)?.to_string();

    let nevra = Nevra::new(name.clone(), Evr::new(epoch, version, release), arch);

    let mut provides: Vec<Relation> = metadata
        .get_provides()
        .unwrap_or_default()
        .iter()
        .map(convert_dependency)
        .collect();
    if !provides.iter().any(|p| p.name == name) {
        provides.push(Relation::versioned(
            name.clone(),
            RelationFlags::Eq,
            nevra.evr.clone(),
        ));
    }

    let requires = metadata
        .get_requires()
        .unwrap_or_default()
        .iter()
        .map(convert_dependency)
        .collect();
    let obsoletes = metadata
        .get_obsoletes()
        .unwrap_or_default()
        .iter()
        .map(convert_dependency)
        .collect();
    let conflicts = metadata
        .get_conflicts()
        .unwrap_or_default()
        .iter()
        .map(convert_dependency)
        .collect();

    let file_provides = metadata
        .get_file_entries()
        .map_err(unreadable)?
        .into_iter()
        .map(|entry| entry.path.to_string_lossy().into_owned())
        .collect();

    Ok(Package {
        nevra,
        source: Source::Commandline {
            path: path.to_path_buf(),
        },
        requires,
        provides,
        obsoletes,
        conflicts,
        file_provides,
    })
}

/// Converts one RPM header dependency tag entry into a [`Relation`].
///
/// An empty version string means the dependency is unversioned (a bare
/// capability name); otherwise the version carries `[epoch:]version[-release]`
/// and the flags bitfield says which comparison, if any, applies.
fn convert_dependency(dep: &Dependency) -> Relation {
    if dep.version.is_empty() {
        return Relation::unversioned(dep.name.clone());
    }

    let evr = Evr::parse_bare(&dep.version);
    let less = dep.flags.contains(DependencyFlags::LESS);
    let greater = dep.flags.contains(DependencyFlags::GREATER);
    let equal = dep.flags.contains(DependencyFlags::EQUAL);

    let flags = match (less, greater, equal) {
        (true, false, true) => RelationFlags::Le,
        (false, true, true) => RelationFlags::Ge,
        (true, false, false) => RelationFlags::Lt,
        (false, true, false) => RelationFlags::Gt,
        (false, false, true) => RelationFlags::Eq,
        _ => return Relation::unversioned(dep.name.clone()),
    };

    Relation::versioned(dep.name.clone(), flags, evr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unversioned_dependency_has_any_flags() {
        let dep = Dependency::any("libfoo.so()(64bit)");
        let relation = convert_dependency(&dep);
        assert_eq!(relation.flags, RelationFlags::Any);
        assert!(relation.evr.is_none());
    }

    #[test]
    fn greater_or_equal_dependency_carries_evr() {
        let dep = Dependency::greater_eq("libfoo", "1:2.0-3");
        let relation = convert_dependency(&dep);
        assert_eq!(relation.flags, RelationFlags::Ge);
        assert_eq!(relation.evr, Some(Evr::new(1, "2.0", "3")));
    }
}
