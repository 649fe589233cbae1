//! Converts `rpmrepo_metadata` records into `rpmdeplint-types` ones.

use rpmdeplint_types::{Checksum, Evr, Nevra, Package, Relation, RelationFlags, Source};

/// Converts a parsed `rpmrepo_metadata::Package` into our own [`Package`],
/// attributing it to `repo_id` and carrying whatever `xml:base` override the
/// package's `<location>` element had.
pub fn convert_package(
    pkg: &rpmrepo_metadata::Package,
    repo_id: &str,
    xml_base: Option<String>,
) -> Package {
    let nevra = Nevra::new(
        pkg.name().to_string(),
        Evr::new(pkg.epoch(), pkg.version(), pkg.release()),
        pkg.arch().to_string(),
    );

    let (algorithm, hex_digest) = pkg
        .checksum()
        .to_values()
        .map(|(algo, digest)| (algo.to_string(), digest.to_string()))
        .unwrap_or_else(|_| (String::from("unknown"), String::new()));

    Package {
        nevra,
        source: Source::Repo {
            repo_id: repo_id.to_string(),
            location: pkg.location_href().to_string(),
            xml_base,
            checksum: Checksum {
                algorithm,
                hex_digest,
            },
        },
        requires: pkg.requires().iter().map(convert_requirement).collect(),
        provides: pkg.provides().iter().map(convert_requirement).collect(),
        obsoletes: pkg.obsoletes().iter().map(convert_requirement).collect(),
        conflicts: pkg.conflicts().iter().map(convert_requirement).collect(),
        file_provides: pkg.files().iter().map(|path| path.display().to_string()).collect(),
    }
}

/// Converts one `primary.xml` `rpm:entry` into a [`Relation`].
///
/// `rpmrepo_metadata::Requirement` keeps its flags/epoch/version/release as
/// plain optional strings (it doesn't know or care about RPM's EVR ordering
/// rules, that's our job); a relation with no `flags` is unversioned.
fn convert_requirement(req: &rpmrepo_metadata::Requirement) -> Relation {
    let Some(flags) = req.flags.as_deref() else {
        return Relation::unversioned(req.name.clone());
    };

    let flags = match flags {
        "EQ" => RelationFlags::Eq,
        "LT" => RelationFlags::Lt,
        "LE" => RelationFlags::Le,
        "GT" => RelationFlags::Gt,
        "GE" => RelationFlags::Ge,
        _ => RelationFlags::Any,
    };

    let epoch = req
        .epoch
        .as_deref()
        .and_then(|e| e.parse().ok())
        .unwrap_or(0);
    let version = req.version.clone().unwrap_or_default();
    let release = req.release.clone().unwrap_or_default();

    Relation::versioned(req.name.clone(), flags, Evr::new(epoch, version, release))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unversioned_requirement_becomes_any_relation() {
        let req = rpmrepo_metadata::Requirement {
            name: "libfoo.so()(64bit)".to_string(),
            flags: None,
            epoch: None,
            version: None,
            release: None,
            preinstall: false,
        };
        let relation = convert_requirement(&req);
        assert_eq!(relation.flags, RelationFlags::Any);
        assert!(relation.evr.is_none());
    }

    #[test]
    fn versioned_requirement_carries_evr() {
        let req = rpmrepo_metadata::Requirement {
            name: "libfoo".to_string(),
            flags: Some("GE".to_string()),
            epoch: Some("1".to_string()),
            version: Some("2.0".to_string()),
            release: Some("3".to_string()),
            preinstall: false,
        };
        let relation = convert_requirement(&req);
        assert_eq!(relation.flags, RelationFlags::Ge);
        assert_eq!(relation.evr, Some(Evr::new(1, "2.0", "3")));
    }
}
