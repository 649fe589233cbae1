//! End-to-end scenarios over the three checks that need no RPM file bytes
//! (`try_to_install_all`, `find_repoclosure_problems`, `find_upgrade_problems`),
//! built from in-memory `Package` fixtures rather than real `.rpm` files.
//!
//! `find_conflicts` reads file entries off actual package bytes through
//! `RpmFileInspector` and is exercised separately at the `rpmdeplint-rpm`
//! level instead.

use std::path::PathBuf;
use std::time::Duration;

use rpmdeplint_cache::{CacheConfig, RepoCache};
use rpmdeplint_repo::RepoLoader;
use rpmdeplint_solve::{DependencyAnalyzer, SolverPoolBuilder};
use rpmdeplint_types::{Arch, Evr, Nevra, Package, Relation, RelationFlags, Source};
use testresult::TestResult;

fn evr(version: &str, release: &str) -> Evr {
    Evr::new(0, version, release)
}

fn repo_package(name: &str, version: &str, release: &str, arch: &str) -> Package {
    Package {
        nevra: Nevra::new(name, evr(version, release), arch),
        source: Source::Repo {
            repo_id: "base".to_string(),
            location: format!("{name}-{version}-{release}.{arch}.rpm"),
            xml_base: None,
            checksum: rpmdeplint_types::Checksum {
                algorithm: "sha256".to_string(),
                hex_digest: "0".repeat(64),
            },
        },
        requires: Vec::new(),
        provides: Vec::new(),
        obsoletes: Vec::new(),
        conflicts: Vec::new(),
        file_provides: Vec::new(),
    }
}

fn put_package(name: &str, version: &str, release: &str, arch: &str) -> Package {
    Package {
        nevra: Nevra::new(name, evr(version, release), arch),
        source: Source::Commandline {
            path: PathBuf::from(format!("{name}-{version}-{release}.{arch}.rpm")),
        },
        requires: Vec::new(),
        provides: Vec::new(),
        obsoletes: Vec::new(),
        conflicts: Vec::new(),
        file_provides: Vec::new(),
    }
}

fn requires(pkg: &mut Package, name: &str) {
    pkg.requires.push(Relation::unversioned(name));
}

fn provides(pkg: &mut Package, name: &str) {
    pkg.provides.push(Relation::unversioned(name));
}

/// Builds a [`DependencyAnalyzer`] over a synthetic pool. The returned
/// `TempDir` guard must be kept alive by the caller for as long as the
/// analyzer is in use, since the cache root lives under it.
fn analyzer(repo_packages: Vec<Package>, puts: Vec<Package>) -> TestResult<(DependencyAnalyzer, tempfile::TempDir)> {
    let mut builder = SolverPoolBuilder::new(Arch::new("i386".to_string()));
    builder.add_repo_packages(repo_packages);
    builder.add_puts(puts);

    let tempdir = tempfile::tempdir()?;
    let cache = RepoCache::new(CacheConfig::at(tempdir.path(), Duration::from_secs(604_800)));
    let loader = RepoLoader::new();
    Ok((
        DependencyAnalyzer::new(builder.finalize(), Vec::new(), loader, cache),
        tempdir,
    ))
}

/// §8 scenario 1 (sat + repoclosure + upgrade legs; the conflict leg is
/// covered at the `rpmdeplint-rpm` level, not here).
#[test]
fn scenario_finds_all_problems() -> TestResult {
    let mut pkg_d = repo_package("d", "0.1", "1", "i386");
    requires(&mut pkg_d, "libfoo.so.4");
    let mut pkg_c = repo_package("c", "0.1", "1", "i386");
    provides(&mut pkg_c, "libfoo.so.4");
    let pkg_a = repo_package("a", "5.0", "1", "i386");

    let put_a = put_package("a", "4.0", "1", "i386");
    let mut put_e = put_package("e", "1.0", "1", "i386");
    requires(&mut put_e, "doesnotexist");
    let mut put_c = put_package("c", "0.2", "1", "i386");
    provides(&mut put_c, "libfoo.so.5");

    let (mut analyzer, _guard) = analyzer(vec![pkg_d, pkg_c, pkg_a], vec![put_a, put_e, put_c])?;

    let (ok, set) = analyzer.try_to_install_all()?;
    assert!(!ok);
    assert!(set
        .overall_problems()
        .iter()
        .any(|p| p.as_str() == "nothing provides doesnotexist needed by e-1.0-1.i386"));

    let repoclosure = analyzer.find_repoclosure_problems()?;
    assert!(repoclosure
        .iter()
        .any(|p| p.as_str() == "nothing provides libfoo.so.4 needed by d-0.1-1.i386"));

    let upgrade = analyzer.find_upgrade_problems()?;
    assert!(upgrade
        .iter()
        .any(|p| p.as_str() == "a-4.0-1.i386 would be upgraded by a-5.0-1.i386 from repo base"));

    Ok(())
}

/// §8 scenario 3: an obsoleting rename drops the old provider, breaking an
/// existing repo package's dependency on it.
#[test]
fn scenario_obsoleting_upgrade_with_rename() -> TestResult {
    let mut foolib = repo_package("foolib", "4.0", "1", "i386");
    provides(&mut foolib, "libfoo.so.4");
    let mut b = repo_package("b", "0.1", "1", "i386");
    requires(&mut b, "libfoo.so.4");

    let mut put = put_package("libfoo", "5.0", "1", "i386");
    provides(&mut put, "libfoo.so.5");
    put.obsoletes.push(Relation::versioned("foolib", RelationFlags::Lt, evr("5.0", "1")));

    let (mut analyzer, _guard) = analyzer(vec![foolib, b], vec![put])?;
    let repoclosure = analyzer.find_repoclosure_problems()?;
    assert!(repoclosure
        .iter()
        .any(|p| p.as_str() == "nothing provides libfoo.so.4 needed by b-0.1-1.i386"));
    Ok(())
}

/// §8 scenario 4: a repoclosure problem that already existed before any PUT
/// is layered on is a warning, not a reported defect.
#[test]
fn scenario_preexisting_repo_problem_is_ignored() -> TestResult {
    let mut b = repo_package("b", "0.1", "1", "i386");
    requires(&mut b, "doesnotexist");
    requires(&mut b, "a");

    let put = put_package("a", "0.1", "1", "i386");

    let (mut analyzer, _guard) = analyzer(vec![b], vec![put])?;
    let repoclosure = analyzer.find_repoclosure_problems()?;
    assert!(repoclosure.is_empty());
    Ok(())
}

/// §8 scenario 5: a higher epoch always wins, even against a much larger
/// version/release string on the other side.
#[test]
fn scenario_epoch_aware_non_upgrade() -> TestResult {
    let repo_pkg = Package {
        nevra: Nevra::new("anaconda-user-help", Evr::new(0, "19.31.123", "1.el7"), "noarch"),
        ..repo_package("anaconda-user-help", "19.31.123", "1.el7", "noarch")
    };
    let put = Package {
        nevra: Nevra::new("anaconda-user-help", Evr::new(1, "7.3.2", "1.el7"), "noarch"),
        ..put_package("anaconda-user-help", "7.3.2", "1.el7", "noarch")
    };

    let (mut analyzer, _guard) = analyzer(vec![repo_pkg], vec![put])?;
    let upgrade = analyzer.find_upgrade_problems()?;
    assert!(upgrade.is_empty());
    Ok(())
}

/// Installonly packages may carry multiple versions side by side without
/// tripping the upgrade check, since `kernel-core` builds are never meant
/// to "replace" one another.
#[test]
fn installonly_kernel_builds_do_not_upgrade_each_other() -> TestResult {
    let mut kernel_repo = repo_package("kernel-core", "0.1", "1", "i386");
    provides(&mut kernel_repo, "installonlypkg(kernel)");

    let mut kernel_put = put_package("kernel-core", "0.2", "1", "i386");
    provides(&mut kernel_put, "installonlypkg(kernel)");

    let (mut analyzer, _guard) = analyzer(vec![kernel_repo], vec![kernel_put])?;
    let (ok, _set) = analyzer.try_to_install_all()?;
    assert!(ok);
    Ok(())
}
