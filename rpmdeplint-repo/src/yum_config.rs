//! Ingests `/etc/yum.conf` and `/etc/yum.repos.d/*.repo` for `--repos-from-system`.

use std::fs;
use std::path::{Path, PathBuf};

use ini::{Ini, Properties};
use rpmdeplint_types::{Repo, RepoLocation};

use crate::error::Error;

const YUM_CONF: &str = "/etc/yum.conf";
const YUM_REPOS_DIR: &str = "/etc/yum.repos.d";
const OS_RELEASE: &str = "/etc/os-release";

/// Reads every repo section out of `/etc/yum.conf` and `/etc/yum.repos.d/*.repo`.
///
/// The `[main]` section of `yum.conf` is parsed only so it can be skipped;
/// it carries global defaults, not a repo to add.
pub fn load_system_repos() -> Result<Vec<Repo>, Error> {
    let substitutions = detect_substitutions();

    let mut repos = Vec::new();

    if let Some(conf) = read_ini_file(Path::new(YUM_CONF))? {
        repos.extend(repos_from_ini(Path::new(YUM_CONF), &conf, &substitutions, &["main"])?);
    }

    let repo_dir = Path::new(YUM_REPOS_DIR);
    if repo_dir.is_dir() {
        let mut paths: Vec<PathBuf> = fs::read_dir(repo_dir)
            .map_err(|source| Error::IoPath {
                path: repo_dir.to_path_buf(),
                context: "reading yum.repos.d",
                source,
            })?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("repo"))
            .collect();
        paths.sort();

        for path in paths {
            let Some(conf) = read_ini_file(&path)? else {
                continue;
            };
            repos.extend(repos_from_ini(&path, &conf, &substitutions, &[])?);
        }
    }

    Ok(repos)
}

/// Reads `path` as an INI file, returning `Ok(None)` if it doesn't exist.
fn read_ini_file(path: &Path) -> Result<Option<Ini>, Error> {
    match Ini::load_from_file(path) {
        Ok(ini) => Ok(Some(ini)),
        Err(ini::Error::Io(source)) if source.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(ini::Error::Io(source)) => Err(Error::IoPath {
            path: path.to_path_buf(),
            context: "reading yum config file",
            source,
        }),
        Err(ini::Error::Parse(source)) => Err(Error::IniParse {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Converts every named, non-skipped, *enabled* section of a parsed INI file
/// into a [`Repo`]. `skip` names sections that carry global defaults rather
/// than a repository (`yum.conf`'s `[main]`); sections with `enabled=0` are
/// likewise dropped entirely, per §6 of the design ("Skip sections named
/// `main` or with `enabled=0`") rather than loaded as skip-if-unavailable.
fn repos_from_ini(path: &Path, conf: &Ini, substitutions: &Substitutions, skip: &[&str]) -> Result<Vec<Repo>, Error> {
    conf.sections()
        .flatten()
        .filter(|name| !skip.contains(name))
        .map(|name| {
            let section = conf.section(Some(name)).expect("name came from conf.sections()");
            repo_from_section(path, name, section, substitutions)
        })
        .collect::<Result<Vec<Option<Repo>>, Error>>()
        .map(|repos| repos.into_iter().flatten().collect())
}

/// Builds a [`Repo`] from one section's entries, or `Ok(None)` if the
/// section is disabled (`enabled=0`) and should be skipped entirely.
fn repo_from_section(path: &Path, name: &str, entries: &Properties, substitutions: &Substitutions) -> Result<Option<Repo>, Error> {
    let enabled = entries.get("enabled").map(|value| value != "0").unwrap_or(true);
    if !enabled {
        return Ok(None);
    }

    let baseurl = entries.get("baseurl");
    let metalink = entries.get("metalink");
    let mirrorlist = entries.get("mirrorlist");

    let location = match (baseurl, metalink, mirrorlist) {
        (Some(url), None, None) => RepoLocation::BaseUrl(substitute(url, substitutions)),
        (None, Some(url), None) => RepoLocation::MirrorList(substitute(url, substitutions)),
        (None, None, Some(url)) => RepoLocation::MirrorList(substitute(url, substitutions)),
        _ => {
            return Err(Error::InvalidRepoSection {
                path: path.to_path_buf(),
                section: name.to_string(),
            })
        }
    };

    let skip_if_unavailable = entries
        .get("skip_if_unavailable")
        .map(|value| value == "1")
        .unwrap_or(false);

    Ok(Some(Repo {
        name: name.to_string(),
        location,
        skip_if_unavailable,
    }))
}

struct Substitutions {
    releasever: Option<String>,
    basearch: String,
    arch: String,
}

fn detect_substitutions() -> Substitutions {
    let arch = std::env::consts::ARCH.to_string();
    Substitutions {
        releasever: read_os_release_version_id(),
        basearch: arch.clone(),
        arch,
    }
}

fn substitute(value: &str, substitutions: &Substitutions) -> String {
    let mut result = value.to_string();
    if let Some(releasever) = &substitutions.releasever {
        result = result.replace("$releasever", releasever);
    }
    result = result.replace("$basearch", &substitutions.basearch);
    result = result.replace("$arch", &substitutions.arch);
    result
}

fn read_os_release_version_id() -> Option<String> {
    let contents = fs::read_to_string(OS_RELEASE).ok()?;
    for line in contents.lines() {
        if let Some(value) = line.strip_prefix("VERSION_ID=") {
            return Some(value.trim_matches('"').to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn substitutions() -> Substitutions {
        Substitutions {
            releasever: Some("39".to_string()),
            basearch: "x86_64".to_string(),
            arch: "x86_64".to_string(),
        }
    }

    #[test]
    fn substitute_replaces_known_tokens() {
        let result = substitute(
            "http://example.com/$releasever/$basearch/os",
            &substitutions(),
        );
        assert_eq!(result, "http://example.com/39/x86_64/os");
    }

    #[test]
    fn substitute_leaves_unknown_tokens_literal() {
        let substitutions = Substitutions {
            releasever: None,
            ..substitutions()
        };
        let result = substitute("http://example.com/$releasever/os", &substitutions);
        assert_eq!(result, "http://example.com/$releasever/os");
    }

    #[test]
    fn read_ini_file_parses_sections_and_comments() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("updates.repo");
        fs::write(
            &path,
            "# a comment\n[updates]\nname = Updates\nbaseurl=http://example.com/updates\nenabled=1\n\n[updates-debug]\nbaseurl = http://example.com/updates-debug\nenabled=0\n",
        )
        .expect("write fixture");

        let conf = read_ini_file(&path).expect("parse").expect("file exists");
        assert_eq!(conf.sections().flatten().count(), 2);
        assert_eq!(
            conf.section(Some("updates")).and_then(|s| s.get("baseurl")),
            Some("http://example.com/updates")
        );
        assert_eq!(
            conf.section(Some("updates-debug")).and_then(|s| s.get("enabled")),
            Some("0")
        );
    }

    #[test]
    fn read_ini_file_returns_none_for_missing_file() {
        let result = read_ini_file(Path::new("/nonexistent/does/not/exist.repo")).expect("ok");
        assert!(result.is_none());
    }

    #[test]
    fn repo_from_section_rejects_conflicting_sources() {
        let mut conf = Ini::new();
        conf.with_section(Some("updates"))
            .set("baseurl", "http://example.com")
            .set("mirrorlist", "http://example.com/mirrors");

        let entries = conf.section(Some("updates")).expect("section set above");
        let err = repo_from_section(Path::new("test.repo"), "updates", entries, &substitutions()).unwrap_err();
        assert!(matches!(err, Error::InvalidRepoSection { .. }));
    }

    #[test]
    fn repo_from_section_defaults_enabled_true() {
        let mut conf = Ini::new();
        conf.with_section(Some("updates")).set("baseurl", "http://example.com");

        let entries = conf.section(Some("updates")).expect("section set above");
        let repo = repo_from_section(Path::new("test.repo"), "updates", entries, &substitutions())
            .expect("valid repo")
            .expect("enabled by default");
        assert!(!repo.skip_if_unavailable);
    }

    #[test]
    fn repo_from_section_drops_disabled_sections() {
        let mut conf = Ini::new();
        conf.with_section(Some("updates-debug"))
            .set("baseurl", "http://example.com/updates-debug")
            .set("enabled", "0");

        let entries = conf.section(Some("updates-debug")).expect("section set above");
        let repo = repo_from_section(Path::new("test.repo"), "updates-debug", entries, &substitutions()).expect("valid section");
        assert!(repo.is_none(), "a disabled section must not become a Repo");
    }

    #[test]
    fn repos_from_ini_skips_disabled_sections_entirely() -> TestResult {
        let mut conf = Ini::new();
        conf.with_section(Some("updates")).set("baseurl", "http://example.com/updates");
        conf.with_section(Some("updates-debug"))
            .set("baseurl", "http://example.com/updates-debug")
            .set("enabled", "0");

        let repos = repos_from_ini(Path::new("test.repo"), &conf, &substitutions(), &[])?;
        assert_eq!(repos.len(), 1);
        assert_eq!(repos[0].name, "updates");
        Ok(())
    }
}
