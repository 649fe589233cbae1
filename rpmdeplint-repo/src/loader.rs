//! Parses `repomd.xml` and loads `primary`/`filelists` into packages.

use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use rpmdeplint_cache::RepoCache;
use rpmdeplint_types::{Package, Repo, RepoLocation, Source};
use rpmrepo_metadata::{RepomdData, RepomdXml, Repository};

use crate::convert::convert_package;
use crate::error::Error;
use crate::scratch::RepoRoot;

const METADATA_PRIMARY: &str = "primary";
const METADATA_FILELISTS: &str = "filelists";

/// Loads a configured [`Repo`] into a list of [`Package`]s.
///
/// Binds directly to local directories; downloads everything else through
/// `reqwest::blocking`, consulting `cache` by checksum before any network
/// read (per §4.1/§4.2 of the design).
#[derive(Debug)]
pub struct RepoLoader {
    http: reqwest::blocking::Client,
}

impl Default for RepoLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl RepoLoader {
    /// Creates a new [`RepoLoader`].
    pub fn new() -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
        }
    }

    /// Loads `repo`'s packages, respecting `repo.skip_if_unavailable`.
    ///
    /// Returns `Ok(vec![])` (with a logged warning) rather than an error if
    /// the repo couldn't be reached and `skip_if_unavailable` is set.
    pub fn load(&self, repo: &Repo, cache: &RepoCache) -> Result<Vec<Package>, Error> {
        match self.load_inner(repo, cache) {
            Ok(packages) => Ok(packages),
            Err(err) if repo.skip_if_unavailable => {
                warn!("skipping unavailable repo {}: {err}", repo.name);
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }

    fn load_inner(&self, repo: &Repo, cache: &RepoCache) -> Result<Vec<Package>, Error> {
        let base = effective_base_url(repo);
        info!("loading repo {} from {base}", repo.name);

        let root = if let Some(path) = local_path(&base) {
            RepoRoot::Borrowed(path)
        } else {
            self.fetch_remote(repo, &base, cache)?
        };

        let parsed = Repository::load_from_directory(root.path()).map_err(|source| Error::Parse {
            repo: repo.name.clone(),
            source,
        })?;

        // `xml:base` is per-package (on primary.xml's own `<location>`
        // element), not per-repo; `rpmrepo_metadata::Package::location_base`
        // carries it through for us.
        Ok(parsed
            .packages()
            .values()
            .map(|pkg| {
                convert_package(
                    pkg,
                    &repo.name,
                    pkg.location_base().map(ToString::to_string),
                )
            })
            .collect())
    }

    /// Fetches `repomd.xml` and the `primary`/`filelists` payloads it names
    /// into a scratch `repodata/` directory, consulting `cache` by checksum
    /// for the payloads (but never for `repomd.xml` itself, which has no
    /// stable checksum to key on before it's been read).
    fn fetch_remote(&self, repo: &Repo, base: &str, cache: &RepoCache) -> Result<RepoRoot, Error> {
        let repomd_url = format!("{}/repodata/repomd.xml", base.trim_end_matches('/'));
        let repomd_bytes = self.get(&repomd_url).map_err(|reason| Error::RepoDownload {
            repo: repo.name.clone(),
            reason,
        })?;

        let mut staging = Repository::new();
        staging
            .load_metadata_bytes::<RepomdXml>(&repomd_bytes)
            .map_err(|source| Error::Parse {
                repo: repo.name.clone(),
                source,
            })?;
        let repomd: &RepomdData = staging.repomd();

        let root = RepoRoot::new_scratch()?;
        root.write(Path::new("repodata/repomd.xml"), &repomd_bytes)?;

        for mdtype in [METADATA_PRIMARY, METADATA_FILELISTS] {
            let record = repomd.get_record(mdtype).ok_or_else(|| Error::Parse {
                repo: repo.name.clone(),
                source: rpmrepo_metadata::MetadataError::MissingFieldError(mdtype),
            })?;

            let (_, hex_digest) = record.checksum.to_values().map_err(|source| Error::Parse {
                repo: repo.name.clone(),
                source,
            })?;

            let bytes = match cache.lookup(hex_digest).map_err(Error::Cache)? {
                Some(mut cached) => {
                    debug!("{mdtype} for {} served from cache", repo.name);
                    let mut buf = Vec::new();
                    std::io::Read::read_to_end(&mut cached, &mut buf).map_err(|source| {
                        Error::IoPath {
                            path: PathBuf::from(hex_digest),
                            context: "reading cached repodata payload",
                            source,
                        }
                    })?;
                    buf
                }
                None => {
                    let url = format!(
                        "{}/{}",
                        base.trim_end_matches('/'),
                        record.location_href.display()
                    );
                    let bytes = self.get(&url).map_err(|reason| Error::RepoDownload {
                        repo: repo.name.clone(),
                        reason,
                    })?;
                    cache
                        .insert(hex_digest, bytes.as_slice())
                        .map_err(Error::Cache)?;
                    bytes
                }
            };

            root.write(&record.location_href, &bytes)?;
        }

        Ok(root)
    }

    /// Fetches a single conflict candidate's own `.rpm` bytes, honouring its
    /// `xml:base` override (if any) over the repo's own base URL, and
    /// verifying the result against its `primary.xml` checksum.
    ///
    /// Consults `cache` by checksum first, same as repodata payloads; a
    /// package's bytes are content-addressed too, so the same cache serves
    /// both without needing a separate store.
    pub fn download_package(&self, repo: &Repo, package: &Package, cache: &RepoCache) -> Result<Vec<u8>, Error> {
        let Source::Repo {
            location,
            xml_base,
            checksum,
            ..
        } = &package.source
        else {
            panic!("download_package called on a PUT, which is already a local file");
        };

        if let Some(mut cached) = cache.lookup(&checksum.hex_digest).map_err(Error::Cache)? {
            debug!("package {location} served from cache");
            let mut buf = Vec::new();
            std::io::Read::read_to_end(&mut cached, &mut buf).map_err(|source| Error::IoPath {
                path: PathBuf::from(&checksum.hex_digest),
                context: "reading cached package payload",
                source,
            })?;
            return Ok(buf);
        }

        let base = xml_base.clone().unwrap_or_else(|| effective_base_url(repo));
        let bytes = if let Some(dir) = local_path(&base) {
            std::fs::read(dir.join(location)).map_err(|source| Error::IoPath {
                path: dir.join(location),
                context: "reading local package file",
                source,
            })?
        } else {
            let url = format!("{}/{}", base.trim_end_matches('/'), location);
            self.get(&url).map_err(|reason| Error::PackageDownload {
                location: location.clone(),
                reason,
            })?
        };

        cache
            .insert(&checksum.hex_digest, bytes.as_slice())
            .map_err(Error::Cache)?;
        Ok(bytes)
    }

    fn get(&self, url: &str) -> Result<Vec<u8>, String> {
        let response = self
            .http
            .get(url)
            .send()
            .map_err(|source| source.to_string())?
            .error_for_status()
            .map_err(|source| source.to_string())?;
        response.bytes().map(|b| b.to_vec()).map_err(|source| source.to_string())
    }
}

/// Resolves a repo's `BaseUrl`/`MirrorList` to the single base URL we'll
/// actually use; mirrorlists and metalinks are treated identically (the
/// first entry is used, no failover), per the design's simplification.
fn effective_base_url(repo: &Repo) -> String {
    match &repo.location {
        RepoLocation::BaseUrl(url) => url.clone(),
        RepoLocation::MirrorList(url) => url.clone(),
    }
}

/// Returns `Some(path)` if `base` names a local filesystem directory rather
/// than something to fetch over HTTP.
fn local_path(base: &str) -> Option<PathBuf> {
    if let Some(path) = base.strip_prefix("file://") {
        return Some(PathBuf::from(path));
    }
    if base.contains("://") {
        return None;
    }
    Some(PathBuf::from(base))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_path_recognises_bare_paths() {
        assert_eq!(local_path("/srv/repo"), Some(PathBuf::from("/srv/repo")));
    }

    #[test]
    fn local_path_recognises_file_urls() {
        assert_eq!(local_path("file:///srv/repo"), Some(PathBuf::from("/srv/repo")));
    }

    #[test]
    fn local_path_rejects_http_urls() {
        assert_eq!(local_path("http://example.com/repo"), None);
    }
}
