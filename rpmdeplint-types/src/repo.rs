//! Repository descriptors: the configured sources `rpmdeplint-repo` fetches
//! from and `rpmdeplint-solve` attributes packages to.

/// Where a repo's metadata is addressed from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RepoLocation {
    /// A single base URL or local path under which `repodata/repomd.xml`
    /// lives, e.g. `--repo updates,http://example.com/updates/`.
    BaseUrl(String),
    /// A metalink or mirrorlist URL returning a list of base URLs to try.
    ///
    /// Per the design's simplification, mirrorlist and metalink are treated
    /// identically: the first mirror is used and no failover between
    /// mirrors is attempted.
    MirrorList(String),
}

/// A configured repository, as named on the command line or read from a yum
/// configuration file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Repo {
    /// Repo name, unique within a single run.
    pub name: String,
    /// Where to fetch its metadata from.
    pub location: RepoLocation,
    /// If `true`, a fetch failure for this repo is logged and the repo is
    /// skipped rather than aborting the whole run.
    pub skip_if_unavailable: bool,
}

impl Repo {
    /// Creates a repo addressed by a single base URL.
    pub fn from_base_url(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: RepoLocation::BaseUrl(base_url.into()),
            skip_if_unavailable: false,
        }
    }
}
