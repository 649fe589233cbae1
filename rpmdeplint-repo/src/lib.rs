//! Loads configured repositories into package records.
//!
//! Binds local `repodata/` directories directly and fetches remote ones
//! through `reqwest::blocking`, consulting `rpmdeplint-cache` by checksum
//! before ever touching the network for a `primary`/`filelists` payload.
//! `yum_config` separately ingests `/etc/yum.conf` and
//! `/etc/yum.repos.d/*.repo` for `--repos-from-system`.

#![forbid(unsafe_code)]

mod convert;
mod error;
mod loader;
mod scratch;
mod yum_config;

pub use error::Error;
pub use loader::RepoLoader;
pub use yum_config::load_system_repos;
