//! A content-addressed, LRU-by-mtime cache of repodata payloads.
//!
//! `rpmdeplint-repo` consults this cache by checksum before downloading
//! `repomd.xml`, `primary.xml.gz` or `filelists.xml.gz`; every entry is
//! self-verifying in the sense that its name *is* its checksum, so a
//! mismatch between the two is a bug in the caller, never an ambiguity the
//! cache itself has to resolve.

#![forbid(unsafe_code)]

mod cache;
mod config;
mod error;

pub use cache::RepoCache;
pub use config::CacheConfig;
pub use error::Error;
