//! Reads RPM package headers directly off disk.
//!
//! `rpmdeplint-solve`'s `find_conflicts` check needs the actual bytes of
//! every PUT and any repo package it might conflict with on a shared path;
//! [`RpmFileInspector`] is the thin layer that turns an RPM file into
//! [`FileEntry`] records it can compare. [`read_put`] covers the other half:
//! turning a package under test into the same [`rpmdeplint_types::Package`]
//! record that `rpmdeplint-repo` builds for packages discovered in a repo.

#![forbid(unsafe_code)]

mod error;
mod file_entry;
mod inspector;
mod put;

pub use error::Error;
pub use file_entry::{FileColor, FileEntry};
pub use inspector::RpmFileInspector;
pub use put::read_put;
