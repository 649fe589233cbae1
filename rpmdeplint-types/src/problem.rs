//! Solver problem diagnostics.

use std::fmt::{self, Display, Formatter};

/// A single diagnostic line in the stable format emitted by the underlying
/// SAT engine, e.g. `nothing provides libfoo.so()(64bit) needed by bar-1-1.x86_64`.
///
/// Deliberately a thin string wrapper rather than a structured enum: the
/// wording comes from `resolvo`'s own problem formatter, and rpmdeplint's
/// contract with its users is the rendered text, not a parseable structure.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Problem(String);

impl Problem {
    /// Wraps a pre-formatted problem line.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// Returns the problem text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Problem {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Problem {
    fn from(message: String) -> Self {
        Self(message)
    }
}
