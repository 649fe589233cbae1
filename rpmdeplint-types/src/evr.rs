//! Epoch-Version-Release identifiers and RPM's version comparison algorithm.

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};

/// An epoch-version-release triple, ordered per RPM's comparison rules.
///
/// Epoch defaults to `0` and is elided from [`Display`] output (and from
/// [`Evr::from_str`][std::str::FromStr]) unless non-zero, matching the
/// canonical NEVRA string form in §3 of the design.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Evr {
    /// Epoch, defaulting to 0 when unspecified.
    pub epoch: u32,
    /// Upstream version string.
    pub version: String,
    /// Packager release string.
    pub release: String,
}

impl Evr {
    /// Creates a new [`Evr`].
    pub fn new(epoch: u32, version: impl Into<String>, release: impl Into<String>) -> Self {
        Self {
            epoch,
            version: version.into(),
            release: release.into(),
        }
    }

    /// Parses a bare `[epoch:]version[-release]` string, as carried by an
    /// RPM header's dependency version tag (no package name or arch
    /// attached, unlike the canonical NEVRA form [`crate::Nevra`] parses).
    ///
    /// Release is optional: a bare `Provides: foo = 1.2` has no release
    /// component, so a missing `-release` suffix is treated as an empty
    /// release rather than a parse error.
    pub fn parse_bare(s: &str) -> Self {
        let (epoch, rest) = match s.split_once(':') {
            Some((epoch, rest)) if !epoch.is_empty() && epoch.chars().all(|c| c.is_ascii_digit()) => {
                (epoch.parse().unwrap_or(0), rest)
            }
            _ => (0, s),
        };
        match rest.rsplit_once('-') {
            Some((version, release)) => Evr::new(epoch, version, release),
            None => Evr::new(epoch, rest, ""),
        }
    }
}

impl Display for Evr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.epoch != 0 {
            write!(f, "{}:", self.epoch)?;
        }
        write!(f, "{}-{}", self.version, self.release)
    }
}

impl PartialOrd for Evr {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Evr {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| rpmvercmp(&self.version, &other.version))
            .then_with(|| rpmvercmp(&self.release, &other.release))
    }
}

/// Implements RPM's `rpmvercmp` algorithm: splits both strings into runs of
/// alphabetic, numeric, and "other" characters, comparing run by run.
///
/// Numeric runs always outrank alphabetic runs (so `"1.0"` > `"1.0a"`... more
/// precisely, a numeric segment always beats an alphabetic one when compared
/// against each other at the same position). A leading `~` segment sorts
/// before everything, including the empty string, which is what makes
/// `1.0~rc1` sort before the final `1.0` release.
pub fn rpmvercmp(a: &str, b: &str) -> Ordering {
    let mut a = a;
    let mut b = b;

    loop {
        // Skip non-alphanumeric "glue" characters on both sides, except `~`
        // which is handled specially below.
        a = a.trim_start_matches(|c: char| !c.is_ascii_alphanumeric() && c != '~');
        b = b.trim_start_matches(|c: char| !c.is_ascii_alphanumeric() && c != '~');

        match (a.starts_with('~'), b.starts_with('~')) {
            (true, true) => {
                a = &a[1..];
                b = &b[1..];
                continue;
            }
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            (false, false) => {}
        }

        if a.is_empty() || b.is_empty() {
            break;
        }

        let (seg_a, rest_a) = take_segment(a);
        let (seg_b, rest_b) = take_segment(b);
        a = rest_a;
        b = rest_b;

        let ordering = if seg_a.starts_with(|c: char| c.is_ascii_digit())
            && seg_b.starts_with(|c: char| c.is_ascii_digit())
        {
            compare_numeric(seg_a, seg_b)
        } else if seg_a.starts_with(|c: char| c.is_ascii_digit()) {
            // Numeric segments always outrank alphabetic ones.
            Ordering::Greater
        } else if seg_b.starts_with(|c: char| c.is_ascii_digit()) {
            Ordering::Less
        } else {
            seg_a.cmp(seg_b)
        };

        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    // Whichever string still has characters left wins (e.g. "1.0.1" > "1.0"),
    // unless the only thing left is a `~` segment, which loses to nothing.
    match (a.is_empty(), b.is_empty()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => Ordering::Equal,
    }
}

/// Splits off a leading run of either all-digits or all-alphabetic
/// characters from `s`, returning `(segment, rest)`.
fn take_segment(s: &str) -> (&str, &str) {
    let is_digit = s.starts_with(|c: char| c.is_ascii_digit());
    let end = s
        .find(|c: char| {
            if is_digit {
                !c.is_ascii_digit()
            } else {
                !c.is_ascii_alphabetic()
            }
        })
        .unwrap_or(s.len());
    s.split_at(end)
}

/// Compares two purely-numeric segments, ignoring leading zeroes, the way
/// `rpmvercmp` does (so `"007"` == `"7"` but both are less than `"10"`).
fn compare_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("1.0", "1.0", Ordering::Equal)]
    #[case("1.0", "2.0", Ordering::Less)]
    #[case("2.0", "1.0", Ordering::Greater)]
    #[case("1.0", "1.0.1", Ordering::Less)]
    #[case("1.0a", "1.0", Ordering::Less)]
    #[case("1.0", "1.0a", Ordering::Greater)]
    #[case("1.0~rc1", "1.0", Ordering::Less)]
    #[case("1.0~rc1", "1.0~rc2", Ordering::Less)]
    #[case("007", "7", Ordering::Equal)]
    #[case("1.007", "1.7", Ordering::Equal)]
    #[case("1.2.3", "1.2.3", Ordering::Equal)]
    fn rpmvercmp_orders_like_rpm(#[case] a: &str, #[case] b: &str, #[case] expected: Ordering) {
        assert_eq!(rpmvercmp(a, b), expected, "comparing {a:?} vs {b:?}");
    }

    #[test]
    fn epoch_dominates_version() {
        let lo = Evr::new(0, "99.0", "1");
        let hi = Evr::new(1, "1.0", "1");
        assert!(lo < hi, "epoch 1 always outranks any epoch 0 version");
    }

    #[test]
    fn zero_epoch_elided_from_display() {
        assert_eq!(Evr::new(0, "1.2", "3.el7").to_string(), "1.2-3.el7");
        assert_eq!(Evr::new(1, "1.2", "3.el7").to_string(), "1:1.2-3.el7");
    }

    #[test]
    fn parse_bare_handles_epoch_version_release() {
        assert_eq!(Evr::parse_bare("1:2.0-3"), Evr::new(1, "2.0", "3"));
    }

    #[test]
    fn parse_bare_defaults_epoch_and_release() {
        assert_eq!(Evr::parse_bare("1.2"), Evr::new(0, "1.2", ""));
    }

    #[test]
    fn parse_bare_does_not_confuse_non_numeric_prefix_for_epoch() {
        // "el7" isn't an epoch even though it precedes a colon-free rest;
        // this case has no colon at all, so the whole string is the version.
        assert_eq!(Evr::parse_bare("2.0-3.el7"), Evr::new(0, "2.0", "3.el7"));
    }
}
