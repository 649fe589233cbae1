//! A single file table entry read from an RPM header.

/// The multilib marker RPM stamps on ELF files: `0` for anything that isn't
/// an ELF object, `1` for 32-bit ELF, `2` for 64-bit ELF.
///
/// Two files at the same path with different, both-non-zero colors are
/// exempt from the undeclared-conflict check (RPM's own multilib rules
/// allow, say, `/usr/lib/libfoo.so` to differ between the `i686` and
/// `x86_64` builds of the same package name).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct FileColor(pub u32);

impl FileColor {
    /// The "not an ELF object" color.
    pub const NONE: FileColor = FileColor(0);

    /// Returns `true` if this is a meaningful multilib color (non-zero).
    pub fn is_colored(self) -> bool {
        self.0 != 0
    }
}

/// A single entry in an RPM's file table, as read from its header.
///
/// [`RpmFileInspector::file_entries`][crate::RpmFileInspector::file_entries]
/// returns one of these per path the package owns.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileEntry {
    /// Absolute install path.
    pub path: String,
    /// POSIX file mode bits (type + permissions).
    pub mode: u32,
    /// Owning user name, as recorded in the header (not resolved against any
    /// local passwd database).
    pub owner: String,
    /// Owning group name, likewise unresolved.
    pub group: String,
    /// Content digest, hex-encoded; `None` for ghost files and directories,
    /// which RPM never digests.
    pub digest: Option<String>,
    /// Multilib color.
    pub color: FileColor,
}

impl FileEntry {
    /// Returns `true` if `self` and `other` are equal in every respect RPM
    /// itself checks before permitting two packages to co-own a path:
    /// mode, owner, group and content digest. Color is deliberately excluded
    /// here; it is consulted separately as a multilib *exemption* from
    /// reporting inequality, not as a component of equality itself.
    pub fn file_equal(&self, other: &FileEntry) -> bool {
        self.mode == other.mode
            && self.owner == other.owner
            && self.group == other.group
            && self.digest == other.digest
    }

    /// Returns `true` if `self` and `other` are exempt from the undeclared
    /// file conflict check under RPM's multilib rules: both have a non-zero
    /// color, and the colors differ.
    pub fn multilib_exempt(&self, other: &FileEntry) -> bool {
        self.color.is_colored() && other.color.is_colored() && self.color != other.color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(digest: &str, color: u32) -> FileEntry {
        FileEntry {
            path: "/usr/share/thing".to_string(),
            mode: 0o100644,
            owner: "root".to_string(),
            group: "root".to_string(),
            digest: Some(digest.to_string()),
            color: FileColor(color),
        }
    }

    #[test]
    fn identical_entries_are_file_equal() {
        let a = entry("abc", 0);
        let b = entry("abc", 0);
        assert!(a.file_equal(&b));
        assert!(!a.multilib_exempt(&b));
    }

    #[test]
    fn differing_digest_is_not_file_equal() {
        let a = entry("abc", 0);
        let b = entry("def", 0);
        assert!(!a.file_equal(&b));
    }

    #[test]
    fn differing_nonzero_colors_are_multilib_exempt() {
        let a = entry("abc", 1);
        let b = entry("def", 2);
        assert!(!a.file_equal(&b));
        assert!(a.multilib_exempt(&b));
    }

    #[test]
    fn zero_color_is_never_multilib_exempt() {
        let a = entry("abc", 0);
        let b = entry("def", 1);
        assert!(!a.multilib_exempt(&b), "one side uncolored can't be exempt");
    }
}
