use std::collections::HashSet;

use crate::language::{get_language_for_file, Languages};

/// Set of changed source paths, used purely as a membership predicate when
/// deciding which compilation units to walk.
///
/// Entries are separator-normalized and compared case-insensitively. Two
/// lookup modes are supported: exact normalized-path membership, and
/// filename-only membership as a fallback for when the reported path and the
/// changed entry disagree on their directory prefix.
///
/// ## Properties:
/// * `paths` (`HashSet<String>`): Normalized, lower-cased full paths,
/// * `file_names` (`HashSet<String>`): Lower-cased bare file names.
pub struct ChangedFileSet {
    /// Normalized, lower-cased full paths.
    paths: HashSet<String>,
    /// Lower-cased bare file names.
    file_names: HashSet<String>,
}

impl ChangedFileSet {
    /// Build the set from the raw lines of a changed-files list, as produced
    /// by a `git diff --name-only`-style command.
    ///
    /// Lines are trimmed; blank lines and entries whose extension does not
    /// belong to a supported dialect are dropped.
    ///
    /// ## Parameters:
    /// * `lines` (`IntoIterator<Item = AsRef<str>>`): Raw lines, one path each.
    ///
    /// ## Returns:
    /// * (`ChangedFileSet`): Deduplicated, case-insensitive membership set.
    pub fn build<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut paths = HashSet::new();
        let mut file_names = HashSet::new();
        for line in lines {
            let entry = line.as_ref().trim();
            if entry.is_empty() {
                continue;
            }
            if matches!(get_language_for_file(entry), Languages::Unknown(_)) {
                continue;
            }
            let normalized = normalize_separators(entry).to_lowercase();
            file_names.insert(file_name(&normalized).to_string());
            paths.insert(normalized);
        }
        Self { paths, file_names }
    }

    /// Number of distinct changed source paths.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// True iff no changed entry survived filtering; the whole run must then
    /// produce zero records and succeed.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Checks whether a compiler-reported path belongs to the set.
    ///
    /// Tries exact normalized-path membership first, then falls back to
    /// filename-only membership. The fallback can match same-named files in
    /// different directories; that tradeoff is deliberate.
    ///
    /// ## Parameters:
    /// * `reported` (`&str`): Path as reported for a compilation unit.
    ///
    /// ## Returns:
    /// * (`bool`): true iff the path matches a changed entry.
    pub fn matches(&self, reported: &str) -> bool {
        let normalized = normalize_separators(reported).to_lowercase();
        if self.paths.contains(&normalized) {
            return true;
        }
        self.file_names.contains(file_name(&normalized))
    }
}

/// Normalize backslash separators to forward slashes.
///
/// ## Parameters:
/// * `path` (`&str`): Path with either separator style.
///
/// ## Returns:
/// * (`String`): Path with forward slashes only.
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_empty_set() {
        let set = ChangedFileSet::build(Vec::<String>::new());
        assert!(set.is_empty());
    }

    #[test]
    fn blank_lines_are_dropped() {
        let set = ChangedFileSet::build(["", "   ", "\t"]);
        assert!(set.is_empty());
    }

    #[test]
    fn unsupported_extensions_are_dropped() {
        let set = ChangedFileSet::build(["docs/readme.txt", "build.sh", "Lib/Widget.cs"]);
        assert_eq!(set.len(), 1);
        assert!(!set.matches("docs/readme.txt"));
    }

    #[test]
    fn backslashes_match_forward_slashes() {
        let set = ChangedFileSet::build(["src\\Foo.cs"]);
        assert!(set.matches("src/Foo.cs"));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let set = ChangedFileSet::build(["Src/FOO.cs"]);
        assert!(set.matches("src/foo.CS"));
    }

    #[test]
    fn entries_are_deduplicated_case_insensitively() {
        let set = ChangedFileSet::build(["Lib/Widget.cs", "lib\\widget.CS"]);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn filename_fallback_matches_other_directories() {
        let set = ChangedFileSet::build(["Lib/Widget.cs"]);
        assert!(set.matches("/work/checkout/Lib/Widget.cs"));
        assert!(set.matches("Other/Widget.cs"));
    }

    #[test]
    fn unrelated_file_does_not_match() {
        let set = ChangedFileSet::build(["Lib/Widget.cs"]);
        assert!(!set.matches("Lib/Gadget.cs"));
    }
}
