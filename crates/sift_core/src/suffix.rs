//! Extension-based file skipping.

use std::borrow::Cow;
use std::collections::HashSet;
use std::path::Path;

/// Decides whether a candidate file is scanned, based on its extension.
///
/// The exclude set is a denylist; the include set is a forced-allow
/// override that always wins. Extensions are matched literally, without
/// a leading dot and case-sensitively. Files whose extension appears in
/// neither set are scanned.
#[derive(Debug, Clone, Default)]
pub struct SuffixPolicy {
    exclude: HashSet<Box<str>>,
    include: HashSet<Box<str>>,
}

impl SuffixPolicy {
    /// Creates a policy from exclude and include extension lists.
    pub fn new<E, I>(exclude: E, include: I) -> Self
    where
        E: IntoIterator<Item = String>,
        I: IntoIterator<Item = String>,
    {
        Self {
            exclude: exclude.into_iter().map(Into::into).collect(),
            include: include.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns `true` if the file at `path` should not be scanned.
    ///
    /// The include set overrides the exclude set: a file whose extension
    /// is in both is still scanned. Files with no extension yield an
    /// empty string, which is tested against both sets literally.
    #[must_use]
    pub fn should_skip(&self, path: &Path) -> bool {
        let extension = file_extension(path);

        if self.include.contains(extension.as_ref()) {
            return false;
        }

        self.exclude.contains(extension.as_ref())
    }
}

/// Extracts the extension of the final path component: the substring after
/// the last dot, without the dot, empty if there is none. A leading dot
/// alone (`.bashrc`) does not count as an extension.
fn file_extension(path: &Path) -> Cow<'_, str> {
    path.extension().map_or(Cow::Borrowed(""), |ext| ext.to_string_lossy())
}
