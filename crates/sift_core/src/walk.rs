//! Directory traversal and match aggregation.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use ignore::WalkBuilder;

#[cfg(feature = "tracing")]
use tracing::{debug, warn};

use crate::fs_util::read_lossy;
use crate::matches::MatchSet;
use crate::rules::RuleSet;
use crate::scanner::scan_content_into;
use crate::suffix::SuffixPolicy;

/// Aggregated results of one tree scan.
#[derive(Debug)]
pub struct ScanOutcome {
    /// Every match found, grouped per rule in rule declaration order.
    /// Within a rule, matches keep intra-file order and append across
    /// files in traversal order.
    pub matches: MatchSet,
    /// Number of files read and scanned.
    pub files_scanned: usize,
    /// Number of files skipped by the suffix policy or the size bound.
    pub files_skipped: usize,
    /// Number of files that could not be read and were passed over.
    pub files_unreadable: usize,
    /// `true` if the scan was cancelled before the walk finished; the
    /// matches then cover only the files visited up to that point.
    pub interrupted: bool,
}

/// Walks a directory tree and aggregates per-file matches into a global
/// [`MatchSet`].
///
/// The walk is sequential and exhaustive: every regular file under the
/// root is visited exactly once, in sorted path order, with no gitignore
/// or hidden-file filtering. Files the suffix policy rejects contribute
/// nothing; files that cannot be read are logged, counted, and passed
/// over without aborting the scan.
#[derive(Debug)]
pub struct TreeScanner {
    rules: RuleSet,
    policy: SuffixPolicy,
    max_file_size: Option<u64>,
    cancel: Option<Arc<AtomicBool>>,
}

impl TreeScanner {
    /// Creates a scanner over the given rules and suffix policy.
    #[must_use]
    pub fn new(rules: RuleSet, policy: SuffixPolicy) -> Self {
        Self {
            rules,
            policy,
            max_file_size: None,
            cancel: None,
        }
    }

    /// Sets a per-file size bound; larger files are skipped.
    #[must_use]
    pub fn with_max_file_size(mut self, limit: u64) -> Self {
        self.max_file_size = Some(limit);
        self
    }

    /// Registers a flag checked before each file; setting it cancels the
    /// walk cooperatively and flags the outcome as interrupted.
    #[must_use]
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Returns the rule set this scanner matches against.
    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Scans every regular file under `root`, merging per-file matches
    /// into one set. Match paths are recorded relative to `root`.
    ///
    /// The observer fires after each visited file (scanned or skipped),
    /// so callers can drive a progress display without the scanner
    /// holding any global state.
    pub fn scan(&self, root: &Path, observer: &mut dyn FnMut(&Path)) -> ScanOutcome {
        let mut outcome = ScanOutcome {
            matches: MatchSet::for_rules(&self.rules),
            files_scanned: 0,
            files_skipped: 0,
            files_unreadable: 0,
            interrupted: false,
        };

        for entry in build_walker(root) {
            if self.cancelled() {
                outcome.interrupted = true;
                break;
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    #[cfg(feature = "tracing")]
                    warn!(error = %err, "error while walking tree");
                    #[cfg(not(feature = "tracing"))]
                    let _ = err;
                    continue;
                }
            };

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = entry.path();

            if self.policy.should_skip(path) {
                outcome.files_skipped += 1;
            } else {
                self.scan_one(path, root, &mut outcome);
            }

            observer(path);
        }

        outcome
    }

    fn scan_one(&self, path: &Path, root: &Path, outcome: &mut ScanOutcome) {
        let content = match read_lossy(path, self.max_file_size) {
            Ok(Some(content)) => content,
            Ok(None) => {
                #[cfg(feature = "tracing")]
                debug!(path = %path.display(), "skipping file over the size bound");
                outcome.files_skipped += 1;
                return;
            }
            Err(err) => {
                #[cfg(feature = "tracing")]
                warn!(path = %path.display(), error = %err, "skipping unreadable file");
                #[cfg(not(feature = "tracing"))]
                let _ = err;
                outcome.files_unreadable += 1;
                return;
            }
        };

        let mut file_matches = MatchSet::for_rules(&self.rules);
        scan_content_into(&content, display_path(path, root), &self.rules, &mut file_matches);
        outcome.matches.merge(file_matches);
        outcome.files_scanned += 1;
    }

    fn cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// Counts the regular files under `root`, for progress totals only.
#[must_use]
pub fn count_files(root: &Path) -> usize {
    build_walker(root)
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .count()
}

/// Path recorded in matches: relative to the scan root where possible.
fn display_path<'a>(path: &'a Path, root: &Path) -> &'a Path {
    match path.strip_prefix(root) {
        Ok(relative) if !relative.as_os_str().is_empty() => relative,
        _ => path,
    }
}

fn build_walker(root: &Path) -> ignore::Walk {
    WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_path(|a, b| a.cmp(b))
        .build()
}
