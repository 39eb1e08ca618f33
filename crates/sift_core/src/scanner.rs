//! Per-file line scanning against every rule.

use std::io;
use std::path::Path;

use crate::fs_util::read_lossy;
use crate::matches::{Match, MatchSet};
use crate::rules::RuleSet;

/// Scans one file line-by-line against every rule, returning the file's
/// matches grouped per rule (one bucket per rule, possibly empty).
///
/// Content is decoded best-effort: undecodable byte sequences become
/// placeholders rather than errors. Files larger than `max_size` (when
/// set) produce no matches. A file that cannot be opened or read at all
/// fails with the underlying `io::Error`; recovering from that is the
/// tree walker's job, not the scanner's.
pub fn scan_file(path: &Path, rules: &RuleSet, max_size: Option<u64>) -> io::Result<MatchSet> {
    let mut matches = MatchSet::for_rules(rules);

    let Some(content) = read_lossy(path, max_size)? else {
        return Ok(matches);
    };

    scan_content_into(&content, path, rules, &mut matches);
    Ok(matches)
}

/// Scans in-memory content, recording matches against `path`.
#[must_use]
pub fn scan_content(content: &str, path: &Path, rules: &RuleSet) -> MatchSet {
    let mut matches = MatchSet::for_rules(rules);
    scan_content_into(content, path, rules, &mut matches);
    matches
}

/// Applies every pattern of every rule to every line of `content`,
/// appending matches to an existing set.
///
/// Lines are 1-indexed. Each pattern contributes all its non-overlapping
/// matches in left-to-right order; rules are evaluated independently and
/// never short-circuit one another.
pub fn scan_content_into(content: &str, path: &Path, rules: &RuleSet, matches: &mut MatchSet) {
    for (line, line_number) in content.lines().zip(1u32..) {
        for (rule_index, rule) in rules.rules().iter().enumerate() {
            for pattern in &rule.patterns {
                for found in pattern.find_iter(line) {
                    matches.push(rule_index, Match::new(path, line_number, found.as_str()));
                }
            }
        }
    }
}
