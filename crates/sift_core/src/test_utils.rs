//! Test utilities for `sift_core` (compiled only during testing).

use std::path::Path;

use crate::matches::Match;
use crate::rules::{PatternSource, RuleSet};

/// Builds a rule set from `(name, patterns)` pairs, panicking on invalid
/// patterns.
pub fn make_ruleset(rules: &[(&str, &[&str])]) -> RuleSet {
    RuleSet::compile(rules.iter().map(|(name, patterns)| {
        (
            (*name).to_string(),
            PatternSource::Alternatives(patterns.iter().map(|&p| p.to_string()).collect()),
        )
    }))
    .unwrap()
}

/// Builds a match at the given location.
pub fn make_match(path: &str, line: u32, text: &str) -> Match {
    Match::new(Path::new(path), line, text)
}
