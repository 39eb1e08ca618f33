//! Match and match-collection types.
//!
//! A [`Match`] records one located occurrence of a rule pattern. A
//! [`MatchSet`] groups every match of a scan per rule, in rule
//! declaration order, so that reports come out deterministic.

use std::path::Path;
use std::sync::Arc;

use crate::rules::RuleSet;

/// One located occurrence of a rule pattern within a file's line.
///
/// Matches are plain value objects; two matches with the same fields are
/// the same match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Path of the file the match was found in.
    pub path: Box<Path>,
    /// 1-indexed line number within the file.
    pub line: u32,
    /// The matched substring, exactly as it appeared on the line.
    pub text: Box<str>,
}

impl Match {
    /// Creates a match at the given location.
    #[must_use]
    pub fn new(path: &Path, line: u32, text: &str) -> Self {
        Self {
            path: path.into(),
            line,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone)]
struct Bucket {
    rule: Arc<str>,
    matches: Vec<Match>,
}

/// All matches of one scan, grouped per rule in rule declaration order.
///
/// Built append-only during a scan; the post-processing step replaces a
/// rule's bucket wholesale rather than editing it in place.
#[derive(Debug, Clone)]
pub struct MatchSet {
    buckets: Vec<Bucket>,
}

impl MatchSet {
    /// Creates an empty set with one bucket per rule, in rule order.
    #[must_use]
    pub fn for_rules(rules: &RuleSet) -> Self {
        Self {
            buckets: rules
                .rules()
                .iter()
                .map(|rule| Bucket {
                    rule: Arc::clone(&rule.name),
                    matches: Vec::new(),
                })
                .collect(),
        }
    }

    /// Appends a match to the bucket at `rule_index`.
    ///
    /// The index must come from the same `RuleSet` this set was created
    /// for; out-of-range pushes are dropped.
    pub(crate) fn push(&mut self, rule_index: usize, m: Match) {
        if let Some(bucket) = self.buckets.get_mut(rule_index) {
            bucket.matches.push(m);
        }
    }

    /// Appends another set's matches bucket-by-bucket, preserving order.
    ///
    /// Both sets must have been created from the same `RuleSet`.
    pub fn merge(&mut self, other: Self) {
        for (bucket, incoming) in self.buckets.iter_mut().zip(other.buckets) {
            bucket.matches.extend(incoming.matches);
        }
    }

    /// Returns the matches recorded for a rule, if the rule exists.
    #[must_use]
    pub fn rule_matches(&self, rule: &str) -> Option<&[Match]> {
        self.buckets
            .iter()
            .find(|b| b.rule.as_ref() == rule)
            .map(|b| b.matches.as_slice())
    }

    /// Replaces a rule's matches with a new sequence.
    ///
    /// Returns `false` (and discards `matches`) if the rule is unknown.
    pub fn replace(&mut self, rule: &str, matches: Vec<Match>) -> bool {
        match self.buckets.iter_mut().find(|b| b.rule.as_ref() == rule) {
            Some(bucket) => {
                bucket.matches = matches;
                true
            }
            None => false,
        }
    }

    /// Iterates `(rule name, matches)` pairs in rule declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Match])> {
        self.buckets.iter().map(|b| (b.rule.as_ref(), b.matches.as_slice()))
    }

    /// Total number of matches across all rules.
    #[must_use]
    pub fn total(&self) -> usize {
        self.buckets.iter().map(|b| b.matches.len()).sum()
    }

    /// Number of rules (buckets), matched or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Returns `true` if the set tracks no rules at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
