//! Core rule-matching engine for sift.
//!
//! This crate scans a file tree line-by-line against a set of named regex
//! rules and aggregates the matches into a per-rule report. It's designed
//! to be embedded in CLIs and CI pipelines.
//!
//! # Main Types
//!
//! - [`RuleSet`] - Named rules, each backed by one or more compiled patterns
//! - [`SuffixPolicy`] - Decides which files to skip by extension
//! - [`TreeScanner`] - Walks a directory tree and aggregates matches
//! - [`MatchSet`] - All matches of one scan, grouped per rule
//! - [`Refinery`] - Cross-rule post-processing of aggregated matches
//! - [`Tier`] - Report verbosity level
//!
//! # Error Handling
//!
//! This crate uses [`thiserror`] for structured, typed errors that library
//! consumers can match on:
//!
//! - [`RuleError`] - Rule compilation failures
//! - [`ConfigError`] - Configuration loading/parsing failures
//! - [`SiftError`] - Top-level error enum combining the above
//!
//! The CLI crate (`sift_cli`) uses `anyhow` for error propagation.

/// Scan configuration loaded from `config.yml`.
pub mod config;
/// Error types for rule compilation and configuration loading.
pub mod error;
/// Filesystem helpers for best-effort text reading.
pub mod fs_util;
/// Match and match-collection types.
pub mod matches;
/// Common re-exports for internal use.
pub mod prelude;
/// Cross-rule post-processing of aggregated matches.
pub mod refine;
/// Report rendering at three verbosity tiers.
pub mod report;
/// Rule definitions and the compiled rule registry.
pub mod rules;
/// Per-file line scanning against every rule.
pub mod scanner;
/// Extension-based file skipping.
pub mod suffix;
#[cfg(test)]
pub(crate) mod test_utils;
/// Directory traversal and match aggregation.
pub mod walk;

pub use config::{ConfigError, ScanConfig, SuffixList};
pub use error::{RuleError, SiftError};
pub use matches::{Match, MatchSet};
pub use refine::{LINK_RULE, Refinery, URL_RULE};
pub use report::{Tier, write_report};
pub use rules::{PatternSource, Rule, RuleSet};
pub use scanner::{scan_content, scan_file};
pub use suffix::SuffixPolicy;
pub use walk::{ScanOutcome, TreeScanner, count_files};

/// Default filename for the rules file.
pub const RULES_FILENAME: &str = "rules.yml";

/// Default filename for the scan configuration file.
pub const CONFIG_FILENAME: &str = "config.yml";
