//! Convenience re-exports of the most commonly used types.

pub use crate::config::{ConfigError, ScanConfig, SuffixList};
pub use crate::error::{RuleError, SiftError};
pub use crate::matches::{Match, MatchSet};
pub use crate::refine::Refinery;
pub use crate::report::{Tier, write_report};
pub use crate::rules::{PatternSource, Rule, RuleSet};
pub use crate::scanner::{scan_content, scan_file};
pub use crate::suffix::SuffixPolicy;
pub use crate::walk::{ScanOutcome, TreeScanner, count_files};
