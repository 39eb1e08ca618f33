use thiserror::Error;

/// Errors that can occur when compiling a rule set.
#[derive(Debug, Error)]
pub enum RuleError {
    /// The rule's regular expression failed to compile.
    #[error("invalid pattern in rule '{name}': {source}")]
    InvalidPattern {
        /// Name of the rule that failed.
        name: String,
        /// The underlying regex compilation error.
        #[source]
        source: regex::Error,
    },

    /// The rule mapped to an empty list of patterns.
    #[error("rule '{name}' has no patterns")]
    EmptyRule {
        /// Name of the offending rule.
        name: String,
    },

    /// The same rule name appeared more than once.
    #[error("duplicate rule '{name}'")]
    DuplicateRule {
        /// Name of the duplicated rule.
        name: String,
    },

    /// A rule key in the rules file was not a string.
    #[error("rule names must be strings, found {found}")]
    InvalidName {
        /// Debug rendering of the offending key.
        found: String,
    },

    /// The rule's value was neither a pattern string nor a list of them.
    #[error("rule '{name}' must map to a pattern string or a list of pattern strings")]
    InvalidShape {
        /// Name of the offending rule.
        name: String,
    },
}

/// Top-level error type for the sift scanning pipeline.
///
/// Unifies errors from rule compilation and configuration loading into a
/// single type for callers that orchestrate the full workflow.
#[derive(Debug, Error)]
pub enum SiftError {
    /// A rule failed to compile.
    #[error(transparent)]
    Rule(#[from] RuleError),

    /// Configuration could not be read or parsed.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
}
