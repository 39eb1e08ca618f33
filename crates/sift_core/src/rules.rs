//! Rule definitions and the compiled rule registry.

use std::path::Path;
use std::sync::Arc;

use regex::Regex;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use crate::config::ConfigError;
use crate::error::{RuleError, SiftError};

/// A rule value as it appears in `rules.yml`: either a single pattern
/// string or a list of alternative pattern strings.
///
/// Both shapes normalise to a non-empty pattern sequence at compile time,
/// so nothing downstream ever branches on which form was written.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PatternSource {
    /// A single pattern string.
    Single(String),
    /// A list of alternative pattern strings, evaluated independently.
    Alternatives(Vec<String>),
}

impl PatternSource {
    fn into_patterns(self) -> Vec<String> {
        match self {
            Self::Single(pattern) => vec![pattern],
            Self::Alternatives(patterns) => patterns,
        }
    }
}

/// A named detection rule backed by one or more compiled patterns.
#[derive(Debug, Clone)]
pub struct Rule {
    /// Unique rule name, as written in the rules file.
    pub name: Arc<str>,
    /// Compiled patterns, in declaration order. Never empty.
    pub patterns: Vec<Regex>,
}

/// Ordered collection of compiled rules, looked up by name.
///
/// Rules keep their declaration order from the rules file so that reports
/// are deterministic across runs. The set is immutable once compiled.
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Compiles a rule set from `(name, patterns)` pairs.
    ///
    /// Fails on the first invalid pattern, reporting the offending rule
    /// name. Scalar rule values must already be wrapped in
    /// [`PatternSource::Single`]; this is what serde produces when the
    /// rules file maps a name to a plain string.
    pub fn compile<I>(raw: I) -> Result<Self, RuleError>
    where
        I: IntoIterator<Item = (String, PatternSource)>,
    {
        let mut rules: Vec<Rule> = Vec::new();

        for (name, source) in raw {
            if rules.iter().any(|r| r.name.as_ref() == name) {
                return Err(RuleError::DuplicateRule { name });
            }

            let patterns = source.into_patterns();
            if patterns.is_empty() {
                return Err(RuleError::EmptyRule { name });
            }

            let compiled = patterns
                .iter()
                .map(|pattern| {
                    Regex::new(pattern).map_err(|err| RuleError::InvalidPattern {
                        name: name.clone(),
                        source: err,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            rules.push(Rule {
                name: Arc::from(name.as_str()),
                patterns: compiled,
            });
        }

        Ok(Self { rules })
    }

    /// Loads and compiles a rule set from a YAML rules file.
    ///
    /// The file is a mapping from rule name to a pattern string or a list
    /// of pattern strings. An empty file yields an empty set.
    pub fn load(path: &Path) -> Result<Self, SiftError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mapping: Option<Mapping> =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let mut raw = Vec::new();
        for (key, value) in mapping.unwrap_or_default() {
            let name = match key {
                Value::String(name) => name,
                other => {
                    return Err(RuleError::InvalidName {
                        found: format!("{other:?}"),
                    }
                    .into());
                }
            };
            let source = serde_yaml::from_value::<PatternSource>(value)
                .map_err(|_| RuleError::InvalidShape { name: name.clone() })?;
            raw.push((name, source));
        }

        Ok(Self::compile(raw)?)
    }

    /// Returns all rules in declaration order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Looks up a rule's patterns by name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&[Regex]> {
        self.rules
            .iter()
            .find(|r| r.name.as_ref() == name)
            .map(|r| r.patterns.as_slice())
    }

    /// Returns `true` if a rule with the given name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Returns the number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if the set contains no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
