use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::suffix::SuffixPolicy;

/// Scan configuration loaded from `config.yml`.
///
/// All fields are optional and default to permissive values (scan
/// everything, no size bound). A missing config file yields the default
/// configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Extensions to skip, as `|`-joined strings or a list of them.
    #[serde(rename = "excludeSuffix")]
    pub exclude_suffix: SuffixList,

    /// Extensions always scanned, overriding the exclude list.
    #[serde(rename = "includeSuffix")]
    pub include_suffix: SuffixList,

    /// Maximum file size in bytes. Larger files are skipped.
    #[serde(rename = "maxFileSize")]
    pub max_file_size: Option<u64>,
}

impl ScanConfig {
    /// Loads configuration from a YAML file.
    ///
    /// Returns the default configuration if the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_yaml_at(path, &content)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Self::from_yaml_at(Path::new("<inline>"), content)
    }

    fn from_yaml_at(path: &Path, content: &str) -> Result<Self, ConfigError> {
        let parsed: Option<Self> = serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(parsed.unwrap_or_default())
    }

    /// Builds the suffix policy from the flattened exclude/include lists.
    #[must_use]
    pub fn suffix_policy(&self) -> SuffixPolicy {
        SuffixPolicy::new(self.exclude_suffix.flatten(), self.include_suffix.flatten())
    }
}

/// A suffix list as written in `config.yml`: one `|`-joined string or a
/// sequence of such strings, flattened uniformly.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SuffixList {
    /// A single delimiter-joined string, e.g. `"png|jpg|gif"`.
    Joined(String),
    /// A sequence of delimiter-joined strings.
    Many(Vec<String>),
}

impl Default for SuffixList {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl SuffixList {
    /// Splits every entry on `|`, keeping empty segments literally.
    #[must_use]
    pub fn flatten(&self) -> Vec<String> {
        match self {
            Self::Joined(joined) => split_suffixes(joined),
            Self::Many(entries) => entries.iter().flat_map(|entry| split_suffixes(entry)).collect(),
        }
    }
}

fn split_suffixes(joined: &str) -> Vec<String> {
    joined.split('|').map(str::to_string).collect()
}

/// Errors that can occur when reading or parsing a YAML configuration
/// or rules file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read from disk.
    #[error("failed to read '{path}': {source}")]
    Read {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file contained invalid YAML or unexpected values.
    #[error("failed to parse '{path}': {source}")]
    Parse {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// The underlying YAML deserialization error.
        #[source]
        source: serde_yaml::Error,
    },
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn default_config_scans_everything() {
        let config = ScanConfig::default();
        assert!(config.exclude_suffix.flatten().is_empty());
        assert!(config.include_suffix.flatten().is_empty());
        assert!(config.max_file_size.is_none());
    }

    #[test]
    fn from_yaml_parses_joined_suffix_string() {
        let config = ScanConfig::from_yaml("excludeSuffix: 'png|jpg|gif'").unwrap();
        assert_eq!(config.exclude_suffix.flatten(), vec!["png", "jpg", "gif"]);
    }

    #[test]
    fn from_yaml_parses_suffix_sequence() {
        let config = ScanConfig::from_yaml("excludeSuffix:\n  - png\n  - 'jpg|gif'").unwrap();
        assert_eq!(config.exclude_suffix.flatten(), vec!["png", "jpg", "gif"]);
    }

    #[test]
    fn from_yaml_parses_include_suffix() {
        let config = ScanConfig::from_yaml("includeSuffix: 'env|conf'").unwrap();
        assert_eq!(config.include_suffix.flatten(), vec!["env", "conf"]);
    }

    #[test]
    fn from_yaml_parses_max_file_size() {
        let config = ScanConfig::from_yaml("maxFileSize: 1048576").unwrap();
        assert_eq!(config.max_file_size, Some(1_048_576));
    }

    #[test]
    fn from_yaml_returns_defaults_for_empty_string() {
        let config = ScanConfig::from_yaml("").unwrap();
        assert!(config.exclude_suffix.flatten().is_empty());
        assert!(config.max_file_size.is_none());
    }

    #[test]
    fn from_yaml_rejects_malformed_yaml() {
        let result = ScanConfig::from_yaml("excludeSuffix: [unterminated");
        assert!(result.is_err());
    }

    #[test]
    fn flatten_keeps_empty_segments_literally() {
        let list = SuffixList::Joined(String::new());
        assert_eq!(list.flatten(), vec![String::new()]);

        let list = SuffixList::Joined("a||b".to_string());
        assert_eq!(list.flatten(), vec!["a", "", "b"]);
    }

    #[test]
    fn load_returns_default_when_file_missing() {
        let config = ScanConfig::load(Path::new("/nonexistent/config.yml")).unwrap();
        assert!(config.exclude_suffix.flatten().is_empty());
    }

    #[test]
    fn load_parses_existing_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "excludeSuffix: 'png|jpg'").unwrap();
        writeln!(file, "maxFileSize: 500").unwrap();

        let config = ScanConfig::load(file.path()).unwrap();

        assert_eq!(config.exclude_suffix.flatten(), vec!["png", "jpg"]);
        assert_eq!(config.max_file_size, Some(500));
    }

    #[test]
    fn suffix_policy_reflects_both_lists() {
        let config = ScanConfig::from_yaml("excludeSuffix: 'env|png'\nincludeSuffix: env").unwrap();
        let policy = config.suffix_policy();

        assert!(policy.should_skip(Path::new("a.png")));
        assert!(!policy.should_skip(Path::new("a.env")));
        assert!(!policy.should_skip(Path::new("a.txt")));
    }

    #[test]
    fn config_error_includes_path_in_display() {
        let error = ConfigError::Read {
            path: PathBuf::from("/etc/sift/config.yml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        };
        assert!(error.to_string().contains("/etc/sift/config.yml"));
    }
}
