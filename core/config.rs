use crate::error::{AppError, Result};
use log;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILENAME: &str = "codedump.toml";
pub const DEFAULT_FORMAT: &str = "txt";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub filters: FiltersConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub secrets: SecretsConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
    #[serde(default)]
    pub base_name: Option<String>,
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,
    /// Bundle the reports and extracted sources into `<base>.zip`.
    #[serde(default = "default_false")]
    pub archive: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FiltersConfig {
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
    #[serde(default = "default_true")]
    pub use_builtin_ignores: bool,
    #[serde(default = "default_true")]
    pub use_ignore_file: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    /// Always write the condensed single-line variant of the txt/md output.
    #[serde(default = "default_false")]
    pub oneline: bool,
    #[serde(default = "default_true")]
    pub interactive: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SecretsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_false")]
    pub force: bool,
}

fn default_true() -> bool {
    true
}
fn default_false() -> bool {
    false
}
fn default_formats() -> Vec<String> {
    vec![DEFAULT_FORMAT.to_string()]
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            formats: default_formats(),
            base_name: None,
            directory: default_output_dir(),
            archive: default_false(),
        }
    }
}
impl Default for FiltersConfig {
    fn default() -> Self {
        Self {
            ignore_patterns: Vec::new(),
            use_builtin_ignores: default_true(),
            use_ignore_file: default_true(),
        }
    }
}
impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            oneline: default_false(),
            interactive: default_true(),
        }
    }
}
impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            force: default_false(),
        }
    }
}

impl Config {
    /// Resolves which config file to load: an explicit path must exist, the
    /// default file in `base_dir` is optional.
    pub fn resolve_config_path(
        base_dir: &Path,
        explicit: Option<&PathBuf>,
        disabled: bool,
    ) -> Result<Option<PathBuf>> {
        if disabled {
            log::debug!("Config file loading disabled.");
            return Ok(None);
        }
        if let Some(path) = explicit {
            if path.is_file() {
                return Ok(Some(path.clone()));
            }
            return Err(AppError::Config(format!(
                "Config file '{}' does not exist",
                path.display()
            )));
        }
        let default_path = base_dir.join(DEFAULT_CONFIG_FILENAME);
        if default_path.is_file() {
            log::debug!("Found default config file: {}", default_path.display());
            Ok(Some(default_path))
        } else {
            log::trace!("No config file at {}", default_path.display());
            Ok(None)
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        log::debug!("Loading config from {}", path.display());
        let raw = fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Config = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.output.formats.is_empty() {
            return Err(AppError::Config(
                "output.formats must list at least one format".to_string(),
            ));
        }
        Ok(())
    }

    /// Patterns added on top of the built-in set, with blanks removed.
    pub fn effective_ignore_patterns(&self) -> Vec<String> {
        self.filters
            .ignore_patterns
            .iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_empty_file() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.output.formats, vec!["txt".to_string()]);
        assert!(config.filters.use_builtin_ignores);
        assert!(config.report.interactive);
        assert!(!config.report.oneline);
    }

    #[test]
    fn parses_sections() {
        let raw = r#"
[output]
formats = ["json", "md"]
base_name = "snapshot"
directory = "out"
archive = true

[filters]
ignore_patterns = ["*.tmp", " ", "fixtures"]
use_ignore_file = false

[report]
oneline = true
"#;
        let config = Config::from_toml_str(raw).unwrap();
        assert_eq!(config.output.formats, vec!["json", "md"]);
        assert_eq!(config.output.base_name.as_deref(), Some("snapshot"));
        assert_eq!(config.output.directory, PathBuf::from("out"));
        assert!(config.output.archive);
        assert!(!config.filters.use_ignore_file);
        assert!(config.report.oneline);
        assert_eq!(config.effective_ignore_patterns(), vec!["*.tmp", "fixtures"]);
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = Config::from_toml_str("[output]\nfromats = [\"txt\"]\n").unwrap_err();
        assert!(matches!(err, AppError::TomlParse(_)));
    }

    #[test]
    fn rejects_empty_format_list() {
        let err = Config::from_toml_str("[output]\nformats = []\n").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Config::resolve_config_path(dir.path(), Some(&missing), false).is_err());
        assert_eq!(
            Config::resolve_config_path(dir.path(), None, false).unwrap(),
            None
        );
        fs::write(dir.path().join(DEFAULT_CONFIG_FILENAME), "").unwrap();
        assert!(
            Config::resolve_config_path(dir.path(), None, false)
                .unwrap()
                .is_some()
        );
        assert_eq!(
            Config::resolve_config_path(dir.path(), None, true).unwrap(),
            None
        );
    }
}
