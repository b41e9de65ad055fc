//! Configuration structures for the nsm migrator.
//!
//! The fixed conventions of a legacy solution (file names, platform tables,
//! output SDK) live here as immutable configuration rather than process-wide
//! constants:
//!
//! - [`PlatformConfig`] - Target platform tables and the tests-folder name
//! - [`ArtifactConfig`] - Names of the legacy files and directories
//! - [`OutputConfig`] - Shape of the generated descriptor
//! - [`DiscoveryConfig`] - Directory walking and parallelism
//! - [`Config`] - Root configuration combining all settings
//!
//! All types implement [`Default`] with the conventions of a classic .NET
//! Framework solution, and every section is `#[serde(default)]` so a JSON file
//! only needs to mention what it overrides.

use std::fs;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Target platform tables used by [`PlatformSelector`](crate::PlatformSelector).
///
/// # Examples
///
/// ```
/// use nsm_core::PlatformConfig;
///
/// let config = PlatformConfig::default();
/// assert_eq!(config.tests_folder_name, "tests");
/// assert_eq!(config.tests_platforms, vec!["net5.0"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Directory name that marks a test project.
    pub tests_folder_name: String,

    /// Platforms for ordinary projects, in output order.
    pub default_platforms: Vec<String>,

    /// Platforms for projects under the tests folder, in output order.
    pub tests_platforms: Vec<String>,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            tests_folder_name: "tests".to_owned(),
            default_platforms: vec![
                "netstandard2.0".to_owned(),
                "netstandard2.1".to_owned(),
                "net461".to_owned(),
                "net5.0".to_owned(),
            ],
            tests_platforms: vec!["net5.0".to_owned()],
        }
    }
}

/// Names of the legacy artifacts found in a project directory.
///
/// # Examples
///
/// ```
/// use nsm_core::ArtifactConfig;
///
/// let config = ArtifactConfig::default();
/// assert_eq!(config.descriptor_extension, "csproj");
/// assert_eq!(config.lock_file_name, "packages.config");
/// assert_eq!(config.build_metadata_dir, "Properties");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    /// Extension of legacy descriptor files, without the dot.
    pub descriptor_extension: String,

    /// File name of the legacy dependency-lock file.
    pub lock_file_name: String,

    /// Name of the legacy build-metadata directory removed after migration.
    pub build_metadata_dir: String,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            descriptor_extension: "csproj".to_owned(),
            lock_file_name: "packages.config".to_owned(),
            build_metadata_dir: "Properties".to_owned(),
        }
    }
}

/// Shape of the generated descriptor.
///
/// # Examples
///
/// ```
/// use nsm_core::OutputConfig;
///
/// let config = OutputConfig::default();
/// assert_eq!(config.sdk, "Microsoft.NET.Sdk");
/// assert_eq!(config.extension, "csproj");
/// assert!(!config.escape_values);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Value of the `Sdk` attribute on the root element.
    pub sdk: String,

    /// Extension of the written descriptor, without the dot.
    ///
    /// When equal to [`ArtifactConfig::descriptor_extension`] the legacy
    /// descriptor is overwritten in place.
    pub extension: String,

    /// Escape `&`, `<`, `>` and `"` in names, versions, and paths.
    ///
    /// Off by default: legacy values are copied verbatim.
    pub escape_values: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            sdk: "Microsoft.NET.Sdk".to_owned(),
            extension: "csproj".to_owned(),
            escape_values: false,
        }
    }
}

/// Directory walking and parallelism settings.
///
/// # Examples
///
/// ```
/// use nsm_core::DiscoveryConfig;
///
/// let config = DiscoveryConfig::default();
/// assert_eq!(config.max_parallel_jobs, 1);
/// assert!(config.skip_dirs.contains(&"obj".to_owned()));
/// assert!(!config.respect_ignore_files);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Directory names never descended into.
    ///
    /// Defaults to build output and tool state only. Any other name could be
    /// a real project directory.
    pub skip_dirs: Vec<String>,

    /// Whether to follow symbolic links.
    pub follow_links: bool,

    /// Whether `.gitignore`, `.ignore` and hidden-file rules apply.
    ///
    /// Off by default: ignore files list build folders such as `Logs/` or
    /// `Release/` that may hold projects.
    pub respect_ignore_files: bool,

    /// Number of projects migrated concurrently. `1` is fully sequential.
    pub max_parallel_jobs: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            skip_dirs: vec![
                "bin".to_owned(),
                "obj".to_owned(),
                ".git".to_owned(),
                ".vs".to_owned(),
            ],
            follow_links: false,
            respect_ignore_files: false,
            max_parallel_jobs: 1,
        }
    }
}

/// Root configuration for the migrator.
///
/// # Examples
///
/// ```
/// use nsm_core::Config;
///
/// let config = Config::default();
/// assert!(config.validate().is_ok());
///
/// let json = serde_json::to_string_pretty(&config).unwrap();
/// assert!(json.contains("packages.config"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Platform selection tables.
    pub platforms: PlatformConfig,

    /// Legacy artifact names.
    pub artifacts: ArtifactConfig,

    /// Generated descriptor settings.
    pub output: OutputConfig,

    /// Directory walking settings.
    pub discovery: DiscoveryConfig,
}

impl Config {
    /// Loads a configuration from a JSON file and validates it.
    ///
    /// Missing fields fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Parse`] if it is not valid JSON, or
    /// [`ConfigError::InvalidOption`] if validation fails.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration can drive a migration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] naming the first offending option.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_platforms("platforms.default_platforms", &self.platforms.default_platforms)?;
        validate_platforms("platforms.tests_platforms", &self.platforms.tests_platforms)?;
        validate_name("platforms.tests_folder_name", &self.platforms.tests_folder_name)?;
        validate_name(
            "artifacts.descriptor_extension",
            &self.artifacts.descriptor_extension,
        )?;
        validate_name("artifacts.lock_file_name", &self.artifacts.lock_file_name)?;
        validate_name("artifacts.build_metadata_dir", &self.artifacts.build_metadata_dir)?;
        validate_name("output.extension", &self.output.extension)?;

        if self.output.sdk.trim().is_empty() {
            return Err(ConfigError::invalid_option("output.sdk", "must not be empty"));
        }
        if self.discovery.max_parallel_jobs == 0 {
            return Err(ConfigError::invalid_option(
                "discovery.max_parallel_jobs",
                "must be at least 1",
            ));
        }

        Ok(())
    }

    /// Checks that `root` exists and is a directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDirectory`] or [`ConfigError::InvalidPath`].
    pub fn validate_root(root: &Utf8Path) -> Result<(), ConfigError> {
        if root.as_str().trim().is_empty() {
            return Err(ConfigError::InvalidPath {
                path: root.to_owned(),
                reason: "path is empty".to_owned(),
            });
        }
        if !root.exists() {
            return Err(ConfigError::MissingDirectory(root.to_owned()));
        }
        if !root.is_dir() {
            return Err(ConfigError::InvalidPath {
                path: root.to_owned(),
                reason: "not a directory".to_owned(),
            });
        }
        Ok(())
    }
}

fn validate_platforms(option: &str, platforms: &[String]) -> Result<(), ConfigError> {
    if platforms.is_empty() {
        return Err(ConfigError::invalid_option(option, "must list at least one platform"));
    }
    // Identifiers are joined with ';' in the output.
    if let Some(bad) = platforms
        .iter()
        .find(|p| p.trim().is_empty() || p.contains(';'))
    {
        return Err(ConfigError::invalid_option(
            option,
            format!("invalid platform identifier '{bad}'"),
        ));
    }
    Ok(())
}

fn validate_name(option: &str, name: &str) -> Result<(), ConfigError> {
    if name.trim().is_empty() {
        return Err(ConfigError::invalid_option(option, "must not be empty"));
    }
    if name.contains(['/', '\\']) {
        return Err(ConfigError::invalid_option(
            option,
            "must be a plain name without path separators",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_platform_config_defaults() {
        let config = PlatformConfig::default();
        assert_eq!(
            config.default_platforms,
            vec!["netstandard2.0", "netstandard2.1", "net461", "net5.0"]
        );
        assert_eq!(config.tests_platforms, vec!["net5.0"]);
        assert_eq!(config.tests_folder_name, "tests");
    }

    #[test]
    fn test_discovery_defaults_hide_no_project_names() {
        let config = DiscoveryConfig::default();
        assert_eq!(config.skip_dirs, vec!["bin", "obj", ".git", ".vs"]);
        assert!(!config.respect_ignore_files);
        assert!(!config.follow_links);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_config_deserialize_with_missing_fields() {
        let json = r#"{"output": {"sdk": "Microsoft.NET.Sdk.Web"}}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.output.sdk, "Microsoft.NET.Sdk.Web");
        assert_eq!(config.output.extension, "csproj");
        assert_eq!(config.artifacts.lock_file_name, "packages.config");
        assert_eq!(config.discovery.max_parallel_jobs, 1);
    }

    #[test]
    fn test_validate_rejects_empty_platforms() {
        let mut config = Config::default();
        config.platforms.tests_platforms.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("platforms.tests_platforms"));
    }

    #[test]
    fn test_validate_rejects_semicolon_in_platform() {
        let mut config = Config::default();
        config.platforms.default_platforms = vec!["net48;net5.0".to_owned()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_jobs() {
        let mut config = Config::default();
        config.discovery.max_parallel_jobs = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_parallel_jobs"));
    }

    #[test]
    fn test_validate_rejects_separator_in_names() {
        let mut config = Config::default();
        config.artifacts.build_metadata_dir = "a/b".to_owned();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"discovery": {{"max_parallel_jobs": 4}}}}"#).unwrap();
        let path = Utf8Path::from_path(file.path()).unwrap();

        let config = Config::load(path).unwrap();
        assert_eq!(config.discovery.max_parallel_jobs, 4);
        assert_eq!(config.platforms, PlatformConfig::default());
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let path = Utf8Path::from_path(file.path()).unwrap();

        assert!(matches!(Config::load(path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_validate_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        assert!(Config::validate_root(root).is_ok());

        let missing = root.join("missing");
        assert!(matches!(
            Config::validate_root(&missing),
            Err(ConfigError::MissingDirectory(_))
        ));
        assert!(matches!(
            Config::validate_root(Utf8Path::new("")),
            Err(ConfigError::InvalidPath { .. })
        ));
    }
}
