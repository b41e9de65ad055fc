//! Error types for the nsm-core crate.
//!
//! This module provides [`ConfigError`] for configuration loading and
//! validation, and [`ErrorKind`], the stable classification every migration
//! failure in the workspace maps onto.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// Errors that can occur during configuration loading and validation.
///
/// # Examples
///
/// ```
/// use nsm_core::ConfigError;
/// use camino::Utf8PathBuf;
///
/// let error = ConfigError::MissingDirectory(Utf8PathBuf::from("/some/path"));
/// assert!(error.to_string().contains("/some/path"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The provided path is invalid or malformed.
    #[error("invalid path '{path}': {reason}")]
    InvalidPath {
        /// The invalid path.
        path: Utf8PathBuf,
        /// Explanation of why the path is invalid.
        reason: String,
    },

    /// A required directory does not exist.
    #[error("missing required directory: {0}")]
    MissingDirectory(Utf8PathBuf),

    /// A configuration option has an invalid value.
    #[error("invalid configuration option '{option}': {reason}")]
    InvalidOption {
        /// The name of the invalid option.
        option: String,
        /// Explanation of why the option is invalid.
        reason: String,
    },

    /// An I/O error occurred while reading configuration.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    /// Creates a new [`ConfigError::InvalidOption`] error.
    #[inline]
    pub fn invalid_option(option: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.into(),
            reason: reason.into(),
        }
    }
}

/// Classification of a failed migration.
///
/// Every error raised while migrating a solution maps onto exactly one kind.
/// All kinds are fatal: the project being migrated is abandoned and the run
/// stops.
///
/// # Examples
///
/// ```
/// use nsm_core::ErrorKind;
///
/// assert_eq!(
///     ErrorKind::AmbiguousOrMissingDescriptor.label(),
///     "ambiguous or missing descriptor"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ErrorKind {
    /// Zero or several legacy descriptors in a project directory.
    AmbiguousOrMissingDescriptor,
    /// Several legacy lock files in a project directory.
    AmbiguousLockFile,
    /// The legacy descriptor is not well-formed markup.
    MalformedDescriptor,
    /// The legacy lock file is not well-formed markup.
    MalformedLockFile,
    /// A parsed element lacks a required attribute.
    MissingExpectedAttribute,
    /// A read, write, or delete failed at the OS level.
    FileSystemFailure,
    /// The directory walk itself failed.
    Discovery,
    /// The configuration is unusable.
    Configuration,
}

impl ErrorKind {
    /// Returns a human-readable label for this kind.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AmbiguousOrMissingDescriptor => "ambiguous or missing descriptor",
            Self::AmbiguousLockFile => "ambiguous lock file",
            Self::MalformedDescriptor => "malformed descriptor",
            Self::MalformedLockFile => "malformed lock file",
            Self::MissingExpectedAttribute => "missing expected attribute",
            Self::FileSystemFailure => "file system failure",
            Self::Discovery => "discovery failure",
            Self::Configuration => "configuration error",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
