//! Error types for the nsm-migrator crate.
//!
//! This module provides the [`MigrateError`] type for every failure that can
//! stop a migration run.

use std::fmt;
use std::path::PathBuf;

use camino::{Utf8Path, Utf8PathBuf};
use nsm_core::{ConfigError, ErrorKind};
use nsm_legacy::LegacyError;

/// A file-system operation that can fail during migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsOperation {
    /// Listing a directory.
    List,
    /// Deleting a file.
    Delete,
    /// Creating or writing a file.
    Write,
    /// Recursively deleting a directory.
    RemoveDir,
}

impl fmt::Display for FsOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::List => "list",
            Self::Delete => "delete",
            Self::Write => "write",
            Self::RemoveDir => "remove directory",
        })
    }
}

/// Errors that can occur while migrating a solution.
///
/// All of them are fatal: the project being migrated is abandoned and the
/// run stops. Errors raised for a specific project reach the caller wrapped
/// in [`MigrateError::Project`], so the originating directory is always
/// known.
///
/// # Examples
///
/// ```
/// use nsm_migrator::MigrateError;
/// use nsm_core::ErrorKind;
/// use camino::Utf8PathBuf;
///
/// let err = MigrateError::AmbiguousOrMissingDescriptor {
///     directory: Utf8PathBuf::from("src/App"),
///     extension: "csproj".to_owned(),
///     found: 2,
/// }
/// .in_project("src/App");
///
/// assert_eq!(err.kind(), ErrorKind::AmbiguousOrMissingDescriptor);
/// assert_eq!(err.project_directory().map(|d| d.as_str()), Some("src/App"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// Zero or several legacy descriptors in a project directory.
    #[error("expected exactly one legacy .{extension} descriptor in {directory}, found {found}")]
    AmbiguousOrMissingDescriptor {
        /// The project directory.
        directory: Utf8PathBuf,
        /// The descriptor extension searched for.
        extension: String,
        /// How many legacy descriptors were found.
        found: usize,
    },

    /// Several legacy lock files in a project directory.
    #[error("expected at most one {file_name} in {directory}, found {found}")]
    AmbiguousLockFile {
        /// The project directory.
        directory: Utf8PathBuf,
        /// The lock file name searched for.
        file_name: String,
        /// How many lock files were found.
        found: usize,
    },

    /// Reading a legacy descriptor or lock file failed.
    #[error(transparent)]
    Legacy(#[from] LegacyError),

    /// A file-system operation failed.
    #[error("failed to {operation} {path}: {source}")]
    FileSystem {
        /// The path being operated on.
        path: Utf8PathBuf,
        /// What was being done.
        operation: FsOperation,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Walking the solution directory failed.
    #[error("failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),

    /// A discovered path is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", _0.display())]
    NonUtf8Path(PathBuf),

    /// The configuration cannot drive a migration.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The worker pool for parallel migration could not be started.
    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// A failure attributed to one project directory.
    #[error("project {directory}: {source}")]
    Project {
        /// The project directory being migrated.
        directory: Utf8PathBuf,
        /// What went wrong.
        #[source]
        source: Box<MigrateError>,
    },
}

impl MigrateError {
    /// Creates a new [`MigrateError::FileSystem`] error.
    #[inline]
    pub fn fs(path: impl Into<Utf8PathBuf>, operation: FsOperation, source: std::io::Error) -> Self {
        Self::FileSystem {
            path: path.into(),
            operation,
            source,
        }
    }

    /// Attributes this error to `directory`.
    ///
    /// Errors already attributed to a project are returned unchanged.
    #[must_use]
    pub fn in_project(self, directory: impl Into<Utf8PathBuf>) -> Self {
        match self {
            Self::Project { .. } => self,
            other => Self::Project {
                directory: directory.into(),
                source: Box::new(other),
            },
        }
    }

    /// Returns the [`ErrorKind`] this error is reported as.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AmbiguousOrMissingDescriptor { .. } => ErrorKind::AmbiguousOrMissingDescriptor,
            Self::AmbiguousLockFile { .. } => ErrorKind::AmbiguousLockFile,
            Self::Legacy(e) => e.kind(),
            Self::FileSystem { .. } => ErrorKind::FileSystemFailure,
            Self::Walk(_) | Self::NonUtf8Path(_) => ErrorKind::Discovery,
            Self::Config(_) | Self::ThreadPool(_) => ErrorKind::Configuration,
            Self::Project { source, .. } => source.kind(),
        }
    }

    /// Returns the project directory this error is attributed to, if any.
    #[must_use]
    pub fn project_directory(&self) -> Option<&Utf8Path> {
        match self {
            Self::Project { directory, .. }
            | Self::AmbiguousOrMissingDescriptor { directory, .. }
            | Self::AmbiguousLockFile { directory, .. } => Some(directory),
            Self::Legacy(_)
            | Self::FileSystem { .. }
            | Self::Walk(_)
            | Self::NonUtf8Path(_)
            | Self::Config(_)
            | Self::ThreadPool(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_fs_error_display() {
        let err = MigrateError::fs(
            "App/packages.config",
            FsOperation::Delete,
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.kind(), ErrorKind::FileSystemFailure);
        assert!(err.to_string().starts_with("failed to delete App/packages.config"));
    }

    #[test]
    fn test_in_project_wraps_once() {
        let err = MigrateError::AmbiguousLockFile {
            directory: Utf8PathBuf::from("App"),
            file_name: "packages.config".to_owned(),
            found: 2,
        }
        .in_project("App")
        .in_project("Other");

        assert_eq!(err.project_directory().map(Utf8Path::as_str), Some("App"));
        assert_eq!(err.kind(), ErrorKind::AmbiguousLockFile);
        assert!(err.to_string().starts_with("project App: expected at most one"));
    }

    #[test]
    fn test_legacy_kind_passes_through() {
        let err: MigrateError = LegacyError::MissingAttribute {
            path: Utf8PathBuf::from("App/packages.config"),
            element: "package".to_owned(),
            attribute: "id",
            line: 2,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::MissingExpectedAttribute);
        assert!(err.project_directory().is_none());
    }

    #[test]
    fn test_config_kind() {
        let err: MigrateError = ConfigError::MissingDirectory(Utf8PathBuf::from("/nope")).into();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
