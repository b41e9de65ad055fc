//! Error types for the nsm-legacy crate.
//!
//! This module provides the [`LegacyError`] type for errors that can occur
//! while reading legacy descriptors and lock files.

use camino::{Utf8Path, Utf8PathBuf};
use nsm_core::ErrorKind;

/// Errors that can occur while reading legacy project files.
///
/// Every variant carries the path of the file being read so the failure can
/// be reported against its project.
///
/// # Examples
///
/// ```
/// use nsm_legacy::LegacyError;
/// use nsm_core::ErrorKind;
///
/// fn describe(err: &LegacyError) -> &'static str {
///     match err.kind() {
///         ErrorKind::MalformedDescriptor => "descriptor is not XML",
///         ErrorKind::MalformedLockFile => "lock file is not XML",
///         ErrorKind::MissingExpectedAttribute => "attribute missing",
///         _ => "I/O failure",
///     }
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum LegacyError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// The file that couldn't be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The legacy descriptor is not well-formed XML.
    #[error("malformed descriptor {path}: {source}")]
    MalformedDescriptor {
        /// The descriptor path.
        path: Utf8PathBuf,
        /// The underlying XML error.
        #[source]
        source: roxmltree::Error,
    },

    /// The legacy lock file is not well-formed XML.
    #[error("malformed lock file {path}: {source}")]
    MalformedLockFile {
        /// The lock file path.
        path: Utf8PathBuf,
        /// The underlying XML error.
        #[source]
        source: roxmltree::Error,
    },

    /// A selected element lacks an attribute the reader needs.
    #[error("{path}:{line}: <{element}> is missing the '{attribute}' attribute")]
    MissingAttribute {
        /// The file containing the element.
        path: Utf8PathBuf,
        /// The element's local name.
        element: String,
        /// The missing attribute.
        attribute: &'static str,
        /// 1-based line of the element.
        line: u32,
    },
}

impl LegacyError {
    /// Creates a new [`LegacyError::Read`] error.
    #[inline]
    pub fn read(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Returns the [`ErrorKind`] this error is reported as.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Read { .. } => ErrorKind::FileSystemFailure,
            Self::MalformedDescriptor { .. } => ErrorKind::MalformedDescriptor,
            Self::MalformedLockFile { .. } => ErrorKind::MalformedLockFile,
            Self::MissingAttribute { .. } => ErrorKind::MissingExpectedAttribute,
        }
    }

    /// Returns the file this error is about.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        match self {
            Self::Read { path, .. }
            | Self::MalformedDescriptor { path, .. }
            | Self::MalformedLockFile { path, .. }
            | Self::MissingAttribute { path, .. } => path,
        }
    }
}
