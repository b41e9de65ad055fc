//! Reference types read from legacy descriptors and lock files.
//!
//! Values are kept exactly as they were written in the legacy files. Nothing
//! here normalizes paths, validates versions, or deduplicates entries.

use serde::{Deserialize, Serialize};

/// An external package pinned by a legacy lock file.
///
/// Duplicates are legal and preserved in source order.
///
/// # Examples
///
/// ```
/// use nsm_core::PackageReference;
///
/// let package = PackageReference::new("Newtonsoft.Json", "13.0.1");
/// assert_eq!(package.name, "Newtonsoft.Json");
/// assert_eq!(package.to_string(), "Newtonsoft.Json 13.0.1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageReference {
    /// Package identifier (`id` attribute).
    pub name: String,
    /// Pinned version, verbatim (`version` attribute).
    pub version: String,
}

impl PackageReference {
    /// Creates a new package reference.
    #[inline]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl std::fmt::Display for PackageReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

/// A reference to another project, as declared in a legacy descriptor.
///
/// The path is copied verbatim: it is neither normalized nor checked for
/// existence, and keeps whatever separators the legacy file used.
///
/// # Examples
///
/// ```
/// use nsm_core::ProjectReference;
///
/// let reference = ProjectReference::new(r"..\Lib\Lib.csproj");
/// assert_eq!(reference.as_str(), r"..\Lib\Lib.csproj");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectReference(pub String);

impl ProjectReference {
    /// Creates a new project reference.
    #[inline]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Returns the declared path.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProjectReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProjectReference {
    #[inline]
    fn from(path: &str) -> Self {
        Self(path.to_owned())
    }
}
