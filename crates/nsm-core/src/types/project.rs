//! Loaded legacy project data and migration state.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use super::reference::{PackageReference, ProjectReference};

/// Where a project is in its one-way migration.
///
/// A project moves `Unloaded → Loaded → Migrated` exactly once. Planning a
/// migration (a dry run) leaves it `Loaded`.
///
/// # Examples
///
/// ```
/// use nsm_core::ProjectState;
///
/// assert_eq!(ProjectState::Loaded.label(), "Loaded");
/// assert!(ProjectState::Migrated.is_terminal());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectState {
    /// Only the directory is known.
    #[default]
    Unloaded,
    /// Legacy artifacts have been located.
    Loaded,
    /// The new descriptor is written and legacy artifacts are removed.
    Migrated,
}

impl ProjectState {
    /// Returns `true` once no further transition is possible.
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Migrated)
    }

    /// Returns a human-readable label for this state.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unloaded => "Unloaded",
            Self::Loaded => "Loaded",
            Self::Migrated => "Migrated",
        }
    }
}

/// A legacy project with its references read from disk.
///
/// Built by a single load, never mutated, and dropped once the project has
/// been migrated. `package_references` is empty when the project has no lock
/// file.
///
/// # Examples
///
/// ```
/// use nsm_core::{LegacyProject, PackageReference};
/// use camino::Utf8PathBuf;
///
/// let project = LegacyProject {
///     directory: Utf8PathBuf::from("src/App"),
///     descriptor_path: Utf8PathBuf::from("src/App/App.csproj"),
///     lock_file_path: None,
///     project_references: Vec::new(),
///     package_references: vec![PackageReference::new("NUnit", "3.13.2")],
/// };
///
/// assert_eq!(project.name(), Some("App"));
/// assert!(!project.has_lock_file());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyProject {
    /// The project directory.
    pub directory: Utf8PathBuf,

    /// The legacy descriptor inside `directory`.
    pub descriptor_path: Utf8PathBuf,

    /// The legacy lock file, if the project has one.
    pub lock_file_path: Option<Utf8PathBuf>,

    /// Inter-project references in declaration order.
    pub project_references: Vec<ProjectReference>,

    /// Package references in declaration order.
    pub package_references: Vec<PackageReference>,
}

impl LegacyProject {
    /// Returns the project name (the descriptor's file stem).
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.descriptor_path.file_stem()
    }

    /// Returns `true` if a legacy lock file was found.
    #[inline]
    #[must_use]
    pub const fn has_lock_file(&self) -> bool {
        self.lock_file_path.is_some()
    }

    /// Returns the project directory.
    #[inline]
    #[must_use]
    pub fn directory(&self) -> &Utf8Path {
        &self.directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_state_transitions_labels() {
        assert_eq!(ProjectState::default(), ProjectState::Unloaded);
        assert!(!ProjectState::Loaded.is_terminal());
        assert_eq!(ProjectState::Migrated.label(), "Migrated");
    }

    #[test]
    fn test_legacy_project_name_from_descriptor() {
        let project = LegacyProject {
            directory: Utf8PathBuf::from("tests/Lib.Tests"),
            descriptor_path: Utf8PathBuf::from("tests/Lib.Tests/Lib.Tests.csproj"),
            lock_file_path: Some(Utf8PathBuf::from("tests/Lib.Tests/packages.config")),
            project_references: vec![ProjectReference::from("../../src/Lib/Lib.csproj")],
            package_references: Vec::new(),
        };
        assert_eq!(project.name(), Some("Lib.Tests"));
        assert!(project.has_lock_file());
        assert_eq!(project.directory().as_str(), "tests/Lib.Tests");
    }
}
