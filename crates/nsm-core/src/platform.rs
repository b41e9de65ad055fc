//! Target platform selection by directory convention.
//!
//! A project whose path runs through the tests folder (`tests` by default)
//! gets the reduced platform table; every other project gets the default
//! table. The rule only looks at the path string: the file system is never
//! consulted.

use camino::Utf8Path;

use crate::config::PlatformConfig;
use crate::types::TargetPlatformSet;

/// Chooses a project's [`TargetPlatformSet`] from its path.
///
/// Segments are split on both `/` and `\`, so Windows-style paths are
/// classified the same way on every host. The match is exact and
/// case-sensitive: `Tests` or `unit-tests` do not count.
///
/// # Examples
///
/// ```
/// use nsm_core::{PlatformConfig, PlatformSelector};
/// use camino::Utf8Path;
///
/// let selector = PlatformSelector::new(PlatformConfig::default());
///
/// let set = selector.select(Utf8Path::new("solution/tests/Lib.Tests"));
/// assert_eq!(set.joined(), "net5.0");
///
/// let set = selector.select(Utf8Path::new("solution/src/Lib"));
/// assert_eq!(set.joined(), "netstandard2.0;netstandard2.1;net461;net5.0");
/// ```
#[derive(Debug, Clone)]
pub struct PlatformSelector {
    config: PlatformConfig,
    default_set: TargetPlatformSet,
    tests_set: TargetPlatformSet,
}

impl PlatformSelector {
    /// Creates a selector over the given platform tables.
    #[must_use]
    pub fn new(config: PlatformConfig) -> Self {
        let default_set = TargetPlatformSet::from_slice(&config.default_platforms);
        let tests_set = TargetPlatformSet::from_slice(&config.tests_platforms);
        Self {
            config,
            default_set,
            tests_set,
        }
    }

    /// Returns the platform set for the project at `project_path`.
    #[must_use]
    pub fn select(&self, project_path: &Utf8Path) -> TargetPlatformSet {
        if self.is_test_project(project_path) {
            self.tests_set.clone()
        } else {
            self.default_set.clone()
        }
    }

    /// Returns `true` if `project_path` has a segment equal to the tests
    /// folder name.
    #[must_use]
    pub fn is_test_project(&self, project_path: &Utf8Path) -> bool {
        project_path
            .as_str()
            .split(['/', '\\'])
            .any(|segment| segment == self.config.tests_folder_name)
    }

    /// Returns the platform tables this selector was built from.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &PlatformConfig {
        &self.config
    }
}

impl Default for PlatformSelector {
    fn default() -> Self {
        Self::new(PlatformConfig::default())
    }
}
