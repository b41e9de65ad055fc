//! The ordered target platform set written into a new descriptor.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Ordered target platform identifiers for one project.
///
/// Chosen once per project by [`PlatformSelector`](crate::PlatformSelector)
/// and never mutated afterwards. Order is output order.
///
/// # Memory Efficiency
///
/// Backed by a [`SmallVec`] sized for the default four-platform table, so
/// the common case never touches the heap for the list itself.
///
/// # Examples
///
/// ```
/// use nsm_core::TargetPlatformSet;
///
/// let set = TargetPlatformSet::from_slice(&["net461", "net5.0"]);
/// assert_eq!(set.joined(), "net461;net5.0");
/// assert_eq!(set.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetPlatformSet(SmallVec<[String; 4]>);

impl TargetPlatformSet {
    /// Builds a set from platform identifiers, keeping their order.
    #[must_use]
    pub fn from_slice<S: AsRef<str>>(platforms: &[S]) -> Self {
        Self(platforms.iter().map(|p| p.as_ref().to_owned()).collect())
    }

    /// Returns the identifiers joined with `;`, as they appear in a
    /// `TargetFrameworks` element.
    #[must_use]
    pub fn joined(&self) -> String {
        self.0.join(";")
    }

    /// Iterates over the identifiers in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Returns the number of identifiers.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the set is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the identifiers as a slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joined_keeps_order() {
        let set = TargetPlatformSet::from_slice(&["net5.0", "net461"]);
        assert_eq!(set.joined(), "net5.0;net461");
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["net5.0", "net461"]);
    }

    #[test]
    fn test_single_platform_has_no_separator() {
        let set = TargetPlatformSet::from_slice(&["net5.0"]);
        assert_eq!(set.joined(), "net5.0");
        assert!(!set.is_empty());
    }
}
