//! Fast hash set type aliases.
//!
//! Discovery deduplicates project directories by path, which is a string-keyed
//! workload where the Fx hash from `rustc-hash` outperforms the std `SipHash`.
//! Nothing here is exposed to untrusted input, so DoS resistance is not needed.
//!
//! # Examples
//!
//! ```
//! use nsm_core::{FxHashSet, fx_hash_set};
//!
//! let mut seen: FxHashSet<&str> = fx_hash_set();
//! assert!(seen.insert("src/Lib"));
//! assert!(!seen.insert("src/Lib"));
//! ```

/// A [`HashSet`](std::collections::HashSet) using the Fx hash algorithm.
pub type FxHashSet<V> = rustc_hash::FxHashSet<V>;

/// Creates a new empty [`FxHashSet`].
///
/// # Examples
///
/// ```
/// use nsm_core::fx_hash_set;
///
/// let set: nsm_core::FxHashSet<String> = fx_hash_set();
/// assert!(set.is_empty());
/// ```
#[inline]
#[must_use]
pub fn fx_hash_set<V>() -> FxHashSet<V> {
    FxHashSet::default()
}

/// Creates a new [`FxHashSet`] with room for at least `capacity` elements.
#[inline]
#[must_use]
pub fn fx_hash_set_with_capacity<V>(capacity: usize) -> FxHashSet<V> {
    FxHashSet::with_capacity_and_hasher(capacity, rustc_hash::FxBuildHasher)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fx_hash_set_dedupes_paths() {
        let mut set: FxHashSet<&str> = fx_hash_set();
        assert!(set.insert("src/Lib"));
        assert!(set.insert("src/App"));
        assert!(!set.insert("src/Lib"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_fx_hash_set_with_capacity() {
        let set: FxHashSet<String> = fx_hash_set_with_capacity(64);
        assert!(set.capacity() >= 64);
    }
}
