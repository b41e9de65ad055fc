//! Migration statistics with atomic counters.
//!
//! This module provides [`MigrationStats`] for tracking a run (including one
//! spread over worker threads) and [`StatsSnapshot`] for point-in-time views.
//!
//! All counters use [`Relaxed`](std::sync::atomic::Ordering::Relaxed)
//! ordering: they are informational and never used for synchronization.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::project::ProjectOutcome;

/// Atomic counters for a migration run.
///
/// # Examples
///
/// ```
/// use nsm_migrator::MigrationStats;
///
/// let stats = MigrationStats::new();
/// stats.add_discovered(3);
/// stats.increment_failed();
///
/// let snapshot = stats.snapshot();
/// assert_eq!(snapshot.discovered, 3);
/// assert_eq!(snapshot.remaining(), 3);
/// ```
#[derive(Debug, Default)]
pub struct MigrationStats {
    /// Project directories found by discovery.
    discovered: AtomicU64,
    /// Projects fully migrated.
    migrated: AtomicU64,
    /// Projects whose migration failed.
    failed: AtomicU64,
    /// Project references written across all projects.
    project_references: AtomicU64,
    /// Package references written across all projects.
    package_references: AtomicU64,
    /// Legacy lock files deleted.
    lock_files_removed: AtomicU64,
    /// Build-metadata directories deleted.
    build_metadata_removed: AtomicU64,
}

impl MigrationStats {
    /// Creates a new [`MigrationStats`] with all counters at zero.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `count` discovered project directories.
    #[inline]
    pub fn add_discovered(&self, count: usize) {
        self.discovered.fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Increments the failure counter.
    #[inline]
    pub fn increment_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a successfully migrated project.
    pub fn record(&self, outcome: &ProjectOutcome) {
        self.migrated.fetch_add(1, Ordering::Relaxed);
        self.project_references
            .fetch_add(outcome.project_references as u64, Ordering::Relaxed);
        self.package_references
            .fetch_add(outcome.package_references as u64, Ordering::Relaxed);
        if outcome.removed_lock_file {
            self.lock_files_removed.fetch_add(1, Ordering::Relaxed);
        }
        if outcome.removed_build_metadata {
            self.build_metadata_removed.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Returns a point-in-time snapshot of all counters.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            discovered: self.discovered.load(Ordering::Relaxed),
            migrated: self.migrated.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            project_references: self.project_references.load(Ordering::Relaxed),
            package_references: self.package_references.load(Ordering::Relaxed),
            lock_files_removed: self.lock_files_removed.load(Ordering::Relaxed),
            build_metadata_removed: self.build_metadata_removed.load(Ordering::Relaxed),
        }
    }

    /// Resets all counters to zero.
    pub fn reset(&self) {
        self.discovered.store(0, Ordering::Relaxed);
        self.migrated.store(0, Ordering::Relaxed);
        self.failed.store(0, Ordering::Relaxed);
        self.project_references.store(0, Ordering::Relaxed);
        self.package_references.store(0, Ordering::Relaxed);
        self.lock_files_removed.store(0, Ordering::Relaxed);
        self.build_metadata_removed.store(0, Ordering::Relaxed);
    }
}

/// A point-in-time snapshot of migration statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Project directories found by discovery.
    pub discovered: u64,
    /// Projects fully migrated.
    pub migrated: u64,
    /// Projects whose migration failed.
    pub failed: u64,
    /// Project references written.
    pub project_references: u64,
    /// Package references written.
    pub package_references: u64,
    /// Legacy lock files deleted.
    pub lock_files_removed: u64,
    /// Build-metadata directories deleted.
    pub build_metadata_removed: u64,
}

impl StatsSnapshot {
    /// Returns the number of discovered projects not (yet) migrated.
    #[must_use]
    pub const fn remaining(&self) -> u64 {
        self.discovered.saturating_sub(self.migrated)
    }

    /// Returns `true` if every discovered project was migrated.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.failed == 0 && self.migrated == self.discovered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use nsm_core::TargetPlatformSet;

    fn outcome(lock: bool, metadata: bool) -> ProjectOutcome {
        ProjectOutcome {
            directory: Utf8PathBuf::from("App"),
            descriptor_path: Utf8PathBuf::from("App/App.csproj"),
            output_path: Utf8PathBuf::from("App/App.csproj"),
            platforms: TargetPlatformSet::from_slice(&["net5.0"]),
            project_references: 2,
            package_references: 3,
            removed_lock_file: lock,
            removed_build_metadata: metadata,
            replaced_in_place: true,
        }
    }

    #[test]
    fn test_record_accumulates() {
        let stats = MigrationStats::new();
        stats.add_discovered(2);
        stats.record(&outcome(true, false));
        stats.record(&outcome(false, true));

        let snap = stats.snapshot();
        assert_eq!(snap.migrated, 2);
        assert_eq!(snap.project_references, 4);
        assert_eq!(snap.package_references, 6);
        assert_eq!(snap.lock_files_removed, 1);
        assert_eq!(snap.build_metadata_removed, 1);
        assert!(snap.is_complete());
        assert_eq!(snap.remaining(), 0);
    }

    #[test]
    fn test_failure_is_not_complete() {
        let stats = MigrationStats::new();
        stats.add_discovered(1);
        stats.increment_failed();
        assert!(!stats.snapshot().is_complete());
    }

    #[test]
    fn test_reset() {
        let stats = MigrationStats::new();
        stats.add_discovered(5);
        stats.record(&outcome(true, true));
        stats.reset();
        assert_eq!(stats.snapshot(), StatsSnapshot::default());
    }
}
