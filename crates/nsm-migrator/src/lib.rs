//! Discovery and migration of legacy .NET solutions.
//!
//! This crate turns a directory tree of legacy project descriptors into
//! SDK-style ones. It finds the projects, parses them with `nsm-legacy`,
//! selects target platforms, writes the new descriptors and removes the
//! artifacts the SDK format no longer needs.
//!
//! # Overview
//!
//! The main entry point is [`SolutionMigrator`], which combines:
//!
//! - [`ProjectWalker`]: Recursive discovery of project directories
//! - [`ProjectMigrator`]: The per-project `Unloaded → Loaded → Migrated` machine
//! - [`DescriptorWriter`]: Rendering of the new descriptor
//! - [`MigrationStats`]: Atomic counters for progress reporting
//!
//! # Example
//!
//! ```no_run
//! use nsm_core::Config;
//! use nsm_migrator::SolutionMigrator;
//!
//! let migrator = SolutionMigrator::new("./solution", Config::default())?;
//! let report = migrator.migrate()?;
//! println!("Migrated {} projects", report.stats.migrated);
//! # Ok::<(), nsm_migrator::MigrateError>(())
//! ```
//!
//! # Streaming API
//!
//! [`SolutionMigrator::migrate_streaming`] runs the same migration while
//! publishing [`MigrationUpdate`]s, so a front end can show progress:
//!
//! ```ignore
//! use nsm_migrator::{MigrationUpdate, SolutionMigrator};
//! use tokio::sync::mpsc;
//!
//! let (tx, mut rx) = mpsc::channel(256);
//! let worker = migrator.clone();
//! let handle = tokio::task::spawn_blocking(move || worker.migrate_streaming(tx));
//!
//! while let Some(update) = rx.recv().await {
//!     match update {
//!         MigrationUpdate::ProjectsDiscovered(n) => println!("Found {n} projects"),
//!         MigrationUpdate::ProjectMigrated(outcome) => println!("{}", outcome.directory),
//!         MigrationUpdate::ProjectFailed { directory, kind } => println!("{directory}: {kind}"),
//!         MigrationUpdate::Complete(report) => println!("{} migrated", report.stats.migrated),
//!     }
//! }
//! handle.await??;
//! ```
//!
//! # Failure model
//!
//! Every error is fatal. The first failing project stops the run, and the
//! returned error is a [`MigrateError::Project`] naming its directory.
//! Projects migrated before the failure stay migrated; nothing is rolled back.

#![deny(clippy::all)]
#![warn(missing_docs)]

mod error;
mod project;
mod stats;
mod walker;
mod writer;

pub use error::{FsOperation, MigrateError};
pub use project::{LoadedProject, MigrationContext, ProjectMigrator, ProjectOutcome, ProjectPlan};
pub use stats::{MigrationStats, StatsSnapshot};
pub use walker::{ProjectWalker, list_files};
pub use writer::DescriptorWriter;

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use nsm_core::{Config, ErrorKind};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{error, info};

/// A solution root and the project directories found under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    /// The solution root directory.
    pub root: Utf8PathBuf,
    /// Project directories in discovery order, without duplicates.
    pub projects: Vec<Utf8PathBuf>,
}

impl Solution {
    /// Returns the number of project directories.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    /// Returns `true` if no project directory was found.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

/// Update sent during a streaming migration.
///
/// Updates arrive in this order:
/// 1. [`MigrationUpdate::ProjectsDiscovered`] once, after discovery
/// 2. [`MigrationUpdate::ProjectMigrated`] per project, or a single
///    [`MigrationUpdate::ProjectFailed`] that ends the run
/// 3. [`MigrationUpdate::Complete`] once, only if every project migrated
#[derive(Debug)]
pub enum MigrationUpdate {
    /// Number of project directories found.
    ProjectsDiscovered(usize),

    /// A project was migrated. Boxed to keep the enum small.
    ProjectMigrated(Box<ProjectOutcome>),

    /// A project failed and the run is stopping.
    ProjectFailed {
        /// The failing project directory.
        directory: Utf8PathBuf,
        /// What kind of failure it was.
        kind: ErrorKind,
    },

    /// The run finished.
    Complete(MigrationReport),
}

/// The result of a successful migration run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationReport {
    /// The solution root.
    pub root: Utf8PathBuf,
    /// Final statistics.
    pub stats: StatsSnapshot,
    /// Per-project outcomes in discovery order.
    pub projects: Vec<ProjectOutcome>,
}

/// Migrates every project under a solution root.
///
/// # Cloning
///
/// `SolutionMigrator` is cheaply cloneable. Clones share the same context
/// and statistics, so a clone can run on a blocking task while this one
/// reports progress.
#[derive(Debug, Clone)]
pub struct SolutionMigrator {
    /// Solution root directory.
    root: Utf8PathBuf,
    /// Configuration and per-run collaborators.
    context: Arc<MigrationContext>,
    /// Statistics counters.
    stats: Arc<MigrationStats>,
}

impl SolutionMigrator {
    /// Creates a migrator for the solution at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::Config`] if `root` is not an existing
    /// directory or the configuration is invalid.
    pub fn new(root: impl Into<Utf8PathBuf>, config: Config) -> Result<Self, MigrateError> {
        let root = root.into();
        Config::validate_root(&root)?;
        let context = MigrationContext::new(config)?;

        info!(
            root = %root,
            jobs = context.config().discovery.max_parallel_jobs,
            "Creating solution migrator"
        );

        Ok(Self {
            root,
            context: Arc::new(context),
            stats: Arc::new(MigrationStats::new()),
        })
    }

    /// Returns the solution root.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Returns the shared migration context.
    #[inline]
    #[must_use]
    pub fn context(&self) -> &MigrationContext {
        &self.context
    }

    /// Returns a snapshot of current statistics.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Finds every project directory under the root.
    ///
    /// File content is not inspected: a directory holding only an SDK-style
    /// descriptor is still listed, and fails when it is loaded.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::Walk`] or [`MigrateError::NonUtf8Path`] if
    /// traversal fails.
    pub fn discover(&self) -> Result<Solution, MigrateError> {
        let config = self.context.config();
        let walker = ProjectWalker::from_config(
            &self.root,
            &config.artifacts.descriptor_extension,
            &config.discovery,
        )?;
        let projects = walker.collect_project_dirs()?;

        info!(root = %self.root, count = projects.len(), "Discovered projects");

        Ok(Solution {
            root: self.root.clone(),
            projects,
        })
    }

    /// Migrates every project in the solution.
    ///
    /// # Errors
    ///
    /// Returns the first failure, wrapped in [`MigrateError::Project`] when
    /// it belongs to a project.
    pub fn migrate(&self) -> Result<MigrationReport, MigrateError> {
        self.run(None)
    }

    /// Migrates every project, streaming progress over `tx`.
    ///
    /// A dropped receiver does not stop the migration. Must not be called
    /// from an async context; use `tokio::task::spawn_blocking`.
    ///
    /// # Errors
    ///
    /// Same as [`migrate`](Self::migrate). The failure is also announced as
    /// [`MigrationUpdate::ProjectFailed`] when it belongs to a project.
    #[allow(clippy::needless_pass_by_value)] // Sender is shared with rayon threads by reference
    pub fn migrate_streaming(&self, tx: mpsc::Sender<MigrationUpdate>) -> Result<(), MigrateError> {
        let report = self.run(Some(&tx))?;
        // Receiver may be gone
        let _ = tx.blocking_send(MigrationUpdate::Complete(report));
        Ok(())
    }

    /// Computes the migration of every project without changing anything.
    ///
    /// # Errors
    ///
    /// Same discovery and fail-fast behavior as [`migrate`](Self::migrate).
    pub fn plan(&self) -> Result<Vec<ProjectPlan>, MigrateError> {
        let solution = self.discover()?;
        let context = self.context.as_ref();

        self.for_each_project(&solution.projects, |dir| {
            ProjectMigrator::new(context, dir).load()?.plan()
        })
    }

    fn run(
        &self,
        tx: Option<&mpsc::Sender<MigrationUpdate>>,
    ) -> Result<MigrationReport, MigrateError> {
        info!(root = %self.root, "Starting migration");
        self.stats.reset();

        let solution = self.discover()?;
        self.stats.add_discovered(solution.len());
        notify(tx, MigrationUpdate::ProjectsDiscovered(solution.len()));

        let context = self.context.as_ref();
        let projects = self.for_each_project(&solution.projects, |dir| {
            let result = ProjectMigrator::new(context, dir)
                .load()
                .and_then(LoadedProject::migrate);

            match &result {
                Ok(outcome) => {
                    self.stats.record(outcome);
                    notify(tx, MigrationUpdate::ProjectMigrated(Box::new(outcome.clone())));
                }
                Err(e) => {
                    self.stats.increment_failed();
                    error!(project = %dir, kind = %e.kind(), error = %e, "Project migration failed");
                    notify(
                        tx,
                        MigrationUpdate::ProjectFailed {
                            directory: dir.to_owned(),
                            kind: e.kind(),
                        },
                    );
                }
            }
            result
        })?;

        let stats = self.stats.snapshot();
        info!(
            migrated = stats.migrated,
            project_refs = stats.project_references,
            package_refs = stats.package_references,
            lock_files_removed = stats.lock_files_removed,
            "Migration completed"
        );

        Ok(MigrationReport {
            root: solution.root,
            stats,
            projects,
        })
    }

    /// Runs `step` for each project directory, stopping at the first error.
    ///
    /// Sequential with one job. With more, projects run on a dedicated
    /// rayon pool of that size; results still come back in discovery order.
    fn for_each_project<T, F>(&self, dirs: &[Utf8PathBuf], step: F) -> Result<Vec<T>, MigrateError>
    where
        T: Send,
        F: Fn(&Utf8Path) -> Result<T, MigrateError> + Sync,
    {
        let attributed = |dir: &Utf8PathBuf| step(dir.as_path()).map_err(|e| e.in_project(dir.clone()));

        let jobs = self.context.config().discovery.max_parallel_jobs;
        if jobs <= 1 {
            return dirs.iter().map(attributed).collect();
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .thread_name(|i| format!("nsm-worker-{i}"))
            .build()?;

        pool.install(|| dirs.par_iter().map(attributed).collect())
    }
}

fn notify(tx: Option<&mpsc::Sender<MigrationUpdate>>, update: MigrationUpdate) {
    if let Some(tx) = tx {
        // Progress is best effort
        let _ = tx.blocking_send(update);
    }
}
