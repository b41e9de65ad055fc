//! The per-project migration state machine.
//!
//! A project moves `Unloaded → Loaded → Migrated` exactly once. Each state is
//! its own type and every transition consumes the previous one:
//!
//! ```text
//! ProjectMigrator ──load()──▶ LoadedProject ──migrate()──▶ ProjectOutcome
//!                                   │
//!                                   └──plan()──▶ ProjectPlan (no changes)
//! ```
//!
//! Loading only locates the legacy artifacts. Their content is parsed when
//! the project is migrated or planned.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use nsm_core::{Config, LegacyProject, PlatformSelector, ProjectState, TargetPlatformSet};
use nsm_legacy::{DescriptorFormat, LegacyDescriptorReader, LegacyLockReader};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{FsOperation, MigrateError};
use crate::walker::{has_extension, list_files};
use crate::writer::DescriptorWriter;

/// Everything a project migration needs, built once per run.
///
/// Shared read-only by every project, including across worker threads.
#[derive(Debug)]
pub struct MigrationContext {
    config: Config,
    selector: PlatformSelector,
    writer: DescriptorWriter,
    descriptor_reader: LegacyDescriptorReader,
    lock_reader: LegacyLockReader,
}

impl MigrationContext {
    /// Creates a context from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::Config`] if the configuration is invalid.
    pub fn new(config: Config) -> Result<Self, MigrateError> {
        config.validate()?;

        Ok(Self {
            selector: PlatformSelector::new(config.platforms.clone()),
            writer: DescriptorWriter::new(&config.output),
            descriptor_reader: LegacyDescriptorReader::new(),
            lock_reader: LegacyLockReader::new(),
            config,
        })
    }

    /// Returns the configuration.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the platform selector.
    #[inline]
    #[must_use]
    pub const fn selector(&self) -> &PlatformSelector {
        &self.selector
    }

    /// Returns the descriptor writer.
    #[inline]
    #[must_use]
    pub const fn writer(&self) -> &DescriptorWriter {
        &self.writer
    }
}

/// A project directory that has not been looked at yet.
///
/// # Examples
///
/// ```no_run
/// use nsm_core::Config;
/// use nsm_migrator::{MigrationContext, ProjectMigrator};
///
/// let context = MigrationContext::new(Config::default())?;
/// let outcome = ProjectMigrator::new(&context, "solution/src/App")
///     .load()?
///     .migrate()?;
///
/// println!("{} -> {}", outcome.descriptor_path, outcome.platforms.joined());
/// # Ok::<(), nsm_migrator::MigrateError>(())
/// ```
#[derive(Debug)]
pub struct ProjectMigrator<'a> {
    context: &'a MigrationContext,
    directory: Utf8PathBuf,
}

impl<'a> ProjectMigrator<'a> {
    /// Creates a migrator for the project in `directory`.
    #[must_use]
    pub fn new(context: &'a MigrationContext, directory: impl Into<Utf8PathBuf>) -> Self {
        Self {
            context,
            directory: directory.into(),
        }
    }

    /// Returns the project directory.
    #[inline]
    #[must_use]
    pub fn directory(&self) -> &Utf8Path {
        &self.directory
    }

    /// Returns [`ProjectState::Unloaded`].
    #[inline]
    #[must_use]
    pub const fn state(&self) -> ProjectState {
        ProjectState::Unloaded
    }

    /// Locates the legacy descriptor and lock file.
    ///
    /// Descriptors that are already SDK-style are not counted, so a
    /// directory that was migrated before has no legacy descriptor left.
    ///
    /// # Errors
    ///
    /// - [`MigrateError::AmbiguousOrMissingDescriptor`] unless exactly one
    ///   legacy descriptor is present
    /// - [`MigrateError::AmbiguousLockFile`] if more than one lock file is
    ///   present (names are compared ignoring ASCII case)
    /// - [`MigrateError::FileSystem`] or [`MigrateError::Legacy`] if the
    ///   directory or a descriptor cannot be read
    pub fn load(self) -> Result<LoadedProject<'a>, MigrateError> {
        let artifacts = &self.context.config.artifacts;

        let candidates = list_files(&self.directory, |name| {
            has_extension(Utf8Path::new(name), &artifacts.descriptor_extension)
        })?;

        let mut descriptors = Vec::with_capacity(candidates.len());
        for path in candidates {
            if DescriptorFormat::detect_file(&path)?.is_legacy() {
                descriptors.push(path);
            } else {
                debug!(project = %self.directory, descriptor = %path, "Skipping SDK-style descriptor");
            }
        }

        let found = descriptors.len();
        let Some(descriptor_path) = descriptors.pop().filter(|_| found == 1) else {
            return Err(MigrateError::AmbiguousOrMissingDescriptor {
                directory: self.directory,
                extension: artifacts.descriptor_extension.clone(),
                found,
            });
        };

        let mut lock_files = list_files(&self.directory, |name| {
            name.eq_ignore_ascii_case(&artifacts.lock_file_name)
        })?;
        if lock_files.len() > 1 {
            return Err(MigrateError::AmbiguousLockFile {
                directory: self.directory,
                file_name: artifacts.lock_file_name.clone(),
                found: lock_files.len(),
            });
        }
        let lock_file_path = lock_files.pop();

        debug!(
            project = %self.directory,
            descriptor = %descriptor_path,
            lock_file = ?lock_file_path.as_deref().map(Utf8Path::as_str),
            "Loaded project"
        );

        Ok(LoadedProject {
            context: self.context,
            directory: self.directory,
            descriptor_path,
            lock_file_path,
        })
    }
}

/// A project whose legacy artifacts have been located.
#[derive(Debug)]
pub struct LoadedProject<'a> {
    context: &'a MigrationContext,
    directory: Utf8PathBuf,
    descriptor_path: Utf8PathBuf,
    lock_file_path: Option<Utf8PathBuf>,
}

impl LoadedProject<'_> {
    /// Returns [`ProjectState::Loaded`].
    #[inline]
    #[must_use]
    pub const fn state(&self) -> ProjectState {
        ProjectState::Loaded
    }

    /// Returns the project directory.
    #[inline]
    #[must_use]
    pub fn directory(&self) -> &Utf8Path {
        &self.directory
    }

    /// Returns the legacy descriptor path.
    #[inline]
    #[must_use]
    pub fn descriptor_path(&self) -> &Utf8Path {
        &self.descriptor_path
    }

    /// Returns the lock file path, if the project has one.
    #[inline]
    #[must_use]
    pub fn lock_file_path(&self) -> Option<&Utf8Path> {
        self.lock_file_path.as_deref()
    }

    /// Returns where the new descriptor will be written.
    ///
    /// This is the legacy descriptor's path with the output extension. When
    /// the extensions match (ignoring ASCII case) the legacy path is reused
    /// as is, so the descriptor is replaced in place.
    #[must_use]
    pub fn output_path(&self) -> Utf8PathBuf {
        let extension = &self.context.config.output.extension;
        if has_extension(&self.descriptor_path, extension) {
            self.descriptor_path.clone()
        } else {
            self.descriptor_path.with_extension(extension)
        }
    }

    /// Returns the build-metadata directory path, whether or not it exists.
    #[must_use]
    pub fn build_metadata_path(&self) -> Utf8PathBuf {
        self.directory
            .join(&self.context.config.artifacts.build_metadata_dir)
    }

    /// Parses the legacy descriptor and lock file.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::Legacy`] if either file cannot be read or
    /// parsed.
    pub fn read(&self) -> Result<LegacyProject, MigrateError> {
        let project_references = self.context.descriptor_reader.load(&self.descriptor_path)?;
        let package_references = match &self.lock_file_path {
            Some(path) => self.context.lock_reader.load(path)?,
            None => Vec::new(),
        };

        Ok(LegacyProject {
            directory: self.directory.clone(),
            descriptor_path: self.descriptor_path.clone(),
            lock_file_path: self.lock_file_path.clone(),
            project_references,
            package_references,
        })
    }

    /// Computes what [`migrate`](Self::migrate) would do, without touching
    /// the file system.
    ///
    /// # Errors
    ///
    /// Same as [`read`](Self::read).
    pub fn plan(&self) -> Result<ProjectPlan, MigrateError> {
        let project = self.read()?;
        let platforms = self.context.selector.select(&project.directory);
        let content = self.context.writer.render(
            &platforms,
            &project.project_references,
            &project.package_references,
        );

        Ok(ProjectPlan {
            output_path: self.output_path(),
            platforms,
            content,
            removes_lock_file: project.has_lock_file(),
            removes_build_metadata: self.build_metadata_path().is_dir(),
            project,
        })
    }

    /// Writes the new descriptor and removes the legacy artifacts.
    ///
    /// Steps run strictly in order: parse, write the new descriptor, delete
    /// the legacy descriptor if it was not overwritten, delete the
    /// build-metadata directory, delete the lock file. A failure stops at
    /// that step; nothing is rolled back.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::Legacy`] for parse failures and
    /// [`MigrateError::FileSystem`] for write or delete failures.
    pub fn migrate(self) -> Result<ProjectOutcome, MigrateError> {
        let project = self.read()?;
        let platforms = self.context.selector.select(&project.directory);
        let output_path = self.output_path();

        self.context.writer.write(
            &output_path,
            &platforms,
            &project.project_references,
            &project.package_references,
        )?;

        let replaced_in_place = output_path == project.descriptor_path;
        if !replaced_in_place {
            fs::remove_file(&project.descriptor_path)
                .map_err(|e| MigrateError::fs(&project.descriptor_path, FsOperation::Delete, e))?;
        }

        let metadata_dir = self.build_metadata_path();
        let removed_build_metadata = metadata_dir.is_dir();
        if removed_build_metadata {
            fs::remove_dir_all(&metadata_dir)
                .map_err(|e| MigrateError::fs(&metadata_dir, FsOperation::RemoveDir, e))?;
            debug!(project = %self.directory, path = %metadata_dir, "Removed build metadata");
        }

        let removed_lock_file = match &project.lock_file_path {
            Some(path) => {
                fs::remove_file(path).map_err(|e| MigrateError::fs(path, FsOperation::Delete, e))?;
                debug!(project = %self.directory, path = %path, "Removed lock file");
                true
            }
            None => false,
        };

        info!(
            project = %self.directory,
            platforms = %platforms.joined(),
            project_refs = project.project_references.len(),
            package_refs = project.package_references.len(),
            "Migrated project"
        );

        Ok(ProjectOutcome {
            directory: project.directory,
            descriptor_path: project.descriptor_path,
            output_path,
            platforms,
            project_references: project.project_references.len(),
            package_references: project.package_references.len(),
            removed_lock_file,
            removed_build_metadata,
            replaced_in_place,
        })
    }
}

/// The result of migrating one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectOutcome {
    /// The project directory.
    pub directory: Utf8PathBuf,
    /// The legacy descriptor that was migrated.
    pub descriptor_path: Utf8PathBuf,
    /// The new descriptor.
    pub output_path: Utf8PathBuf,
    /// The platforms written into the new descriptor.
    pub platforms: TargetPlatformSet,
    /// Number of project references written.
    pub project_references: usize,
    /// Number of package references written.
    pub package_references: usize,
    /// Whether a lock file was deleted.
    pub removed_lock_file: bool,
    /// Whether a build-metadata directory was deleted.
    pub removed_build_metadata: bool,
    /// Whether the new descriptor overwrote the legacy one.
    pub replaced_in_place: bool,
}

/// What migrating one project would do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPlan {
    /// The parsed legacy project.
    pub project: LegacyProject,
    /// Where the new descriptor would be written.
    pub output_path: Utf8PathBuf,
    /// The selected platforms.
    pub platforms: TargetPlatformSet,
    /// The rendered new descriptor.
    pub content: String,
    /// Whether a lock file would be deleted.
    pub removes_lock_file: bool,
    /// Whether a build-metadata directory would be deleted.
    pub removes_build_metadata: bool,
}
