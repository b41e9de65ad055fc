//! Directory traversal for legacy project descriptors.
//!
//! This module provides [`ProjectWalker`], which uses the `ignore` crate to
//! find every descriptor under a solution root, and [`list_files`], the
//! non-recursive listing used inside a single project directory.
//!
//! # Features
//!
//! - Matches descriptors by extension, ASCII case-insensitively
//! - Never descends into build output and tool directories (`bin`, `obj`, ...)
//! - Walks hidden and git-ignored directories unless ignore rules are enabled
//! - Converts matching paths to UTF-8 [`Utf8PathBuf`]; other files may have
//!   any name
//! - Yields entries sorted by file name, so runs are reproducible

use std::fs;
use std::path::Path;

use camino::{Utf8Path, Utf8PathBuf};
use ignore::WalkBuilder;
use nsm_core::{DiscoveryConfig, fx_hash_set_with_capacity};

use crate::error::{FsOperation, MigrateError};

/// A walker that discovers legacy descriptors in a solution tree.
///
/// # Examples
///
/// ```no_run
/// use nsm_migrator::ProjectWalker;
/// use camino::Utf8Path;
///
/// let walker = ProjectWalker::new(Utf8Path::new("./solution"), "csproj")?
///     .with_skip_dirs(&["artifacts"]);
///
/// for dir in walker.collect_project_dirs()? {
///     println!("Project: {dir}");
/// }
/// # Ok::<(), nsm_migrator::MigrateError>(())
/// ```
#[derive(Debug)]
pub struct ProjectWalker {
    /// The root directory to walk.
    root: Utf8PathBuf,
    /// Descriptor extension, without the dot.
    extension: String,
    /// Directory names never descended into.
    skip_dirs: Vec<String>,
    /// Whether to follow symbolic links.
    follow_links: bool,
    /// Whether ignore files and hidden-file rules apply.
    respect_ignore_files: bool,
}

impl ProjectWalker {
    /// Creates a new walker for descriptors with the given extension.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::Config`] if the root path doesn't exist or
    /// isn't a directory.
    pub fn new(root: &Utf8Path, extension: &str) -> Result<Self, MigrateError> {
        nsm_core::Config::validate_root(root)?;

        Ok(Self {
            root: root.to_owned(),
            extension: extension.to_owned(),
            skip_dirs: Vec::new(),
            follow_links: false,
            respect_ignore_files: false,
        })
    }

    /// Creates a walker configured from a [`DiscoveryConfig`].
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn from_config(
        root: &Utf8Path,
        extension: &str,
        config: &DiscoveryConfig,
    ) -> Result<Self, MigrateError> {
        let skip_dirs: Vec<&str> = config.skip_dirs.iter().map(String::as_str).collect();
        Ok(Self::new(root, extension)?
            .with_skip_dirs(&skip_dirs)
            .with_follow_links(config.follow_links)
            .with_ignore_files(config.respect_ignore_files))
    }

    /// Adds directory names to skip during traversal.
    #[must_use]
    pub fn with_skip_dirs(mut self, dirs: &[&str]) -> Self {
        self.skip_dirs.extend(dirs.iter().map(ToString::to_string));
        self
    }

    /// Configures whether to follow symbolic links.
    #[must_use]
    pub const fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Configures whether `.gitignore`, `.ignore` and hidden-file rules apply.
    ///
    /// Off unless enabled here or through [`DiscoveryConfig`].
    #[must_use]
    pub const fn with_ignore_files(mut self, respect: bool) -> Self {
        self.respect_ignore_files = respect;
        self
    }

    /// Collects every descriptor path under the root.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::Walk`] if directory traversal fails, or
    /// [`MigrateError::NonUtf8Path`] if a descriptor's path is not UTF-8.
    pub fn collect_descriptors(&self) -> Result<Vec<Utf8PathBuf>, MigrateError> {
        let mut paths = Vec::new();

        for result in self.build_walker() {
            let entry = result?;

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = entry.path();
            if !has_extension(path, &self.extension) {
                continue;
            }

            let utf8_path = Utf8Path::from_path(path)
                .ok_or_else(|| MigrateError::NonUtf8Path(path.to_owned()))?;
            paths.push(utf8_path.to_owned());
        }

        Ok(paths)
    }

    /// Collects the project directories under the root.
    ///
    /// Each descriptor's parent directory is a project directory. A
    /// directory holding several descriptors is listed once, at the position
    /// of its first descriptor; whether it holds exactly one is checked when
    /// the project is loaded, not here.
    ///
    /// # Errors
    ///
    /// Same as [`collect_descriptors`](Self::collect_descriptors).
    pub fn collect_project_dirs(&self) -> Result<Vec<Utf8PathBuf>, MigrateError> {
        let descriptors = self.collect_descriptors()?;
        let mut seen = fx_hash_set_with_capacity(descriptors.len());
        let mut dirs = Vec::with_capacity(descriptors.len());

        for descriptor in descriptors {
            let Some(dir) = descriptor.parent() else {
                continue;
            };
            if seen.insert(dir.to_owned()) {
                dirs.push(dir.to_owned());
            }
        }

        Ok(dirs)
    }

    /// Builds the ignore walker with configured settings.
    fn build_walker(&self) -> ignore::Walk {
        let skip_dirs = self.skip_dirs.clone();

        WalkBuilder::new(&self.root)
            .standard_filters(self.respect_ignore_files)
            .follow_links(self.follow_links)
            // Don't require the root to be a git repo
            .require_git(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| {
                let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
                // The root itself is never skipped, whatever its name.
                !(is_dir
                    && entry.depth() > 0
                    && entry
                        .file_name()
                        .to_str()
                        .is_some_and(|name| skip_dirs.iter().any(|d| d == name)))
            })
            .build()
    }

    /// Returns the root directory being walked.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}

/// Lists the files directly inside `dir` whose name satisfies `matches`.
///
/// Not recursive. Results are sorted by path. Entries whose name is not
/// UTF-8 never match.
///
/// # Errors
///
/// Returns [`MigrateError::FileSystem`] if the directory cannot be read, or
/// [`MigrateError::NonUtf8Path`] if a matching entry's path is not UTF-8.
pub fn list_files(
    dir: &Utf8Path,
    matches: impl Fn(&str) -> bool,
) -> Result<Vec<Utf8PathBuf>, MigrateError> {
    let entries = fs::read_dir(dir).map_err(|e| MigrateError::fs(dir, FsOperation::List, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| MigrateError::fs(dir, FsOperation::List, e))?;
        let file_type = entry
            .file_type()
            .map_err(|e| MigrateError::fs(dir, FsOperation::List, e))?;
        if !file_type.is_file() {
            continue;
        }

        if !entry.file_name().to_str().is_some_and(&matches) {
            continue;
        }

        let path = Utf8PathBuf::from_path_buf(entry.path()).map_err(MigrateError::NonUtf8Path)?;
        files.push(path);
    }

    files.sort();
    Ok(files)
}

/// Checks a path's extension, ignoring ASCII case.
///
/// Works on any path, so non-UTF-8 names can be rejected before conversion.
pub(crate) fn has_extension(path: impl AsRef<Path>, extension: &str) -> bool {
    path.as_ref()
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Utf8Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "<Project />").unwrap();
    }

    fn utf8_tempdir() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        (dir, root)
    }

    #[test]
    fn test_has_extension() {
        assert!(has_extension(Utf8Path::new("App.csproj"), "csproj"));
        assert!(has_extension(Utf8Path::new("src/App.CSPROJ"), "csproj"));
        assert!(!has_extension(Utf8Path::new("App.csproj.user"), "csproj"));
        assert!(!has_extension(Utf8Path::new("App.vbproj"), "csproj"));
        assert!(!has_extension(Utf8Path::new("csproj"), "csproj"));
    }

    #[test]
    fn test_walker_rejects_missing_root() {
        assert!(ProjectWalker::new(Utf8Path::new("/nonexistent/solution"), "csproj").is_err());
    }

    #[test]
    fn test_collect_project_dirs() {
        let (_guard, root) = utf8_tempdir();
        touch(&root.join("src/App/App.csproj"));
        touch(&root.join("src/Lib/Lib.csproj"));
        touch(&root.join("src/Lib/Other.csproj"));
        touch(&root.join("tests/Lib.Tests/Lib.Tests.csproj"));
        touch(&root.join("src/App/Program.cs"));

        let dirs = ProjectWalker::new(&root, "csproj")
            .unwrap()
            .collect_project_dirs()
            .unwrap();

        assert_eq!(
            dirs,
            vec![
                root.join("src/App"),
                root.join("src/Lib"),
                root.join("tests/Lib.Tests"),
            ]
        );
    }

    #[test]
    fn test_skip_dirs_are_not_descended() {
        let (_guard, root) = utf8_tempdir();
        touch(&root.join("src/App/App.csproj"));
        touch(&root.join("src/App/obj/Debug/App.csproj"));
        touch(&root.join("vendor/Thing/Thing.csproj"));

        let walker = ProjectWalker::from_config(&root, "csproj", &DiscoveryConfig::default())
            .unwrap()
            .with_skip_dirs(&["vendor"]);
        let dirs = walker.collect_project_dirs().unwrap();

        assert_eq!(dirs, vec![root.join("src/App")]);
    }

    #[test]
    fn test_root_named_like_skip_dir_is_walked() {
        let (_guard, base) = utf8_tempdir();
        let root = base.join("packages");
        touch(&root.join("App/App.csproj"));

        let walker = ProjectWalker::new(&root, "csproj")
            .unwrap()
            .with_skip_dirs(&["packages"]);
        assert_eq!(walker.collect_project_dirs().unwrap(), vec![root.join("App")]);
    }

    #[test]
    fn test_list_files_is_not_recursive() {
        let (_guard, root) = utf8_tempdir();
        touch(&root.join("b.csproj"));
        touch(&root.join("a.csproj"));
        touch(&root.join("nested/c.csproj"));
        touch(&root.join("packages.config"));

        let files = list_files(&root, |name| {
            has_extension(Utf8Path::new(name), "csproj")
        })
        .unwrap();
        assert_eq!(files, vec![root.join("a.csproj"), root.join("b.csproj")]);
    }

    #[test]
    fn test_list_files_missing_dir() {
        let err = list_files(Utf8Path::new("/nonexistent/dir"), |_| true).unwrap_err();
        assert_eq!(err.kind(), nsm_core::ErrorKind::FileSystemFailure);
    }

    #[test]
    fn test_ignore_rules_are_opt_in() {
        let (_guard, root) = utf8_tempdir();
        fs::write(root.join(".gitignore"), "[Ll]ogs/\n").unwrap();
        touch(&root.join("src/App/App.csproj"));
        touch(&root.join("src/Logs/Logs.csproj"));
        touch(&root.join(".build/Tool/Tool.csproj"));

        let all = ProjectWalker::from_config(&root, "csproj", &DiscoveryConfig::default())
            .unwrap()
            .collect_project_dirs()
            .unwrap();
        assert_eq!(
            all,
            vec![
                root.join(".build/Tool"),
                root.join("src/App"),
                root.join("src/Logs"),
            ]
        );

        let filtered = ProjectWalker::new(&root, "csproj")
            .unwrap()
            .with_ignore_files(true)
            .collect_project_dirs()
            .unwrap();
        assert_eq!(filtered, vec![root.join("src/App")]);
    }

    #[cfg(unix)]
    fn write_raw_name(dir: &Utf8Path, name: &[u8]) -> bool {
        use std::os::unix::ffi::OsStrExt;

        let path = dir.as_std_path().join(std::ffi::OsStr::from_bytes(name));
        fs::write(path, "binary").is_ok()
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_unrelated_files_are_skipped() {
        let (_guard, root) = utf8_tempdir();
        touch(&root.join("App/App.csproj"));
        fs::create_dir_all(root.join("App/Resources")).unwrap();
        // Some file systems refuse non-UTF-8 names.
        if !write_raw_name(&root.join("App/Resources"), b"caf\xe9.png")
            || !write_raw_name(&root.join("App"), b"r\xe9sum\xe9.txt")
        {
            return;
        }

        let dirs = ProjectWalker::new(&root, "csproj")
            .unwrap()
            .collect_project_dirs()
            .unwrap();
        assert_eq!(dirs, vec![root.join("App")]);

        let files = list_files(&root.join("App"), |_| true).unwrap();
        assert_eq!(files, vec![root.join("App/App.csproj")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_descriptor_is_reported() {
        let (_guard, root) = utf8_tempdir();
        fs::create_dir_all(root.join("App")).unwrap();
        if !write_raw_name(&root.join("App"), b"caf\xe9.csproj") {
            return;
        }

        let err = ProjectWalker::new(&root, "csproj")
            .unwrap()
            .collect_descriptors()
            .unwrap_err();
        assert!(matches!(err, MigrateError::NonUtf8Path(_)));
    }
}
