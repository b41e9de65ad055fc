//! Rendering and persisting SDK-style descriptors.
//!
//! The descriptor is produced textually, not through an XML object model,
//! so its layout is fixed:
//!
//! ```text
//! <Project Sdk="Microsoft.NET.Sdk">
//!
//!   <PropertyGroup>
//!     <TargetFrameworks>netstandard2.0;netstandard2.1;net461;net5.0</TargetFrameworks>
//!   </PropertyGroup>
//!
//!   <ItemGroup>                                   only with packages
//!     <PackageReference Include="..." Version="..." />
//!   </ItemGroup>
//!
//!   <ItemGroup>                                   only with project references
//!     <ProjectReference Include="..." />
//!   </ItemGroup>
//! </Project>
//! ```
//!
//! An empty reference list produces no `ItemGroup` at all. Values are copied
//! verbatim unless escaping is enabled in [`OutputConfig`].

use std::borrow::Cow;
use std::fmt::Write as _;
use std::fs;

use camino::Utf8Path;
use nsm_core::{OutputConfig, PackageReference, ProjectReference, TargetPlatformSet};
use tracing::debug;

use crate::error::{FsOperation, MigrateError};

/// Renders and writes new descriptors.
///
/// # Examples
///
/// ```
/// use nsm_migrator::DescriptorWriter;
/// use nsm_core::{OutputConfig, ProjectReference, TargetPlatformSet};
///
/// let writer = DescriptorWriter::new(&OutputConfig::default());
/// let text = writer.render(
///     &TargetPlatformSet::from_slice(&["net5.0"]),
///     &[ProjectReference::from("../Lib/Lib.csproj")],
///     &[],
/// );
///
/// assert!(text.starts_with("<Project Sdk=\"Microsoft.NET.Sdk\">"));
/// assert!(text.contains("<ProjectReference Include=\"../Lib/Lib.csproj\" />"));
/// assert!(!text.contains("PackageReference"));
/// ```
#[derive(Debug, Clone)]
pub struct DescriptorWriter {
    sdk: String,
    escape_values: bool,
}

impl DescriptorWriter {
    /// Creates a writer from the output settings.
    #[must_use]
    pub fn new(config: &OutputConfig) -> Self {
        Self {
            sdk: config.sdk.clone(),
            escape_values: config.escape_values,
        }
    }

    /// Renders the full descriptor text.
    #[must_use]
    pub fn render(
        &self,
        platforms: &TargetPlatformSet,
        project_refs: &[ProjectReference],
        package_refs: &[PackageReference],
    ) -> String {
        let mut out = String::with_capacity(
            160 + 64 * package_refs.len() + 48 * project_refs.len(),
        );

        let _ = writeln!(out, "<Project Sdk=\"{}\">", self.value(&self.sdk));
        out.push('\n');
        out.push_str("  <PropertyGroup>\n");
        let _ = writeln!(
            out,
            "    <TargetFrameworks>{}</TargetFrameworks>",
            platforms.joined()
        );
        out.push_str("  </PropertyGroup>\n");

        if !package_refs.is_empty() {
            out.push_str("\n  <ItemGroup>\n");
            for package in package_refs {
                let _ = writeln!(
                    out,
                    "    <PackageReference Include=\"{}\" Version=\"{}\" />",
                    self.value(&package.name),
                    self.value(&package.version)
                );
            }
            out.push_str("  </ItemGroup>\n");
        }

        if !project_refs.is_empty() {
            out.push_str("\n  <ItemGroup>\n");
            for project in project_refs {
                let _ = writeln!(
                    out,
                    "    <ProjectReference Include=\"{}\" />",
                    self.value(project.as_str())
                );
            }
            out.push_str("  </ItemGroup>\n");
        }

        out.push_str("</Project>\n");
        out
    }

    /// Renders the descriptor and writes it to `path`.
    ///
    /// Any existing file at `path` is deleted first; the new file is then
    /// created from scratch.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::FileSystem`] if the old file cannot be
    /// deleted or the new one cannot be written.
    pub fn write(
        &self,
        path: &Utf8Path,
        platforms: &TargetPlatformSet,
        project_refs: &[ProjectReference],
        package_refs: &[PackageReference],
    ) -> Result<(), MigrateError> {
        let content = self.render(platforms, project_refs, package_refs);

        if path.is_file() {
            fs::remove_file(path).map_err(|e| MigrateError::fs(path, FsOperation::Delete, e))?;
        }
        fs::write(path, &content).map_err(|e| MigrateError::fs(path, FsOperation::Write, e))?;

        debug!(path = %path, bytes = content.len(), "Wrote descriptor");
        Ok(())
    }

    fn value<'a>(&self, raw: &'a str) -> Cow<'a, str> {
        if self.escape_values {
            escape(raw)
        } else {
            Cow::Borrowed(raw)
        }
    }
}

impl Default for DescriptorWriter {
    fn default() -> Self {
        Self::new(&OutputConfig::default())
    }
}

/// Escapes the characters that would break a double-quoted XML attribute.
fn escape(raw: &str) -> Cow<'_, str> {
    if !raw.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(raw);
    }

    let mut escaped = String::with_capacity(raw.len() + 8);
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_platforms() -> TargetPlatformSet {
        TargetPlatformSet::from_slice(&["netstandard2.0", "netstandard2.1", "net461", "net5.0"])
    }

    #[test]
    fn test_render_without_references() {
        let text = DescriptorWriter::default().render(&default_platforms(), &[], &[]);
        let expected = r#"<Project Sdk="Microsoft.NET.Sdk">

  <PropertyGroup>
    <TargetFrameworks>netstandard2.0;netstandard2.1;net461;net5.0</TargetFrameworks>
  </PropertyGroup>
</Project>
"#;
        assert_eq!(text, expected);
        assert!(!text.contains("ItemGroup"));
    }

    #[test]
    fn test_render_with_both_blocks() {
        let text = DescriptorWriter::default().render(
            &TargetPlatformSet::from_slice(&["net5.0"]),
            &[
                ProjectReference::from(r"..\Lib\Lib.csproj"),
                ProjectReference::from("../Core/Core.csproj"),
            ],
            &[
                PackageReference::new("Newtonsoft.Json", "13.0.1"),
                PackageReference::new("NUnit", "3.13.2"),
            ],
        );

        let expected = r#"<Project Sdk="Microsoft.NET.Sdk">

  <PropertyGroup>
    <TargetFrameworks>net5.0</TargetFrameworks>
  </PropertyGroup>

  <ItemGroup>
    <PackageReference Include="Newtonsoft.Json" Version="13.0.1" />
    <PackageReference Include="NUnit" Version="3.13.2" />
  </ItemGroup>

  <ItemGroup>
    <ProjectReference Include="..\Lib\Lib.csproj" />
    <ProjectReference Include="../Core/Core.csproj" />
  </ItemGroup>
</Project>
"#;
        assert_eq!(text, expected);
    }

    #[test]
    fn test_blocks_are_independent() {
        let writer = DescriptorWriter::default();
        let platforms = default_platforms();

        let packages_only =
            writer.render(&platforms, &[], &[PackageReference::new("NUnit", "3.13.2")]);
        assert_eq!(packages_only.matches("<ItemGroup>").count(), 1);
        assert!(!packages_only.contains("ProjectReference"));

        let projects_only = writer.render(&platforms, &[ProjectReference::from("a.csproj")], &[]);
        assert_eq!(projects_only.matches("<ItemGroup>").count(), 1);
        assert!(!projects_only.contains("PackageReference"));
    }

    #[test]
    fn test_values_are_verbatim_by_default() {
        let text = DescriptorWriter::default().render(
            &default_platforms(),
            &[ProjectReference::from("a&b.csproj")],
            &[PackageReference::new("A<B", "1.0\"")],
        );
        assert!(text.contains("Include=\"a&b.csproj\""));
        assert!(text.contains("Include=\"A<B\" Version=\"1.0\"\""));
    }

    #[test]
    fn test_escaping_when_enabled() {
        let writer = DescriptorWriter::new(&OutputConfig {
            escape_values: true,
            ..OutputConfig::default()
        });
        let text = writer.render(
            &default_platforms(),
            &[ProjectReference::from("a&b.csproj")],
            &[PackageReference::new("A<B>", "\"1.0\"")],
        );
        assert!(text.contains("Include=\"a&amp;b.csproj\""));
        assert!(text.contains("Include=\"A&lt;B&gt;\" Version=\"&quot;1.0&quot;\""));
    }

    #[test]
    fn test_escape_borrows_clean_values() {
        assert!(matches!(escape("Newtonsoft.Json"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_custom_sdk() {
        let writer = DescriptorWriter::new(&OutputConfig {
            sdk: "Microsoft.NET.Sdk.Web".to_owned(),
            ..OutputConfig::default()
        });
        let text = writer.render(&default_platforms(), &[], &[]);
        assert!(text.starts_with("<Project Sdk=\"Microsoft.NET.Sdk.Web\">\n"));
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = camino::Utf8PathBuf::from_path_buf(dir.path().join("App.csproj")).unwrap();
        fs::write(&path, "<Project ToolsVersion=\"15.0\">legacy content that is longer</Project>")
            .unwrap();

        DescriptorWriter::default()
            .write(&path, &default_platforms(), &[], &[])
            .unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<Project Sdk="));
        assert!(!written.contains("legacy content"));
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let err = DescriptorWriter::default()
            .write(
                Utf8Path::new("/nonexistent/dir/App.csproj"),
                &default_platforms(),
                &[],
                &[],
            )
            .unwrap_err();
        assert_eq!(err.kind(), nsm_core::ErrorKind::FileSystemFailure);
    }
}
