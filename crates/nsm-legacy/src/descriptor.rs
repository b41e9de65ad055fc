//! Reader for legacy (MSBuild 2003 namespace) project descriptors.
//!
//! Only inter-project references are extracted: every `ProjectReference`
//! element in the MSBuild namespace contributes its `Include` attribute,
//! verbatim, in document order. Everything else in the file is ignored.
//!
//! # Examples
//!
//! ```
//! use nsm_legacy::LegacyDescriptorReader;
//! use camino::Utf8Path;
//!
//! let text = r#"<Project ToolsVersion="15.0" xmlns="http://schemas.microsoft.com/developer/msbuild/2003">
//!   <ItemGroup>
//!     <ProjectReference Include="..\Lib\Lib.csproj">
//!       <Name>Lib</Name>
//!     </ProjectReference>
//!   </ItemGroup>
//! </Project>"#;
//!
//! let refs = LegacyDescriptorReader::new().parse(text, Utf8Path::new("App.csproj"))?;
//! assert_eq!(refs[0].as_str(), r"..\Lib\Lib.csproj");
//! # Ok::<(), nsm_legacy::LegacyError>(())
//! ```

use camino::Utf8Path;
use nsm_core::ProjectReference;
use tracing::debug;

use crate::error::LegacyError;
use crate::markup::{parse_document, read_text, required_attribute};

/// XML namespace of legacy MSBuild project files.
pub const MSBUILD_NAMESPACE: &str = "http://schemas.microsoft.com/developer/msbuild/2003";

const PROJECT_REFERENCE: &str = "ProjectReference";
const INCLUDE: &str = "Include";

/// Extracts project references from legacy descriptors.
#[derive(Debug, Default, Clone, Copy)]
pub struct LegacyDescriptorReader {
    _private: (),
}

impl LegacyDescriptorReader {
    /// Creates a new reader.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads and parses the descriptor at `path`.
    ///
    /// # Errors
    ///
    /// - [`LegacyError::Read`] if the file cannot be read
    /// - [`LegacyError::MalformedDescriptor`] if it is not well-formed XML
    /// - [`LegacyError::MissingAttribute`] if a reference has no `Include`
    pub fn load(&self, path: &Utf8Path) -> Result<Vec<ProjectReference>, LegacyError> {
        let text = read_text(path)?;
        self.parse(&text, path)
    }

    /// Parses descriptor text. `path` is only used for error reporting.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load), minus the read failure.
    pub fn parse(&self, text: &str, path: &Utf8Path) -> Result<Vec<ProjectReference>, LegacyError> {
        let doc = parse_document(text).map_err(|source| LegacyError::MalformedDescriptor {
            path: path.to_owned(),
            source,
        })?;

        let mut references = Vec::new();
        for node in doc.descendants().filter(|n| {
            n.is_element()
                && n.tag_name().name() == PROJECT_REFERENCE
                && n.tag_name().namespace() == Some(MSBUILD_NAMESPACE)
        }) {
            let include = required_attribute(node, INCLUDE, path)?;
            debug!(descriptor = %path, reference = include, "Found project reference");
            references.push(ProjectReference::new(include));
        }

        Ok(references)
    }
}
