//! Distinguishing legacy descriptors from SDK-style ones.
//!
//! Both formats share the `.csproj` extension. A descriptor is SDK-style when
//! its root `Project` element names an SDK, either through an `Sdk`
//! attribute or an `<Sdk>` child element. Anything else, including text
//! that does not parse, is treated as legacy so the reader reports the
//! parse failure against the right file.

use camino::Utf8Path;

use crate::error::LegacyError;
use crate::markup::{parse_document, read_text};

/// The format of a project descriptor.
///
/// # Examples
///
/// ```
/// use nsm_legacy::DescriptorFormat;
///
/// let sdk = r#"<Project Sdk="Microsoft.NET.Sdk"></Project>"#;
/// assert_eq!(DescriptorFormat::detect(sdk), DescriptorFormat::SdkStyle);
///
/// let legacy = r#"<Project xmlns="http://schemas.microsoft.com/developer/msbuild/2003" />"#;
/// assert_eq!(DescriptorFormat::detect(legacy), DescriptorFormat::Legacy);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorFormat {
    /// A pre-SDK descriptor that still needs migrating.
    Legacy,
    /// An SDK-style descriptor, e.g. one this tool already wrote.
    SdkStyle,
}

impl DescriptorFormat {
    /// Classifies descriptor text.
    #[must_use]
    pub fn detect(text: &str) -> Self {
        let Ok(doc) = parse_document(text) else {
            return Self::Legacy;
        };
        let root = doc.root_element();
        let names_sdk = root.attribute("Sdk").is_some()
            || root
                .children()
                .any(|child| child.is_element() && child.tag_name().name() == "Sdk");

        if root.tag_name().name() == "Project" && names_sdk {
            Self::SdkStyle
        } else {
            Self::Legacy
        }
    }

    /// Reads the file at `path` and classifies it.
    ///
    /// # Errors
    ///
    /// Returns [`LegacyError::Read`] if the file cannot be read.
    pub fn detect_file(path: &Utf8Path) -> Result<Self, LegacyError> {
        read_text(path).map(|text| Self::detect(&text))
    }

    /// Returns `true` for [`DescriptorFormat::Legacy`].
    #[inline]
    #[must_use]
    pub const fn is_legacy(self) -> bool {
        matches!(self, Self::Legacy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sdk_attribute() {
        let text = "<Project Sdk=\"Microsoft.NET.Sdk\">\n  <PropertyGroup />\n</Project>\n";
        assert_eq!(DescriptorFormat::detect(text), DescriptorFormat::SdkStyle);
    }

    #[test]
    fn test_sdk_child_element() {
        let text = r#"<Project><Sdk Name="Microsoft.NET.Sdk" /></Project>"#;
        assert_eq!(DescriptorFormat::detect(text), DescriptorFormat::SdkStyle);
    }

    #[test]
    fn test_sdk_style_with_doctype() {
        let text = "<!DOCTYPE Project>\n<Project Sdk=\"Microsoft.NET.Sdk\" />\n";
        assert_eq!(DescriptorFormat::detect(text), DescriptorFormat::SdkStyle);
    }

    #[test]
    fn test_legacy_descriptor() {
        let text = r#"<?xml version="1.0" encoding="utf-8"?>
<Project ToolsVersion="15.0" xmlns="http://schemas.microsoft.com/developer/msbuild/2003">
  <Import Project="$(MSBuildExtensionsPath)\$(MSBuildToolsVersion)\Microsoft.Common.props" />
</Project>"#;
        assert!(DescriptorFormat::detect(text).is_legacy());
    }

    #[test]
    fn test_unparseable_is_legacy() {
        assert!(DescriptorFormat::detect("<Project Sdk=").is_legacy());
        assert!(DescriptorFormat::detect("").is_legacy());
    }

    #[test]
    fn test_detect_file_missing() {
        assert!(DescriptorFormat::detect_file(Utf8Path::new("/no/such/App.csproj")).is_err());
    }
}
