//! Reader for legacy `packages.config` lock files.
//!
//! Every `package` element (no namespace) contributes one
//! [`PackageReference`] built from its `id` and `version` attributes, in
//! document order. Other attributes (`targetFramework`,
//! `developmentDependency`, ...) are ignored.

use camino::Utf8Path;
use nsm_core::PackageReference;
use tracing::debug;

use crate::error::LegacyError;
use crate::markup::{parse_document, read_text, required_attribute};

const PACKAGE: &str = "package";
const ID: &str = "id";
const VERSION: &str = "version";

/// Extracts package references from legacy lock files.
///
/// # Examples
///
/// ```
/// use nsm_legacy::LegacyLockReader;
/// use camino::Utf8Path;
///
/// let text = r#"<?xml version="1.0" encoding="utf-8"?>
/// <packages>
///   <package id="Newtonsoft.Json" version="13.0.1" targetFramework="net461" />
/// </packages>"#;
///
/// let packages = LegacyLockReader::new().parse(text, Utf8Path::new("packages.config"))?;
/// assert_eq!(packages[0].name, "Newtonsoft.Json");
/// assert_eq!(packages[0].version, "13.0.1");
/// # Ok::<(), nsm_legacy::LegacyError>(())
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct LegacyLockReader {
    _private: (),
}

impl LegacyLockReader {
    /// Creates a new reader.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads and parses the lock file at `path`.
    ///
    /// # Errors
    ///
    /// - [`LegacyError::Read`] if the file cannot be read
    /// - [`LegacyError::MalformedLockFile`] if it is not well-formed XML
    /// - [`LegacyError::MissingAttribute`] if a package lacks `id` or `version`
    pub fn load(&self, path: &Utf8Path) -> Result<Vec<PackageReference>, LegacyError> {
        let text = read_text(path)?;
        self.parse(&text, path)
    }

    /// Parses lock file text. `path` is only used for error reporting.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load), minus the read failure.
    pub fn parse(&self, text: &str, path: &Utf8Path) -> Result<Vec<PackageReference>, LegacyError> {
        let doc = parse_document(text).map_err(|source| LegacyError::MalformedLockFile {
            path: path.to_owned(),
            source,
        })?;

        let mut packages = Vec::new();
        for node in doc.descendants().filter(|n| {
            n.is_element() && n.tag_name().name() == PACKAGE && n.tag_name().namespace().is_none()
        }) {
            let name = required_attribute(node, ID, path)?;
            let version = required_attribute(node, VERSION, path)?;
            debug!(lock_file = %path, package = name, version, "Found package reference");
            packages.push(PackageReference::new(name, version));
        }

        Ok(packages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nsm_core::ErrorKind;

    fn parse(text: &str) -> Result<Vec<PackageReference>, LegacyError> {
        LegacyLockReader::new().parse(text, Utf8Path::new("App/packages.config"))
    }

    #[test]
    fn test_doctype_declaration_is_accepted() {
        let text = r#"<?xml version="1.0"?>
<!DOCTYPE packages>
<packages>
  <package id="NUnit" version="3.13.2" />
</packages>"#;

        let packages = parse(text).unwrap();
        assert_eq!(packages, vec![PackageReference::new("NUnit", "3.13.2")]);
    }

    #[test]
    fn test_packages_in_document_order() {
        let text = r#"<?xml version="1.0" encoding="utf-8"?>
<packages>
  <package id="Zeta.Lib" version="2.0.0" targetFramework="net461" />
  <package id="Alpha.Lib" version="1.0.0-beta.1" targetFramework="net461" developmentDependency="true" />
  <package id="Mid.Lib" version="[1.0,2.0)" />
</packages>"#;

        let packages = parse(text).unwrap();
        assert_eq!(
            packages,
            vec![
                PackageReference::new("Zeta.Lib", "2.0.0"),
                PackageReference::new("Alpha.Lib", "1.0.0-beta.1"),
                PackageReference::new("Mid.Lib", "[1.0,2.0)"),
            ]
        );
    }

    #[test]
    fn test_duplicates_are_preserved() {
        let text = r#"<packages>
  <package id="NUnit" version="3.12.0" />
  <package id="NUnit" version="3.13.2" />
  <package id="NUnit" version="3.12.0" />
</packages>"#;
        let packages = parse(text).unwrap();
        assert_eq!(packages.len(), 3);
        assert_eq!(packages[1].version, "3.13.2");
    }

    #[test]
    fn test_empty_lock_file() {
        assert!(parse("<packages />").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_lock_file() {
        let err = parse("<packages><package id=\"A\" version=\"1\"></packages>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedLockFile);
    }

    #[test]
    fn test_missing_version_attribute() {
        let text = r#"<packages>
  <package id="NUnit" />
</packages>"#;
        let err = parse(text).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingExpectedAttribute);
        assert!(err.to_string().contains("'version'"));
    }

    #[test]
    fn test_missing_id_attribute() {
        let err = parse(r#"<packages><package version="1.0.0" /></packages>"#).unwrap_err();
        assert!(matches!(
            err,
            LegacyError::MissingAttribute { attribute: "id", line: 1, .. }
        ));
    }
}
