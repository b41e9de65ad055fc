//! Readers for legacy .NET project files.
//!
//! A legacy project directory holds a descriptor (`*.csproj` in the MSBuild
//! 2003 namespace) and, optionally, a `packages.config` lock file. This crate
//! turns both into the reference model of `nsm-core`:
//!
//! - [`LegacyDescriptorReader`] - ordered project references (`ProjectReference/@Include`)
//! - [`LegacyLockReader`] - ordered package references (`package/@id`, `package/@version`)
//! - [`DescriptorFormat`] - tells a legacy descriptor from an SDK-style one
//!
//! Values are copied verbatim and in document order; nothing is sorted,
//! normalized, or deduplicated. A selected element that lacks a required
//! attribute is reported as [`LegacyError::MissingAttribute`].
//!
//! # Example
//!
//! ```no_run
//! use nsm_legacy::{LegacyDescriptorReader, LegacyLockReader};
//! use camino::Utf8Path;
//!
//! let projects = LegacyDescriptorReader::new().load(Utf8Path::new("App/App.csproj"))?;
//! let packages = LegacyLockReader::new().load(Utf8Path::new("App/packages.config"))?;
//!
//! for package in &packages {
//!     println!("{} {}", package.name, package.version);
//! }
//! # Ok::<(), nsm_legacy::LegacyError>(())
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod descriptor;
mod error;
mod format;
mod lock;
mod markup;

pub use descriptor::{LegacyDescriptorReader, MSBUILD_NAMESPACE};
pub use error::LegacyError;
pub use format::DescriptorFormat;
pub use lock::LegacyLockReader;
