//! Domain types for the nsm migrator.
//!
//! # Module Organization
//!
//! - [`reference`] - Package and project references read from legacy files
//! - [`platform_set`] - The ordered target platform set of a project
//! - [`project`] - A loaded legacy project and its migration state
//!
//! All public types are re-exported here and at the crate root:
//!
//! ```
//! use nsm_core::{LegacyProject, PackageReference, ProjectReference, TargetPlatformSet};
//! ```

pub mod platform_set;
pub mod project;
pub mod reference;

pub use platform_set::TargetPlatformSet;
pub use project::{LegacyProject, ProjectState};
pub use reference::{PackageReference, ProjectReference};
