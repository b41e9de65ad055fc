//! Core types, configuration, and platform selection for nsm.
//!
//! This crate provides the foundational pieces shared across the workspace:
//!
//! - Reference model ([`PackageReference`], [`ProjectReference`], [`LegacyProject`])
//! - [`TargetPlatformSet`] and the directory-convention [`PlatformSelector`]
//! - Configuration structures ([`Config`] and its sections)
//! - [`ErrorKind`] classification and [`ConfigError`]
//! - The `FxHashSet` alias used for path deduplication

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod hash;
pub mod platform;
pub mod types;

pub use config::{ArtifactConfig, Config, DiscoveryConfig, OutputConfig, PlatformConfig};
pub use error::{ConfigError, ErrorKind};
pub use hash::{FxHashSet, fx_hash_set, fx_hash_set_with_capacity};
pub use platform::PlatformSelector;
pub use types::{
    LegacyProject, PackageReference, ProjectReference, ProjectState, TargetPlatformSet,
};
