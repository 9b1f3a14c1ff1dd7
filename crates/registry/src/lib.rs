#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Completion categories and the registry that publishes them.
//!
//! A [`Category`] groups [`ComputerDescriptor`]s and resolves, per partition,
//! which computers apply. The [`CategoryRegistry`] holds the authoritative
//! ordered list as an immutable snapshot; edits are made on copies through
//! [`CategoryEdit`] and published atomically with [`CategoryRegistry::commit`].
//!
//! Registries are built from static configuration: a TOML [`Manifest`] maps
//! categories to computers, and a [`FactoryTable`] maps factory names to
//! constructors. There is no dynamic discovery.

/// Categories and their partition-keyed computer cache.
pub mod category;
/// Lazily instantiated computer descriptors.
pub mod descriptor;
/// Registry error types.
pub mod error;
/// TOML manifest and factory table.
pub mod manifest;
/// Snapshot-published category registry.
pub mod registry;

pub use category::Category;
pub use descriptor::{ComputerDescriptor, ComputerFactory};
pub use error::{ManifestError, RegistryError};
pub use manifest::{CategoryManifest, ComputerManifest, FactoryTable, Manifest};
pub use registry::{CategoryEdit, CategoryRegistry, CategorySnapshot};
