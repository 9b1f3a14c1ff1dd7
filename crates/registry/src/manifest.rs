//! TOML manifest mapping categories to computers.
//!
//! ```toml
//! [[category]]
//! id = "words"
//! name = "Word Proposals"
//! rank = 1
//!
//! [[category.computer]]
//! id = "buffer-words"
//! factory = "words"
//! partitions = ["__default", "string"]
//! ```
//!
//! Omitted fields take defaults: categories are included in the default
//! group, not enabled as separate, and ranked by their position in the file.
//! A computer's factory defaults to its id and its partitions to the default
//! partition.

use std::path::Path;
use std::sync::Arc;

use assist_primitives::DEFAULT_PARTITION;
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::category::Category;
use crate::descriptor::{ComputerDescriptor, ComputerFactory};
use crate::error::ManifestError;
use crate::registry::CategoryRegistry;


/// Parsed manifest.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
	/// Declared categories, in file order.
	#[serde(default, rename = "category")]
	pub categories: Vec<CategoryManifest>,
}

/// One `[[category]]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryManifest {
	pub id: String,
	/// Display name; defaults to the id.
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default = "default_true")]
	pub included_in_default: bool,
	#[serde(default)]
	pub enabled_as_separate: bool,
	/// Cycling rank; defaults to the category's position in the manifest.
	#[serde(default)]
	pub rank: Option<u32>,
	#[serde(default, rename = "computer")]
	pub computers: Vec<ComputerManifest>,
}

/// One `[[category.computer]]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct ComputerManifest {
	pub id: String,
	#[serde(default)]
	pub name: Option<String>,
	/// Factory table key; defaults to the id.
	#[serde(default)]
	pub factory: Option<String>,
	#[serde(default = "default_partitions")]
	pub partitions: Vec<String>,
}

fn default_true() -> bool {
	true
}

fn default_partitions() -> Vec<String> {
	vec![DEFAULT_PARTITION.to_string()]
}

impl Manifest {
	/// Parses a manifest from TOML text.
	pub fn from_toml_str(text: &str) -> Result<Self, ManifestError> {
		Ok(toml::from_str(text)?)
	}

	/// Reads and parses the manifest at `path`.
	pub fn load(path: &Path) -> Result<Self, ManifestError> {
		let text = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml_str(&text)
	}

	/// Builds a registry for `content_type`, resolving factories in `factories`.
	///
	/// Every factory name must be known up front; instantiation itself stays
	/// lazy.
	pub fn build(&self, content_type: &str, factories: &FactoryTable) -> Result<CategoryRegistry, ManifestError> {
		let mut categories = Vec::with_capacity(self.categories.len());
		for (position, entry) in self.categories.iter().enumerate() {
			let mut descriptors = Vec::with_capacity(entry.computers.len());
			for computer in &entry.computers {
				let factory_name = computer.factory.as_deref().unwrap_or(&computer.id);
				let factory = factories.get(factory_name).ok_or_else(|| ManifestError::UnknownFactory {
					category: entry.id.clone(),
					factory: factory_name.to_string(),
				})?;
				descriptors.push(ComputerDescriptor::new(
					&computer.id,
					computer.name.as_deref().unwrap_or(&computer.id),
					computer.partitions.iter().map(String::as_str),
					factory,
				));
			}

			categories.push(
				Category::new(&entry.id, entry.name.as_deref().unwrap_or(&entry.id), descriptors)
					.with_included_in_default(entry.included_in_default)
					.with_enabled_as_separate(entry.enabled_as_separate)
					.with_rank(entry.rank.unwrap_or(position as u32)),
			);
		}

		tracing::debug!(content_type, categories = categories.len(), "assist.manifest.build");
		Ok(CategoryRegistry::new(content_type, categories)?)
	}
}

/// Named computer constructors available to manifests.
#[derive(Default, Clone)]
pub struct FactoryTable {
	factories: FxHashMap<Arc<str>, ComputerFactory>,
}

impl FactoryTable {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `factory` under `name`, replacing any previous entry.
	pub fn register(&mut self, name: &str, factory: ComputerFactory) -> &mut Self {
		self.factories.insert(Arc::from(name), factory);
		self
	}

	pub fn get(&self, name: &str) -> Option<ComputerFactory> {
		self.factories.get(name).cloned()
	}

	pub fn contains(&self, name: &str) -> bool {
		self.factories.contains_key(name)
	}
}

impl std::fmt::Debug for FactoryTable {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut names: Vec<_> = self.factories.keys().map(|k| &**k).collect();
		names.sort_unstable();
		f.debug_struct("FactoryTable").field("factories", &names).finish()
	}
}
