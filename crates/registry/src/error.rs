use std::path::PathBuf;
use std::sync::Arc;

/// Errors raised by [`crate::CategoryRegistry`] and [`crate::CategoryEdit`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
	/// Two categories share an id.
	#[error("duplicate category id: {0}")]
	DuplicateCategory(Arc<str>),
	/// No category has the given id.
	#[error("unknown category: {0}")]
	UnknownCategory(String),
	/// The registry was committed to after the edit was started.
	#[error("registry changed since edit began (base generation {base}, current {current})")]
	Conflict {
		/// Generation the edit was based on.
		base: u64,
		/// Generation currently published.
		current: u64,
	},
}

/// Errors raised while loading a [`crate::Manifest`].
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
	/// The manifest file could not be read.
	#[error("failed to read manifest {path}: {source}")]
	Io {
		/// Manifest path.
		path: PathBuf,
		/// Underlying I/O error.
		#[source]
		source: std::io::Error,
	},
	/// The manifest is not valid TOML or does not match the schema.
	#[error("invalid manifest: {0}")]
	Parse(#[from] toml::de::Error),
	/// A computer names a factory that is not in the factory table.
	#[error("category {category}: unknown computer factory {factory:?}")]
	UnknownFactory {
		/// Category declaring the computer.
		category: String,
		/// Missing factory name.
		factory: String,
	},
	/// The resulting registry is invalid.
	#[error(transparent)]
	Registry(#[from] RegistryError),
}
