use std::path::PathBuf;

/// Errors raised while configuring a [`crate::CompletionEngine`].
///
/// Computation itself never fails: computer failures are logged and
/// swallowed, and an empty result is a valid outcome.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
	/// The options file could not be read.
	#[error("failed to read engine options {path}: {source}")]
	Io {
		/// Options file path.
		path: PathBuf,
		/// Underlying I/O error.
		#[source]
		source: std::io::Error,
	},
	/// The options are not valid TOML or do not match the schema.
	#[error("invalid engine options: {0}")]
	Parse(#[from] toml::de::Error),
}
