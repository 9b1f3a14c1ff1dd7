//! Engine options.
//!
//! Every field has a default, so an empty TOML table is a valid
//! configuration.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::EngineError;

/// User-facing engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
	/// Insert a lone proposal without showing the popup.
	pub auto_insert: bool,
	/// How long a successful context-information resolution suppresses the
	/// shortcut at the same offset, in milliseconds.
	pub information_staleness_ms: u64,
	/// Key binding cited in cycling status messages.
	pub cycle_binding: String,
	/// Identifier of this engine as a computation source. Restart
	/// notifications naming another source end the session.
	pub source_id: String,
	/// Delay before a requested reload is queued, in milliseconds. Zero
	/// queues immediately.
	pub reload_delay_ms: u64,
}

impl Default for EngineOptions {
	fn default() -> Self {
		Self {
			auto_insert: false,
			information_staleness_ms: 3000,
			cycle_binding: "Ctrl+Space".to_string(),
			source_id: "completion".to_string(),
			reload_delay_ms: 0,
		}
	}
}

impl EngineOptions {
	/// Parses options from TOML text.
	pub fn from_toml_str(text: &str) -> Result<Self, EngineError> {
		Ok(toml::from_str(text)?)
	}

	/// Reads and parses options from `path`.
	pub fn load(path: &Path) -> Result<Self, EngineError> {
		let text = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml_str(&text)
	}

	pub fn information_staleness(&self) -> Duration {
		Duration::from_millis(self.information_staleness_ms)
	}

	pub fn reload_delay(&self) -> Duration {
		Duration::from_millis(self.reload_delay_ms)
	}
}
