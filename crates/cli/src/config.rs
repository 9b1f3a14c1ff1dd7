//! CLI configuration file.
//!
//! One TOML file carries the engine options, the category manifest and the
//! data of the built-in computers:
//!
//! ```toml
//! keywords = ["fn", "let", "match"]
//!
//! [engine]
//! cycle_binding = "Tab"
//!
//! [[category]]
//! id = "words"
//!
//! [[category.computer]]
//! id = "words"
//!
//! [[templates]]
//! name = "for"
//! body = "for ${item} in ${items} {\n}"
//! ```

use std::path::Path;

use anyhow::Context;
use assist_engine::EngineOptions;
use assist_registry::Manifest;
use serde::Deserialize;

#[cfg(test)]
mod tests;

/// Configuration used when no file is given.
pub const BUILTIN: &str = r#"
keywords = [
	"as", "break", "const", "continue", "else", "enum", "false", "fn", "for",
	"if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub",
	"return", "self", "static", "struct", "trait", "true", "type", "use",
	"where", "while",
]

[[category]]
id = "words"
name = "Words"

[[category.computer]]
id = "words"
partitions = ["__default", "string"]

[[category]]
id = "keywords"
name = "Keywords"
enabled_as_separate = true

[[category.computer]]
id = "keywords"

[[category]]
id = "templates"
name = "Templates"
included_in_default = false
enabled_as_separate = true

[[category.computer]]
id = "templates"

[[templates]]
name = "fn"
description = "function"
body = "fn ${name}(${args}) {\n}"

[[templates]]
name = "for"
description = "for loop"
body = "for ${item} in ${items} {\n}"

[[templates]]
name = "match"
description = "match expression"
body = "match ${value} {\n}"
"#;

/// A named snippet offered by the templates computer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Template {
	pub name: String,
	#[serde(default)]
	pub description: Option<String>,
	pub body: String,
}

impl Template {
	/// Placeholder names in body order, without duplicates.
	pub fn parameters(&self) -> Vec<&str> {
		let mut parameters = Vec::new();
		let mut rest = self.body.as_str();
		while let Some(start) = rest.find("${") {
			let after = &rest[start + 2..];
			let Some(end) = after.find('}') else {
				break;
			};
			let name = &after[..end];
			if !parameters.contains(&name) {
				parameters.push(name);
			}
			rest = &after[end + 1..];
		}
		parameters
	}

	/// Body with every placeholder replaced by its name.
	pub fn expand(&self) -> String {
		let mut expanded = String::with_capacity(self.body.len());
		let mut rest = self.body.as_str();
		while let Some(start) = rest.find("${") {
			let after = &rest[start + 2..];
			let Some(end) = after.find('}') else {
				break;
			};
			expanded.push_str(&rest[..start]);
			expanded.push_str(&after[..end]);
			rest = &after[end + 1..];
		}
		expanded.push_str(rest);
		expanded
	}
}

/// Parsed configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	#[serde(default)]
	pub engine: EngineOptions,
	#[serde(flatten)]
	pub manifest: Manifest,
	#[serde(default)]
	pub keywords: Vec<String>,
	#[serde(default)]
	pub templates: Vec<Template>,
}

impl Config {
	pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
		toml::from_str(text).context("invalid configuration")
	}

	/// Reads `path`, or the built-in configuration when `path` is `None`.
	pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
		let Some(path) = path else {
			return Self::from_toml_str(BUILTIN);
		};
		let text = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
		let config = Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))?;
		tracing::debug!(
			path = %path.display(),
			categories = config.manifest.categories.len(),
			keywords = config.keywords.len(),
			templates = config.templates.len(),
			"assist.config.load"
		);
		Ok(config)
	}
}
