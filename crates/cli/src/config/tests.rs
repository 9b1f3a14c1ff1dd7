use std::io::Write as _;

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn builtin_parses() {
	let config = Config::load(None).unwrap();
	assert_eq!(config.engine, EngineOptions::default());
	let ids: Vec<_> = config.manifest.categories.iter().map(|c| c.id.as_str()).collect();
	assert_eq!(ids, vec!["words", "keywords", "templates"]);
	assert!(config.keywords.iter().any(|k| k == "match"));
	assert_eq!(config.templates.len(), 3);
}

#[test]
fn sections_are_optional() {
	let config = Config::from_toml_str("[engine]\ncycle_binding = \"Tab\"\n").unwrap();
	assert_eq!(config.engine.cycle_binding, "Tab");
	assert!(config.manifest.categories.is_empty());
	assert!(config.keywords.is_empty() && config.templates.is_empty());
}

#[test]
fn load_reports_path() {
	let mut file = tempfile::NamedTempFile::new().unwrap();
	write!(file, "keywords = 3").unwrap();
	let err = Config::load(Some(file.path())).unwrap_err();
	assert!(format!("{err:#}").contains(&file.path().display().to_string()));

	let missing = file.path().with_extension("missing");
	assert!(Config::load(Some(&missing)).is_err());
}

#[test]
fn template_placeholders() {
	let template = Template {
		name: "for".into(),
		description: None,
		body: "for ${item} in ${items} { ${item} }".into(),
	};
	assert_eq!(template.parameters(), vec!["item", "items"]);
	assert_eq!(template.expand(), "for item in items { item }");
}

#[test]
fn unterminated_placeholder_is_kept() {
	let template = Template {
		name: "t".into(),
		description: None,
		body: "a ${b".into(),
	};
	assert!(template.parameters().is_empty());
	assert_eq!(template.expand(), "a ${b");
}
