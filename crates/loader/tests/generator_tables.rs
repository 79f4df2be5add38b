//! Loads tables captured from real generator output.

use std::path::PathBuf;

use ndtips_config::Config;
use ndtips_loader::{Fragment, TooltipLoader, TopicType, read_table};
use ndtips_registry::{GroupKey, InsertAction, TooltipRegistry};
use pretty_assertions::assert_eq;
// Dependencies of the library crate, unused by these tests.
use globset as _;
use ignore as _;
use regex as _;
use rstest as _;
use tempfile as _;
use thiserror as _;
use tracing as _;

fn fixtures() -> PathBuf {
	PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn loader(registry: &TooltipRegistry) -> TooltipLoader<'_> {
	let config = Config {
		root: fixtures(),
		..Config::default()
	};
	TooltipLoader::new(registry, &config).unwrap()
}

#[test]
fn every_fixture_loads() {
	let registry = TooltipRegistry::new();
	let report = loader(&registry).load_all().unwrap();

	assert!(report.skipped.is_empty(), "{:?}", report.skipped);
	assert_eq!(
		registry.groups(),
		vec![
			GroupKey::from("File:extensions/bit.lua"),
			GroupKey::from("File:extensions/entity.lua"),
			GroupKey::from("File:extensions/math.lua"),
			GroupKey::from("File:libraries/unit.lua"),
			GroupKey::from("LuaClass:Extensions.Color"),
		]
	);
	assert_eq!(report.entries(), 8 + 3 + 3 + 5 + 10);
	assert!(report.loaded.iter().all(|g| g.action == InsertAction::InsertedNew));
}

#[test]
fn math_sign_resolves_and_unknown_id_misses() {
	let registry = TooltipRegistry::new();
	loader(&registry).load_all().unwrap();

	let html = registry.lookup("File:extensions/math.lua", 28).unwrap();
	assert!(html.starts_with(r#"<div class="NDToolTip TShared LLua"><div id="NDPrototype28""#));
	assert!(html.contains("math.Sign("));

	let fragment = Fragment::inspect(&html);
	assert_eq!(fragment.prototype.as_deref(), Some("function math.Sign(value)"));
	assert_eq!(fragment.summary.as_deref(), Some("Returns the sign of a number."));

	assert!(registry.lookup("File:extensions/math.lua", 99).is_none());
	assert!(registry.lookup("File:extensions/vector.lua", 28).is_none());
}

#[test]
fn escaped_apostrophes_are_decoded() {
	let path = fixtures().join("files/extensions/entity-lua-SummaryToolTips.js");
	let table = read_table(&path).unwrap();
	let (_, html) = table
		.entries
		.iter()
		.find(|(id, _)| id.get() == 22)
		.unwrap();

	assert!(html.contains("an entity's bodygroups"));
	assert!(!html.contains('\\'));

	let fragment = Fragment::inspect(html);
	assert_eq!(
		fragment.prototype.as_deref(),
		Some("function entity:ClearBodyGroups()")
	);
}

#[test]
fn topic_types_follow_container_classes() {
	let registry = TooltipRegistry::new();
	let loader = loader(&registry);
	let group = loader.ensure_group("File:extensions/entity.lua").unwrap().unwrap();

	let topics: Vec<_> = group
		.sorted()
		.into_iter()
		.map(|(id, html)| (id.get(), Fragment::inspect(html).topic.map(|t| t.as_str().to_string())))
		.collect();
	assert_eq!(
		topics,
		vec![
			(19, Some("Class".to_string())),
			(21, Some("Server".to_string())),
			(22, Some("Shared".to_string())),
		]
	);
}

#[test]
fn class_group_loads_on_demand() {
	let registry = TooltipRegistry::new();
	let loader = loader(&registry);

	let html = loader
		.lookup_or_load("LuaClass:Extensions.Color", 45)
		.unwrap()
		.unwrap();
	let fragment = Fragment::inspect(&html);
	assert_eq!(fragment.topic, Some(TopicType::Class));
	assert_eq!(fragment.language, Some("Lua"));
	assert_eq!(
		fragment.summary.as_deref(),
		Some("Color related functions and metatable extensions.")
	);
	assert_eq!(registry.len(), 1);
}

#[test]
fn wide_form_parameters_are_spaced() {
	let registry = TooltipRegistry::new();
	let loader = loader(&registry);

	let html = loader.lookup_or_load("File:extensions/bit.lua", 34).unwrap().unwrap();
	assert_eq!(
		Fragment::inspect(&html).prototype.as_deref(),
		Some("function bit.Pack(bitCount, ...)")
	);
}
