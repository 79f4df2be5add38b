use std::sync::Arc;

use pretty_assertions::assert_eq;

use crate::{GroupKey, InsertAction, TooltipGroup, TooltipId, TooltipRegistry};

const MATH: &str = "File:extensions/math.lua";
const MATH_CLASS: &str = r#"<div class="NDToolTip TClass LLua"><div class="TTSummary">Extension functions for the math library.</div></div>"#;
const MATH_SIGN: &str = r#"<div class="NDToolTip TShared LLua"><div id="NDPrototype28" class="NDPrototype WideForm"><div class="PSection PParameterSection CStyle"><div class="PParameterCells" data-WideColumnCount="3" data-NarrowColumnCount="2"><div class="PBeforeParameters" data-WideGridArea="1/1/2/2" data-NarrowGridArea="1/1/2/3" style="grid-area:1/1/2/2"><span class="SHKeyword">function</span> math.Sign(</div><div class="PName InFirstParameterColumn InLastParameterColumn" data-WideGridArea="1/2/2/3" data-NarrowGridArea="2/1/3/2" style="grid-area:1/2/2/3">value</div><div class="PAfterParameters" data-WideGridArea="1/3/2/4" data-NarrowGridArea="3/1/4/3" style="grid-area:1/3/2/4">)</div></div></div></div><div class="TTSummary">Returns the sign of a number.</div></div>"#;

fn id(n: u32) -> TooltipId {
	TooltipId::new(n).expect("non-zero id")
}

fn math_registry() -> TooltipRegistry {
	let registry = TooltipRegistry::new();
	registry.register(MATH, [(id(26), MATH_CLASS), (id(28), MATH_SIGN)]);
	registry
}

#[test]
fn lookup_returns_registered_fragment() {
	let registry = math_registry();

	assert_eq!(registry.lookup(MATH, 28).as_deref(), Some(MATH_SIGN));
	assert_eq!(registry.lookup(MATH, 26).as_deref(), Some(MATH_CLASS));
	assert!(registry.lookup(MATH, 99).is_none());
}

#[test]
fn unknown_group_is_absent() {
	let registry = math_registry();

	assert!(registry.lookup("File:extensions/bit.lua", 28).is_none());
	assert!(registry.group("File:extensions/bit.lua").is_none());
	assert!(!registry.contains_group("File:extensions/bit.lua"));
}

#[test]
fn zero_id_is_absent() {
	let registry = math_registry();
	assert!(registry.lookup(MATH, 0).is_none());
}

#[test]
fn fragments_are_stored_verbatim() {
	let registry = TooltipRegistry::new();
	let odd = "<div class=\"x\">unclosed <b>bold & \u{00e9}\t</div></div>";
	registry.register("File:odd.lua", [(id(1), odd)]);

	let got = registry.lookup("File:odd.lua", 1).expect("registered");
	assert_eq!(got.as_bytes(), odd.as_bytes());
}

#[test]
fn reregistering_replaces_instead_of_merging() {
	let registry = math_registry();

	let action = registry.register(MATH, [(id(30), "<div>ClampedRemap</div>")]);
	assert_eq!(action, InsertAction::ReplacedExisting { previous_len: 2 });

	assert!(registry.lookup(MATH, 28).is_none());
	assert!(registry.lookup(MATH, 26).is_none());
	assert_eq!(registry.lookup(MATH, 30).as_deref(), Some("<div>ClampedRemap</div>"));
	assert_eq!(registry.len(), 1);
}

#[test]
fn first_registration_reports_insert() {
	let registry = TooltipRegistry::new();
	assert!(registry.is_empty());

	let action = registry.register(MATH, [(id(26), MATH_CLASS)]);
	assert_eq!(action, InsertAction::InsertedNew);
	assert_eq!(registry.generation(), 1);
}

#[test]
fn duplicate_ids_keep_the_later_fragment() {
	let group = TooltipGroup::new(MATH, [(id(5), "first"), (id(5), "second")]);
	assert_eq!(group.len(), 1);
	assert_eq!(group.get_raw(5).map(|s| &**s), Some("second"));
}

#[test]
fn group_listing_is_sorted() {
	let registry = TooltipRegistry::new();
	registry.register("LuaClass:Extensions.Color", [(id(45), "c")]);
	registry.register("File:libraries/unit.lua", [(id(88), "u")]);
	registry.register("File:extensions/bit.lua", [(id(32), "b")]);

	assert_eq!(
		registry.groups(),
		vec![
			GroupKey::from("File:extensions/bit.lua"),
			GroupKey::from("File:libraries/unit.lua"),
			GroupKey::from("LuaClass:Extensions.Color"),
		]
	);
}

#[test]
fn group_entries_sort_by_id() {
	let group = TooltipGroup::new(MATH, [(id(31), "d"), (id(26), "a"), (id(29), "c")]);
	let ids: Vec<u32> = group.sorted().into_iter().map(|(id, _)| id.get()).collect();
	assert_eq!(ids, vec![26, 29, 31]);
}

#[test]
fn snapshot_survives_later_registration() {
	let registry = math_registry();
	let before = registry.snapshot();

	registry.register(MATH, [(id(30), "replacement")]);

	assert_eq!(before.lookup(MATH, 28), Some(MATH_SIGN));
	assert_eq!(before.generation(), 1);
	assert!(registry.snapshot().lookup(MATH, 28).is_none());
	assert_eq!(registry.generation(), 2);
}

#[test]
fn snapshot_is_stable_without_mutation() {
	let registry = math_registry();
	let a = registry.snapshot();
	let b = registry.snapshot();
	assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn concurrent_registrations_are_not_lost() {
	let registry = TooltipRegistry::new();

	std::thread::scope(|scope| {
		for t in 0..8u32 {
			let registry = &registry;
			scope.spawn(move || {
				for g in 0..25u32 {
					let key = format!("File:thread{t}/group{g}.lua");
					registry.register(key, [(id(g + 1), format!("t{t}g{g}"))]);
				}
			});
		}
	});

	assert_eq!(registry.len(), 200);
	assert_eq!(registry.generation(), 200);
	assert_eq!(
		registry.lookup("File:thread3/group7.lua", 8).as_deref(),
		Some("t3g7")
	);
}

#[test]
fn global_registry_is_shared() {
	const KEY: &str = "File:tests/global-registry.lua";
	crate::register(KEY, [(id(3), "global")]);

	assert_eq!(crate::lookup(KEY, 3).as_deref(), Some("global"));
	assert!(TooltipRegistry::global().contains_group(KEY));
}
