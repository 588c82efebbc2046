//! End-to-end binding scenarios
//!
//! Each test mounts a template through the facade and drives it the way a
//! page would: programmatic writes, simulated input, clicks.

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;
use reinhardt_bind::prelude::*;
use reinhardt_bind::reactive::Watcher;
use serde_json::json;
use serial_test::serial;

fn first(vm: &ViewModel, selector: &str) -> Node {
	vm.el().query_selector(selector).unwrap().unwrap()
}

#[test]
#[serial]
fn test_text_interpolation_follows_data() {
	let vm = ViewModel::mount(
		"<div><span>{{name}}</span></div>",
		Options::new().data(json!({ "name": "a" })),
	)
	.unwrap();
	let span = first(&vm, "span");
	assert_eq!(span.text_content(), "a");

	vm.data().set("name", "b");
	assert_eq!(span.text_content(), "b");
}

#[test]
#[serial]
fn test_attribute_bind_blanks_undefined() {
	let vm = ViewModel::mount(
		r#"<section><div v-bind:title="title"></div></section>"#,
		Options::new().data(json!({ "title": "x" })),
	)
	.unwrap();
	let div = first(&vm, "div");
	assert_eq!(div.get_attribute("title").as_deref(), Some("x"));
	assert!(!div.has_attribute("v-bind:title"));

	vm.data().set("title", Value::Undefined);
	assert_eq!(div.get_attribute("title").as_deref(), Some(""));
}

#[test]
#[serial]
fn test_model_round_trip() {
	let vm = ViewModel::mount(
		r#"<form><input v-model="msg"></form>"#,
		Options::new().data(json!({ "msg": "hi" })),
	)
	.unwrap();
	let input = first(&vm, "input");
	assert_eq!(input.value(), "hi");

	input.input("bye");
	assert_eq!(vm.get("msg").unwrap(), Value::from("bye"));

	vm.set("msg", "yo").unwrap();
	assert_eq!(input.value(), "yo");
}

#[test]
#[serial]
fn test_event_directive_dispatches_with_context() {
	let calls = Rc::new(RefCell::new(Vec::new()));
	let sink = calls.clone();
	let vm = ViewModel::mount(
		r#"<div><button v-on:click="click">go</button></div>"#,
		Options::new()
			.data(json!({ "label": "ctx" }))
			.method("click", move |data: &Mapping, event: &Event| {
				sink.borrow_mut()
					.push((data.get_untracked("label"), event.event_type().to_string()));
			}),
	)
	.unwrap();
	let button = first(&vm, "button");
	assert!(!button.has_attribute("v-on:click"));

	button.click();
	assert_eq!(
		*calls.borrow(),
		vec![(Value::from("ctx"), "click".to_string())]
	);
}

#[test]
#[serial]
fn test_nested_path_fires_on_leaf_and_replacement() {
	let mut vm = ViewModel::mount(
		"<p>{{ a.b }}</p>",
		Options::new().data(json!({ "a": { "b": 1 } })),
	)
	.unwrap();
	let fired = Rc::new(RefCell::new(Vec::new()));
	let sink = fired.clone();
	vm.watch("a.b", move |new, _| sink.borrow_mut().push(new.clone()))
		.unwrap();

	vm.set("a.b", 2).unwrap();
	assert_eq!(vm.el().text_content(), "2");

	vm.data().set("a", Mapping::from_json(json!({ "b": 3 })));
	assert_eq!(vm.el().text_content(), "3");
	assert_eq!(*fired.borrow(), vec![Value::from(2), Value::from(3)]);

	// The replacement is reactive too
	vm.set("a.b", 4).unwrap();
	assert_eq!(vm.el().text_content(), "4");
}

#[test]
#[serial]
fn test_interpolation_replaces_text_around_stray_angle() {
	let vm = ViewModel::mount(
		"<p>x < y: {{ name }}</p>",
		Options::new().data(json!({ "name": "a" })),
	)
	.unwrap();
	assert_eq!(vm.el().child_nodes().len(), 1);
	assert_eq!(vm.el().text_content(), "a");

	vm.set("name", "b").unwrap();
	assert_eq!(vm.el().text_content(), "b");
}

#[test]
#[serial]
fn test_initial_sync_before_any_write() {
	let vm = ViewModel::mount(
		r#"<div><i>{{ n }}</i><a v-bind:href="url"></a><input v-model="q"></div>"#,
		Options::new().data(json!({ "n": 0, "url": "/x", "q": "" })),
	)
	.unwrap();
	assert_eq!(
		vm.el().inner_html(),
		r#"<i>0</i><a href="/x"></a><input>"#
	);
	assert_eq!(first(&vm, "input").value(), "");
}

#[test]
#[serial]
fn test_path_miss_renders_empty_string() {
	let vm = ViewModel::mount(
		"<p>{{ missing.deep.key }}</p>",
		Options::new().data(json!({})),
	)
	.unwrap();
	assert_eq!(vm.get("missing.deep.key").unwrap(), Value::from(""));
	assert_eq!(vm.el().text_content(), "");
}

#[test]
#[serial]
fn test_repeated_write_updates_dom_once() {
	let vm = ViewModel::mount("<p>{{ n }}</p>", Options::new().data(json!({ "n": 1 }))).unwrap();
	let p = first(&vm, "p");
	let text = p.first_child().unwrap();

	vm.set("n", 2).unwrap();
	text.set_text_content("tampered");
	vm.set("n", 2).unwrap();
	assert_eq!(p.text_content(), "tampered");
}

#[test]
#[serial]
fn test_custom_grammar_from_settings() {
	let settings = BindSettings::from_toml_str(
		r#"
directive_prefix = "data-"
delimiters = ["${", "}"]
"#,
	)
	.unwrap();
	let vm = ViewModel::mount_with(
		r#"<div><b data-bind:class="kind">${ kind }</b></div>"#,
		Options::new().data(json!({ "kind": "warn" })),
		&settings,
	)
	.unwrap();
	assert_eq!(vm.el().inner_html(), r#"<b class="warn">warn</b>"#);
}

#[test]
#[serial]
fn test_teardown_detaches_everything() {
	let mut vm = ViewModel::mount(
		r#"<div><input v-model="msg"><span>{{ msg }}</span></div>"#,
		Options::new().data(json!({ "msg": "a" })),
	)
	.unwrap();
	vm.teardown();
	assert!(vm.scope().is_torn_down());

	first(&vm, "input").input("b");
	assert_eq!(vm.get("msg").unwrap(), Value::from("a"));
	vm.set("msg", "c").unwrap();
	assert_eq!(first(&vm, "span").text_content(), "a");
}

proptest! {
	#[test]
	fn test_text_binding_converges(writes in prop::collection::vec("[a-c]{0,2}", 1..25)) {
		let vm = ViewModel::mount("<p>{{ s }}</p>", Options::new().data(json!({ "s": "" }))).unwrap();
		let updates: Rc<RefCell<Vec<(Value, Value)>>> = Rc::new(RefCell::new(Vec::new()));
		let sink = updates.clone();
		let _watcher = Watcher::with_path(vm.data().clone(), "s", move |new, old| {
			sink.borrow_mut().push((new.clone(), old.clone()));
		})
		.unwrap();

		let mut expected = Vec::new();
		let mut current = String::new();
		for write in &writes {
			vm.set("s", write.as_str()).unwrap();
			if *write != current {
				expected.push((Value::from(write.as_str()), Value::from(current.as_str())));
				current = write.clone();
			}
			prop_assert_eq!(vm.el().text_content(), current.clone());
		}
		prop_assert_eq!(updates.borrow().clone(), expected);
	}
}
