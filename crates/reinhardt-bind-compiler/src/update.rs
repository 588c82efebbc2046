//! DOM update functions
//!
//! One function per reactive directive. Each writes only when there is no
//! previous value (the initial sync) or the value strictly changed.

use reinhardt_bind_dom::Node;
use reinhardt_bind_reactive::Value;

use crate::directive::Directive;

/// String written into text content and control values
///
/// `undefined` and `null` both render as the empty string.
pub fn content_string(value: &Value) -> String {
	match value {
		Value::Undefined | Value::Null => String::new(),
		other => other.to_js_string(),
	}
}

/// String written into attributes; only `undefined` is blanked
pub fn attribute_string(value: &Value) -> String {
	match value {
		Value::Undefined => String::new(),
		other => other.to_js_string(),
	}
}

fn unchanged(value: &Value, old: Option<&Value>) -> bool {
	old.is_some_and(|old| old == value)
}

/// Replace the whole text content of `node`
pub fn text(node: &Node, value: &Value, old: Option<&Value>) -> bool {
	if unchanged(value, old) {
		return false;
	}
	node.set_text_content(&content_string(value));
	true
}

/// Set `attribute` on `node`
pub fn attribute(node: &Node, attribute: &str, value: &Value, old: Option<&Value>) -> bool {
	if unchanged(value, old) {
		return false;
	}
	node.set_attribute(attribute, &attribute_string(value));
	true
}

/// Write a form control's value property
pub fn model(node: &Node, value: &Value, old: Option<&Value>) -> bool {
	if unchanged(value, old) {
		return false;
	}
	node.set_value(&content_string(value));
	true
}

/// Dispatch to the update function for `directive`
///
/// Event directives have no update function and never write.
pub fn apply(directive: &Directive, node: &Node, value: &Value, old: Option<&Value>) -> bool {
	match directive {
		Directive::Text { .. } => text(node, value, old),
		Directive::AttributeBind { attribute: name, .. } => attribute(node, name, value, old),
		Directive::Model { .. } => model(node, value, old),
		Directive::Event { .. } => false,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(Value::Undefined, "", "")]
	#[case(Value::Null, "", "null")]
	#[case(Value::from(3), "3", "3")]
	#[case(Value::from(1.5), "1.5", "1.5")]
	#[case(Value::from(false), "false", "false")]
	#[case(Value::from("x"), "x", "x")]
	fn test_string_forms(#[case] value: Value, #[case] content: &str, #[case] attr: &str) {
		assert_eq!(content_string(&value), content);
		assert_eq!(attribute_string(&value), attr);
	}

	#[test]
	fn test_initial_write_always_happens() {
		let span = Node::element("span");
		assert!(text(&span, &Value::from(""), None));
		assert!(text(&span, &Value::from("a"), None));
		assert_eq!(span.text_content(), "a");
	}

	#[test]
	fn test_unchanged_value_is_skipped() {
		let div = Node::element("div");
		assert!(attribute(&div, "title", &Value::from("x"), None));
		div.set_attribute("title", "tampered");

		assert!(!attribute(&div, "title", &Value::from("x"), Some(&Value::from("x"))));
		assert_eq!(div.get_attribute("title").as_deref(), Some("tampered"));

		assert!(attribute(&div, "title", &Value::Undefined, Some(&Value::from("x"))));
		assert_eq!(div.get_attribute("title").as_deref(), Some(""));
	}

	#[test]
	fn test_nan_always_differs() {
		let input = Node::element("input");
		let nan = Value::from(f64::NAN);
		assert!(model(&input, &nan, Some(&nan)));
		assert_eq!(input.value(), "NaN");
	}

	#[test]
	fn test_apply_dispatches_per_variant() {
		let node = Node::element("input");
		let model_directive = Directive::from_attribute("v-", "v-model", "a")
			.unwrap()
			.unwrap();
		assert!(apply(&model_directive, &node, &Value::from("m"), None));
		assert_eq!(node.value(), "m");

		let event = Directive::Event {
			event_type: Some("click".into()),
			method: "go".into(),
		};
		assert!(!apply(&event, &node, &Value::from("m"), None));
	}
}
