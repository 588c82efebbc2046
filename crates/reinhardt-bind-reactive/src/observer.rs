//! Observer - Reactivity Transformer
//!
//! Walks a data graph and turns every plain key of every mapping into a
//! reactive [`Property`](crate::Property). Nested mappings are transformed
//! before the key that holds them, and values written later through a
//! reactive key are transformed on the way in.
//!
//! Keys that are already reactive are skipped, which makes the walk idempotent.
//! Arrays are not walked.

use std::collections::HashSet;

use crate::value::{Mapping, Value};

/// Make `value` reactive
///
/// Anything other than a mapping (including `Null` and `Undefined`) is ignored.
///
/// # Example
///
/// ```ignore
/// let data = Mapping::from_json(json!({ "a": { "b": 1 } }));
/// observe(&Value::Map(data.clone()));
/// assert!(data.is_reactive("a"));
/// ```
pub fn observe(value: &Value) {
	if let Value::Map(mapping) = value {
		Observer::new().walk(mapping);
	}
}

/// Recursive walker behind [`observe`]
///
/// Remembers the mappings it is visiting so a cyclic graph terminates.
#[derive(Debug, Default)]
pub struct Observer {
	visiting: HashSet<usize>,
	transformed: usize,
}

impl Observer {
	/// Create a walker with no history
	pub fn new() -> Self {
		Self::default()
	}

	/// Transform every plain key of `mapping`, depth first
	pub fn walk(&mut self, mapping: &Mapping) {
		if !self.visiting.insert(mapping.addr()) {
			return;
		}

		for (key, value) in mapping.plain_entries() {
			if let Value::Map(nested) = &value {
				self.walk(nested);
			}
			if mapping.define_reactive(&key, value) {
				self.transformed += 1;
			}
		}

		self.visiting.remove(&mapping.addr());
		tracing::trace!(keys = mapping.len(), "observed mapping");
	}

	/// Number of keys converted by this walker so far
	pub fn transformed(&self) -> usize {
		self.transformed
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;
	use serial_test::serial;

	#[test]
	#[serial]
	fn test_non_mapping_is_ignored() {
		observe(&Value::Null);
		observe(&Value::Undefined);
		observe(&Value::from(3));
		observe(&Value::from(vec![Value::Map(Mapping::new())]));
	}

	#[test]
	#[serial]
	fn test_nested_mappings_become_reactive() {
		let data = Mapping::from_json(json!({ "a": { "b": 1 }, "c": "x" }));
		observe(&Value::Map(data.clone()));

		assert!(data.is_reactive("a"));
		assert!(data.is_reactive("c"));
		let nested = data.get_untracked("a");
		assert!(nested.as_map().is_some_and(|m| m.is_reactive("b")));
	}

	#[test]
	#[serial]
	fn test_transformation_is_idempotent() {
		let data = Mapping::from_json(json!({ "a": 1 }));
		let mut observer = Observer::new();
		observer.walk(&data);
		let property = data.property("a");

		observer.walk(&data);
		observe(&Value::Map(data.clone()));

		assert_eq!(observer.transformed(), 1);
		assert!(std::rc::Rc::ptr_eq(
			&property.unwrap(),
			&data.property("a").unwrap()
		));
	}

	#[test]
	#[serial]
	fn test_keys_stay_enumerable() {
		let data = Mapping::from_json(json!({ "first": 1, "second": 2 }));
		observe(&Value::Map(data.clone()));
		assert_eq!(data.keys(), vec!["first", "second"]);
	}

	#[test]
	#[serial]
	fn test_cycle_terminates() {
		let data = Mapping::new();
		data.set("me", data.clone());
		observe(&Value::Map(data.clone()));
		assert!(data.is_reactive("me"));
	}

	#[test]
	#[serial]
	fn test_written_mapping_is_transformed() {
		let data = Mapping::from_json(json!({ "a": null }));
		observe(&Value::Map(data.clone()));

		let replacement = Mapping::from_json(json!({ "b": 3 }));
		data.set("a", replacement.clone());
		assert!(replacement.is_reactive("b"));
	}
}
