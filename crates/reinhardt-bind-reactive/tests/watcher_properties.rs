//! Property tests for write propagation
//!
//! 1. Every callback sees the final value of each effective write and the previous cached value
//! 2. Repeating a write is never observed twice

use proptest::prelude::*;
use reinhardt_bind_reactive::{Mapping, Value, Watcher, observe};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

fn reactive_counter() -> Mapping {
	let data = Mapping::from_json(json!({ "counter": { "n": 0 } }));
	observe(&Value::Map(data.clone()));
	data
}

proptest! {
	#[test]
	fn test_callbacks_converge_on_last_write(writes in prop::collection::vec(0i32..5, 1..40)) {
		let data = reactive_counter();
		let calls: Rc<RefCell<Vec<(Value, Value)>>> = Rc::new(RefCell::new(Vec::new()));
		let sink = calls.clone();
		let watcher = Watcher::with_path(data.clone(), "counter.n", move |new, old| {
			sink.borrow_mut().push((new.clone(), old.clone()));
		})
		.unwrap();

		let counter = data.get_untracked("counter");
		let counter = counter.as_map().unwrap();
		let mut expected = Vec::new();
		let mut current = 0;
		for n in writes {
			counter.set("n", n);
			if n != current {
				expected.push((Value::from(n), Value::from(current)));
				current = n;
			}
		}

		prop_assert_eq!(watcher.value(), Value::from(current));
		prop_assert_eq!(&*calls.borrow(), &expected);
	}

	#[test]
	fn test_repeated_write_fires_once(value in "[a-z]{0,8}") {
		let data = Mapping::from_json(json!({ "text": null }));
		observe(&Value::Map(data.clone()));
		let calls = Rc::new(RefCell::new(0usize));
		let sink = calls.clone();
		let _watcher = Watcher::with_path(data.clone(), "text", move |_, _| {
			*sink.borrow_mut() += 1;
		})
		.unwrap();

		data.set("text", value.as_str());
		data.set("text", value.as_str());

		prop_assert_eq!(*calls.borrow(), 1);
	}
}
