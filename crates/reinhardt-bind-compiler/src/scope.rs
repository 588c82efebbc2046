//! Binding lifetime
//!
//! A [`BindingScope`] owns everything one compilation created: the watchers
//! (dependency registries only hold them weakly) and the listener
//! registrations on the compiled nodes. Tearing the scope down, explicitly or
//! by dropping it, stops every binding at once.

use std::fmt;
use std::rc::Rc;

use reinhardt_bind_dom::{ListenerId, Node};
use reinhardt_bind_reactive::Watcher;

/// Owner of the watchers and listeners created for one template
#[derive(Default)]
pub struct BindingScope {
	watchers: Vec<Rc<Watcher>>,
	listeners: Vec<(Node, ListenerId)>,
	torn_down: bool,
}

impl BindingScope {
	/// Create an empty scope
	pub fn new() -> Self {
		Self::default()
	}

	/// Keep `watcher` alive for the lifetime of the scope
	///
	/// A torn-down scope becomes live again, so the next teardown releases it.
	pub fn add_watcher(&mut self, watcher: Rc<Watcher>) {
		self.watchers.push(watcher);
		self.torn_down = false;
	}

	/// Remember a listener so teardown can detach it
	pub fn add_listener(&mut self, node: Node, id: ListenerId) {
		self.listeners.push((node, id));
		self.torn_down = false;
	}

	/// Watchers owned by this scope, in creation order
	pub fn watchers(&self) -> &[Rc<Watcher>] {
		&self.watchers
	}

	/// Number of live watchers
	pub fn watcher_count(&self) -> usize {
		self.watchers.len()
	}

	/// Number of attached listeners
	pub fn listener_count(&self) -> usize {
		self.listeners.len()
	}

	/// Whether `teardown` has run
	pub fn is_torn_down(&self) -> bool {
		self.torn_down
	}

	/// Move every binding of `other` into this scope
	pub fn absorb(&mut self, mut other: BindingScope) {
		if !other.watchers.is_empty() || !other.listeners.is_empty() {
			self.torn_down = false;
		}
		self.watchers.append(&mut other.watchers);
		self.listeners.append(&mut other.listeners);
	}

	/// Detach listeners and release watchers
	///
	/// Calling this more than once is harmless.
	pub fn teardown(&mut self) {
		if self.torn_down {
			return;
		}
		let detached = self
			.listeners
			.drain(..)
			.filter(|(node, id)| node.remove_event_listener(*id))
			.count();
		let released = self.watchers.len();
		self.watchers.clear();
		self.torn_down = true;
		tracing::debug!(released, detached, "binding scope torn down");
	}
}

impl Drop for BindingScope {
	fn drop(&mut self) {
		self.teardown();
	}
}

impl fmt::Debug for BindingScope {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("BindingScope")
			.field("watchers", &self.watchers.len())
			.field("listeners", &self.listeners.len())
			.field("torn_down", &self.torn_down)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use reinhardt_bind_reactive::{Expression, Mapping, Subscriber, Value, observe};
	use serde_json::json;
	use serial_test::serial;

	#[test]
	#[serial]
	fn test_teardown_releases_watchers_and_listeners() {
		let data = Mapping::from_json(json!({ "n": 1 }));
		observe(&Value::Map(data.clone()));
		let button = Node::element("button");

		let mut scope = BindingScope::new();
		let watcher = Watcher::silent(data.clone(), Expression::path("n").unwrap());
		let id = watcher.id();
		scope.add_watcher(watcher);
		let listener = button.add_event_listener("click", |_| {}).unwrap();
		scope.add_listener(button.clone(), listener);

		scope.teardown();
		scope.teardown();

		assert!(scope.is_torn_down());
		assert_eq!(scope.watcher_count(), 0);
		assert_eq!(button.listener_count("click"), 0);

		data.set("n", 2);
		let property = data.property("n").unwrap();
		assert!(!property.dep().has_subscriber(id));
	}

	#[test]
	#[serial]
	fn test_bindings_added_after_teardown_are_released() {
		let data = Mapping::from_json(json!({ "n": 1 }));
		observe(&Value::Map(data.clone()));
		let mut scope = BindingScope::new();
		scope.teardown();

		let watcher = Watcher::silent(data.clone(), Expression::path("n").unwrap());
		let id = watcher.id();
		scope.add_watcher(watcher);
		assert!(!scope.is_torn_down());

		scope.teardown();
		assert!(scope.is_torn_down());
		assert_eq!(scope.watcher_count(), 0);
		assert!(!data.property("n").unwrap().dep().has_subscriber(id));
	}

	#[test]
	#[serial]
	fn test_drop_tears_down() {
		let button = Node::element("button");
		{
			let mut scope = BindingScope::new();
			let listener = button.add_event_listener("click", |_| {}).unwrap();
			scope.add_listener(button.clone(), listener);
		}
		assert_eq!(button.listener_count("click"), 0);
	}

	#[test]
	fn test_absorb_moves_bindings() {
		let button = Node::element("button");
		let mut outer = BindingScope::new();
		let mut inner = BindingScope::new();
		let listener = button.add_event_listener("click", |_| {}).unwrap();
		inner.add_listener(button.clone(), listener);

		outer.absorb(inner);
		assert_eq!(outer.listener_count(), 1);
		assert_eq!(button.listener_count("click"), 1);
	}
}
