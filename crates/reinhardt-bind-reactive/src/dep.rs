//! Dep - Per-Property Subscriber Registry
//!
//! Every reactive property owns exactly one `Dep`. Reading the property while a
//! subscriber is evaluating registers that subscriber; writing a different value
//! notifies every registered subscriber in registration order.
//!
//! Subscribers are held weakly. A subscriber that has been dropped (for example
//! because the binding scope that owned it was torn down) is skipped on the next
//! notification. Dead entries are pruned on every registration and notification,
//! so a property that is only ever read does not accumulate them.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::runtime::{NodeId, Subscriber, with_runtime};

/// Ordered, duplicate-free list of subscribers for one reactive property
pub struct Dep {
	/// Unique identifier for this dep
	id: NodeId,
	/// Registered subscribers, in registration order
	subscribers: RefCell<Vec<(NodeId, Weak<dyn Subscriber>)>>,
}

impl Dep {
	/// Create an empty dep
	pub fn new() -> Self {
		Self {
			id: NodeId::new(),
			subscribers: RefCell::new(Vec::new()),
		}
	}

	/// Get the NodeId of this dep
	pub fn id(&self) -> NodeId {
		self.id
	}

	/// Register a subscriber unless it is already present
	///
	/// De-duplication is by subscriber identity ([`Subscriber::id`]).
	/// Returns `true` when the subscriber was newly added.
	pub fn add_subscriber(&self, subscriber: &Rc<dyn Subscriber>) -> bool {
		let id = subscriber.id();
		let mut subscribers = self.subscribers.borrow_mut();
		subscribers.retain(|(_, subscriber)| subscriber.strong_count() > 0);
		if subscribers.iter().any(|(existing, _)| *existing == id) {
			return false;
		}
		subscribers.push((id, Rc::downgrade(subscriber)));
		tracing::trace!(dep = ?self.id, subscriber = ?id, "registered subscriber");
		true
	}

	/// Register the runtime's active collector, if there is one
	///
	/// This is the implicit half of dependency tracking: it is called on every
	/// reactive read and is a no-op outside of an evaluation.
	pub fn depend(&self) {
		if let Some(observer) = with_runtime(|rt| rt.current_observer()) {
			self.add_subscriber(&observer);
		}
	}

	/// Invoke `update()` on every live subscriber, in registration order
	///
	/// The list is snapshotted first so that subscribers may re-register
	/// (or register new subscribers) while being notified.
	pub fn notify(&self) {
		let snapshot: Vec<Weak<dyn Subscriber>> = {
			let mut subscribers = self.subscribers.borrow_mut();
			subscribers.retain(|(_, subscriber)| subscriber.strong_count() > 0);
			subscribers
				.iter()
				.map(|(_, subscriber)| subscriber.clone())
				.collect()
		};

		tracing::debug!(dep = ?self.id, subscribers = snapshot.len(), "notifying");

		for subscriber in snapshot {
			// Dropped mid-cascade
			if let Some(subscriber) = subscriber.upgrade() {
				subscriber.update();
			}
		}
	}

	/// Number of live subscribers
	pub fn subscriber_count(&self) -> usize {
		self.subscribers
			.borrow()
			.iter()
			.filter(|(_, subscriber)| subscriber.strong_count() > 0)
			.count()
	}

	/// Whether `id` is registered and still alive
	pub fn has_subscriber(&self, id: NodeId) -> bool {
		self.subscribers
			.borrow()
			.iter()
			.any(|(existing, subscriber)| *existing == id && subscriber.strong_count() > 0)
	}
}

impl Default for Dep {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for Dep {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Dep")
			.field("id", &self.id)
			.field("subscribers", &self.subscriber_count())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serial_test::serial;
	use std::cell::RefCell;

	struct Recorder {
		id: NodeId,
		name: &'static str,
		log: Rc<RefCell<Vec<&'static str>>>,
	}

	impl Subscriber for Recorder {
		fn id(&self) -> NodeId {
			self.id
		}

		fn update(&self) {
			self.log.borrow_mut().push(self.name);
		}
	}

	fn recorder(name: &'static str, log: &Rc<RefCell<Vec<&'static str>>>) -> Rc<dyn Subscriber> {
		Rc::new(Recorder {
			id: NodeId::new(),
			name,
			log: log.clone(),
		})
	}

	#[test]
	#[serial]
	fn test_add_subscriber_deduplicates() {
		let dep = Dep::new();
		let log = Rc::new(RefCell::new(Vec::new()));
		let a = recorder("a", &log);

		assert!(dep.add_subscriber(&a));
		assert!(!dep.add_subscriber(&a));
		assert_eq!(dep.subscriber_count(), 1);

		dep.notify();
		assert_eq!(*log.borrow(), vec!["a"]);
	}

	#[test]
	#[serial]
	fn test_notify_in_registration_order() {
		let dep = Dep::new();
		let log = Rc::new(RefCell::new(Vec::new()));
		let first = recorder("first", &log);
		let second = recorder("second", &log);
		let third = recorder("third", &log);

		dep.add_subscriber(&second);
		dep.add_subscriber(&first);
		dep.add_subscriber(&third);
		dep.notify();

		assert_eq!(*log.borrow(), vec!["second", "first", "third"]);
	}

	#[test]
	#[serial]
	fn test_dropped_subscriber_is_skipped_and_pruned() {
		let dep = Dep::new();
		let log = Rc::new(RefCell::new(Vec::new()));
		let kept = recorder("kept", &log);
		let dropped = recorder("dropped", &log);
		let dropped_id = dropped.id();

		dep.add_subscriber(&dropped);
		dep.add_subscriber(&kept);
		drop(dropped);

		dep.notify();
		assert_eq!(*log.borrow(), vec!["kept"]);
		assert!(!dep.has_subscriber(dropped_id));
		assert_eq!(dep.subscriber_count(), 1);
	}

	#[test]
	#[serial]
	fn test_registration_prunes_dropped_subscribers() {
		let dep = Dep::new();
		let log = Rc::new(RefCell::new(Vec::new()));
		for _ in 0..1000 {
			let transient = recorder("transient", &log);
			dep.add_subscriber(&transient);
		}
		assert!(dep.subscribers.borrow().len() <= 1);

		let kept = recorder("kept", &log);
		dep.add_subscriber(&kept);
		assert_eq!(dep.subscribers.borrow().len(), 1);
		assert!(dep.has_subscriber(kept.id()));
		assert!(log.borrow().is_empty());
	}

	#[test]
	#[serial]
	fn test_depend_without_collector_is_noop() {
		let dep = Dep::new();
		dep.depend();
		assert_eq!(dep.subscriber_count(), 0);
	}

	#[test]
	#[serial]
	fn test_depend_registers_active_collector() {
		let dep = Dep::new();
		let log = Rc::new(RefCell::new(Vec::new()));
		let active = recorder("active", &log);

		with_runtime(|rt| rt.push_observer(Rc::downgrade(&active)));
		dep.depend();
		dep.depend();
		with_runtime(|rt| rt.pop_observer());

		assert!(dep.has_subscriber(active.id()));
		assert_eq!(dep.subscriber_count(), 1);
	}
}
