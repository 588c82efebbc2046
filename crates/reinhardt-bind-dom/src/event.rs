//! Events
//!
//! Listeners are registered per element and event type. Dispatch runs the
//! target's listeners, then bubbles through its ancestors until a handler
//! stops propagation.

use core::sync::atomic::{AtomicUsize, Ordering};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::node::Node;

/// Type alias for event handler functions
pub type EventHandler = Rc<dyn Fn(&Event) + 'static>;

/// Identifies one registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

impl ListenerId {
	fn new() -> Self {
		static COUNTER: AtomicUsize = AtomicUsize::new(0);
		Self(COUNTER.fetch_add(1, Ordering::Relaxed))
	}
}

pub(crate) struct Listener {
	pub(crate) id: ListenerId,
	pub(crate) event_type: String,
	pub(crate) handler: EventHandler,
}

impl Listener {
	pub(crate) fn new(event_type: &str, handler: EventHandler) -> Self {
		Self {
			id: ListenerId::new(),
			event_type: event_type.to_string(),
			handler,
		}
	}
}

/// An event being dispatched
pub struct Event {
	event_type: String,
	target: Node,
	current_target: RefCell<Option<Node>>,
	propagation_stopped: Cell<bool>,
}

impl Event {
	fn new(event_type: &str, target: Node) -> Self {
		Self {
			event_type: event_type.to_string(),
			target,
			current_target: RefCell::new(None),
			propagation_stopped: Cell::new(false),
		}
	}

	/// The event type, e.g. `"click"`
	pub fn event_type(&self) -> &str {
		&self.event_type
	}

	/// The node the event was dispatched on
	pub fn target(&self) -> &Node {
		&self.target
	}

	/// The node whose listeners are currently running
	pub fn current_target(&self) -> Option<Node> {
		self.current_target.borrow().clone()
	}

	/// Stop bubbling after the current node's listeners
	pub fn stop_propagation(&self) {
		self.propagation_stopped.set(true);
	}
}

impl fmt::Debug for Event {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Event")
			.field("event_type", &self.event_type)
			.field("target", &self.target)
			.finish_non_exhaustive()
	}
}

impl Node {
	/// Dispatch an event of `event_type` at this node
	///
	/// Listeners added while dispatching are not run for this event.
	/// Returns the number of handlers invoked.
	pub fn dispatch_event(&self, event_type: &str) -> usize {
		let event = Event::new(event_type, self.clone());
		let mut invoked = 0;
		let mut current = Some(self.clone());

		while let Some(node) = current {
			let handlers = node.listeners_for(event_type);
			*event.current_target.borrow_mut() = Some(node.clone());
			for handler in handlers {
				handler(&event);
				invoked += 1;
			}
			if event.propagation_stopped.get() {
				break;
			}
			current = node.parent();
		}

		tracing::trace!(event_type, invoked, "dispatched event");
		invoked
	}

	/// Simulate user input: write the control's value and dispatch `input`
	pub fn input(&self, value: &str) -> usize {
		self.set_value(value);
		self.dispatch_event("input")
	}

	/// Simulate a click
	pub fn click(&self) -> usize {
		self.dispatch_event("click")
	}
}
