//! Reactive Runtime
//!
//! This module owns the dependency-collection state shared by every [`Dep`](crate::Dep)
//! and [`Watcher`](crate::Watcher) on the current thread.
//!
//! ## Architecture
//!
//! Dependency discovery is implicit: a watcher pushes itself as the active collector,
//! runs its getter, and pops itself again. Every reactive property read that happens
//! in between registers the active collector into that property's `Dep`.
//!
//! 1. **Collector Stack**: Tracks the currently evaluating subscriber
//! 2. **Dependency Tracking**: `Property::get()` asks the runtime for the active collector
//! 3. **Synchronous Propagation**: `Property::set()` notifies subscribers before returning
//!
//! The collector is a stack rather than a single slot so that a nested evaluation
//! restores the outer collector instead of clearing it.
//!
//! ## Example
//!
//! ```ignore
//! use reinhardt_bind_reactive::{Mapping, Watcher, observe};
//!
//! let data = Mapping::from_json(serde_json::json!({ "count": 0 }));
//! observe(&data.clone().into());
//!
//! let watcher = Watcher::with_path(data.clone(), "count", |new, old| {
//!     println!("count: {old} -> {new}");
//! })?;
//!
//! // Notifies the watcher synchronously
//! data.set("count", 42);
//! ```

use core::sync::atomic::{AtomicUsize, Ordering};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Unique identifier for reactive nodes (deps and subscribers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
	/// Create a new unique NodeId
	pub fn new() -> Self {
		static COUNTER: AtomicUsize = AtomicUsize::new(0);
		Self(COUNTER.fetch_add(1, Ordering::Relaxed))
	}
}

impl Default for NodeId {
	fn default() -> Self {
		Self::new()
	}
}

/// Anything a [`Dep`](crate::Dep) can notify.
///
/// Identity is the [`NodeId`]; two registrations with the same id are the same subscriber.
pub trait Subscriber {
	/// Identity used for de-duplication inside a dep
	fn id(&self) -> NodeId;

	/// Re-evaluate after a tracked property changed
	fn update(&self);
}

/// Per-thread reactive runtime
///
/// Holds the collector stack. In WASM there is only one thread, so this is
/// effectively a global; on native targets each thread gets its own instance.
pub struct Runtime {
	/// Collector stack for tracking the currently evaluating subscriber
	observer_stack: RefCell<Vec<Weak<dyn Subscriber>>>,
}

impl Runtime {
	/// Create a new Runtime instance
	pub fn new() -> Self {
		Self {
			observer_stack: RefCell::new(Vec::new()),
		}
	}

	/// Get the active collector, if any
	///
	/// Returns `None` outside of an evaluation, or when the collector has already been dropped.
	pub fn current_observer(&self) -> Option<Rc<dyn Subscriber>> {
		self.observer_stack
			.borrow()
			.last()
			.and_then(|observer| observer.upgrade())
	}

	/// Push a collector onto the stack
	///
	/// This should be called when starting to evaluate a subscriber's expression.
	pub fn push_observer(&self, observer: Weak<dyn Subscriber>) {
		self.observer_stack.borrow_mut().push(observer);
	}

	/// Pop a collector from the stack
	///
	/// This should be called when the evaluation finishes.
	pub fn pop_observer(&self) -> Option<Weak<dyn Subscriber>> {
		self.observer_stack.borrow_mut().pop()
	}

	/// Number of evaluations currently in progress on this thread
	pub fn depth(&self) -> usize {
		self.observer_stack.borrow().len()
	}
}

impl Default for Runtime {
	fn default() -> Self {
		Self::new()
	}
}

// Thread-local runtime instance
thread_local! {
	static RUNTIME: Runtime = Runtime::new();
}

/// Get a reference to the thread's runtime
///
/// # Example
///
/// ```ignore
/// use reinhardt_bind_reactive::runtime::with_runtime;
///
/// let collecting = with_runtime(|rt| rt.current_observer().is_some());
/// ```
pub fn with_runtime<F, R>(f: F) -> R
where
	F: FnOnce(&Runtime) -> R,
{
	RUNTIME.with(f)
}

/// Try to access the runtime (safe version for Drop implementations)
///
/// Returns None if the thread-local storage has been destroyed.
pub(crate) fn try_with_runtime<F, R>(f: F) -> Option<R>
where
	F: FnOnce(&Runtime) -> R,
{
	RUNTIME.try_with(f).ok()
}

/// Keeps a subscriber on top of the collector stack until dropped.
///
/// Popping in `Drop` guarantees the slot is cleared even if the getter panics.
pub(crate) struct CollectorGuard {
	_private: (),
}

impl CollectorGuard {
	pub(crate) fn enter(observer: Weak<dyn Subscriber>) -> Self {
		with_runtime(|rt| rt.push_observer(observer));
		Self { _private: () }
	}
}

impl Drop for CollectorGuard {
	fn drop(&mut self) {
		let _ = try_with_runtime(|rt| rt.pop_observer());
	}
}
