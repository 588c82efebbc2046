//! Watcher - Expression Subscriber
//!
//! A `Watcher` evaluates one expression against a context mapping, caches the
//! result, and re-evaluates whenever a property it read changes. If the new
//! value strictly differs from the cached one, its callback receives
//! `(new, old)`.
//!
//! ## Dependency Discovery
//!
//! `evaluate()` pushes the watcher as the runtime's active collector, runs the
//! getter, and pops it again. Every reactive read in between registers the
//! watcher with that property's [`Dep`](crate::Dep). There is no explicit
//! subscribe call.
//!
//! ## Example
//!
//! ```ignore
//! use reinhardt_bind_reactive::{Mapping, Value, Watcher, observe};
//!
//! let data = Mapping::from_json(json!({ "a": { "b": 1 } }));
//! observe(&Value::Map(data.clone()));
//!
//! let watcher = Watcher::with_path(data.clone(), "a.b", |new, old| {
//!     println!("{old} -> {new}");
//! })?;
//! assert_eq!(watcher.value(), Value::from(1));
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::path::{Path, PathError};
use crate::runtime::{CollectorGuard, NodeId, Subscriber};
use crate::value::{Mapping, Value};

/// Type alias for precompiled getters
pub type Getter = Rc<dyn Fn(&Mapping) -> Value>;

/// Type alias for change callbacks, called with `(new, old)`
pub type WatchCallback = Box<dyn Fn(&Value, &Value)>;

/// What a watcher evaluates
#[derive(Clone)]
pub enum Expression {
	/// A dotted path resolved from the context
	Path(Path),
	/// A pure function of the context
	Getter(Getter),
}

impl Expression {
	/// Parse a dotted path expression
	pub fn path(expression: &str) -> Result<Self, PathError> {
		Path::parse(expression).map(Expression::Path)
	}

	/// Wrap a getter function
	pub fn getter<F>(f: F) -> Self
	where
		F: Fn(&Mapping) -> Value + 'static,
	{
		Expression::Getter(Rc::new(f))
	}

	/// Evaluate against `context`
	///
	/// Tracking only happens if a collector is active.
	pub fn evaluate(&self, context: &Mapping) -> Value {
		match self {
			Expression::Path(path) => path.read(context),
			Expression::Getter(getter) => getter(context),
		}
	}
}

impl From<Path> for Expression {
	fn from(path: Path) -> Self {
		Expression::Path(path)
	}
}

impl TryFrom<&str> for Expression {
	type Error = PathError;

	fn try_from(value: &str) -> Result<Self, Self::Error> {
		Expression::path(value)
	}
}

impl fmt::Debug for Expression {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Expression::Path(path) => f.debug_tuple("Path").field(&path.as_str()).finish(),
			Expression::Getter(_) => f.write_str("Getter(..)"),
		}
	}
}

/// A subscriber that tracks one expression's value
pub struct Watcher {
	/// Unique identifier for this watcher
	id: NodeId,
	/// Context the expression is resolved from
	context: Mapping,
	expression: Expression,
	callback: Option<WatchCallback>,
	/// Last observed value
	value: RefCell<Value>,
	/// Self reference pushed onto the collector stack during evaluation
	this: Weak<Watcher>,
}

impl Watcher {
	/// Create a watcher and evaluate it once
	///
	/// The initial evaluation registers the watcher with every reactive
	/// property it reads and caches the value for the first comparison.
	/// The callback is not called for the initial value.
	pub fn new<F>(context: Mapping, expression: Expression, callback: F) -> Rc<Self>
	where
		F: Fn(&Value, &Value) + 'static,
	{
		Self::build(context, expression, Some(Box::new(callback)))
	}

	/// Create a watcher from a dotted path
	pub fn with_path<F>(context: Mapping, expression: &str, callback: F) -> Result<Rc<Self>, PathError>
	where
		F: Fn(&Value, &Value) + 'static,
	{
		Ok(Self::new(context, Expression::path(expression)?, callback))
	}

	/// Create a watcher that only keeps its value current
	pub fn silent(context: Mapping, expression: Expression) -> Rc<Self> {
		Self::build(context, expression, None)
	}

	fn build(context: Mapping, expression: Expression, callback: Option<WatchCallback>) -> Rc<Self> {
		let watcher = Rc::new_cyclic(|this| Self {
			id: NodeId::new(),
			context,
			expression,
			callback,
			value: RefCell::new(Value::Undefined),
			this: this.clone(),
		});

		let initial = watcher.evaluate();
		tracing::debug!(watcher = ?watcher.id, expression = ?watcher.expression, value = %initial, "watcher created");
		*watcher.value.borrow_mut() = initial;
		watcher
	}

	/// Evaluate the expression with this watcher as the active collector
	pub fn evaluate(&self) -> Value {
		let this: Weak<dyn Subscriber> = self.this.clone();
		let _collector = CollectorGuard::enter(this);
		self.expression.evaluate(&self.context)
	}

	/// The cached value from the last evaluation
	pub fn value(&self) -> Value {
		self.value.borrow().clone()
	}

	/// The watched expression
	pub fn expression(&self) -> &Expression {
		&self.expression
	}

	/// The context the expression is resolved from
	pub fn context(&self) -> &Mapping {
		&self.context
	}
}

impl Subscriber for Watcher {
	fn id(&self) -> NodeId {
		self.id
	}

	/// Re-evaluate; on a strict change update the cache and call the callback
	fn update(&self) {
		let value = self.evaluate();
		let old = self.value.borrow().clone();
		if value == old {
			return;
		}

		*self.value.borrow_mut() = value.clone();
		tracing::debug!(watcher = ?self.id, old = %old, new = %value, "watcher changed");
		if let Some(callback) = &self.callback {
			callback(&value, &old);
		}
	}
}

impl fmt::Debug for Watcher {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Watcher")
			.field("id", &self.id)
			.field("expression", &self.expression)
			.field("value", &*self.value.borrow())
			.finish()
	}
}
