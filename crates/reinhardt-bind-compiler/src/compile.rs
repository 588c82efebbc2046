//! Directive Compiler
//!
//! Walks a DOM subtree once, depth first. Elements are scanned for directive
//! attributes and text nodes for an interpolation placeholder; every other
//! node kind is passed over. Children are always visited, whether or not
//! their parent carried a binding.
//!
//! ## Binding protocol
//!
//! For `Text`, `AttributeBind` and `Model` the compiler creates one
//! [`Watcher`] on the bound path. The watcher's first evaluation registers its
//! dependencies; its value is then written to the DOM immediately, and later
//! changes re-run the same update function with `(new, old)`.
//!
//! `Event` directives attach a native listener and create no watcher.
//!
//! ## Example
//!
//! ```ignore
//! let fragment = parse_html(r#"<span>{{ name }}</span>"#)?;
//! let data = Mapping::from_json(json!({ "name": "a" }));
//! observe(&Value::Map(data.clone()));
//!
//! let scope = Compiler::default().compile(&fragment, &data, &Methods::new());
//! data.set("name", "b");
//! assert_eq!(fragment.text_content(), "b");
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use reinhardt_bind_dom::{Event, Node, NodeType};
use reinhardt_bind_reactive::{Expression, Mapping, Path, Value, Watcher};

use crate::directive::Directive;
use crate::interpolation::Interpolation;
use crate::scope::BindingScope;
use crate::update;

/// Default directive attribute prefix
pub const DEFAULT_PREFIX: &str = "v-";

/// Type alias for methods callable from event directives
///
/// Methods receive the context mapping and the dispatched event.
pub type Method = Rc<dyn Fn(&Mapping, &Event)>;

/// Method table resolved by name from `v-on` directives
#[derive(Clone, Default)]
pub struct Methods {
	table: IndexMap<String, Method>,
}

impl Methods {
	/// Create an empty table
	pub fn new() -> Self {
		Self::default()
	}

	/// Register `method` under `name`, replacing any previous entry
	pub fn insert<F>(&mut self, name: impl Into<String>, method: F)
	where
		F: Fn(&Mapping, &Event) + 'static,
	{
		self.table.insert(name.into(), Rc::new(method));
	}

	/// Builder form of [`Methods::insert`]
	pub fn with<F>(mut self, name: impl Into<String>, method: F) -> Self
	where
		F: Fn(&Mapping, &Event) + 'static,
	{
		self.insert(name, method);
		self
	}

	/// Look up a method
	pub fn get(&self, name: &str) -> Option<Method> {
		self.table.get(name).cloned()
	}

	/// Whether `name` is registered
	pub fn contains(&self, name: &str) -> bool {
		self.table.contains_key(name)
	}

	/// Registered names in insertion order
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.table.keys().map(String::as_str)
	}

	/// Number of registered methods
	pub fn len(&self) -> usize {
		self.table.len()
	}

	/// Whether the table is empty
	pub fn is_empty(&self) -> bool {
		self.table.is_empty()
	}
}

impl fmt::Debug for Methods {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_set().entries(self.table.keys()).finish()
	}
}

/// Template compiler
#[derive(Debug, Clone)]
pub struct Compiler {
	prefix: String,
	interpolation: Interpolation,
}

impl Default for Compiler {
	fn default() -> Self {
		Self::new(DEFAULT_PREFIX, Interpolation::default())
	}
}

impl Compiler {
	/// Create a compiler for `prefix`-ed attributes and the given placeholder matcher
	pub fn new(prefix: impl Into<String>, interpolation: Interpolation) -> Self {
		Self {
			prefix: prefix.into(),
			interpolation,
		}
	}

	/// The directive attribute prefix
	pub fn prefix(&self) -> &str {
		&self.prefix
	}

	/// Compile `root` and its descendants against `context`
	///
	/// Bindings stay active while the returned scope is alive.
	///
	/// # Arguments
	///
	/// * `root` - Element, text node or fragment to compile
	/// * `context` - Mapping paths are resolved from
	/// * `methods` - Table `v-on` handlers are looked up in
	pub fn compile(&self, root: &Node, context: &Mapping, methods: &Methods) -> BindingScope {
		let mut scope = BindingScope::new();
		self.compile_node(root, context, methods, &mut scope);
		tracing::debug!(
			watchers = scope.watcher_count(),
			listeners = scope.listener_count(),
			"template compiled"
		);
		scope
	}

	fn compile_node(&self, node: &Node, context: &Mapping, methods: &Methods, scope: &mut BindingScope) {
		match node.node_type() {
			NodeType::Element => self.compile_element(node, context, methods, scope),
			NodeType::Text => self.compile_text(node, context, scope),
			NodeType::Comment | NodeType::DocumentFragment => {}
		}

		for child in node.child_nodes() {
			self.compile_node(&child, context, methods, scope);
		}
	}

	fn compile_element(&self, node: &Node, context: &Mapping, methods: &Methods, scope: &mut BindingScope) {
		for (name, value) in node.attributes() {
			let Some(parsed) = Directive::from_attribute(&self.prefix, &name, &value) else {
				continue;
			};
			node.remove_attribute(&name);

			match parsed {
				Ok(directive @ Directive::Event { .. }) => {
					self.attach_event(node, &directive, context, methods, scope)
				}
				Ok(directive) => self.bind(node, directive, context, scope),
				Err(error) => tracing::warn!(attribute = %name, %error, "skipping directive"),
			}
		}
	}

	fn compile_text(&self, node: &Node, context: &Mapping, scope: &mut BindingScope) {
		let text = node.text_content();
		match Directive::from_text(&self.interpolation, &text) {
			Some(Ok(directive)) => self.bind(node, directive, context, scope),
			Some(Err(error)) => tracing::warn!(%error, "skipping interpolation"),
			None => {}
		}
	}

	/// Create the watcher for a reactive directive and sync the DOM once
	fn bind(&self, node: &Node, directive: Directive, context: &Mapping, scope: &mut BindingScope) {
		let Some(path) = directive.path().cloned() else {
			return;
		};

		// Model bindings share the last value pushed either way
		let last_pushed = matches!(directive, Directive::Model { .. })
			.then(|| Rc::new(RefCell::new(Value::Undefined)));

		let watcher = {
			let node = node.clone();
			let directive = directive.clone();
			let last_pushed = last_pushed.clone();
			Watcher::new(
				context.clone(),
				Expression::Path(path.clone()),
				move |new, old| {
					update::apply(&directive, &node, new, Some(old));
					if let Some(last) = &last_pushed {
						*last.borrow_mut() = new.clone();
					}
				},
			)
		};

		let initial = watcher.value();
		update::apply(&directive, node, &initial, None);
		tracing::debug!(kind = directive.kind(), path = %path, value = %initial, "binding created");

		if let Some(last) = last_pushed {
			*last.borrow_mut() = initial;
			self.attach_model_input(node, path, last, context, scope);
		}
		scope.add_watcher(watcher);
	}

	/// Write user input back to the data graph
	fn attach_model_input(
		&self,
		node: &Node,
		path: Path,
		last_pushed: Rc<RefCell<Value>>,
		context: &Mapping,
		scope: &mut BindingScope,
	) {
		let context = context.clone();
		let handler = move |event: &Event| {
			let current = Value::from(event.target().value());
			if *last_pushed.borrow() == current {
				return;
			}
			*last_pushed.borrow_mut() = current.clone();
			path.assign(&context, current);
		};

		if let Some(id) = node.add_event_listener("input", handler) {
			scope.add_listener(node.clone(), id);
		}
	}

	fn attach_event(
		&self,
		node: &Node,
		directive: &Directive,
		context: &Mapping,
		methods: &Methods,
		scope: &mut BindingScope,
	) {
		let Directive::Event { event_type, method } = directive else {
			return;
		};
		let Some(event_type) = event_type else {
			tracing::warn!(method = %method, "event directive without an event type");
			return;
		};
		let Some(handler) = methods.get(method) else {
			tracing::warn!(method = %method, event_type = %event_type, "event handler not found");
			return;
		};

		let context = context.clone();
		let listener = node.add_event_listener(event_type, move |event| handler(&context, event));
		if let Some(id) = listener {
			tracing::debug!(method = %method, event_type = %event_type, "event listener attached");
			scope.add_listener(node.clone(), id);
		}
	}
}
