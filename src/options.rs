//! View model options
//!
//! `Options` is a builder collecting what a [`ViewModel`](crate::ViewModel)
//! is mounted with: where (`el`), on what data (`data`), and which methods
//! event directives may call (`method`).

use std::fmt;

use reinhardt_bind_compiler::Methods;
use reinhardt_bind_dom::{Event, Node};
use reinhardt_bind_reactive::{Mapping, Value};

/// Where a view model mounts
#[derive(Debug, Clone)]
pub enum Template {
	/// An existing element
	Node(Node),
	/// The first element under `document` matching `selector`
	Selector { document: Node, selector: String },
}

impl Template {
	/// Mount point found by selector
	pub fn query(document: &Node, selector: impl Into<String>) -> Self {
		Template::Selector {
			document: document.clone(),
			selector: selector.into(),
		}
	}
}

impl From<Node> for Template {
	fn from(node: Node) -> Self {
		Template::Node(node)
	}
}

impl From<&Node> for Template {
	fn from(node: &Node) -> Self {
		Template::Node(node.clone())
	}
}

/// Builder for [`ViewModel`](crate::ViewModel)
///
/// # Example
///
/// ```ignore
/// let options = Options::new()
///     .el(Template::query(&document, "#app"))
///     .data(json!({ "count": 0 }))
///     .method("increment", |data, _event| { /* ... */ });
/// ```
#[derive(Clone, Default)]
pub struct Options {
	pub(crate) el: Option<Template>,
	pub(crate) data: Value,
	pub(crate) methods: Methods,
}

impl Options {
	/// Create empty options
	pub fn new() -> Self {
		Self::default()
	}

	/// Set the mount element
	pub fn el(mut self, el: impl Into<Template>) -> Self {
		self.el = Some(el.into());
		self
	}

	/// Set the data object
	///
	/// Accepts JSON or an existing [`Mapping`]; anything that is not a mapping
	/// is replaced by an empty one when mounting.
	pub fn data(mut self, data: impl Into<Value>) -> Self {
		self.data = data.into();
		self
	}

	/// Register a method for `v-on` directives
	pub fn method<F>(mut self, name: impl Into<String>, method: F) -> Self
	where
		F: Fn(&Mapping, &Event) + 'static,
	{
		self.methods.insert(name, method);
		self
	}

	/// Replace the whole method table
	pub fn methods(mut self, methods: Methods) -> Self {
		self.methods = methods;
		self
	}
}

impl fmt::Debug for Options {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Options")
			.field("el", &self.el)
			.field("data", &self.data)
			.field("methods", &self.methods)
			.finish()
	}
}
