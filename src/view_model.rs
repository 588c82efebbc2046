//! View Model
//!
//! A `ViewModel` owns one mounted template: the element, the reactive data
//! graph, the method table and the [`BindingScope`] produced by compiling the
//! element's children.
//!
//! ## Mounting
//!
//! 1. Resolve the mount element (directly or by selector)
//! 2. Make the data graph reactive with [`observe`]
//! 3. Move the element's children into a fragment
//! 4. Compile the fragment against the data
//! 5. Move the compiled children back under the element
//!
//! Paths in templates resolve from the data mapping itself, so `{{ name }}`
//! reads the `name` key of the data.

use std::rc::Rc;

use reinhardt_bind_compiler::{BindingScope, Methods};
use reinhardt_bind_dom::{Node, parse_html};
use reinhardt_bind_reactive::{Expression, Mapping, Path, Value, Watcher, observe};

use crate::error::BindError;
use crate::options::{Options, Template};
use crate::settings::BindSettings;

/// A template bound to a reactive data graph
pub struct ViewModel {
	el: Node,
	data: Mapping,
	methods: Methods,
	scope: BindingScope,
}

impl ViewModel {
	/// Mount `options` using `settings`
	///
	/// # Errors
	///
	/// - [`BindError::MissingElement`] when no `el` was given
	/// - [`BindError::ElementNotFound`] when a selector matches nothing
	/// - [`BindError::Settings`] when the settings are invalid
	pub fn new(options: Options, settings: &BindSettings) -> Result<Self, BindError> {
		let compiler = settings.compiler()?;
		let el = resolve(options.el.ok_or(BindError::MissingElement)?)?;

		let data = match options.data {
			Value::Map(mapping) => mapping,
			_ => Mapping::new(),
		};
		observe(&Value::Map(data.clone()));

		let fragment = el.take_children();
		let scope = compiler.compile(&fragment, &data, &options.methods);
		el.append_child(&fragment)?;

		tracing::debug!(
			el = ?el,
			watchers = scope.watcher_count(),
			listeners = scope.listener_count(),
			"view model mounted"
		);

		Ok(Self {
			el,
			data,
			methods: options.methods,
			scope,
		})
	}

	/// Parse `html` and mount on its first root element with default settings
	///
	/// # Example
	///
	/// ```ignore
	/// let vm = ViewModel::mount(
	///     r#"<div><span>{{ name }}</span></div>"#,
	///     Options::new().data(json!({ "name": "a" })),
	/// )?;
	/// assert_eq!(vm.el().outer_html(), "<div><span>a</span></div>");
	/// ```
	pub fn mount(html: &str, options: Options) -> Result<Self, BindError> {
		Self::mount_with(html, options, &BindSettings::default())
	}

	/// Like [`ViewModel::mount`] with explicit settings
	pub fn mount_with(html: &str, options: Options, settings: &BindSettings) -> Result<Self, BindError> {
		let fragment = parse_html(html)?;
		let root = fragment
			.child_nodes()
			.into_iter()
			.find(Node::is_element)
			.ok_or(BindError::EmptyTemplate)?;
		root.detach();
		Self::new(options.el(root), settings)
	}

	/// The mount element
	pub fn el(&self) -> &Node {
		&self.el
	}

	/// The reactive data graph
	pub fn data(&self) -> &Mapping {
		&self.data
	}

	/// The method table
	pub fn methods(&self) -> &Methods {
		&self.methods
	}

	/// The bindings created when mounting
	pub fn scope(&self) -> &BindingScope {
		&self.scope
	}

	/// Read a dotted path from the data
	pub fn get(&self, path: &str) -> Result<Value, BindError> {
		Ok(Path::parse(path)?.read(&self.data))
	}

	/// Write a dotted path in the data, propagating synchronously
	pub fn set(&self, path: &str, value: impl Into<Value>) -> Result<(), BindError> {
		Path::parse(path)?.assign(&self.data, value);
		Ok(())
	}

	/// Call `callback` with `(new, old)` whenever `expression` changes
	///
	/// The watcher lives as long as this view model's bindings, including
	/// when it is added after [`ViewModel::teardown`].
	pub fn watch<F>(&mut self, expression: &str, callback: F) -> Result<Rc<Watcher>, BindError>
	where
		F: Fn(&Value, &Value) + 'static,
	{
		let watcher = Watcher::new(self.data.clone(), Expression::path(expression)?, callback);
		self.scope.add_watcher(watcher.clone());
		Ok(watcher)
	}

	/// Stop every binding; the DOM keeps its last rendered state
	pub fn teardown(&mut self) {
		self.scope.teardown();
	}
}

fn resolve(template: Template) -> Result<Node, BindError> {
	match template {
		Template::Node(node) => Ok(node),
		Template::Selector { document, selector } => document
			.query_selector(&selector)?
			.ok_or(BindError::ElementNotFound(selector)),
	}
}
