//! DOM Nodes
//!
//! `Node` is a cheap-to-clone handle to a node in an in-memory tree. Children are
//! owned by their parent; parents are referenced weakly. The API mirrors the
//! subset of the browser DOM the binding compiler needs.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;

use crate::event::{Event, EventHandler, Listener, ListenerId};

/// Elements that never have children or a closing tag
pub const VOID_ELEMENTS: &[&str] = &[
	"area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
	"wbr",
];

/// Whether `tag_name` is a void element
pub fn is_void_element(tag_name: &str) -> bool {
	VOID_ELEMENTS
		.iter()
		.any(|void| void.eq_ignore_ascii_case(tag_name))
}

/// Errors raised by tree mutations and queries
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
	#[error("cannot insert a node into itself or one of its descendants")]
	HierarchyRequest,

	#[error("cannot append children to a {0:?} node")]
	NotAContainer(NodeType),

	#[error("invalid selector '{0}'")]
	InvalidSelector(String),
}

/// Kind of node, numbered like the DOM's `nodeType`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
	/// An element such as `<div>`
	Element = 1,
	/// A text node
	Text = 3,
	/// A comment
	Comment = 8,
	/// A detached container
	DocumentFragment = 11,
}

pub(crate) struct ElementData {
	pub(crate) tag_name: String,
	pub(crate) attributes: IndexMap<String, String>,
	/// Form-control value property; falls back to the `value` attribute
	pub(crate) value: Option<String>,
	pub(crate) listeners: Vec<Listener>,
}

pub(crate) enum NodeKind {
	Element(ElementData),
	Text(String),
	Comment(String),
	Fragment,
}

pub(crate) struct NodeInner {
	pub(crate) kind: NodeKind,
	parent: Weak<RefCell<NodeInner>>,
	children: Vec<Node>,
}

/// Handle to a node in the tree
#[derive(Clone)]
pub struct Node(pub(crate) Rc<RefCell<NodeInner>>);

impl Node {
	fn from_kind(kind: NodeKind) -> Self {
		Self(Rc::new(RefCell::new(NodeInner {
			kind,
			parent: Weak::new(),
			children: Vec::new(),
		})))
	}

	/// Create an element; the tag name is stored lowercase
	pub fn element(tag_name: &str) -> Self {
		Self::from_kind(NodeKind::Element(ElementData {
			tag_name: tag_name.to_ascii_lowercase(),
			attributes: IndexMap::new(),
			value: None,
			listeners: Vec::new(),
		}))
	}

	/// Create a text node
	pub fn text(data: impl Into<String>) -> Self {
		Self::from_kind(NodeKind::Text(data.into()))
	}

	/// Create a comment node
	pub fn comment(data: impl Into<String>) -> Self {
		Self::from_kind(NodeKind::Comment(data.into()))
	}

	/// Create an empty document fragment
	pub fn fragment() -> Self {
		Self::from_kind(NodeKind::Fragment)
	}

	/// The DOM `nodeType` of this node
	pub fn node_type(&self) -> NodeType {
		match self.0.borrow().kind {
			NodeKind::Element(_) => NodeType::Element,
			NodeKind::Text(_) => NodeType::Text,
			NodeKind::Comment(_) => NodeType::Comment,
			NodeKind::Fragment => NodeType::DocumentFragment,
		}
	}

	/// Whether this is an element
	pub fn is_element(&self) -> bool {
		self.node_type() == NodeType::Element
	}

	/// Whether this is a text node
	pub fn is_text(&self) -> bool {
		self.node_type() == NodeType::Text
	}

	/// Lowercase tag name for elements
	pub fn tag_name(&self) -> Option<String> {
		match &self.0.borrow().kind {
			NodeKind::Element(element) => Some(element.tag_name.clone()),
			_ => None,
		}
	}

	/// Identity comparison
	pub fn ptr_eq(&self, other: &Node) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}

	// ------------------------------------------------------------------
	// Tree
	// ------------------------------------------------------------------

	/// The parent node, if attached
	pub fn parent(&self) -> Option<Node> {
		self.0.borrow().parent.upgrade().map(Node)
	}

	/// Snapshot of the children, in order
	pub fn child_nodes(&self) -> Vec<Node> {
		self.0.borrow().children.clone()
	}

	/// The first child, if any
	pub fn first_child(&self) -> Option<Node> {
		self.0.borrow().children.first().cloned()
	}

	/// The last child, if any
	pub fn last_child(&self) -> Option<Node> {
		self.0.borrow().children.last().cloned()
	}

	/// Whether this node has children
	pub fn has_child_nodes(&self) -> bool {
		!self.0.borrow().children.is_empty()
	}

	fn is_container(&self) -> bool {
		matches!(
			self.0.borrow().kind,
			NodeKind::Element(_) | NodeKind::Fragment
		)
	}

	fn is_inclusive_ancestor_of(&self, node: &Node) -> bool {
		let mut current = Some(node.clone());
		while let Some(candidate) = current {
			if candidate.ptr_eq(self) {
				return true;
			}
			current = candidate.parent();
		}
		false
	}

	/// Append `child`, moving it out of its previous parent
	///
	/// Appending a fragment moves the fragment's children instead, leaving it empty.
	pub fn append_child(&self, child: &Node) -> Result<(), DomError> {
		if !self.is_container() {
			return Err(DomError::NotAContainer(self.node_type()));
		}
		if child.is_inclusive_ancestor_of(self) {
			return Err(DomError::HierarchyRequest);
		}

		if child.node_type() == NodeType::DocumentFragment {
			let moved = std::mem::take(&mut child.0.borrow_mut().children);
			for node in moved {
				node.0.borrow_mut().parent = Weak::new();
				self.attach(node);
			}
			return Ok(());
		}

		child.detach();
		self.attach(child.clone());
		Ok(())
	}

	fn attach(&self, child: Node) {
		child.0.borrow_mut().parent = Rc::downgrade(&self.0);
		self.0.borrow_mut().children.push(child);
	}

	/// Remove `child` from this node's children
	///
	/// Returns the removed node, or `None` if it was not a child.
	pub fn remove_child(&self, child: &Node) -> Option<Node> {
		let removed = {
			let mut inner = self.0.borrow_mut();
			let index = inner.children.iter().position(|c| c.ptr_eq(child))?;
			inner.children.remove(index)
		};
		removed.0.borrow_mut().parent = Weak::new();
		Some(removed)
	}

	/// Remove this node from its parent, if any
	pub fn detach(&self) {
		if let Some(parent) = self.parent() {
			parent.remove_child(self);
		}
	}

	/// Move every child of this node into a new fragment
	pub fn take_children(&self) -> Node {
		let fragment = Node::fragment();
		while let Some(child) = self.first_child() {
			// Only fails for cycles, which cannot occur with a fresh fragment
			let _ = fragment.append_child(&child);
		}
		fragment
	}

	/// All descendants in document order (excluding this node)
	pub fn descendants(&self) -> Vec<Node> {
		let mut out = Vec::new();
		for child in self.child_nodes() {
			out.push(child.clone());
			out.extend(child.descendants());
		}
		out
	}

	// ------------------------------------------------------------------
	// Text
	// ------------------------------------------------------------------

	/// Concatenated text of this node
	///
	/// Elements and fragments concatenate their descendant text nodes.
	pub fn text_content(&self) -> String {
		let inner = self.0.borrow();
		match &inner.kind {
			NodeKind::Text(data) | NodeKind::Comment(data) => data.clone(),
			NodeKind::Element(_) | NodeKind::Fragment => inner
				.children
				.iter()
				.filter(|child| child.node_type() != NodeType::Comment)
				.map(Node::text_content)
				.collect(),
		}
	}

	/// Replace the text of this node
	///
	/// On elements and fragments every child is replaced by a single text node
	/// (or removed, for an empty string).
	pub fn set_text_content(&self, text: &str) {
		let container = {
			let mut inner = self.0.borrow_mut();
			match &mut inner.kind {
				NodeKind::Text(data) | NodeKind::Comment(data) => {
					*data = text.to_string();
					false
				}
				NodeKind::Element(_) | NodeKind::Fragment => true,
			}
		};
		if !container {
			return;
		}

		for child in self.child_nodes() {
			self.remove_child(&child);
		}
		if !text.is_empty() {
			self.attach(Node::text(text));
		}
	}

	// ------------------------------------------------------------------
	// Attributes
	// ------------------------------------------------------------------

	/// Read an attribute (elements only)
	pub fn get_attribute(&self, name: &str) -> Option<String> {
		match &self.0.borrow().kind {
			NodeKind::Element(element) => element.attributes.get(name).cloned(),
			_ => None,
		}
	}

	/// Whether an attribute is present
	pub fn has_attribute(&self, name: &str) -> bool {
		self.get_attribute(name).is_some()
	}

	/// Set an attribute, keeping its position if it already exists
	///
	/// Ignored on non-elements.
	pub fn set_attribute(&self, name: &str, value: &str) {
		if let NodeKind::Element(element) = &mut self.0.borrow_mut().kind {
			element
				.attributes
				.insert(name.to_string(), value.to_string());
		}
	}

	/// Remove an attribute; returns whether it was present
	pub fn remove_attribute(&self, name: &str) -> bool {
		match &mut self.0.borrow_mut().kind {
			NodeKind::Element(element) => element.attributes.shift_remove(name).is_some(),
			_ => false,
		}
	}

	/// Snapshot of `(name, value)` pairs in source order
	pub fn attributes(&self) -> Vec<(String, String)> {
		match &self.0.borrow().kind {
			NodeKind::Element(element) => element
				.attributes
				.iter()
				.map(|(name, value)| (name.clone(), value.clone()))
				.collect(),
			_ => Vec::new(),
		}
	}

	/// Attribute names in source order
	pub fn attribute_names(&self) -> Vec<String> {
		self.attributes().into_iter().map(|(name, _)| name).collect()
	}

	// ------------------------------------------------------------------
	// Form controls
	// ------------------------------------------------------------------

	/// The control's current value
	///
	/// Until written, this reflects the `value` attribute (or `""`).
	pub fn value(&self) -> String {
		match &self.0.borrow().kind {
			NodeKind::Element(element) => element
				.value
				.clone()
				.or_else(|| element.attributes.get("value").cloned())
				.unwrap_or_default(),
			_ => String::new(),
		}
	}

	/// Write the control's value property (the attribute is untouched)
	pub fn set_value(&self, value: &str) {
		if let NodeKind::Element(element) = &mut self.0.borrow_mut().kind {
			element.value = Some(value.to_string());
		}
	}

	// ------------------------------------------------------------------
	// Events
	// ------------------------------------------------------------------

	/// Register `handler` for `event_type`
	///
	/// Returns `None` on non-elements.
	pub fn add_event_listener<F>(&self, event_type: &str, handler: F) -> Option<ListenerId>
	where
		F: Fn(&Event) + 'static,
	{
		self.add_event_handler(event_type, Rc::new(handler))
	}

	/// Register a shared handler for `event_type`
	pub fn add_event_handler(&self, event_type: &str, handler: EventHandler) -> Option<ListenerId> {
		match &mut self.0.borrow_mut().kind {
			NodeKind::Element(element) => {
				let listener = Listener::new(event_type, handler);
				let id = listener.id;
				element.listeners.push(listener);
				Some(id)
			}
			_ => None,
		}
	}

	/// Unregister a listener; returns whether it was found
	pub fn remove_event_listener(&self, id: ListenerId) -> bool {
		match &mut self.0.borrow_mut().kind {
			NodeKind::Element(element) => {
				let before = element.listeners.len();
				element.listeners.retain(|listener| listener.id != id);
				element.listeners.len() != before
			}
			_ => false,
		}
	}

	/// Number of listeners registered for `event_type`
	pub fn listener_count(&self, event_type: &str) -> usize {
		match &self.0.borrow().kind {
			NodeKind::Element(element) => element
				.listeners
				.iter()
				.filter(|listener| listener.event_type == event_type)
				.count(),
			_ => 0,
		}
	}

	pub(crate) fn listeners_for(&self, event_type: &str) -> Vec<EventHandler> {
		match &self.0.borrow().kind {
			NodeKind::Element(element) => element
				.listeners
				.iter()
				.filter(|listener| listener.event_type == event_type)
				.map(|listener| listener.handler.clone())
				.collect(),
			_ => Vec::new(),
		}
	}
}

impl fmt::Debug for Node {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.0.borrow().kind {
			NodeKind::Element(element) => f
				.debug_struct("Element")
				.field("tag_name", &element.tag_name)
				.field("attributes", &element.attributes)
				.finish_non_exhaustive(),
			NodeKind::Text(data) => f.debug_tuple("Text").field(data).finish(),
			NodeKind::Comment(data) => f.debug_tuple("Comment").field(data).finish(),
			NodeKind::Fragment => f.write_str("Fragment"),
		}
	}
}
