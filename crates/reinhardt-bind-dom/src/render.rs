//! Serialization back to markup

use std::fmt::Write as _;

use crate::node::{Node, NodeKind, is_void_element};

/// Escape text content
pub fn escape_text(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			_ => out.push(c),
		}
	}
	out
}

/// Escape a double-quoted attribute value
pub fn escape_attribute(value: &str) -> String {
	let mut out = String::with_capacity(value.len());
	for c in value.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'"' => out.push_str("&quot;"),
			_ => out.push(c),
		}
	}
	out
}

impl Node {
	/// Markup for this node, including itself
	///
	/// Fragments have no markup of their own and render their children.
	pub fn outer_html(&self) -> String {
		let mut out = String::new();
		write_node(self, &mut out);
		out
	}

	/// Markup for this node's children
	pub fn inner_html(&self) -> String {
		let mut out = String::new();
		for child in self.child_nodes() {
			write_node(&child, &mut out);
		}
		out
	}
}

fn write_node(node: &Node, out: &mut String) {
	let closing_tag = {
		let inner = node.0.borrow();
		match &inner.kind {
			NodeKind::Text(data) => {
				out.push_str(&escape_text(data));
				return;
			}
			NodeKind::Comment(data) => {
				let _ = write!(out, "<!--{data}-->");
				return;
			}
			NodeKind::Fragment => None,
			NodeKind::Element(element) => {
				out.push('<');
				out.push_str(&element.tag_name);
				for (name, value) in &element.attributes {
					if value.is_empty() {
						let _ = write!(out, " {name}");
					} else {
						let _ = write!(out, " {name}=\"{}\"", escape_attribute(value));
					}
				}
				out.push('>');
				if is_void_element(&element.tag_name) {
					return;
				}
				Some(element.tag_name.clone())
			}
		}
	};

	for child in node.child_nodes() {
		write_node(&child, out);
	}
	if let Some(tag_name) = closing_tag {
		let _ = write!(out, "</{tag_name}>");
	}
}
