//! CSS selectors
//!
//! Supports compound selectors made of a tag name, `#id`, `.class` and
//! `[attr]` / `[attr=value]` parts, joined by the descendant combinator
//! (whitespace). Enough to locate a mount point.

use crate::node::{DomError, Node};

#[derive(Debug, Clone, Default, PartialEq)]
struct Compound {
	tag_name: Option<String>,
	id: Option<String>,
	classes: Vec<String>,
	attributes: Vec<(String, Option<String>)>,
}

impl Compound {
	fn matches(&self, node: &Node) -> bool {
		let Some(tag_name) = node.tag_name() else {
			return false;
		};
		if self.tag_name.as_ref().is_some_and(|t| *t != tag_name) {
			return false;
		}
		if self
			.id
			.as_ref()
			.is_some_and(|id| node.get_attribute("id").as_ref() != Some(id))
		{
			return false;
		}
		if !self.classes.is_empty() {
			let class = node.get_attribute("class").unwrap_or_default();
			let present: Vec<&str> = class.split_whitespace().collect();
			if !self.classes.iter().all(|c| present.contains(&c.as_str())) {
				return false;
			}
		}
		self.attributes.iter().all(|(name, expected)| {
			match (node.get_attribute(name), expected) {
				(Some(_), None) => true,
				(Some(actual), Some(expected)) => actual == *expected,
				(None, _) => false,
			}
		})
	}
}

/// A parsed selector
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
	/// Compounds from outermost to innermost
	parts: Vec<Compound>,
}

fn is_ident_char(c: char) -> bool {
	c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn take_ident<'a>(source: &'a str, rest: &'a str) -> Result<(&'a str, &'a str), DomError> {
	let end = rest
		.find(|c: char| !is_ident_char(c))
		.unwrap_or(rest.len());
	if end == 0 {
		return Err(DomError::InvalidSelector(source.to_string()));
	}
	Ok(rest.split_at(end))
}

impl Selector {
	/// Parse a selector string
	pub fn parse(source: &str) -> Result<Self, DomError> {
		let invalid = || DomError::InvalidSelector(source.to_string());
		let parts = source
			.split_whitespace()
			.map(|part| Self::parse_compound(source, part))
			.collect::<Result<Vec<_>, _>>()?;
		if parts.is_empty() {
			return Err(invalid());
		}
		Ok(Self { parts })
	}

	fn parse_compound(source: &str, part: &str) -> Result<Compound, DomError> {
		let invalid = || DomError::InvalidSelector(source.to_string());
		let mut compound = Compound::default();
		let mut rest = part;

		if rest.starts_with('*') {
			rest = &rest[1..];
		} else if rest.starts_with(is_ident_char) {
			let (tag_name, tail) = take_ident(source, rest)?;
			compound.tag_name = Some(tag_name.to_ascii_lowercase());
			rest = tail;
		}

		while let Some(c) = rest.chars().next() {
			match c {
				'#' => {
					let (id, tail) = take_ident(source, &rest[1..])?;
					compound.id = Some(id.to_string());
					rest = tail;
				}
				'.' => {
					let (class, tail) = take_ident(source, &rest[1..])?;
					compound.classes.push(class.to_string());
					rest = tail;
				}
				'[' => {
					let close = rest.find(']').ok_or_else(invalid)?;
					let body = &rest[1..close];
					let attribute = match body.split_once('=') {
						Some((name, value)) => (
							name.trim().to_string(),
							Some(value.trim().trim_matches(['"', '\'']).to_string()),
						),
						None => (body.trim().to_string(), None),
					};
					if attribute.0.is_empty() {
						return Err(invalid());
					}
					compound.attributes.push(attribute);
					rest = &rest[close + 1..];
				}
				_ => return Err(invalid()),
			}
		}
		Ok(compound)
	}

	/// Whether `node` matches, looking at its ancestors for descendant parts
	pub fn matches(&self, node: &Node) -> bool {
		let Some((last, ancestors)) = self.parts.split_last() else {
			return false;
		};
		if !last.matches(node) {
			return false;
		}

		let mut pending = ancestors.iter().rev().peekable();
		let mut current = node.parent();
		while let Some(compound) = pending.peek() {
			let Some(candidate) = current else {
				return false;
			};
			if compound.matches(&candidate) {
				pending.next();
			}
			current = candidate.parent();
		}
		true
	}
}

impl Node {
	/// First descendant matching `selector`, in document order
	pub fn query_selector(&self, selector: &str) -> Result<Option<Node>, DomError> {
		let selector = Selector::parse(selector)?;
		Ok(self
			.descendants()
			.into_iter()
			.find(|node| selector.matches(node)))
	}

	/// Every descendant matching `selector`, in document order
	pub fn query_selector_all(&self, selector: &str) -> Result<Vec<Node>, DomError> {
		let selector = Selector::parse(selector)?;
		Ok(self
			.descendants()
			.into_iter()
			.filter(|node| selector.matches(node))
			.collect())
	}
}
