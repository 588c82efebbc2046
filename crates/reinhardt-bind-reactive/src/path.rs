//! Dotted path expressions
//!
//! A path such as `"user.profile.name"` is resolved segment by segment starting
//! at the context mapping. Reading never fails: if an intermediate value is falsy
//! the read short-circuits to the empty string.

use std::fmt;
use std::str::FromStr;

use crate::value::{Mapping, Value};

/// Errors raised while parsing a path expression
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
	#[error("path expression cannot be empty")]
	Empty,

	#[error("path expression '{expression}' contains invalid character '{character}'")]
	InvalidCharacter {
		/// The rejected expression
		expression: String,
		/// First character outside `[A-Za-z0-9_.$]`
		character: char,
	},
}

/// A parsed dotted path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
	raw: String,
	segments: Vec<String>,
}

impl Path {
	/// Parse a path expression
	///
	/// Only ASCII letters, digits, `_`, `$` and `.` are accepted.
	///
	/// # Example
	///
	/// ```ignore
	/// let path = Path::parse("a.b.c")?;
	/// assert_eq!(path.segments(), ["a", "b", "c"]);
	/// ```
	pub fn parse(expression: &str) -> Result<Self, PathError> {
		if expression.is_empty() {
			return Err(PathError::Empty);
		}
		if let Some(character) = expression
			.chars()
			.find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.')))
		{
			return Err(PathError::InvalidCharacter {
				expression: expression.to_string(),
				character,
			});
		}

		Ok(Self {
			raw: expression.to_string(),
			segments: expression.split('.').map(str::to_string).collect(),
		})
	}

	/// The expression as written
	pub fn as_str(&self) -> &str {
		&self.raw
	}

	/// The dot-separated segments
	pub fn segments(&self) -> &[String] {
		&self.segments
	}

	/// Resolve the path against `context`
	///
	/// Every reactive key passed through registers the active collector.
	/// A falsy intermediate value yields `""`; a missing final key yields `Undefined`.
	pub fn read(&self, context: &Mapping) -> Value {
		let mut current = Value::Map(context.clone());
		for segment in &self.segments {
			if !current.is_truthy() {
				return Value::String(String::new());
			}
			current = current.member(segment);
		}
		current
	}

	/// Assign `value` at this path
	///
	/// Walks to the parent of the last segment and writes the last segment there.
	/// If the parent is not a mapping the write is dropped.
	pub fn assign(&self, context: &Mapping, value: impl Into<Value>) {
		let Some((last, parents)) = self.segments.split_last() else {
			return;
		};

		let mut parent = Value::Map(context.clone());
		for segment in parents {
			parent = parent.member(segment);
		}

		match parent {
			Value::Map(mapping) => mapping.set(last, value),
			_ => tracing::debug!(path = %self.raw, "assignment target has no parent mapping"),
		}
	}
}

impl FromStr for Path {
	type Err = PathError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl fmt::Display for Path {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.raw)
	}
}
