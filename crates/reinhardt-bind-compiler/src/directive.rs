//! Directives
//!
//! Every binding the compiler knows is one [`Directive`] variant. Attribute
//! names are matched case-sensitively against the configured prefix:
//!
//! | Attribute               | Directive                 |
//! |-------------------------|---------------------------|
//! | `v-on:<event>="method"` | [`Directive::Event`]      |
//! | `v-bind:<attr>="path"`  | [`Directive::AttributeBind`] |
//! | `v-model="path"`        | [`Directive::Model`]      |
//! | `{{ path }}` in text    | [`Directive::Text`]       |

use reinhardt_bind_reactive::{Path, PathError};

use crate::interpolation::Interpolation;

/// Errors for attributes that carry the directive prefix but cannot be bound
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectiveError {
	#[error("unknown directive '{0}'")]
	UnknownDirective(String),

	#[error("directive '{0}' requires an argument")]
	MissingArgument(String),

	#[error("invalid expression in '{attribute}': {source}")]
	InvalidExpression {
		attribute: String,
		#[source]
		source: PathError,
	},
}

/// A binding site descriptor
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
	/// Replace a text node's content
	Text { path: Path },
	/// Write an attribute
	AttributeBind { attribute: String, path: Path },
	/// Two-way form-control value binding
	Model { path: Path },
	/// Native listener calling a named method
	Event {
		/// `None` when the attribute carries no event type; nothing is attached then
		event_type: Option<String>,
		method: String,
	},
}

impl Directive {
	/// Classify an element attribute
	///
	/// Returns `None` when `name` does not start with `prefix`.
	///
	/// # Example
	///
	/// ```ignore
	/// let directive = Directive::from_attribute("v-", "v-bind:title", "title").unwrap()?;
	/// assert!(matches!(directive, Directive::AttributeBind { .. }));
	/// ```
	pub fn from_attribute(
		prefix: &str,
		name: &str,
		value: &str,
	) -> Option<Result<Self, DirectiveError>> {
		let directive = name.strip_prefix(prefix)?;
		Some(Self::classify(name, directive, value))
	}

	fn classify(attribute: &str, directive: &str, value: &str) -> Result<Self, DirectiveError> {
		let (kind, argument) = match directive.split_once(':') {
			Some((kind, argument)) => (kind, Some(argument).filter(|a| !a.is_empty())),
			None => (directive, None),
		};
		let path = || {
			Path::parse(value).map_err(|source| DirectiveError::InvalidExpression {
				attribute: attribute.to_string(),
				source,
			})
		};

		match kind {
			"on" => Ok(Directive::Event {
				event_type: argument.map(str::to_string),
				method: value.trim().to_string(),
			}),
			"bind" => {
				let attribute_name = argument
					.ok_or_else(|| DirectiveError::MissingArgument(attribute.to_string()))?;
				Ok(Directive::AttributeBind {
					attribute: attribute_name.to_string(),
					path: path()?,
				})
			}
			"model" => Ok(Directive::Model { path: path()? }),
			_ => Err(DirectiveError::UnknownDirective(attribute.to_string())),
		}
	}

	/// Classify a text node's content
	///
	/// Returns `None` when the text holds no interpolation.
	pub fn from_text(
		interpolation: &Interpolation,
		text: &str,
	) -> Option<Result<Self, DirectiveError>> {
		let expression = interpolation.find(text)?;
		Some(
			Path::parse(&expression)
				.map(|path| Directive::Text { path })
				.map_err(|source| DirectiveError::InvalidExpression {
					attribute: text.to_string(),
					source,
				}),
		)
	}

	/// The bound path, for reactive directives
	pub fn path(&self) -> Option<&Path> {
		match self {
			Directive::Text { path }
			| Directive::AttributeBind { path, .. }
			| Directive::Model { path } => Some(path),
			Directive::Event { .. } => None,
		}
	}

	/// Short name used in logs
	pub fn kind(&self) -> &'static str {
		match self {
			Directive::Text { .. } => "text",
			Directive::AttributeBind { .. } => "bind",
			Directive::Model { .. } => "model",
			Directive::Event { .. } => "on",
		}
	}
}
