//! Facade error type

use reinhardt_bind_dom::{DomError, ParseError};
use reinhardt_bind_reactive::PathError;

use crate::settings::SettingsError;

/// Errors raised while mounting or driving a [`ViewModel`](crate::ViewModel)
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum BindError {
	#[error("no element matches selector '{0}'")]
	ElementNotFound(String),

	#[error("options have no mount element")]
	MissingElement,

	#[error("template has no root element")]
	EmptyTemplate,

	#[error("Template error: {0}")]
	Parse(#[from] ParseError),

	#[error("DOM error: {0}")]
	Dom(#[from] DomError),

	#[error("Path error: {0}")]
	Path(#[from] PathError),

	#[error("Settings error: {0}")]
	Settings(#[from] SettingsError),
}
