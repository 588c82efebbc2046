//! Binding settings
//!
//! Settings control the directive grammar: the attribute prefix, the
//! interpolation delimiters, and whether captured expressions are trimmed.
//! Every field has a default, so a settings file only lists what it changes.
//!
//! ## Example
//!
//! ```toml
//! directive_prefix = "x-"
//! delimiters = ["[[", "]]"]
//! ```

use std::fs;
use std::path::Path;

use reinhardt_bind_compiler::{Compiler, DEFAULT_DELIMITERS, DEFAULT_PREFIX, Interpolation};
use serde::{Deserialize, Serialize};

/// Error type for loading and validating settings
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("Invalid setting '{field}': {reason}")]
	Invalid {
		/// Offending field
		field: &'static str,
		/// What is wrong with it
		reason: String,
	},
}

fn default_prefix() -> String {
	DEFAULT_PREFIX.to_string()
}

fn default_delimiters() -> (String, String) {
	let (open, close) = DEFAULT_DELIMITERS;
	(open.to_string(), close.to_string())
}

fn default_trim() -> bool {
	true
}

/// Directive grammar settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BindSettings {
	/// Attribute prefix marking directives (case-sensitive)
	#[serde(default = "default_prefix")]
	pub directive_prefix: String,

	/// Open and close interpolation delimiters, matched literally
	#[serde(default = "default_delimiters")]
	pub delimiters: (String, String),

	/// Trim whitespace around interpolated expressions
	#[serde(default = "default_trim")]
	pub trim_expressions: bool,
}

impl Default for BindSettings {
	fn default() -> Self {
		Self {
			directive_prefix: default_prefix(),
			delimiters: default_delimiters(),
			trim_expressions: default_trim(),
		}
	}
}

impl BindSettings {
	/// Parse and validate settings from TOML
	pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
		let settings: Self = toml::from_str(source)?;
		settings.validate()?;
		Ok(settings)
	}

	/// Parse and validate settings from JSON
	pub fn from_json_str(source: &str) -> Result<Self, SettingsError> {
		let settings: Self = serde_json::from_str(source)?;
		settings.validate()?;
		Ok(settings)
	}

	/// Load settings from a file
	///
	/// Files ending in `.json` are read as JSON, everything else as TOML.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let path = path.as_ref();
		let source = fs::read_to_string(path)?;
		tracing::debug!(path = %path.display(), "loading bind settings");
		match path.extension().and_then(|ext| ext.to_str()) {
			Some("json") => Self::from_json_str(&source),
			_ => Self::from_toml_str(&source),
		}
	}

	/// Set the directive prefix
	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.directive_prefix = prefix.into();
		self
	}

	/// Set the interpolation delimiters
	pub fn with_delimiters(mut self, open: impl Into<String>, close: impl Into<String>) -> Self {
		self.delimiters = (open.into(), close.into());
		self
	}

	/// Check that the grammar is usable
	pub fn validate(&self) -> Result<(), SettingsError> {
		if self.directive_prefix.is_empty() {
			return Err(SettingsError::Invalid {
				field: "directive_prefix",
				reason: "must not be empty".to_string(),
			});
		}
		if self.directive_prefix.chars().any(char::is_whitespace) {
			return Err(SettingsError::Invalid {
				field: "directive_prefix",
				reason: "must not contain whitespace".to_string(),
			});
		}
		let (open, close) = &self.delimiters;
		if open.is_empty() || close.is_empty() {
			return Err(SettingsError::Invalid {
				field: "delimiters",
				reason: "open and close delimiters must not be empty".to_string(),
			});
		}
		Ok(())
	}

	/// Build a compiler for this grammar
	pub fn compiler(&self) -> Result<Compiler, SettingsError> {
		self.validate()?;
		let (open, close) = &self.delimiters;
		let interpolation = Interpolation::new(open, close, self.trim_expressions).map_err(|error| {
			SettingsError::Invalid {
				field: "delimiters",
				reason: error.to_string(),
			}
		})?;
		Ok(Compiler::new(self.directive_prefix.clone(), interpolation))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::io::Write;

	#[test]
	fn test_defaults() {
		let settings = BindSettings::default();
		assert_eq!(settings.directive_prefix, "v-");
		assert_eq!(settings.delimiters, ("{{".to_string(), "}}".to_string()));
		assert!(settings.trim_expressions);
		assert_eq!(BindSettings::from_toml_str("").unwrap(), settings);
	}

	#[test]
	fn test_partial_toml() {
		let settings = BindSettings::from_toml_str(
			r#"
directive_prefix = "x-"
delimiters = ["[[", "]]"]
"#,
		)
		.unwrap();
		assert_eq!(settings.directive_prefix, "x-");
		assert_eq!(settings.delimiters.0, "[[");
		assert!(settings.trim_expressions);
	}

	#[rstest]
	#[case(r#"directive_prefix = """#, "directive_prefix")]
	#[case(r#"directive_prefix = "v -""#, "directive_prefix")]
	#[case(r#"delimiters = ["", "}}"]"#, "delimiters")]
	fn test_invalid_settings(#[case] source: &str, #[case] expected: &str) {
		match BindSettings::from_toml_str(source) {
			Err(SettingsError::Invalid { field, .. }) => assert_eq!(field, expected),
			other => panic!("expected invalid settings, got {other:?}"),
		}
	}

	#[test]
	fn test_unknown_field_is_rejected() {
		assert!(matches!(
			BindSettings::from_toml_str("prefix = \"v-\""),
			Err(SettingsError::Toml(_))
		));
	}

	#[test]
	fn test_from_file() {
		let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
		writeln!(file, "trim_expressions = false").unwrap();
		let settings = BindSettings::from_file(file.path()).unwrap();
		assert!(!settings.trim_expressions);

		let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
		writeln!(json, r#"{{ "directive_prefix": "data-" }}"#).unwrap();
		assert_eq!(BindSettings::from_file(json.path()).unwrap().directive_prefix, "data-");

		assert!(matches!(
			BindSettings::from_file("/nonexistent/bind.toml"),
			Err(SettingsError::Io(_))
		));
	}

	#[test]
	fn test_compiler_uses_prefix() {
		let compiler = BindSettings::default().with_prefix("x-").compiler().unwrap();
		assert_eq!(compiler.prefix(), "x-");
	}
}
