//! Interpolation placeholders
//!
//! One placeholder per text node is recognized: the first non-greedy match
//! between the open and close delimiters. Further placeholders in the same
//! text are left as they are.

use regex::Regex;

/// Default placeholder delimiters
pub const DEFAULT_DELIMITERS: (&str, &str) = ("{{", "}}");

/// Compiled placeholder matcher
#[derive(Debug, Clone)]
pub struct Interpolation {
	pattern: Regex,
	trim: bool,
}

impl Interpolation {
	/// Build a matcher for `open`..`close`
	///
	/// Delimiters are matched literally.
	pub fn new(open: &str, close: &str, trim: bool) -> Result<Self, regex::Error> {
		let pattern = Regex::new(&format!(
			"{}(.*?){}",
			regex::escape(open),
			regex::escape(close)
		))?;
		Ok(Self { pattern, trim })
	}

	/// Expression inside the first placeholder of `text`
	pub fn find(&self, text: &str) -> Option<String> {
		let captures = self.pattern.captures(text)?;
		let expression = captures.get(1)?.as_str();
		Some(if self.trim {
			expression.trim().to_string()
		} else {
			expression.to_string()
		})
	}

	/// Whether `text` holds a placeholder
	pub fn is_match(&self, text: &str) -> bool {
		self.pattern.is_match(text)
	}
}

impl Default for Interpolation {
	fn default() -> Self {
		let (open, close) = DEFAULT_DELIMITERS;
		// Escaped literals always compile
		Self::new(open, close, true).expect("Invalid regex pattern")
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("{{name}}", Some("name"))]
	#[case("Hello, {{  user.name  }}!", Some("user.name"))]
	#[case("{{a}} and {{b}}", Some("a"))]
	#[case("{{}}", Some(""))]
	#[case("{ name }", None)]
	#[case("{{ unterminated", None)]
	fn test_find(#[case] text: &str, #[case] expected: Option<&str>) {
		assert_eq!(Interpolation::default().find(text).as_deref(), expected);
	}

	#[test]
	fn test_custom_delimiters_are_literal() {
		let interpolation = Interpolation::new("[[", "]]", true).unwrap();
		assert_eq!(interpolation.find("x [[ a.b ]] y").as_deref(), Some("a.b"));
		assert!(!interpolation.is_match("{{ a }}"));
	}

	#[test]
	fn test_untrimmed() {
		let interpolation = Interpolation::new("{{", "}}", false).unwrap();
		assert_eq!(interpolation.find("{{ a }}").as_deref(), Some(" a "));
	}
}
