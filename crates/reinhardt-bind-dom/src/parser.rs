//! Template parser
//!
//! Turns template markup into a [`Node`] fragment. Tokenizing uses nom parser
//! combinators; tree construction is a stack over the token stream.
//!
//! Supported: elements, quoted / unquoted / boolean attributes, void and
//! self-closing elements, comments, doctypes (skipped), and the common named
//! and numeric character references.

use nom::{
	IResult, Parser,
	branch::alt,
	bytes::complete::{tag, tag_no_case, take_until, take_while, take_while1},
	character::complete::{char, multispace0, multispace1},
	combinator::{map, opt},
	multi::many0,
	sequence::{delimited, pair, preceded},
};

use crate::node::{Node, is_void_element};

/// Errors raised while parsing a template
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
	#[error("unexpected input at position {position}")]
	Syntax {
		/// Byte offset of the unparsable input
		position: usize,
	},

	#[error("closing tag </{tag}> at position {position} has no matching opening tag")]
	UnexpectedClosingTag {
		/// Tag name of the stray closing tag
		tag: String,
		/// Byte offset of the closing tag
		position: usize,
	},

	#[error("expected </{expected}> but found </{found}> at position {position}")]
	MismatchedClosingTag {
		/// Tag name of the innermost open element
		expected: String,
		/// Tag name that was found
		found: String,
		/// Byte offset of the closing tag
		position: usize,
	},

	#[error("element <{0}> is never closed")]
	UnclosedTag(String),
}

// ============================================================================
// Tokens
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Token<'a> {
	Open {
		name: &'a str,
		attributes: Vec<(&'a str, Option<&'a str>)>,
		self_closing: bool,
	},
	Close(&'a str),
	Text(&'a str),
	Comment(&'a str),
	Doctype,
}

fn tag_name(input: &str) -> IResult<&str, &str> {
	take_while1(|c: char| c.is_ascii_alphanumeric() || c == '-').parse(input)
}

/// Attribute names allow `:`, `@` and `.` so directives survive tokenizing
fn attribute_name(input: &str) -> IResult<&str, &str> {
	take_while1(|c: char| {
		!c.is_whitespace() && !matches!(c, '=' | '>' | '/' | '"' | '\'' | '<')
	})
	.parse(input)
}

fn attribute_value(input: &str) -> IResult<&str, &str> {
	alt((
		delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
		delimited(char('\''), take_while(|c: char| c != '\''), char('\'')),
		take_while1(|c: char| !c.is_whitespace() && c != '>'),
	))
	.parse(input)
}

fn attribute(input: &str) -> IResult<&str, (&str, Option<&str>)> {
	preceded(
		multispace1,
		pair(
			attribute_name,
			opt(preceded(
				(multispace0, char('='), multispace0),
				attribute_value,
			)),
		),
	)
	.parse(input)
}

fn open_tag(input: &str) -> IResult<&str, Token<'_>> {
	map(
		(
			char('<'),
			tag_name,
			many0(attribute),
			multispace0,
			opt(char('/')),
			char('>'),
		),
		|(_, name, attributes, _, slash, _)| Token::Open {
			name,
			attributes,
			self_closing: slash.is_some(),
		},
	)
	.parse(input)
}

fn close_tag(input: &str) -> IResult<&str, Token<'_>> {
	map(
		delimited(tag("</"), tag_name, preceded(multispace0, char('>'))),
		Token::Close,
	)
	.parse(input)
}

fn comment(input: &str) -> IResult<&str, Token<'_>> {
	map(
		delimited(tag("<!--"), take_until("-->"), tag("-->")),
		Token::Comment,
	)
	.parse(input)
}

fn doctype(input: &str) -> IResult<&str, Token<'_>> {
	map(
		delimited(tag_no_case("<!doctype"), take_until(">"), char('>')),
		|_| Token::Doctype,
	)
	.parse(input)
}

fn text(input: &str) -> IResult<&str, Token<'_>> {
	map(take_while1(|c: char| c != '<'), Token::Text).parse(input)
}

/// A `<` that starts no tag is kept as text
fn stray_angle(input: &str) -> IResult<&str, Token<'_>> {
	map(tag("<"), Token::Text).parse(input)
}

fn token(input: &str) -> IResult<&str, Token<'_>> {
	alt((comment, doctype, close_tag, open_tag, text, stray_angle)).parse(input)
}

// ============================================================================
// Tree construction
// ============================================================================

/// Parse `markup` into a document fragment
///
/// # Example
///
/// ```ignore
/// let fragment = parse_html(r#"<div id="app"><span>{{ name }}</span></div>"#)?;
/// assert_eq!(fragment.child_nodes().len(), 1);
/// ```
pub fn parse_html(markup: &str) -> Result<Node, ParseError> {
	let root = Node::fragment();
	let mut stack: Vec<(String, Node)> = Vec::new();
	let mut rest = markup;

	while !rest.is_empty() {
		let position = markup.len() - rest.len();
		let (remaining, token) = token(rest).map_err(|_| ParseError::Syntax { position })?;
		rest = remaining;

		let parent = stack
			.last()
			.map(|(_, node)| node.clone())
			.unwrap_or_else(|| root.clone());

		match token {
			Token::Open {
				name,
				attributes,
				self_closing,
			} => {
				let element = Node::element(name);
				for (attribute, value) in attributes {
					element.set_attribute(attribute, &decode_entities(value.unwrap_or("")));
				}
				append(&parent, &element);
				if !self_closing && !is_void_element(name) {
					stack.push((name.to_ascii_lowercase(), element));
				}
			}
			Token::Close(name) => {
				let name = name.to_ascii_lowercase();
				match stack.last() {
					Some((open, _)) if *open == name => {
						stack.pop();
					}
					Some((open, _)) => {
						return Err(ParseError::MismatchedClosingTag {
							expected: open.clone(),
							found: name,
							position,
						});
					}
					// `</br>` and friends are tolerated
					None if is_void_element(&name) => {}
					None => {
						return Err(ParseError::UnexpectedClosingTag {
							tag: name,
							position,
						});
					}
				}
			}
			Token::Text(data) => {
				let data = decode_entities(data);
				// A stray `<` splits the token stream, not the text node
				match parent.last_child().filter(Node::is_text) {
					Some(previous) => {
						previous.set_text_content(&(previous.text_content() + &data));
					}
					None => append(&parent, &Node::text(data)),
				}
			}
			Token::Comment(data) => append(&parent, &Node::comment(data)),
			Token::Doctype => {}
		}
	}

	if let Some((open, _)) = stack.pop() {
		return Err(ParseError::UnclosedTag(open));
	}
	Ok(root)
}

fn append(parent: &Node, child: &Node) {
	// Fresh nodes are never ancestors of `parent`
	if let Err(error) = parent.append_child(child) {
		tracing::warn!(%error, "dropped node while building template");
	}
}

/// Decode character references in text and attribute values
///
/// Unknown references are kept verbatim.
pub fn decode_entities(input: &str) -> String {
	if !input.contains('&') {
		return input.to_string();
	}

	let mut out = String::with_capacity(input.len());
	let mut rest = input;
	while let Some(start) = rest.find('&') {
		out.push_str(&rest[..start]);
		rest = &rest[start..];
		let decoded = rest
			.find(';')
			.filter(|end| *end <= 10)
			.and_then(|end| decode_reference(&rest[1..end]).map(|c| (c, end)));
		match decoded {
			Some((character, end)) => {
				out.push(character);
				rest = &rest[end + 1..];
			}
			None => {
				out.push('&');
				rest = &rest[1..];
			}
		}
	}
	out.push_str(rest);
	out
}

fn decode_reference(reference: &str) -> Option<char> {
	match reference {
		"amp" => Some('&'),
		"lt" => Some('<'),
		"gt" => Some('>'),
		"quot" => Some('"'),
		"apos" => Some('\''),
		"nbsp" => Some('\u{a0}'),
		_ => {
			let number = reference.strip_prefix('#')?;
			let code = match number.strip_prefix(['x', 'X']) {
				Some(hex) => u32::from_str_radix(hex, 16).ok()?,
				None => number.parse().ok()?,
			};
			char::from_u32(code)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::node::NodeType;
	use rstest::rstest;

	#[test]
	fn test_tokenize_open_tag_with_directives() {
		let (rest, token) =
			open_tag(r#"<input v-model="msg" v-on:input=handle disabled>"#).unwrap();
		assert_eq!(rest, "");
		assert_eq!(
			token,
			Token::Open {
				name: "input",
				attributes: vec![
					("v-model", Some("msg")),
					("v-on:input", Some("handle")),
					("disabled", None),
				],
				self_closing: false,
			}
		);
	}

	#[test]
	fn test_parse_nested_tree() {
		let fragment =
			parse_html(r#"<div id="app"><span>{{ name }}</span><!-- note --></div>"#).unwrap();
		let div = fragment.first_child().unwrap();
		assert_eq!(div.tag_name().as_deref(), Some("div"));
		assert_eq!(div.get_attribute("id").as_deref(), Some("app"));

		let children = div.child_nodes();
		assert_eq!(children.len(), 2);
		assert_eq!(children[0].text_content(), "{{ name }}");
		assert_eq!(children[1].node_type(), NodeType::Comment);
	}

	#[test]
	fn test_parse_void_and_self_closing() {
		let fragment = parse_html(r#"<p><input value='a b'><br/><br></p>"#).unwrap();
		let p = fragment.first_child().unwrap();
		let children = p.child_nodes();
		assert_eq!(children.len(), 3);
		assert_eq!(children[0].value(), "a b");
	}

	#[test]
	fn test_parse_preserves_whitespace_and_decodes_entities() {
		let fragment = parse_html("<p>\n  a &lt; b &amp;&amp; c &#x41;&#66; &bogus; </p>").unwrap();
		assert_eq!(
			fragment.first_child().unwrap().text_content(),
			"\n  a < b && c AB &bogus; "
		);
	}

	#[test]
	fn test_stray_angle_is_text() {
		let fragment = parse_html("<p>1 < 2</p>").unwrap();
		assert_eq!(fragment.text_content(), "1 < 2");
	}

	#[rstest]
	#[case("<p>x < y: {{ name }}</p>", "x < y: {{ name }}")]
	#[case("<p>a<<b</p>", "a<<b")]
	#[case("<p><</p>", "<")]
	fn test_stray_angle_keeps_one_text_node(#[case] markup: &str, #[case] expected: &str) {
		let p = parse_html(markup).unwrap().first_child().unwrap();
		let children = p.child_nodes();
		assert_eq!(children.len(), 1);
		assert!(children[0].is_text());
		assert_eq!(children[0].text_content(), expected);
	}

	#[test]
	fn test_comment_separates_text_nodes() {
		let p = parse_html("<p>a<!-- c --><b</p>").unwrap().first_child().unwrap();
		assert_eq!(p.child_nodes().len(), 3);
	}

	#[test]
	fn test_doctype_is_skipped() {
		let fragment = parse_html("<!DOCTYPE html><main></main>").unwrap();
		assert_eq!(fragment.child_nodes().len(), 1);
	}

	#[rstest]
	#[case("<div><span></div>", ParseError::MismatchedClosingTag { expected: "span".into(), found: "div".into(), position: 11 })]
	#[case("</div>", ParseError::UnexpectedClosingTag { tag: "div".into(), position: 0 })]
	#[case("<div><p>", ParseError::UnclosedTag("p".into()))]
	fn test_parse_errors(#[case] markup: &str, #[case] expected: ParseError) {
		assert_eq!(parse_html(markup).unwrap_err(), expected);
	}

	#[test]
	fn test_closing_tag_is_case_insensitive() {
		assert!(parse_html("<DIV></div>").is_ok());
	}
}
