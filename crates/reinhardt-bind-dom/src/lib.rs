//! # Reinhardt Bind DOM
//!
//! A small in-memory document model for `reinhardt-bind`: just the node,
//! attribute, form-value and event surface the binding compiler touches.
//!
//! ## Components
//!
//! - [`Node`]: reference-counted tree handle (elements, text, comments, fragments)
//! - [`parse_html`]: template markup to a fragment
//! - [`Node::outer_html`] / [`Node::inner_html`]: fragment back to markup
//! - [`Node::query_selector`]: locating a mount point
//! - [`Event`]: synchronous dispatch with bubbling
//!
//! ## Example
//!
//! ```ignore
//! use reinhardt_bind_dom::parse_html;
//!
//! let document = parse_html(r#"<div id="app"><input></div>"#)?;
//! let input = document.query_selector("#app input")?.unwrap();
//! input.add_event_listener("input", |event| println!("{}", event.target().value()));
//! input.input("typed");
//! ```

pub mod event;
pub mod node;
pub mod parser;
pub mod render;
pub mod selector;

pub use event::{Event, EventHandler, ListenerId};
pub use node::{DomError, Node, NodeType, is_void_element};
pub use parser::{ParseError, decode_entities, parse_html};
pub use render::{escape_attribute, escape_text};
pub use selector::Selector;
