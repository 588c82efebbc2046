//! # Reinhardt Bind
//!
//! A minimal reactive view-binding engine. A plain data object and a template
//! carrying declarative markers are kept in sync: data writes update the DOM
//! synchronously, and user input flows back through two-way models.
//!
//! ## Crates
//!
//! - [`reactive`]: data graph, dependency registries, watchers
//! - [`dom`]: in-memory DOM, template parser, selectors
//! - [`compiler`]: directives, interpolation, binding scopes
//!
//! ## Directive grammar
//!
//! | Marker                   | Effect                                  |
//! |--------------------------|-----------------------------------------|
//! | `{{ path }}`             | replaces the text node's content        |
//! | `v-bind:<attr>="path"`   | keeps an attribute in sync              |
//! | `v-model="path"`         | two-way form-control value binding      |
//! | `v-on:<event>="method"`  | calls a registered method on the event  |
//!
//! The prefix and delimiters are configurable through [`BindSettings`].
//!
//! ## Example
//!
//! ```ignore
//! use reinhardt_bind::{Options, ViewModel};
//! use serde_json::json;
//!
//! let vm = ViewModel::mount(
//!     r#"<div><input v-model="msg"><p>{{ msg }}</p></div>"#,
//!     Options::new().data(json!({ "msg": "hi" })),
//! )?;
//!
//! let input = vm.el().query_selector("input")?.unwrap();
//! input.input("bye");
//! assert_eq!(vm.el().query_selector("p")?.unwrap().text_content(), "bye");
//! ```

pub mod error;
pub mod options;
pub mod settings;
pub mod view_model;

pub use error::BindError;
pub use options::{Options, Template};
pub use settings::{BindSettings, SettingsError};
pub use view_model::ViewModel;

pub use reinhardt_bind_compiler as compiler;
pub use reinhardt_bind_dom as dom;
pub use reinhardt_bind_reactive as reactive;

pub use reinhardt_bind_compiler::{BindingScope, Compiler, Directive, DirectiveError, Methods};
pub use reinhardt_bind_dom::{Event, Node, parse_html};
pub use reinhardt_bind_reactive::{Mapping, Value, Watcher, observe};

/// Commonly used items
pub mod prelude {
	pub use crate::{
		BindError, BindSettings, Event, Mapping, Methods, Node, Options, Template, Value, ViewModel,
		parse_html,
	};
}
