//! # Reinhardt Bind Compiler
//!
//! Connects template nodes to reactive data.
//!
//! ## Architecture
//!
//! ```text
//! parse_html ──► Node tree ──► Compiler::compile ──► BindingScope
//!                                   │
//!                 ┌─────────────────┼──────────────────┐
//!                 ▼                 ▼                  ▼
//!          Directive::Text   AttributeBind/Model   Directive::Event
//!                 │                 │                  │
//!                 └──── Watcher ────┘          native listener
//!                          │
//!                   update::apply
//! ```
//!
//! Directives form a closed set ([`Directive`]); anything else carrying the
//! prefix is reported through `tracing` and skipped, and its attribute is
//! removed like every other directive attribute.

pub mod compile;
pub mod directive;
pub mod interpolation;
pub mod scope;
pub mod update;

pub use compile::{Compiler, DEFAULT_PREFIX, Method, Methods};
pub use directive::{Directive, DirectiveError};
pub use interpolation::{DEFAULT_DELIMITERS, Interpolation};
pub use scope::BindingScope;
