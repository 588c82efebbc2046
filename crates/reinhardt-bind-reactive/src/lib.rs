//! # Reinhardt Bind Reactive
//!
//! Change detection and dependency tracking for `reinhardt-bind`.
//!
//! ## Components
//!
//! - [`Mapping`] / [`Value`]: the data graph a view model binds against
//! - [`observe`]: turns every plain key of a mapping (recursively) into a reactive [`Property`]
//! - [`Dep`]: per-property, ordered, duplicate-free subscriber list
//! - [`Watcher`]: evaluates one expression, caches it, and calls back on change
//! - [`runtime`]: the per-thread collector stack that links reads to watchers
//!
//! Propagation is fully synchronous: a write returns only after every affected
//! watcher has re-evaluated and run its callback.
//!
//! ## Example
//!
//! ```ignore
//! use reinhardt_bind_reactive::{Mapping, Value, Watcher, observe};
//!
//! let data = Mapping::from_json(serde_json::json!({ "name": "a" }));
//! observe(&Value::Map(data.clone()));
//!
//! let watcher = Watcher::with_path(data.clone(), "name", |new, old| {
//!     println!("name changed from {old} to {new}");
//! })?;
//!
//! data.set("name", "b");
//! assert_eq!(watcher.value(), Value::from("b"));
//! ```

pub mod dep;
pub mod observer;
pub mod path;
pub mod runtime;
pub mod value;
pub mod watcher;

pub use dep::Dep;
pub use observer::{Observer, observe};
pub use path::{Path, PathError};
pub use runtime::{NodeId, Runtime, Subscriber, with_runtime};
pub use value::{Mapping, Property, Value};
pub use watcher::{Expression, Getter, WatchCallback, Watcher};
