//! Data Graph
//!
//! The values a view model binds against. A [`Mapping`] is a shared, ordered table
//! whose entries start out as plain slots; [`observe`](crate::observe) turns each
//! plain slot into a reactive [`Property`] cell backed by its own [`Dep`].
//!
//! ## Equality
//!
//! `Value`'s `PartialEq` is the strict inequality used for change detection:
//! primitives compare by value (so `NaN != NaN`), while mappings and arrays
//! compare by identity. Replacing a mapping with a structurally equal copy is a change.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::dep::Dep;
use crate::observer::observe;

/// A node in the data graph
#[derive(Clone, Default)]
pub enum Value {
	/// Absent value (missing key, unset property)
	#[default]
	Undefined,
	/// Explicit null
	Null,
	/// Boolean
	Bool(bool),
	/// Number (all numbers are `f64`)
	Number(f64),
	/// String
	String(String),
	/// Immutable array, compared by identity
	Array(Rc<[Value]>),
	/// Shared mapping, compared by identity
	Map(Mapping),
}

impl Value {
	/// Truthiness used by path traversal
	///
	/// `undefined`, `null`, `false`, `0`, `NaN` and `""` are falsy.
	pub fn is_truthy(&self) -> bool {
		match self {
			Value::Undefined | Value::Null => false,
			Value::Bool(b) => *b,
			Value::Number(n) => *n != 0.0 && !n.is_nan(),
			Value::String(s) => !s.is_empty(),
			Value::Array(_) | Value::Map(_) => true,
		}
	}

	/// Whether this is [`Value::Undefined`]
	pub fn is_undefined(&self) -> bool {
		matches!(self, Value::Undefined)
	}

	/// Borrow the mapping, if this value is one
	pub fn as_map(&self) -> Option<&Mapping> {
		match self {
			Value::Map(mapping) => Some(mapping),
			_ => None,
		}
	}

	/// Borrow the string, if this value is one
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::String(s) => Some(s),
			_ => None,
		}
	}

	/// Read a named member of this value
	///
	/// Mappings perform a tracked read. Arrays and strings expose `length`, and
	/// arrays accept numeric indices. Everything else yields `Undefined`.
	pub fn member(&self, key: &str) -> Value {
		match self {
			Value::Map(mapping) => mapping.get(key),
			Value::Array(items) => {
				if key == "length" {
					return Value::Number(items.len() as f64);
				}
				key.parse::<usize>()
					.ok()
					.and_then(|index| items.get(index).cloned())
					.unwrap_or_default()
			}
			Value::String(s) if key == "length" => Value::Number(s.encode_utf16().count() as f64),
			_ => Value::Undefined,
		}
	}

	/// Host string conversion (`String(value)`)
	pub fn to_js_string(&self) -> String {
		self.to_string()
	}

	/// Convert to JSON without registering dependencies
	///
	/// `Undefined` becomes `null`; non-finite numbers become `null`.
	pub fn to_json(&self) -> serde_json::Value {
		match self {
			Value::Undefined | Value::Null => serde_json::Value::Null,
			Value::Bool(b) => serde_json::Value::Bool(*b),
			Value::Number(n) => serde_json::Number::from_f64(*n)
				.map(serde_json::Value::Number)
				.unwrap_or(serde_json::Value::Null),
			Value::String(s) => serde_json::Value::String(s.clone()),
			Value::Array(items) => {
				serde_json::Value::Array(items.iter().map(Value::to_json).collect())
			}
			Value::Map(mapping) => mapping.to_json(),
		}
	}
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
			(Value::Bool(a), Value::Bool(b)) => a == b,
			(Value::Number(a), Value::Number(b)) => a == b,
			(Value::String(a), Value::String(b)) => a == b,
			(Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
			(Value::Map(a), Value::Map(b)) => a.ptr_eq(b),
			_ => false,
		}
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Undefined => f.write_str("undefined"),
			Value::Null => f.write_str("null"),
			Value::Bool(b) => write!(f, "{b}"),
			Value::Number(n) => f.write_str(&format_number(*n)),
			Value::String(s) => f.write_str(s),
			Value::Array(items) => {
				for (index, item) in items.iter().enumerate() {
					if index > 0 {
						f.write_str(",")?;
					}
					// join() renders null and undefined as empty
					if !matches!(item, Value::Undefined | Value::Null) {
						write!(f, "{item}")?;
					}
				}
				Ok(())
			}
			Value::Map(_) => f.write_str("[object Object]"),
		}
	}
}

impl fmt::Debug for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Undefined => f.write_str("Undefined"),
			Value::Null => f.write_str("Null"),
			Value::Bool(b) => write!(f, "Bool({b})"),
			Value::Number(n) => write!(f, "Number({n})"),
			Value::String(s) => write!(f, "String({s:?})"),
			Value::Array(items) => f.debug_list().entries(items.iter()).finish(),
			Value::Map(mapping) => fmt::Debug::fmt(mapping, f),
		}
	}
}

fn format_number(n: f64) -> String {
	if n.is_nan() {
		return "NaN".to_string();
	}
	if n.is_infinite() {
		return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
	}
	if n == 0.0 {
		// Also covers -0
		return "0".to_string();
	}
	let magnitude = n.abs();
	if !(1e-6..1e21).contains(&magnitude) {
		// Shortest digits in exponent form, with an explicit exponent sign
		let formatted = format!("{n:e}");
		return match formatted.split_once('e') {
			Some((mantissa, exponent)) if !exponent.starts_with('-') => {
				format!("{mantissa}e+{exponent}")
			}
			_ => formatted,
		};
	}
	format!("{n}")
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Value::String(value.to_string())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Value::String(value)
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Value::Bool(value)
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Value::Number(value)
	}
}

impl From<i32> for Value {
	fn from(value: i32) -> Self {
		Value::Number(f64::from(value))
	}
}

impl From<u32> for Value {
	fn from(value: u32) -> Self {
		Value::Number(f64::from(value))
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Value::Number(value as f64)
	}
}

impl From<Mapping> for Value {
	fn from(value: Mapping) -> Self {
		Value::Map(value)
	}
}

impl From<Vec<Value>> for Value {
	fn from(value: Vec<Value>) -> Self {
		Value::Array(value.into())
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(value: Option<T>) -> Self {
		value.map(Into::into).unwrap_or(Value::Null)
	}
}

impl From<serde_json::Value> for Value {
	fn from(value: serde_json::Value) -> Self {
		match value {
			serde_json::Value::Null => Value::Null,
			serde_json::Value::Bool(b) => Value::Bool(b),
			serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
			serde_json::Value::String(s) => Value::String(s),
			serde_json::Value::Array(items) => {
				Value::Array(items.into_iter().map(Value::from).collect())
			}
			serde_json::Value::Object(entries) => Value::Map(
				entries
					.into_iter()
					.map(|(key, value)| (key, Value::from(value)))
					.collect(),
			),
		}
	}
}

/// One entry of a [`Mapping`]
#[derive(Clone)]
enum Slot {
	/// Not yet transformed; reads and writes are untracked
	Plain(Value),
	/// Transformed into an intercepted cell
	Reactive(Rc<Property>),
}

/// Shared, insertion-ordered table of named values
///
/// Cloning a `Mapping` clones the handle, not the table.
#[derive(Clone, Default)]
pub struct Mapping {
	inner: Rc<RefCell<IndexMap<String, Slot>>>,
}

impl Mapping {
	/// Create an empty mapping
	pub fn new() -> Self {
		Self::default()
	}

	/// Build a plain mapping from JSON
	///
	/// Non-object JSON produces an empty mapping.
	pub fn from_json(json: serde_json::Value) -> Self {
		match Value::from(json) {
			Value::Map(mapping) => mapping,
			_ => Self::new(),
		}
	}

	/// Read `key`, registering the active collector if the key is reactive
	///
	/// A missing key reads as `Undefined`.
	pub fn get(&self, key: &str) -> Value {
		let slot = self.inner.borrow().get(key).cloned();
		match slot {
			Some(Slot::Plain(value)) => value,
			Some(Slot::Reactive(property)) => property.get(),
			None => Value::Undefined,
		}
	}

	/// Read `key` without registering any dependency
	pub fn get_untracked(&self, key: &str) -> Value {
		match self.inner.borrow().get(key) {
			Some(Slot::Plain(value)) => value.clone(),
			Some(Slot::Reactive(property)) => property.get_untracked(),
			None => Value::Undefined,
		}
	}

	/// Write `key`
	///
	/// Reactive keys go through [`Property::set`] and may notify subscribers.
	/// Plain and new keys are stored as plain slots; adding a key never makes it reactive.
	pub fn set(&self, key: &str, value: impl Into<Value>) {
		let value = value.into();
		let property = match self.inner.borrow().get(key) {
			Some(Slot::Reactive(property)) => Some(property.clone()),
			_ => None,
		};
		match property {
			Some(property) => {
				property.set(value);
			}
			None => {
				self.inner
					.borrow_mut()
					.insert(key.to_string(), Slot::Plain(value));
			}
		}
	}

	/// Get the reactive cell behind `key`, if the key has been transformed
	pub fn property(&self, key: &str) -> Option<Rc<Property>> {
		match self.inner.borrow().get(key) {
			Some(Slot::Reactive(property)) => Some(property.clone()),
			_ => None,
		}
	}

	/// Whether `key` has been transformed into a reactive cell
	pub fn is_reactive(&self, key: &str) -> bool {
		self.property(key).is_some()
	}

	/// Whether `key` is present
	pub fn contains_key(&self, key: &str) -> bool {
		self.inner.borrow().contains_key(key)
	}

	/// Keys in insertion order
	///
	/// Transformed keys stay enumerable.
	pub fn keys(&self) -> Vec<String> {
		self.inner.borrow().keys().cloned().collect()
	}

	/// Number of keys
	pub fn len(&self) -> usize {
		self.inner.borrow().len()
	}

	/// Whether the mapping has no keys
	pub fn is_empty(&self) -> bool {
		self.inner.borrow().is_empty()
	}

	/// Identity comparison
	pub fn ptr_eq(&self, other: &Mapping) -> bool {
		Rc::ptr_eq(&self.inner, &other.inner)
	}

	/// Stable address used to detect cycles while walking the graph
	pub(crate) fn addr(&self) -> usize {
		Rc::as_ptr(&self.inner) as *const () as usize
	}

	/// Plain entries that still need transforming, in key order
	pub(crate) fn plain_entries(&self) -> Vec<(String, Value)> {
		self.inner
			.borrow()
			.iter()
			.filter_map(|(key, slot)| match slot {
				Slot::Plain(value) => Some((key.clone(), value.clone())),
				Slot::Reactive(_) => None,
			})
			.collect()
	}

	/// Replace a plain slot with a reactive cell holding `value`
	///
	/// Already-reactive keys are left untouched, so a key is never wrapped twice.
	pub(crate) fn define_reactive(&self, key: &str, value: Value) -> bool {
		let mut entries = self.inner.borrow_mut();
		match entries.get_mut(key) {
			Some(slot) if matches!(slot, Slot::Plain(_)) => {
				*slot = Slot::Reactive(Rc::new(Property::new(value)));
				true
			}
			_ => false,
		}
	}

	/// Convert to a JSON object without registering dependencies
	pub fn to_json(&self) -> serde_json::Value {
		let entries = self.inner.borrow().clone();
		serde_json::Value::Object(
			entries
				.into_iter()
				.map(|(key, slot)| {
					let value = match slot {
						Slot::Plain(value) => value,
						Slot::Reactive(property) => property.get_untracked(),
					};
					(key, value.to_json())
				})
				.collect(),
		)
	}
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Mapping {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let entries = iter
			.into_iter()
			.map(|(key, value)| (key.into(), Slot::Plain(value.into())))
			.collect();
		Self {
			inner: Rc::new(RefCell::new(entries)),
		}
	}
}

impl fmt::Debug for Mapping {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		// Untracked on purpose: formatting must not create dependencies
		let mut map = f.debug_map();
		for key in self.keys() {
			map.entry(&key, &self.get_untracked(&key));
		}
		map.finish()
	}
}

/// A reactive cell: one transformed key of a mapping
///
/// Owns the current value and the [`Dep`] that subscribers register into.
pub struct Property {
	value: RefCell<Value>,
	dep: Dep,
}

impl Property {
	pub(crate) fn new(value: Value) -> Self {
		Self {
			value: RefCell::new(value),
			dep: Dep::new(),
		}
	}

	/// Read the value, registering the active collector
	pub fn get(&self) -> Value {
		self.dep.depend();
		self.get_untracked()
	}

	/// Read the value without registering any dependency
	pub fn get_untracked(&self) -> Value {
		self.value.borrow().clone()
	}

	/// Write the value
	///
	/// If `value` strictly differs from the current one, it is made reactive,
	/// stored, and every subscriber is notified before this returns.
	/// Returns `true` when a change was propagated.
	pub fn set(&self, value: Value) -> bool {
		if *self.value.borrow() == value {
			return false;
		}
		observe(&value);
		*self.value.borrow_mut() = value;
		self.dep.notify();
		true
	}

	/// The subscriber registry of this cell
	pub fn dep(&self) -> &Dep {
		&self.dep
	}
}

impl fmt::Debug for Property {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Property")
			.field("value", &*self.value.borrow())
			.field("dep", &self.dep)
			.finish()
	}
}
