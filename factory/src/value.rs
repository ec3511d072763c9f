//! The dynamic values that flow through definitions: literals, ordered arrays,
//! objects, callables and definitions themselves.

use crate::callable::Callable;
use crate::definitions::{
  ArrayDefinition, CallableDefinition, ClassDefinition, Definition, DynamicReference, Reference,
  ValueDefinition,
};
use crate::object::Object;

use core::fmt;

use indexmap::map::{IntoIter, Iter};
use indexmap::IndexMap;

/// A key of an [`Array`]: either a position or a name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
  Index(usize),
  Name(String),
}

impl Key {
  pub fn as_index(&self) -> Option<usize> {
    match self {
      Key::Index(index) => Some(*index),
      Key::Name(_) => None,
    }
  }

  pub fn as_name(&self) -> Option<&str> {
    match self {
      Key::Name(name) => Some(name),
      Key::Index(_) => None,
    }
  }
}

impl fmt::Display for Key {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Key::Index(index) => write!(f, "{}", index),
      Key::Name(name) => write!(f, "\"{}\"", name),
    }
  }
}

impl From<usize> for Key {
  fn from(index: usize) -> Self {
    Key::Index(index)
  }
}

impl From<&str> for Key {
  fn from(name: &str) -> Self {
    Key::Name(name.to_owned())
  }
}

impl From<String> for Key {
  fn from(name: String) -> Self {
    Key::Name(name)
  }
}

/// An insertion-ordered map of [`Key`] to [`Value`].
///
/// Overwriting an existing key keeps its original position; new keys are appended.
#[derive(Clone, Default)]
pub struct Array {
  entries: IndexMap<Key, Value>,
}

impl Array {
  pub fn new() -> Self {
    Self::default()
  }

  /// Appends `value` under the next free integer index.
  pub fn push(&mut self, value: impl Into<Value>) {
    let next = self
      .entries
      .keys()
      .filter_map(Key::as_index)
      .max()
      .map_or(0, |max| max + 1);
    self.entries.insert(Key::Index(next), value.into());
  }

  /// Inserts `value` under `key`, returning the previous value if any.
  pub fn insert(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Option<Value> {
    self.entries.insert(key.into(), value.into())
  }

  pub fn get(&self, key: &Key) -> Option<&Value> {
    self.entries.get(key)
  }

  pub fn get_index(&self, index: usize) -> Option<&Value> {
    self.entries.get(&Key::Index(index))
  }

  pub fn get_name(&self, name: &str) -> Option<&Value> {
    self.entries.get(&Key::Name(name.to_owned()))
  }

  pub fn contains_key(&self, key: &Key) -> bool {
    self.entries.contains_key(key)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn keys(&self) -> impl Iterator<Item = &Key> {
    self.entries.keys()
  }

  pub fn values(&self) -> impl Iterator<Item = &Value> {
    self.entries.values()
  }

  pub fn iter(&self) -> Iter<'_, Key, Value> {
    self.entries.iter()
  }

  /// `true` when every key is an integer index (an empty array counts).
  pub fn is_integer_indexed(&self) -> bool {
    self.entries.keys().all(|key| matches!(key, Key::Index(_)))
  }

  /// `true` when every key is a name (an empty array counts).
  pub fn is_name_indexed(&self) -> bool {
    self.entries.keys().all(|key| matches!(key, Key::Name(_)))
  }

  /// Overrides entries of `self` with the entries of `other`, key by key.
  pub fn merged_with(&self, other: &Array) -> Array {
    let mut result = self.clone();
    for (key, value) in other.iter() {
      result.entries.insert(key.clone(), value.clone());
    }
    result
  }

  /// Returns the values in key order, discarding keys.
  pub fn into_values(self) -> Vec<Value> {
    self.entries.into_values().collect()
  }
}

impl fmt::Debug for Array {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_map().entries(self.entries.iter()).finish()
  }
}

impl IntoIterator for Array {
  type Item = (Key, Value);
  type IntoIter = IntoIter<Key, Value>;

  fn into_iter(self) -> Self::IntoIter {
    self.entries.into_iter()
  }
}

impl<'a> IntoIterator for &'a Array {
  type Item = (&'a Key, &'a Value);
  type IntoIter = Iter<'a, Key, Value>;

  fn into_iter(self) -> Self::IntoIter {
    self.entries.iter()
  }
}

impl<K: Into<Key>, V: Into<Value>> FromIterator<(K, V)> for Array {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    let mut array = Array::new();
    for (key, value) in iter {
      array.insert(key, value);
    }
    array
  }
}

impl<V: Into<Value>> From<Vec<V>> for Array {
  fn from(values: Vec<V>) -> Self {
    let mut array = Array::new();
    for value in values {
      array.push(value);
    }
    array
  }
}

/// A dynamically typed value.
#[derive(Clone, Default)]
pub enum Value {
  #[default]
  Null,
  Bool(bool),
  Int(i64),
  Float(f64),
  Str(String),
  Array(Array),
  Object(Object),
  Callable(Callable),
  Definition(Box<Definition>),
}

impl Value {
  pub fn is_null(&self) -> bool {
    matches!(self, Value::Null)
  }

  pub fn as_bool(&self) -> Option<bool> {
    match self {
      Value::Bool(value) => Some(*value),
      _ => None,
    }
  }

  pub fn as_int(&self) -> Option<i64> {
    match self {
      Value::Int(value) => Some(*value),
      _ => None,
    }
  }

  pub fn as_float(&self) -> Option<f64> {
    match self {
      Value::Float(value) => Some(*value),
      Value::Int(value) => Some(*value as f64),
      _ => None,
    }
  }

  pub fn as_str(&self) -> Option<&str> {
    match self {
      Value::Str(value) => Some(value),
      _ => None,
    }
  }

  pub fn as_array(&self) -> Option<&Array> {
    match self {
      Value::Array(value) => Some(value),
      _ => None,
    }
  }

  pub fn as_object(&self) -> Option<&Object> {
    match self {
      Value::Object(value) => Some(value),
      _ => None,
    }
  }

  pub fn as_definition(&self) -> Option<&Definition> {
    match self {
      Value::Definition(definition) => Some(definition),
      _ => None,
    }
  }

  /// The type name used in error messages; objects report their class.
  pub fn type_name(&self) -> String {
    match self {
      Value::Null => "null".to_string(),
      Value::Bool(_) => "bool".to_string(),
      Value::Int(_) => "int".to_string(),
      Value::Float(_) => "float".to_string(),
      Value::Str(_) => "string".to_string(),
      Value::Array(_) => "array".to_string(),
      Value::Object(object) => object.class_name().to_string(),
      Value::Callable(_) => "callable".to_string(),
      Value::Definition(definition) => definition.kind_name().to_string(),
    }
  }
}

impl fmt::Debug for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Value::Null => f.write_str("null"),
      Value::Bool(value) => write!(f, "{}", value),
      Value::Int(value) => write!(f, "{}", value),
      Value::Float(value) => write!(f, "{:?}", value),
      Value::Str(value) => write!(f, "{:?}", value),
      Value::Array(array) => array.fmt(f),
      Value::Object(object) => object.fmt(f),
      Value::Callable(callable) => callable.fmt(f),
      Value::Definition(definition) => definition.fmt(f),
    }
  }
}

impl From<bool> for Value {
  fn from(value: bool) -> Self {
    Value::Bool(value)
  }
}

impl From<i32> for Value {
  fn from(value: i32) -> Self {
    Value::Int(i64::from(value))
  }
}

impl From<i64> for Value {
  fn from(value: i64) -> Self {
    Value::Int(value)
  }
}

impl From<f64> for Value {
  fn from(value: f64) -> Self {
    Value::Float(value)
  }
}

impl From<&str> for Value {
  fn from(value: &str) -> Self {
    Value::Str(value.to_owned())
  }
}

impl From<String> for Value {
  fn from(value: String) -> Self {
    Value::Str(value)
  }
}

impl From<Array> for Value {
  fn from(value: Array) -> Self {
    Value::Array(value)
  }
}

impl From<Object> for Value {
  fn from(value: Object) -> Self {
    Value::Object(value)
  }
}

impl From<Callable> for Value {
  fn from(value: Callable) -> Self {
    Value::Callable(value)
  }
}

impl From<Definition> for Value {
  fn from(value: Definition) -> Self {
    Value::Definition(Box::new(value))
  }
}

impl From<Reference> for Value {
  fn from(value: Reference) -> Self {
    Value::from(Definition::Reference(value))
  }
}

impl From<DynamicReference> for Value {
  fn from(value: DynamicReference) -> Self {
    Value::from(Definition::DynamicReference(value))
  }
}

impl From<ArrayDefinition> for Value {
  fn from(value: ArrayDefinition) -> Self {
    Value::from(Definition::Array(value))
  }
}

impl From<CallableDefinition> for Value {
  fn from(value: CallableDefinition) -> Self {
    Value::from(Definition::Callable(value))
  }
}

impl From<ClassDefinition> for Value {
  fn from(value: ClassDefinition) -> Self {
    Value::from(Definition::Class(value))
  }
}

impl From<ValueDefinition> for Value {
  fn from(value: ValueDefinition) -> Self {
    Value::from(Definition::Value(value))
  }
}

impl<T: Into<Value>> From<Option<T>> for Value {
  fn from(value: Option<T>) -> Self {
    value.map_or(Value::Null, Into::into)
  }
}
