//! Positional argument lists handed to registered constructors, methods and functions.

use crate::error::{Error, Result};
use crate::object::Object;
use crate::value::{Array, Value};

use std::any::Any;

/// The resolved arguments of one invocation.
///
/// Accessors fail with [`Error::Invocation`] naming the invoked target when an
/// argument is missing or has the wrong type.
#[derive(Debug, Clone)]
pub struct Arguments {
  target: String,
  values: Vec<Value>,
}

impl Arguments {
  pub fn new(target: impl Into<String>, values: Vec<Value>) -> Self {
    Self {
      target: target.into(),
      values,
    }
  }

  /// What is being invoked, e.g. `Phone::__construct`.
  pub fn target(&self) -> &str {
    &self.target
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  pub fn get(&self, index: usize) -> Option<&Value> {
    self.values.get(index)
  }

  pub fn values(&self) -> &[Value] {
    &self.values
  }

  pub fn into_values(self) -> Vec<Value> {
    self.values
  }

  /// Every argument from `index` on; used for variadic parameters.
  pub fn rest(&self, index: usize) -> &[Value] {
    self.values.get(index..).unwrap_or(&[])
  }

  pub fn value(&self, index: usize) -> Result<&Value> {
    self
      .values
      .get(index)
      .ok_or_else(|| Error::invocation(&self.target, format!("missing argument #{}", index + 1)))
  }

  pub fn string(&self, index: usize) -> Result<String> {
    match self.value(index)? {
      Value::Str(value) => Ok(value.clone()),
      other => Err(self.type_error(index, "string", other)),
    }
  }

  pub fn optional_string(&self, index: usize) -> Result<Option<String>> {
    match self.values.get(index) {
      None | Some(Value::Null) => Ok(None),
      Some(_) => self.string(index).map(Some),
    }
  }

  pub fn int(&self, index: usize) -> Result<i64> {
    match self.value(index)? {
      Value::Int(value) => Ok(*value),
      other => Err(self.type_error(index, "int", other)),
    }
  }

  pub fn float(&self, index: usize) -> Result<f64> {
    let value = self.value(index)?;
    value
      .as_float()
      .ok_or_else(|| self.type_error(index, "float", value))
  }

  pub fn bool(&self, index: usize) -> Result<bool> {
    match self.value(index)? {
      Value::Bool(value) => Ok(*value),
      other => Err(self.type_error(index, "bool", other)),
    }
  }

  pub fn array(&self, index: usize) -> Result<Array> {
    match self.value(index)? {
      Value::Array(value) => Ok(value.clone()),
      other => Err(self.type_error(index, "array", other)),
    }
  }

  pub fn object(&self, index: usize) -> Result<Object> {
    match self.value(index)? {
      Value::Object(value) => Ok(value.clone()),
      other => Err(self.type_error(index, "object", other)),
    }
  }

  pub fn optional_object(&self, index: usize) -> Result<Option<Object>> {
    match self.values.get(index) {
      None | Some(Value::Null) => Ok(None),
      Some(_) => self.object(index).map(Some),
    }
  }

  /// Copies the concrete value out of the object argument at `index`.
  pub fn downcast<T: Any + Clone>(&self, index: usize) -> Result<T> {
    let object = self.object(index)?;
    object.get::<T>().ok_or_else(|| {
      Error::invocation(
        &self.target,
        format!(
          "argument #{} of class {} does not hold a {}",
          index + 1,
          object.class_name(),
          std::any::type_name::<T>()
        ),
      )
    })
  }

  fn type_error(&self, index: usize, expected: &str, actual: &Value) -> Error {
    Error::invocation(
      &self.target,
      format!(
        "argument #{} must be of type {}, {} given",
        index + 1,
        expected,
        actual.type_name()
      ),
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn typed_accessors_report_the_target() {
    let args = Arguments::new("Phone::__construct", vec![Value::from(5), Value::from("x")]);

    assert_eq!(args.int(0).unwrap(), 5);
    assert_eq!(args.string(1).unwrap(), "x");

    let err = args.string(0).unwrap_err();
    assert_eq!(
      err.to_string(),
      "Phone::__construct: argument #1 must be of type string, int given"
    );
    assert!(matches!(args.value(2), Err(Error::Invocation { .. })));
  }

  #[test]
  fn optional_accessors_accept_null_and_missing() {
    let args = Arguments::new("f", vec![Value::Null]);
    assert_eq!(args.optional_string(0).unwrap(), None);
    assert!(args.optional_object(1).unwrap().is_none());
    assert!(args.rest(3).is_empty());
  }
}
