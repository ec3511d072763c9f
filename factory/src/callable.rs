//! Callables: plain functions with declared parameters, and `[target, method]` pairs.

use crate::arguments::Arguments;
use crate::error::Result;
use crate::object::Object;
use crate::reflection::{ClassRegistry, Parameter};
use crate::value::{Key, Value};

use core::fmt;
use std::sync::Arc;

type FunctionBody = Arc<dyn Fn(Arguments) -> Result<Value> + Send + Sync>;

/// Name of the method that makes an object invokable.
pub const INVOKE: &str = "__invoke";

/// A function whose parameters are autowired when it is invoked.
#[derive(Clone)]
pub struct Function {
  name: String,
  params: Vec<Parameter>,
  body: FunctionBody,
}

impl Function {
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn params(&self) -> &[Parameter] {
    &self.params
  }

  pub(crate) fn call(&self, args: Arguments) -> Result<Value> {
    (self.body)(args)
  }
}

/// The receiver of a method callable.
#[derive(Debug, Clone)]
pub enum MethodTarget {
  /// A class name; the method is static, or an instance is looked up by class.
  Class(String),
  Object(Object),
}

impl From<&str> for MethodTarget {
  fn from(class: &str) -> Self {
    MethodTarget::Class(class.to_owned())
  }
}

impl From<String> for MethodTarget {
  fn from(class: String) -> Self {
    MethodTarget::Class(class)
  }
}

impl From<Object> for MethodTarget {
  fn from(object: Object) -> Self {
    MethodTarget::Object(object)
  }
}

/// Something the injector can invoke.
#[derive(Clone)]
pub enum Callable {
  Function(Function),
  Method { target: MethodTarget, method: String },
}

impl Callable {
  /// An anonymous function taking the given parameters.
  pub fn function<F>(params: Vec<Parameter>, f: F) -> Self
  where
    F: Fn(Arguments) -> Result<Value> + Send + Sync + 'static,
  {
    Self::named_function("{closure}", params, f)
  }

  pub fn named_function<F>(name: impl Into<String>, params: Vec<Parameter>, f: F) -> Self
  where
    F: Fn(Arguments) -> Result<Value> + Send + Sync + 'static,
  {
    Callable::Function(Function {
      name: name.into(),
      params,
      body: Arc::new(f),
    })
  }

  pub fn method(target: impl Into<MethodTarget>, method: impl Into<String>) -> Self {
    Callable::Method {
      target: target.into(),
      method: method.into(),
    }
  }

  /// Human readable name, e.g. `Car::create` or `{closure}`.
  pub fn describe(&self) -> String {
    match self {
      Callable::Function(function) => function.name.clone(),
      Callable::Method {
        target: MethodTarget::Class(class),
        method,
      } => format!("{}::{}", class, method),
      Callable::Method {
        target: MethodTarget::Object(object),
        method,
      } => format!("{}::{}", object.class_name(), method),
    }
  }

  /// Interprets `value` as a callable: an explicit callable, a two element
  /// `[class-or-object, "method"]` list, or an object whose class declares `__invoke`.
  pub(crate) fn from_value(value: &Value, classes: &ClassRegistry) -> Option<Callable> {
    match value {
      Value::Callable(callable) => Some(callable.clone()),
      Value::Array(array) if array.len() == 2 => {
        let target = array.get(&Key::Index(0))?;
        let method = array.get(&Key::Index(1))?.as_str()?;
        let target = match target {
          Value::Str(class) => MethodTarget::Class(class.clone()),
          Value::Object(object) => MethodTarget::Object(object.clone()),
          _ => return None,
        };
        Some(Callable::method(target, method))
      }
      Value::Object(object) if classes.find_method(object.class_name(), INVOKE).is_some() => {
        Some(Callable::method(object.clone(), INVOKE))
      }
      _ => None,
    }
  }
}

impl fmt::Debug for Callable {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Callable({})", self.describe())
  }
}
