use crate::callable::{Callable, MethodTarget};
use crate::dependency_resolver::ResolverContext;
use crate::error::{Error, Result};
use crate::value::Value;

/// A definition produced by invoking a callable with autowired arguments.
#[derive(Debug, Clone)]
pub struct CallableDefinition {
  callable: Callable,
}

impl CallableDefinition {
  pub fn new(callable: Callable) -> Self {
    Self { callable }
  }

  pub fn callable(&self) -> &Callable {
    &self.callable
  }

  pub fn resolve(&self, context: &dyn ResolverContext) -> Result<Value> {
    let callable = self.prepare(context)?;
    context.invoke(&callable)
  }

  /// Swaps a class name for an instance when the named method is not static.
  fn prepare(&self, context: &dyn ResolverContext) -> Result<Callable> {
    let (class, method) = match &self.callable {
      Callable::Method {
        target: MethodTarget::Class(class),
        method,
      } => (class, method),
      other => return Ok(other.clone()),
    };

    let found = context.classes().find_method(class, method).ok_or_else(|| {
      Error::invalid_config(format!(
        "Invalid definition: class \"{}\" does not have the method \"{}\".",
        class, method
      ))
    })?;
    if found.is_static() {
      return Ok(self.callable.clone());
    }

    match context.get(class)? {
      Value::Object(instance) => Ok(Callable::method(instance, method.clone())),
      other => Err(Error::TypeMismatch {
        expected: class.clone(),
        actual: other.type_name(),
      }),
    }
  }
}
