use crate::dependency_resolver::ResolverContext;
use crate::error::Result;
use crate::value::Value;

/// A bound value.
///
/// When the context asks for clone-on-resolve, an object value is duplicated on every
/// resolution so repeated `create()` calls never share mutable state through it.
#[derive(Debug, Clone)]
pub struct ValueDefinition {
  value: Value,
}

impl ValueDefinition {
  pub fn new(value: impl Into<Value>) -> Self {
    Self {
      value: value.into(),
    }
  }

  pub fn value(&self) -> &Value {
    &self.value
  }

  pub fn resolve(&self, context: &dyn ResolverContext) -> Result<Value> {
    match &self.value {
      Value::Object(object) if context.clone_on_resolve() => match object.try_duplicate() {
        Some(copy) => Ok(Value::Object(copy)),
        None => {
          tracing::debug!(
            class = object.class_name(),
            "object cannot be duplicated, sharing the bound instance"
          );
          Ok(self.value.clone())
        }
      },
      value => Ok(value.clone()),
    }
  }
}
