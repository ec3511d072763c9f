use crate::dependency_resolver::ResolverContext;
use crate::error::{Error, Result};
use crate::value::Value;

/// A dependency on a class or interface, or on the first resolvable member of a
/// `|`-joined union of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDefinition {
  class: String,
  optional: bool,
}

impl ClassDefinition {
  pub fn new(class: impl Into<String>, optional: bool) -> Self {
    Self {
      class: class.into(),
      optional,
    }
  }

  /// The type as declared, possibly a union like `A|B`.
  pub fn class(&self) -> &str {
    &self.class
  }

  pub fn is_optional(&self) -> bool {
    self.optional
  }

  pub fn is_union(&self) -> bool {
    self.class.contains('|')
  }

  /// The member types in declaration order.
  pub fn types(&self) -> impl Iterator<Item = &str> {
    self.class.split('|')
  }

  pub fn resolve(&self, context: &dyn ResolverContext) -> Result<Value> {
    if self.is_union() {
      return self.resolve_union(context);
    }

    let result = match context.get(&self.class) {
      Ok(result) => result,
      Err(_) if self.optional => return Ok(Value::Null),
      Err(err) => return Err(err),
    };
    Self::check_type(context, &self.class, result)
  }

  /// Tries each member in order; a wrong runtime type counts as a failure and moves on.
  fn resolve_union(&self, context: &dyn ResolverContext) -> Result<Value> {
    let mut last_error = None;
    for ty in self.types() {
      match context
        .get(ty)
        .and_then(|result| Self::check_type(context, ty, result))
      {
        Ok(result) => return Ok(result),
        Err(err) => {
          tracing::trace!(ty, error = %err, "union member failed, trying the next one");
          last_error = Some(err);
        }
      }
    }

    if self.optional {
      return Ok(Value::Null);
    }
    Err(last_error.unwrap_or_else(|| {
      Error::invalid_config(format!("Invalid definition: empty union type \"{}\".", self.class))
    }))
  }

  fn check_type(context: &dyn ResolverContext, ty: &str, result: Value) -> Result<Value> {
    if context.classes().is_instance_of(&result, ty) {
      Ok(result)
    } else {
      Err(Error::TypeMismatch {
        expected: ty.to_owned(),
        actual: result.type_name(),
      })
    }
  }
}
