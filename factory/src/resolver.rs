//! Recursive resolution of definitions and nested arrays of definitions.

use crate::definitions::{Definition, ValueDefinition};
use crate::dependency_resolver::ResolverContext;
use crate::error::{Error, Result};
use crate::value::{Array, Value};

pub struct DefinitionResolver;

impl DefinitionResolver {
  /// Resolves every member of `definitions`, keeping keys. Parameter slots that
  /// carry no value are dropped.
  pub fn resolve_array(context: &dyn ResolverContext, definitions: &Array) -> Result<Array> {
    let mut result = Array::new();
    for (key, definition) in definitions {
      if matches!(definition, Value::Definition(d) if d.is_valueless_parameter()) {
        continue;
      }
      result.insert(key.clone(), Self::resolve(context, definition)?);
    }
    Ok(result)
  }

  /// Resolves `value` until it is no longer a definition; arrays resolve member-wise
  /// and any other value is returned unchanged.
  pub fn resolve(context: &dyn ResolverContext, value: &Value) -> Result<Value> {
    match value {
      Value::Definition(definition) => {
        let mut resolved = definition.resolve(context)?;
        while let Value::Definition(next) = resolved {
          resolved = next.resolve(context)?;
        }
        Ok(resolved)
      }
      Value::Array(array) => Self::resolve_array(context, array).map(Value::Array),
      other => Ok(other.clone()),
    }
  }

  /// Prepares a constructor override for resolution.
  ///
  /// References and arrays pass through and resolve later; any other literal or
  /// object is bound as a [`ValueDefinition`]. Other definitions are rejected: only
  /// references may stand in for another definition.
  pub fn ensure_resolvable(value: &Value) -> Result<Value> {
    match value {
      Value::Definition(definition) if definition.is_reference() => Ok(value.clone()),
      Value::Array(_) => Ok(value.clone()),
      Value::Definition(definition) => Err(Error::invalid_config(format!(
        "Only references are allowed in constructor arguments, a definition object was provided: {:?}",
        definition
      ))),
      other => Ok(Value::from(Definition::Value(ValueDefinition::new(other.clone())))),
    }
  }
}
