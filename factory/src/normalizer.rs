//! Maps raw user input onto one canonical [`Definition`].

use crate::callable::Callable;
use crate::definitions::{
  ArrayDefinition, CallableDefinition, Definition, Reference, ValueDefinition, CLASS_NAME,
};
use crate::error::{Error, Result};
use crate::reflection::ClassRegistry;
use crate::value::{Key, Value};

pub struct Normalizer;

impl Normalizer {
  /// Normalizes `definition`. `class` is the id the definition is registered under,
  /// used as the class of array definitions that do not name one.
  ///
  /// - references are returned unchanged;
  /// - a string naming `class` (or, without a context, any registered class that is
  ///   not an interface) becomes an argument-less array definition, any other string
  ///   a reference;
  /// - callables become callable definitions;
  /// - arrays become array definitions;
  /// - other definitions are returned unchanged and objects are bound as values.
  pub fn normalize(definition: &Value, class: Option<&str>, classes: &ClassRegistry) -> Result<Definition> {
    if let Value::Definition(inner) = definition {
      if inner.is_reference() {
        return Ok((**inner).clone());
      }
    }

    if let Value::Str(id) = definition {
      if id.trim().is_empty() {
        return Err(Error::invalid_config("Invalid definition: empty string."));
      }
      let is_class = match class {
        Some(class) => class == id,
        None => classes.is_class(id),
      };
      if is_class {
        return Ok(Definition::Array(ArrayDefinition::for_class(id.as_str())));
      }
      return Ok(Definition::Reference(Reference::to(id.as_str())));
    }

    if let Some(callable) = Callable::from_value(definition, classes) {
      return Ok(Definition::Callable(CallableDefinition::new(callable)));
    }

    match definition {
      Value::Array(config) => {
        let key = Key::from(CLASS_NAME);
        if config.contains_key(&key) {
          return ArrayDefinition::from_config(config).map(Definition::Array);
        }
        let mut config = config.clone();
        config.insert(key, Value::from(class));
        ArrayDefinition::from_config(&config).map(Definition::Array)
      }
      Value::Definition(inner) => Ok((**inner).clone()),
      Value::Object(_) => Ok(Definition::Value(ValueDefinition::new(definition.clone()))),
      other => Err(Error::invalid_config(format!(
        "Invalid definition: {:?}",
        other
      ))),
    }
  }
}
