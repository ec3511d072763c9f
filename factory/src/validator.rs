//! Shape checks for raw definitions, run before they are registered or created.

use crate::callable::Callable;
use crate::definitions::{CLASS_NAME, CONSTRUCTOR};
use crate::error::{Error, Result};
use crate::reflection::ClassRegistry;
use crate::value::{Array, Key, Value};

pub struct DefinitionValidator;

impl DefinitionValidator {
  /// Checks that `definition` can be normalized. `id` is the id it is registered
  /// under, which supplies the class of array definitions that omit one.
  pub fn validate(definition: &Value, id: Option<&str>, classes: &ClassRegistry) -> Result<()> {
    match definition {
      Value::Definition(_) | Value::Object(_) | Value::Callable(_) => Ok(()),
      Value::Str(value) if value.trim().is_empty() => {
        Err(Error::invalid_config("Invalid definition: empty string."))
      }
      Value::Str(_) => Ok(()),
      Value::Array(config) => {
        if Callable::from_value(definition, classes).is_some() {
          return Ok(());
        }
        Self::validate_array(config, id, classes)
      }
      other => Err(Error::invalid_config(format!(
        "Invalid definition: {:?}",
        other
      ))),
    }
  }

  fn validate_array(config: &Array, id: Option<&str>, classes: &ClassRegistry) -> Result<()> {
    let class = Self::validate_class_name(config, id, classes)?;

    for (key, value) in config {
      let key = match key {
        Key::Name(key) => key.as_str(),
        Key::Index(index) => {
          return Err(Error::invalid_config(format!(
            "Invalid definition: invalid key in array definition. Only string keys are allowed, got {}.",
            index
          )))
        }
      };

      if key == CLASS_NAME {
        continue;
      }
      if key == CONSTRUCTOR {
        Self::validate_constructor(value)?;
        continue;
      }
      if let Some(method) = key.strip_suffix("()") {
        Self::validate_method(&class, key, method, value, classes)?;
        continue;
      }
      if let Some(property) = key.strip_prefix('$') {
        if !classes.has_property(&class, property) {
          return Err(Error::invalid_config(format!(
            "Invalid definition: property \"{}\" of class \"{}\" does not exist.",
            property, class
          )));
        }
        continue;
      }

      return Err(Self::unknown_key(&class, key, classes));
    }
    Ok(())
  }

  fn validate_class_name(config: &Array, id: Option<&str>, classes: &ClassRegistry) -> Result<String> {
    let class = match config.get_name(CLASS_NAME) {
      Some(Value::Str(class)) => class.as_str(),
      None | Some(Value::Null) => match id {
        Some(id) => id,
        None => {
          return Err(Error::invalid_config(
            "Invalid definition: no class name specified.",
          ))
        }
      },
      Some(other) => {
        return Err(Error::invalid_config(format!(
          "Invalid definition: invalid class name. Expected string, got {}.",
          other.type_name()
        )))
      }
    };

    if class.trim().is_empty() {
      return Err(Error::invalid_config("Invalid definition: empty class name."));
    }
    if !classes.contains(class) {
      return Err(Error::invalid_config(format!(
        "Invalid definition: class \"{}\" does not exist.",
        class
      )));
    }
    Ok(class.to_owned())
  }

  fn validate_constructor(value: &Value) -> Result<()> {
    let arguments = match value {
      Value::Array(arguments) => arguments,
      other => {
        return Err(Error::invalid_config(format!(
          "Invalid definition: incorrect constructor arguments. Expected array, got {}.",
          other.type_name()
        )))
      }
    };
    for argument in arguments.values() {
      if let Value::Definition(definition) = argument {
        if !definition.is_reference() {
          return Err(Error::invalid_config(format!(
            "Only references are allowed in constructor arguments, a definition object was provided: {:?}",
            definition
          )));
        }
      }
    }
    Ok(())
  }

  fn validate_method(
    class: &str,
    key: &str,
    method: &str,
    value: &Value,
    classes: &ClassRegistry,
  ) -> Result<()> {
    if classes.find_method(class, method).is_none() {
      return Err(Error::invalid_config(format!(
        "Invalid definition: class \"{}\" does not have the public method with name \"{}\".",
        class, method
      )));
    }
    if !matches!(value, Value::Array(_)) {
      return Err(Error::invalid_config(format!(
        "Invalid definition: incorrect method \"{}\" arguments. Expected array, got \"{}\".",
        key,
        value.type_name()
      )));
    }
    Ok(())
  }

  fn unknown_key(class: &str, key: &str, classes: &ClassRegistry) -> Error {
    let mut suggestions = Vec::new();
    if classes.find_method(class, key).is_some() {
      suggestions.push(format!("\"{}()\"", key));
    }
    if classes.has_property(class, key) {
      suggestions.push(format!("\"${}\"", key));
    }

    if suggestions.is_empty() {
      Error::invalid_config(format!(
        "Invalid definition: key \"{}\" is not allowed. Only \"class\", \"__construct()\", method calls (\"name()\") and properties (\"$name\") are allowed.",
        key
      ))
    } else {
      Error::invalid_config(format!(
        "Invalid definition: key \"{}\" is not allowed. Did you mean {}?",
        key,
        suggestions.join(" or ")
      ))
    }
  }
}
