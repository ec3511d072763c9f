//! Turns declared parameters into the definitions that supply them.

use crate::definitions::{ClassDefinition, Definition, InvalidDefinition, ParameterDefinition};
use crate::error::{Error, Result};
use crate::reflection::{ClassRegistry, Dependencies, Parameter};
use crate::value::Value;

use std::sync::Arc;

pub struct DefinitionExtractor;

impl DefinitionExtractor {
  /// Constructor dependencies of `class`, memoized on the registered class.
  pub fn from_class_name(classes: &ClassRegistry, class: &str) -> Result<Arc<Dependencies>> {
    let descriptor = classes.get(class).ok_or_else(|| Error::NotFound {
      id: class.to_owned(),
      building: Vec::new(),
    })?;
    if !descriptor.is_instantiable() {
      return Err(descriptor.not_instantiable());
    }

    let dependencies = descriptor.dependencies.get_or_init(|| {
      tracing::debug!(class, "extracting constructor dependencies");
      Arc::new(Self::from_parameters(descriptor.params()))
    });
    Ok(dependencies.clone())
  }

  /// One definition per parameter, keyed by name in declaration order.
  pub fn from_parameters(params: &[Parameter]) -> Dependencies {
    params
      .iter()
      .map(|parameter| (parameter.name().to_owned(), Self::from_parameter(parameter)))
      .collect()
  }

  pub fn from_parameter(parameter: &Parameter) -> Definition {
    if parameter.is_variadic() {
      return Definition::Parameter(ParameterDefinition::new(parameter.clone()));
    }

    // Unions keep only their class members; `self` is already the declaring class.
    let classes = parameter.class_names();
    if !classes.is_empty() {
      return Definition::Class(ClassDefinition::new(
        classes.join("|"),
        parameter.allows_null(),
      ));
    }

    if let Some(default) = parameter.default_value() {
      return Definition::Parameter(ParameterDefinition::with_value(
        parameter.clone(),
        default.clone(),
      ));
    }
    if parameter.allows_null() {
      return Definition::Parameter(ParameterDefinition::with_value(
        parameter.clone(),
        Value::Null,
      ));
    }
    Definition::Invalid(InvalidDefinition::new(parameter.clone()))
  }
}
