use crate::dependency_resolver::ResolverContext;
use crate::error::{Error, Result};
use crate::reflection::Parameter;
use crate::value::Value;

/// A non-class parameter, optionally carrying the value to pass for it.
///
/// A parameter without a value carries no information at all; the builder skips it,
/// which is how an untouched variadic parameter receives no arguments.
#[derive(Debug, Clone)]
pub struct ParameterDefinition {
  parameter: Parameter,
  value: Option<Value>,
}

impl ParameterDefinition {
  pub fn new(parameter: Parameter) -> Self {
    Self {
      parameter,
      value: None,
    }
  }

  pub fn with_value(parameter: Parameter, value: impl Into<Value>) -> Self {
    Self {
      parameter,
      value: Some(value.into()),
    }
  }

  pub fn parameter(&self) -> &Parameter {
    &self.parameter
  }

  pub fn has_value(&self) -> bool {
    self.value.is_some()
  }

  pub fn resolve(&self, _context: &dyn ResolverContext) -> Result<Value> {
    self.value.clone().ok_or_else(|| {
      Error::NotInstantiable(format!(
        "No value available for the \"{}\" parameter of \"{}\".",
        self.parameter.name(),
        self.parameter.declaring_class().unwrap_or("{closure}")
      ))
    })
  }
}
