use crate::dependency_resolver::ResolverContext;
use crate::error::{Error, Result};
use crate::reflection::Parameter;
use crate::value::Value;

/// A required parameter with no class type, no default and no nullability.
///
/// Resolving it always fails; it has to be overridden with an explicit argument.
#[derive(Debug, Clone)]
pub struct InvalidDefinition {
  parameter: Parameter,
}

impl InvalidDefinition {
  pub fn new(parameter: Parameter) -> Self {
    Self { parameter }
  }

  pub fn parameter(&self) -> &Parameter {
    &self.parameter
  }

  pub fn resolve(&self, _context: &dyn ResolverContext) -> Result<Value> {
    Err(Error::NotInstantiable(format!(
      "Can not determine value of the \"{}\" parameter of type \"{}\" when instantiating \"{}\". Please specify argument explicitly.",
      self.parameter.name(),
      self.parameter.type_description(),
      self.parameter.declaring_class().unwrap_or("{closure}"),
    )))
  }
}
