//! Calls functions and methods with their parameters autowired.

use crate::arguments::Arguments;
use crate::callable::{Callable, MethodTarget};
use crate::dependency_resolver::ResolverContext;
use crate::error::{Error, Result};
use crate::extractor::DefinitionExtractor;
use crate::reflection::Parameter;
use crate::value::Value;

pub struct Injector;

impl Injector {
  pub fn invoke(context: &dyn ResolverContext, callable: &Callable) -> Result<Value> {
    tracing::trace!(callable = %callable.describe(), "invoking");
    match callable {
      Callable::Function(function) => {
        let arguments = Self::resolve_parameters(context, function.params())?;
        function.call(Arguments::new(function.name(), arguments))
      }
      Callable::Method { target, method } => {
        let class = match target {
          MethodTarget::Class(class) => class.as_str(),
          MethodTarget::Object(object) => object.class_name(),
        };
        let found = context.classes().find_method(class, method).ok_or_else(|| {
          Error::invalid_config(format!(
            "Invalid definition: class \"{}\" does not have the method \"{}\".",
            class, method
          ))
        })?;
        let arguments = Self::resolve_parameters(context, found.params())?;
        let receiver = match target {
          MethodTarget::Object(object) => Some(object),
          MethodTarget::Class(_) => None,
        };
        found.call(receiver, Arguments::new(callable.describe(), arguments))
      }
    }
  }

  fn resolve_parameters(context: &dyn ResolverContext, params: &[Parameter]) -> Result<Vec<Value>> {
    let mut arguments = Vec::with_capacity(params.len());
    for definition in DefinitionExtractor::from_parameters(params).values() {
      if definition.is_valueless_parameter() {
        continue;
      }
      arguments.push(definition.resolve(context)?);
    }
    Ok(arguments)
  }
}
