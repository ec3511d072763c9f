//! The definition kinds: recipes that resolve to a value against a [`ResolverContext`].

mod array;
mod callable;
mod class;
mod invalid;
mod parameter;
mod reference;
mod value;

pub use array::{ArrayDefinition, Mutation, CLASS_NAME, CONSTRUCTOR};
pub use callable::CallableDefinition;
pub use class::ClassDefinition;
pub use invalid::InvalidDefinition;
pub use parameter::ParameterDefinition;
pub use reference::{DynamicReference, Reference};
pub use value::ValueDefinition;

use crate::dependency_resolver::ResolverContext;
use crate::error::Result;
use crate::value::Value;

/// How to produce a value.
#[derive(Debug, Clone)]
pub enum Definition {
  Value(ValueDefinition),
  Class(ClassDefinition),
  Parameter(ParameterDefinition),
  Reference(Reference),
  DynamicReference(DynamicReference),
  Callable(CallableDefinition),
  Array(ArrayDefinition),
  Invalid(InvalidDefinition),
}

impl Definition {
  pub fn resolve(&self, context: &dyn ResolverContext) -> Result<Value> {
    match self {
      Definition::Value(definition) => definition.resolve(context),
      Definition::Class(definition) => definition.resolve(context),
      Definition::Parameter(definition) => definition.resolve(context),
      Definition::Reference(definition) => definition.resolve(context),
      Definition::DynamicReference(definition) => definition.resolve(context),
      Definition::Callable(definition) => definition.resolve(context),
      Definition::Array(definition) => definition.resolve(context),
      Definition::Invalid(definition) => definition.resolve(context),
    }
  }

  /// References stand in for another definition and may be used as constructor overrides.
  pub fn is_reference(&self) -> bool {
    matches!(self, Definition::Reference(_) | Definition::DynamicReference(_))
  }

  /// A parameter slot carrying no information, which only variadic parameters produce.
  pub(crate) fn is_valueless_parameter(&self) -> bool {
    matches!(self, Definition::Parameter(parameter) if !parameter.has_value())
  }

  pub(crate) fn is_variadic_parameter(&self) -> bool {
    matches!(self, Definition::Parameter(parameter) if parameter.parameter().is_variadic())
  }

  pub fn kind_name(&self) -> &'static str {
    match self {
      Definition::Value(_) => "ValueDefinition",
      Definition::Class(_) => "ClassDefinition",
      Definition::Parameter(_) => "ParameterDefinition",
      Definition::Reference(_) => "Reference",
      Definition::DynamicReference(_) => "DynamicReference",
      Definition::Callable(_) => "CallableDefinition",
      Definition::Array(_) => "ArrayDefinition",
      Definition::Invalid(_) => "InvalidDefinition",
    }
  }
}

impl From<ArrayDefinition> for Definition {
  fn from(definition: ArrayDefinition) -> Self {
    Definition::Array(definition)
  }
}

impl From<Reference> for Definition {
  fn from(reference: Reference) -> Self {
    Definition::Reference(reference)
  }
}

impl From<DynamicReference> for Definition {
  fn from(reference: DynamicReference) -> Self {
    Definition::DynamicReference(reference)
  }
}

impl From<ValueDefinition> for Definition {
  fn from(definition: ValueDefinition) -> Self {
    Definition::Value(definition)
  }
}

impl From<CallableDefinition> for Definition {
  fn from(definition: CallableDefinition) -> Self {
    Definition::Callable(definition)
  }
}

impl From<ClassDefinition> for Definition {
  fn from(definition: ClassDefinition) -> Self {
    Definition::Class(definition)
  }
}
