use crate::builder::ArrayDefinitionBuilder;
use crate::dependency_resolver::ResolverContext;
use crate::error::{Error, Result};
use crate::value::{Array, Key, Value};

use indexmap::IndexMap;

/// Config key holding the class name.
pub const CLASS_NAME: &str = "class";
/// Config key holding the constructor argument bag.
pub const CONSTRUCTOR: &str = "__construct()";

/// A post-construction step: a method call (`name()`) or a property assignment (`$name`).
#[derive(Debug, Clone)]
pub enum Mutation {
  Method { name: String, arguments: Array },
  Property { name: String, value: Value },
}

impl Mutation {
  pub fn name(&self) -> &str {
    match self {
      Mutation::Method { name, .. } | Mutation::Property { name, .. } => name,
    }
  }
}

/// A full object-construction recipe: class, constructor arguments, and method
/// calls and property assignments applied in declaration order.
///
/// ```
/// use fibre_factory::{array, ArrayDefinition};
///
/// let definition = ArrayDefinition::from_config(&array! {
///   "class" => "Phone",
///   "__construct()" => array!["Kiradzu"],
///   "setId()" => array!["abc"],
///   "$dev" => true,
/// })
/// .unwrap();
///
/// assert_eq!(definition.class(), "Phone");
/// assert_eq!(definition.methods_and_properties().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ArrayDefinition {
  class: String,
  constructor_arguments: Array,
  methods_and_properties: IndexMap<String, Mutation>,
}

impl ArrayDefinition {
  /// A definition for `class` with no arguments and no mutations.
  pub fn for_class(class: impl Into<String>) -> Self {
    Self {
      class: class.into(),
      constructor_arguments: Array::new(),
      methods_and_properties: IndexMap::new(),
    }
  }

  /// Builds a definition from prepared parts. The argument bag must not mix
  /// positional and named keys.
  pub fn new(
    class: impl Into<String>,
    constructor_arguments: Array,
    methods_and_properties: IndexMap<String, Mutation>,
  ) -> Result<Self> {
    ensure_not_mixed(&constructor_arguments)?;
    Ok(Self {
      class: class.into(),
      constructor_arguments,
      methods_and_properties,
    })
  }

  /// Parses an array config such as `{"class": ..., "__construct()": [...],
  /// "setId()": [...], "$dev": true}`.
  pub fn from_config(config: &Array) -> Result<Self> {
    let class = match config.get_name(CLASS_NAME) {
      None | Some(Value::Null) => {
        return Err(Error::invalid_config(
          "Invalid definition: no class name specified.",
        ))
      }
      Some(Value::Str(class)) if class.trim().is_empty() => {
        return Err(Error::invalid_config("Invalid definition: empty class name."))
      }
      Some(Value::Str(class)) => class.clone(),
      Some(other) => {
        return Err(Error::invalid_config(format!(
          "Invalid definition: invalid class name. Expected string, got {}.",
          other.type_name()
        )))
      }
    };

    let mut constructor_arguments = Array::new();
    let mut methods_and_properties = IndexMap::new();
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
        constructor_arguments = match value {
          Value::Array(arguments) => arguments.clone(),
          other => {
            return Err(Error::invalid_config(format!(
              "Invalid definition: incorrect constructor arguments. Expected array, got {}.",
              other.type_name()
            )))
          }
        };
        continue;
      }
      if let Some(method) = key.strip_suffix("()") {
        let arguments = match value {
          Value::Array(arguments) => arguments.clone(),
          other => {
            return Err(Error::invalid_config(format!(
              "Invalid definition: incorrect method \"{}\" arguments. Expected array, got \"{}\".",
              key,
              other.type_name()
            )))
          }
        };
        methods_and_properties.insert(
          key.to_owned(),
          Mutation::Method {
            name: method.to_owned(),
            arguments,
          },
        );
        continue;
      }
      if let Some(property) = key.strip_prefix('$') {
        methods_and_properties.insert(
          key.to_owned(),
          Mutation::Property {
            name: property.to_owned(),
            value: value.clone(),
          },
        );
        continue;
      }

      return Err(Error::invalid_config(format!(
        "Invalid definition: key \"{key}\" is not allowed. Did you mean \"{key}()\" or \"${key}\"?"
      )));
    }

    Self::new(class, constructor_arguments, methods_and_properties)
  }

  pub fn class(&self) -> &str {
    &self.class
  }

  pub fn constructor_arguments(&self) -> &Array {
    &self.constructor_arguments
  }

  /// Mutations keyed by their config key (`name()` or `$name`), in declaration order.
  pub fn methods_and_properties(&self) -> &IndexMap<String, Mutation> {
    &self.methods_and_properties
  }

  /// Returns a new definition with `other` layered over `self`.
  ///
  /// The class comes from `other`. Constructor arguments merge index-wise with
  /// `other` winning. Properties are replaced by key. A method present in both has
  /// its argument lists merged index-wise; the call is not repeated.
  pub fn merge(&self, other: &ArrayDefinition) -> ArrayDefinition {
    let mut methods_and_properties = self.methods_and_properties.clone();
    for (key, mutation) in &other.methods_and_properties {
      let merged = match (methods_and_properties.get(key), mutation) {
        (
          Some(Mutation::Method {
            arguments: base, ..
          }),
          Mutation::Method { name, arguments },
        ) => Mutation::Method {
          name: name.clone(),
          arguments: base.merged_with(arguments),
        },
        _ => mutation.clone(),
      };
      methods_and_properties.insert(key.clone(), merged);
    }

    ArrayDefinition {
      class: other.class.clone(),
      constructor_arguments: self
        .constructor_arguments
        .merged_with(&other.constructor_arguments),
      methods_and_properties,
    }
  }

  pub fn resolve(&self, context: &dyn ResolverContext) -> Result<Value> {
    ArrayDefinitionBuilder::build(context, self).map(Value::Object)
  }
}

/// Rejects argument bags indexed both by position and by name.
pub(crate) fn ensure_not_mixed(arguments: &Array) -> Result<()> {
  if arguments.is_integer_indexed() || arguments.is_name_indexed() {
    Ok(())
  } else {
    Err(Error::invalid_config(
      "Arguments indexed both by name and by position are not allowed in the same array.",
    ))
  }
}
