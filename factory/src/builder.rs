//! Materializes one object from an [`ArrayDefinition`].

use crate::arguments::Arguments;
use crate::definitions::{ArrayDefinition, Mutation};
use crate::dependency_resolver::ResolverContext;
use crate::error::{Error, Result};
use crate::extractor::DefinitionExtractor;
use crate::object::Object;
use crate::reflection::{ClassRegistry, Parameter};
use crate::resolver::DefinitionResolver;
use crate::value::{Array, Key, Value};

use std::collections::HashSet;

pub struct ArrayDefinitionBuilder;

impl ArrayDefinitionBuilder {
  pub fn build(context: &dyn ResolverContext, definition: &ArrayDefinition) -> Result<Object> {
    let classes = context.classes();
    let class = definition.class();
    tracing::trace!(class, "building object");

    let dependencies = DefinitionExtractor::from_class_name(classes, class)?;
    let slots = Self::inject_arguments(
      class,
      dependencies.iter().map(|(name, definition)| (name.as_str(), Value::from(definition.clone()))),
      definition.constructor_arguments(),
    )?;

    let mut arguments = Vec::with_capacity(slots.len());
    for slot in &slots {
      if matches!(slot, Value::Definition(d) if d.is_valueless_parameter()) {
        continue;
      }
      arguments.push(DefinitionResolver::resolve(context, slot)?);
    }

    let descriptor = classes.get(class).ok_or_else(|| Error::NotFound {
      id: class.to_owned(),
      building: Vec::new(),
    })?;
    let object = descriptor.construct(Arguments::new(format!("{}::__construct", class), arguments))?;

    Self::apply_mutations(context, definition, object)
  }

  /// Lays the supplied arguments over the reflected dependencies.
  ///
  /// Positional bags match parameters by position, named bags by parameter name.
  /// Arguments left over flow into a variadic parameter as trailing values in their
  /// original order; without a variadic parameter they are a configuration error.
  fn inject_arguments<'a>(
    class: &str,
    dependencies: impl Iterator<Item = (&'a str, Value)>,
    arguments: &Array,
  ) -> Result<Vec<Value>> {
    let positional = if arguments.is_integer_indexed() {
      true
    } else if arguments.is_name_indexed() {
      false
    } else {
      return Err(Error::invalid_config(
        "Arguments indexed both by name and by position are not allowed in the same array.",
      ));
    };

    let mut slots = Vec::new();
    let mut used: HashSet<Key> = HashSet::new();
    let mut is_variadic = false;
    for (index, (name, dependency)) in dependencies.enumerate() {
      if matches!(&dependency, Value::Definition(d) if d.is_variadic_parameter()) {
        is_variadic = true;
      }
      let key = if positional {
        Key::Index(index)
      } else {
        Key::Name(name.to_owned())
      };
      match arguments.get(&key) {
        Some(argument) => {
          slots.push(DefinitionResolver::ensure_resolvable(argument)?);
          used.insert(key);
        }
        None => slots.push(dependency),
      }
    }

    let unused: Vec<(&Key, &Value)> = arguments.iter().filter(|(key, _)| !used.contains(*key)).collect();
    if unused.is_empty() {
      return Ok(slots);
    }
    if !is_variadic {
      let keys: Vec<String> = unused.iter().map(|(key, _)| key.to_string()).collect();
      return Err(Error::invalid_config(format!(
        "Invalid definition: constructor of \"{}\" has no parameter for the argument(s) {}.",
        class,
        keys.join(", ")
      )));
    }
    for (_, argument) in unused {
      slots.push(DefinitionResolver::ensure_resolvable(argument)?);
    }
    Ok(slots)
  }

  /// Applies method calls and property assignments in declaration order. A method
  /// returning an instance of the object's class replaces the object from then on.
  fn apply_mutations(
    context: &dyn ResolverContext,
    definition: &ArrayDefinition,
    mut object: Object,
  ) -> Result<Object> {
    let classes = context.classes();

    let mut resolved = Vec::with_capacity(definition.methods_and_properties().len());
    for mutation in definition.methods_and_properties().values() {
      resolved.push(match mutation {
        Mutation::Method { name, arguments } => Mutation::Method {
          name: name.clone(),
          arguments: DefinitionResolver::resolve_array(context, arguments)?,
        },
        Mutation::Property { name, value } => Mutation::Property {
          name: name.clone(),
          value: DefinitionResolver::resolve(context, value)?,
        },
      });
    }

    for mutation in resolved {
      match mutation {
        Mutation::Method { name, arguments } => {
          let result = Self::call_method(classes, &object, &name, arguments)?;
          if let Value::Object(returned) = result {
            if classes.is_subclass_of(returned.class_name(), object.class_name()) {
              object = returned;
            }
          }
        }
        Mutation::Property { name, value } => {
          let setter = classes
            .find_property(object.class_name(), &name)
            .ok_or_else(|| {
              Error::invalid_config(format!(
                "Invalid definition: class \"{}\" does not have the property \"{}\".",
                object.class_name(),
                name
              ))
            })?;
          setter(&object, value)?;
        }
      }
    }
    Ok(object)
  }

  fn call_method(classes: &ClassRegistry, object: &Object, name: &str, arguments: Array) -> Result<Value> {
    let method = classes.find_method(object.class_name(), name).ok_or_else(|| {
      Error::invalid_config(format!(
        "Invalid definition: class \"{}\" does not have the method \"{}\".",
        object.class_name(),
        name
      ))
    })?;
    let target = format!("{}::{}", object.class_name(), name);
    let values = bind_arguments(&target, method.params(), arguments)?;
    method.call(Some(object), Arguments::new(target, values))
  }
}

/// Orders a method's argument list: integer keys are positions, named entries go
/// to the parameter of that name, and gaps take the declared default.
pub(crate) fn bind_arguments(target: &str, params: &[Parameter], arguments: Array) -> Result<Vec<Value>> {
  let dense = arguments
    .keys()
    .enumerate()
    .all(|(position, key)| *key == Key::Index(position));
  if dense {
    return Ok(arguments.into_values());
  }

  let mut slots: Vec<Option<Value>> = Vec::new();
  let mut extra = Vec::new();
  for (key, value) in arguments {
    let position = match &key {
      Key::Index(index) => *index,
      Key::Name(name) => match params.iter().position(|p| p.name() == name.as_str()) {
        Some(position) if !params[position].is_variadic() => position,
        _ => {
          if params.last().is_some_and(Parameter::is_variadic) {
            extra.push(value);
            continue;
          }
          return Err(Error::invocation(target, format!("unknown named parameter ${}", name)));
        }
      },
    };
    if slots.len() <= position {
      slots.resize(position + 1, None);
    }
    slots[position] = Some(value);
  }

  let mut values = Vec::with_capacity(slots.len() + extra.len());
  for (position, slot) in slots.into_iter().enumerate() {
    match slot {
      Some(value) => values.push(value),
      None => {
        let default = params
          .get(position)
          .and_then(Parameter::default_value)
          .cloned()
          .ok_or_else(|| Error::invocation(target, format!("missing argument #{}", position + 1)))?;
        values.push(default);
      }
    }
  }
  values.extend(extra);
  Ok(values)
}
