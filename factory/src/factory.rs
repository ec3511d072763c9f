//! The public entry point: register definitions by id and create objects from them.

use crate::container::Container;
use crate::definitions::{ArrayDefinition, Definition};
use crate::dependency_resolver::{DependencyResolver, ResolverContext};
use crate::error::{Error, Result};
use crate::normalizer::Normalizer;
use crate::reflection::ClassRegistry;
use crate::resolver::DefinitionResolver;
use crate::validator::DefinitionValidator;
use crate::value::{Array, Value};

use core::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

/// Behavioural switches of a [`Factory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactoryConfig {
  /// Check the shape of definitions when they are registered or created.
  pub validate: bool,
  /// Duplicate objects bound as values on every resolution, so objects created from
  /// the same definition never share them. Objects from the external container are
  /// always shared.
  pub clone_on_resolve: bool,
}

impl Default for FactoryConfig {
  fn default() -> Self {
    Self {
      validate: true,
      clone_on_resolve: true,
    }
  }
}

/// Creates objects from definitions.
///
/// A factory keeps per-instance resolution state without locking, so it is not
/// `Sync`: drive each factory from one thread at a time.
///
/// ```
/// use fibre_factory::{array, Class, ClassRegistry, Factory, Parameter};
/// use std::sync::Arc;
///
/// #[derive(Clone)]
/// struct Greeter {
///   greeting: String,
/// }
///
/// let classes = Arc::new(ClassRegistry::new());
/// classes.register(
///   Class::new("Greeter")
///     .param(Parameter::new("greeting").builtin("string").default("hello"))
///     .constructor(|args| Ok(Greeter { greeting: args.string(0)? })),
/// );
///
/// let factory = Factory::new(classes);
/// let greeter = factory
///   .create(array! { "class" => "Greeter", "__construct()" => array!["hi"] })
///   .unwrap();
///
/// let greeting = greeter.as_object().and_then(|o| o.get::<Greeter>()).unwrap().greeting;
/// assert_eq!(greeting, "hi");
/// ```
pub struct Factory {
  resolver: DependencyResolver,
  config: FactoryConfig,
}

impl Factory {
  /// A factory with no definitions, no external container and the default config.
  pub fn new(classes: Arc<ClassRegistry>) -> Self {
    Self {
      resolver: DependencyResolver::new(classes, None, FactoryConfig::default().clone_on_resolve),
      config: FactoryConfig::default(),
    }
  }

  pub fn builder() -> FactoryBuilder {
    FactoryBuilder::new()
  }

  pub fn config(&self) -> FactoryConfig {
    self.config
  }

  pub fn classes(&self) -> &Arc<ClassRegistry> {
    self.resolver.class_registry()
  }

  /// Registers `definition` under `id`, replacing any previous one.
  pub fn set(&mut self, id: impl Into<String>, definition: impl Into<Value>) -> Result<()> {
    let id = id.into();
    let definition = definition.into();
    if self.config.validate {
      DefinitionValidator::validate(&definition, Some(id.as_str()), self.classes())?;
    }
    self.resolver.set(id, definition);
    Ok(())
  }

  /// Registers every definition, or none of them when one fails validation.
  pub fn set_multiple<I, K, V>(&mut self, definitions: I) -> Result<()>
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
  {
    let definitions: Vec<(String, Value)> = definitions
      .into_iter()
      .map(|(id, definition)| (id.into(), definition.into()))
      .collect();
    if self.config.validate {
      for (id, definition) in &definitions {
        DefinitionValidator::validate(definition, Some(id.as_str()), self.classes())?;
      }
    }
    for (id, definition) in definitions {
      self.resolver.set(id, definition);
    }
    Ok(())
  }

  /// Whether `get(id)` could produce something: a registered definition, an entry
  /// of the external container or an instantiable class.
  pub fn has(&self, id: &str) -> bool {
    self.resolver.has(id)
  }

  /// Resolves `id`. Registered definitions are built anew on every call.
  pub fn get(&self, id: &str) -> Result<Value> {
    self.resolver.get(id)
  }

  /// Builds a value from `config`: an id or class name, an array config, a
  /// callable, a definition or an object.
  pub fn create(&self, config: impl Into<Value>) -> Result<Value> {
    self.create_with(config, Array::new())
  }

  /// Like [`create`](Self::create), with `arguments` laid over the constructor
  /// arguments of the definition. Only array definitions accept arguments.
  pub fn create_with(&self, config: impl Into<Value>, arguments: Array) -> Result<Value> {
    let config = config.into();
    let classes: &ClassRegistry = self.classes();
    if self.config.validate {
      DefinitionValidator::validate(&config, None, classes)?;
    }

    if let Value::Str(id) = &config {
      if let Some(definition) = self.resolver.definition_instance(id) {
        let _guard = self.resolver.creating(id)?;
        let definition = with_arguments(definition?, arguments)?;
        return DefinitionResolver::resolve(&self.resolver, &Value::from(definition));
      }
      if classes.is_class(id) {
        let definition = ArrayDefinition::new(id.as_str(), arguments, IndexMap::new())?;
        let _guard = self.resolver.creating(id)?;
        return definition.resolve(&self.resolver);
      }
      return Err(Error::NotFound {
        id: id.clone(),
        building: Vec::new(),
      });
    }

    let mut definition = Normalizer::normalize(&config, None, classes)?;
    if let Definition::Array(created) = &definition {
      match self.resolver.definition_instance(created.class()) {
        Some(Ok(Definition::Array(registered))) => {
          tracing::debug!(class = created.class(), "merging with the registered definition");
          definition = Definition::Array(registered.merge(created));
        }
        Some(Err(err)) => return Err(err),
        _ => {}
      }
    }
    let definition = with_arguments(definition, arguments)?;

    let _guard = match &definition {
      Definition::Array(array) => Some(self.resolver.creating(array.class())?),
      _ => None,
    };
    DefinitionResolver::resolve(&self.resolver, &Value::from(definition))
  }
}

fn with_arguments(definition: Definition, arguments: Array) -> Result<Definition> {
  if arguments.is_empty() {
    return Ok(definition);
  }
  match definition {
    Definition::Array(array) => {
      let overrides = ArrayDefinition::new(array.class(), arguments, IndexMap::new())?;
      Ok(Definition::Array(array.merge(&overrides)))
    }
    other => Err(Error::invalid_config(format!(
      "Constructor arguments can only be passed to an array definition, got {}.",
      other.kind_name()
    ))),
  }
}

impl fmt::Debug for Factory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Factory")
      .field("config", &self.config)
      .field("classes", &self.classes().len())
      .finish_non_exhaustive()
  }
}

/// A consuming builder for [`Factory`].
///
/// ```
/// use fibre_factory::{Factory, SimpleContainer};
/// use std::sync::Arc;
///
/// let factory = Factory::builder()
///   .container(Arc::new(SimpleContainer::new()))
///   .clone_on_resolve(false)
///   .build()
///   .unwrap();
/// assert!(!factory.config().clone_on_resolve);
/// ```
#[derive(Default)]
pub struct FactoryBuilder {
  classes: Option<Arc<ClassRegistry>>,
  container: Option<Arc<dyn Container>>,
  definitions: Vec<(String, Value)>,
  config: FactoryConfig,
}

impl FactoryBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// The class metadata to build from. Defaults to an empty registry.
  pub fn classes(mut self, classes: Arc<ClassRegistry>) -> Self {
    self.classes = Some(classes);
    self
  }

  /// The container consulted for ids that have no definition.
  pub fn container(mut self, container: Arc<dyn Container>) -> Self {
    self.container = Some(container);
    self
  }

  pub fn definition(mut self, id: impl Into<String>, definition: impl Into<Value>) -> Self {
    self.definitions.push((id.into(), definition.into()));
    self
  }

  pub fn definitions<I, K, V>(mut self, definitions: I) -> Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
  {
    self.definitions.extend(
      definitions
        .into_iter()
        .map(|(id, definition)| (id.into(), definition.into())),
    );
    self
  }

  pub fn validate(mut self, validate: bool) -> Self {
    self.config.validate = validate;
    self
  }

  pub fn clone_on_resolve(mut self, clone_on_resolve: bool) -> Self {
    self.config.clone_on_resolve = clone_on_resolve;
    self
  }

  /// Builds the factory, validating the collected definitions if enabled.
  pub fn build(self) -> Result<Factory> {
    let classes = self.classes.unwrap_or_default();
    let mut factory = Factory {
      resolver: DependencyResolver::new(classes, self.container, self.config.clone_on_resolve),
      config: self.config,
    };
    factory.set_multiple(self.definitions)?;
    Ok(factory)
  }
}

impl fmt::Debug for FactoryBuilder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("FactoryBuilder")
      .field("config", &self.config)
      .field("definitions", &self.definitions.len())
      .field("has_container", &self.container.is_some())
      .finish_non_exhaustive()
  }
}
