//! The lookup coordinator that definitions resolve against.

use crate::callable::Callable;
use crate::container::Container;
use crate::definitions::{ArrayDefinition, Definition};
use crate::error::{Error, Result};
use crate::injector::Injector;
use crate::normalizer::Normalizer;
use crate::reflection::ClassRegistry;
use crate::value::Value;

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexSet;

/// What a [`Definition`] may ask for while it resolves.
pub trait ResolverContext {
  /// Resolves `id`: a registered definition, then the external container, then an
  /// instantiable class of that name.
  fn get(&self, id: &str) -> Result<Value>;

  /// Whether [`get`](Self::get) could find something for `id`. Has no side effects.
  fn has(&self, id: &str) -> bool;

  /// Resolves the target of a [`Reference`](crate::Reference).
  fn resolve_reference(&self, id: &str) -> Result<Value>;

  /// Calls `callable` with its parameters autowired.
  fn invoke(&self, callable: &Callable) -> Result<Value>;

  fn classes(&self) -> &ClassRegistry;

  /// Whether bound objects are duplicated on every resolution.
  fn clone_on_resolve(&self) -> bool;
}

/// Holds raw definitions by id, normalizes them lazily and tracks the ids currently
/// being created to detect cycles.
///
/// The in-flight set and the normalization cache use `RefCell`, so a resolver must
/// be driven from one thread at a time.
pub(crate) struct DependencyResolver {
  classes: Arc<ClassRegistry>,
  container: Option<Arc<dyn Container>>,
  definitions: HashMap<String, Value>,
  definition_instances: RefCell<HashMap<String, Definition>>,
  creating_ids: RefCell<IndexSet<String>>,
  clone_on_resolve: bool,
}

impl DependencyResolver {
  pub(crate) fn new(
    classes: Arc<ClassRegistry>,
    container: Option<Arc<dyn Container>>,
    clone_on_resolve: bool,
  ) -> Self {
    Self {
      classes,
      container,
      definitions: HashMap::new(),
      definition_instances: RefCell::new(HashMap::new()),
      creating_ids: RefCell::new(IndexSet::new()),
      clone_on_resolve,
    }
  }

  pub(crate) fn class_registry(&self) -> &Arc<ClassRegistry> {
    &self.classes
  }

  /// Registers a raw definition, dropping any normalized form cached for `id`.
  pub(crate) fn set(&mut self, id: impl Into<String>, definition: Value) {
    let id = id.into();
    self.definition_instances.get_mut().remove(&id);
    self.definitions.insert(id, definition);
  }

  pub(crate) fn has_definition(&self, id: &str) -> bool {
    self.definitions.contains_key(id)
  }

  /// The normalized definition registered under `id`, normalizing and caching it on
  /// first use.
  pub(crate) fn definition_instance(&self, id: &str) -> Option<Result<Definition>> {
    if let Some(definition) = self.definition_instances.borrow().get(id) {
      return Some(Ok(definition.clone()));
    }

    let raw = self.definitions.get(id)?;
    let definition = match Normalizer::normalize(raw, Some(id), &self.classes) {
      Ok(definition) => definition,
      Err(err) => return Some(Err(err)),
    };
    tracing::debug!(id, kind = definition.kind_name(), "normalized definition");
    self
      .definition_instances
      .borrow_mut()
      .insert(id.to_owned(), definition.clone());
    Some(Ok(definition))
  }

  /// Marks `id` as in flight until the returned guard is dropped.
  pub(crate) fn creating(&self, id: &str) -> Result<CreatingGuard<'_>> {
    CreatingGuard::new(&self.creating_ids, id)
  }

  fn resolve_registered(&self, id: &str, definition: Result<Definition>) -> Result<Value> {
    let _guard = self.creating(id)?;
    definition?.resolve(self)
  }

  fn autowire(&self, class: &str) -> Result<Value> {
    let _guard = self.creating(class)?;
    tracing::trace!(class, "autowiring class");
    ArrayDefinition::for_class(class).resolve(self)
  }

  fn lookup(&self, id: &str) -> Result<Value> {
    tracing::trace!(id, "resolving");
    if let Some(definition) = self.definition_instance(id) {
      return self.resolve_registered(id, definition);
    }
    if let Some(container) = &self.container {
      if container.has(id) {
        return container.get(id);
      }
    }
    if self.classes.is_instantiable(id) {
      return self.autowire(id);
    }
    Err(self.not_found(id))
  }

  fn not_found(&self, id: &str) -> Error {
    Error::NotFound {
      id: id.to_owned(),
      building: self.creating_ids.borrow().iter().cloned().collect(),
    }
  }
}

impl ResolverContext for DependencyResolver {
  fn get(&self, id: &str) -> Result<Value> {
    self.lookup(id)
  }

  fn has(&self, id: &str) -> bool {
    self.has_definition(id)
      || self.container.as_ref().is_some_and(|container| container.has(id))
      || self.classes.is_instantiable(id)
  }

  fn resolve_reference(&self, id: &str) -> Result<Value> {
    self.lookup(id)
  }

  fn invoke(&self, callable: &Callable) -> Result<Value> {
    Injector::invoke(self, callable)
  }

  fn classes(&self) -> &ClassRegistry {
    &self.classes
  }

  fn clone_on_resolve(&self) -> bool {
    self.clone_on_resolve
  }
}

/// An RAII guard over one entry of the in-flight set.
///
/// Entering an id that is already in flight fails with
/// [`Error::CircularReference`]. The id is removed again when the guard drops,
/// whether resolution succeeded or not.
pub(crate) struct CreatingGuard<'a> {
  creating_ids: &'a RefCell<IndexSet<String>>,
  id: String,
}

impl<'a> CreatingGuard<'a> {
  fn new(creating_ids: &'a RefCell<IndexSet<String>>, id: &str) -> Result<Self> {
    let mut ids = creating_ids.borrow_mut();
    if ids.contains(id) {
      let chain: Vec<String> = ids.iter().cloned().collect();
      tracing::debug!(id, chain = ?chain, "circular reference detected");
      return Err(Error::CircularReference {
        id: id.to_owned(),
        chain,
      });
    }
    ids.insert(id.to_owned());
    Ok(Self {
      creating_ids,
      id: id.to_owned(),
    })
  }
}

impl Drop for CreatingGuard<'_> {
  fn drop(&mut self) {
    self.creating_ids.borrow_mut().shift_remove(&self.id);
  }
}
