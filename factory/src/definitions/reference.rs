use crate::definitions::Definition;
use crate::dependency_resolver::ResolverContext;
use crate::error::Result;
use crate::normalizer::Normalizer;
use crate::reflection::ClassRegistry;
use crate::value::{Array, Key, Value};

/// A pointer to another entry, looked up by id when resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
  id: String,
  optional: bool,
}

impl Reference {
  pub fn to(id: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      optional: false,
    }
  }

  /// A reference that resolves to `null` when the id cannot be found anywhere.
  pub fn optional(id: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      optional: true,
    }
  }

  /// References to each id, keyed like the input.
  pub fn many<K, S, I>(ids: I) -> Array
  where
    I: IntoIterator<Item = (K, S)>,
    K: Into<Key>,
    S: Into<String>,
  {
    ids
      .into_iter()
      .map(|(key, id)| (key, Value::from(Reference::to(id))))
      .collect()
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn is_optional(&self) -> bool {
    self.optional
  }

  pub fn resolve(&self, context: &dyn ResolverContext) -> Result<Value> {
    if self.optional && !context.has(&self.id) {
      return Ok(Value::Null);
    }
    context.resolve_reference(&self.id)
  }
}

/// A one-off definition resolved in place without being registered under an id.
#[derive(Debug, Clone)]
pub struct DynamicReference {
  definition: Box<Definition>,
}

impl DynamicReference {
  /// Normalizes `definition` right away; invalid definitions fail here, not on resolve.
  pub fn to(definition: impl Into<Value>, classes: &ClassRegistry) -> Result<Self> {
    let definition = Normalizer::normalize(&definition.into(), None, classes)?;
    Ok(Self {
      definition: Box::new(definition),
    })
  }

  /// Dynamic references to each member of `definitions`, keyed like the input.
  pub fn many(definitions: &Array, classes: &ClassRegistry) -> Result<Array> {
    let mut result = Array::new();
    for (key, definition) in definitions {
      let reference = DynamicReference::to(definition.clone(), classes)?;
      result.insert(key.clone(), reference);
    }
    Ok(result)
  }

  pub fn definition(&self) -> &Definition {
    &self.definition
  }

  pub fn resolve(&self, context: &dyn ResolverContext) -> Result<Value> {
    self.definition.resolve(context)
  }
}
