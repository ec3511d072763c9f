//! The external container contract and a thread-safe implementation of it.

use crate::error::{Error, Result};
use crate::value::Value;

use std::cell::RefCell;
use std::collections::HashSet;

use dashmap::DashMap;
use once_cell::sync::OnceCell;

/// A lookup a [`Factory`](crate::Factory) falls back to for ids it has no definition for.
///
/// Values coming from a container are returned as is: they are never duplicated,
/// so a singleton stays shared across everything built from it.
pub trait Container: Send + Sync {
  fn has(&self, id: &str) -> bool;

  /// Fails with [`Error::NotFound`] when `id` is absent.
  fn get(&self, id: &str) -> Result<Value>;
}

type ValueFactory = Box<dyn Fn() -> Result<Value> + Send + Sync>;

enum Provider {
  Singleton {
    cell: OnceCell<Value>,
    factory: Option<ValueFactory>,
  },
  Transient {
    factory: ValueFactory,
  },
}

impl Provider {
  fn provide(&self) -> Result<Value> {
    match self {
      Provider::Singleton { cell, factory } => cell
        .get_or_try_init(|| match factory {
          Some(factory) => factory(),
          None => Ok(Value::Null),
        })
        .cloned(),
      Provider::Transient { factory } => factory(),
    }
  }
}

thread_local! {
  // Ids whose factories are running on this thread.
  static RESOLVING: RefCell<HashSet<String>> = RefCell::new(HashSet::new());
}

struct ResolutionGuard {
  id: String,
}

impl ResolutionGuard {
  fn new(id: &str) -> Result<Self> {
    RESOLVING.with(|resolving| {
      let mut resolving = resolving.borrow_mut();
      if !resolving.insert(id.to_owned()) {
        let mut chain: Vec<String> = resolving.iter().cloned().collect();
        chain.sort();
        return Err(Error::CircularReference {
          id: id.to_owned(),
          chain,
        });
      }
      Ok(Self { id: id.to_owned() })
    })
  }
}

impl Drop for ResolutionGuard {
  fn drop(&mut self) {
    RESOLVING.with(|resolving| {
      resolving.borrow_mut().remove(&self.id);
    });
  }
}

/// A `DashMap`-backed [`Container`] of instances, lazy singletons and transients.
///
/// ```
/// use fibre_factory::{Container, SimpleContainer, Value};
///
/// let container = SimpleContainer::new();
/// container.add_instance("greeting", "hello");
/// container.add_transient("answer", || Ok(Value::Int(42)));
///
/// assert!(container.has("greeting"));
/// assert_eq!(container.get("answer").unwrap().as_int(), Some(42));
/// assert!(container.get("missing").unwrap_err().is_not_found());
/// ```
#[derive(Default)]
pub struct SimpleContainer {
  providers: DashMap<String, Provider>,
}

impl SimpleContainer {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers a ready value. Every `get` returns a handle to it.
  pub fn add_instance(&self, id: impl Into<String>, value: impl Into<Value>) {
    let provider = Provider::Singleton {
      cell: OnceCell::with_value(value.into()),
      factory: None,
    };
    self.providers.insert(id.into(), provider);
  }

  /// Registers a factory run once, on first `get`. A failed run is retried next time.
  pub fn add_singleton(
    &self,
    id: impl Into<String>,
    factory: impl Fn() -> Result<Value> + Send + Sync + 'static,
  ) {
    let provider = Provider::Singleton {
      cell: OnceCell::new(),
      factory: Some(Box::new(factory)),
    };
    self.providers.insert(id.into(), provider);
  }

  /// Registers a factory run on every `get`.
  pub fn add_transient(
    &self,
    id: impl Into<String>,
    factory: impl Fn() -> Result<Value> + Send + Sync + 'static,
  ) {
    let provider = Provider::Transient {
      factory: Box::new(factory),
    };
    self.providers.insert(id.into(), provider);
  }

  pub fn remove(&self, id: &str) -> bool {
    self.providers.remove(id).is_some()
  }

  pub fn len(&self) -> usize {
    self.providers.len()
  }

  pub fn is_empty(&self) -> bool {
    self.providers.is_empty()
  }
}

impl Container for SimpleContainer {
  fn has(&self, id: &str) -> bool {
    self.providers.contains_key(id)
  }

  fn get(&self, id: &str) -> Result<Value> {
    let _guard = ResolutionGuard::new(id)?;

    let provider = self.providers.get(id).ok_or_else(|| Error::NotFound {
      id: id.to_owned(),
      building: Vec::new(),
    })?;
    provider.value().provide()
  }
}
