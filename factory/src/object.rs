//! Type-erased, shared object handles.

use core::fmt;
use std::any::Any;
use std::sync::Arc;

use parking_lot::RwLock;

type Erased = Box<dyn Any + Send + Sync>;
type Duplicator = fn(&(dyn Any + Send + Sync)) -> Option<Erased>;

fn duplicate<T: Any + Send + Sync + Clone>(value: &(dyn Any + Send + Sync)) -> Option<Erased> {
  value
    .downcast_ref::<T>()
    .map(|value| Box::new(value.clone()) as Erased)
}

/// A shared handle to an instance of a registered class.
///
/// Cloning the handle does not clone the instance: both handles observe the same
/// state, and [`Object::ptr_eq`] reports them as identical. Use
/// [`Object::try_duplicate`] for a fresh copy.
#[derive(Clone)]
pub struct Object {
  class: Arc<str>,
  cell: Arc<RwLock<Erased>>,
  duplicator: Option<Duplicator>,
}

impl Object {
  /// Wraps `value` as an instance of `class`. The instance can be duplicated.
  pub fn new<T: Any + Send + Sync + Clone>(class: impl Into<Arc<str>>, value: T) -> Self {
    Self {
      class: class.into(),
      cell: Arc::new(RwLock::new(Box::new(value))),
      duplicator: Some(duplicate::<T>),
    }
  }

  /// Wraps `value` as an instance of `class` that is always shared, never duplicated.
  pub fn shared<T: Any + Send + Sync>(class: impl Into<Arc<str>>, value: T) -> Self {
    Self {
      class: class.into(),
      cell: Arc::new(RwLock::new(Box::new(value))),
      duplicator: None,
    }
  }

  /// The runtime class of this instance.
  pub fn class_name(&self) -> &str {
    &self.class
  }

  /// Whether both handles point at the same instance.
  pub fn ptr_eq(&self, other: &Object) -> bool {
    Arc::ptr_eq(&self.cell, &other.cell)
  }

  pub fn is<T: Any>(&self) -> bool {
    self.cell.read().is::<T>()
  }

  /// Runs `f` against the instance if it holds a `T`.
  pub fn read<T: Any, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
    let guard = self.cell.read();
    guard.downcast_ref::<T>().map(f)
  }

  /// Runs `f` against the instance mutably if it holds a `T`.
  pub fn write<T: Any, R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
    let mut guard = self.cell.write();
    guard.downcast_mut::<T>().map(f)
  }

  /// Returns a copy of the instance if it holds a `T`.
  pub fn get<T: Any + Clone>(&self) -> Option<T> {
    self.read(T::clone)
  }

  pub fn is_duplicable(&self) -> bool {
    self.duplicator.is_some()
  }

  /// Creates an independent copy of the instance, or `None` for shared-only objects.
  pub fn try_duplicate(&self) -> Option<Object> {
    let duplicator = self.duplicator?;
    let copy = {
      let guard = self.cell.read();
      duplicator(&**guard)?
    };
    Some(Self {
      class: self.class.clone(),
      cell: Arc::new(RwLock::new(copy)),
      duplicator: self.duplicator,
    })
  }
}

impl fmt::Debug for Object {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Object({} @ {:p})", self.class, Arc::as_ptr(&self.cell))
  }
}
