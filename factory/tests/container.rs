mod common;

use common::{classes, engine_of, EngineMarkOne, EngineMarkTwo};
use fibre_factory::{Container, Factory, Object, Reference, SimpleContainer, Value};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

// --- Clone On Resolve ---

#[test]
fn test_bound_object_is_duplicated_per_creation() {
  // Arrange
  let mut factory = Factory::new(classes());
  let engine = Object::new("EngineMarkOne", EngineMarkOne { number: 42 });
  factory.set("EngineInterface", engine.clone()).unwrap();

  // Act
  let first = factory.create("Car").unwrap();
  let second = factory.create("Car").unwrap();

  // Assert
  let (first, second) = (engine_of(&first), engine_of(&second));
  assert!(!first.ptr_eq(&second));
  assert!(!first.ptr_eq(&engine));
  assert_eq!(first.get::<EngineMarkOne>(), Some(EngineMarkOne { number: 42 }));
  assert_eq!(second.get::<EngineMarkOne>(), Some(EngineMarkOne { number: 42 }));
}

#[test]
fn test_bound_object_is_shared_when_cloning_is_off() {
  // Arrange
  let engine = Object::new("EngineMarkOne", EngineMarkOne { number: 42 });
  let factory = Factory::builder()
    .classes(classes())
    .definition("EngineInterface", engine.clone())
    .clone_on_resolve(false)
    .build()
    .unwrap();

  // Act
  let first = factory.create("Car").unwrap();
  let second = factory.create("Car").unwrap();

  // Assert
  assert!(engine_of(&first).ptr_eq(&engine));
  assert!(engine_of(&second).ptr_eq(&engine));
}

#[test]
fn test_shared_only_object_is_never_duplicated() {
  // Arrange
  let mut factory = Factory::new(classes());
  let engine = Object::shared("EngineMarkOne", EngineMarkOne { number: 1 });
  factory.set("EngineInterface", engine.clone()).unwrap();

  // Act
  let car = factory.create("Car").unwrap();

  // Assert
  assert!(engine_of(&car).ptr_eq(&engine));
}

// --- External Container ---

#[test]
fn test_container_instance_is_shared_across_creations() {
  // Arrange
  let container = Arc::new(SimpleContainer::new());
  let engine = Object::new("EngineMarkTwo", EngineMarkTwo { number: 7 });
  container.add_instance("EngineInterface", engine.clone());
  let factory = Factory::builder()
    .classes(classes())
    .container(container)
    .build()
    .unwrap();

  // Act
  let first = factory.create("Car").unwrap();
  let second = factory.create("Car").unwrap();

  // Assert
  assert!(!first.as_object().unwrap().ptr_eq(second.as_object().unwrap()));
  assert!(engine_of(&first).ptr_eq(&engine));
  assert!(engine_of(&second).ptr_eq(&engine));
}

#[test]
fn test_container_singleton_is_built_once() {
  // Arrange
  let calls = Arc::new(AtomicUsize::new(0));
  let counter = calls.clone();
  let container = Arc::new(SimpleContainer::new());
  container.add_singleton("EngineInterface", move || {
    counter.fetch_add(1, Ordering::SeqCst);
    Ok(Value::Object(Object::new("EngineMarkOne", EngineMarkOne { number: 1 })))
  });
  let factory = Factory::builder()
    .classes(classes())
    .container(container)
    .build()
    .unwrap();

  // Act
  factory.create("Car").unwrap();
  factory.create("Car").unwrap();

  // Assert
  assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_own_definitions_take_precedence_over_the_container() {
  // Arrange
  let container = Arc::new(SimpleContainer::new());
  container.add_instance("EngineInterface", Object::new("EngineMarkTwo", EngineMarkTwo { number: 7 }));
  let factory = Factory::builder()
    .classes(classes())
    .container(container)
    .definition("EngineInterface", Reference::to("EngineMarkOne"))
    .build()
    .unwrap();

  // Act
  let car = factory.create("Car").unwrap();

  // Assert
  assert_eq!(engine_of(&car).class_name(), "EngineMarkOne");
}

#[test]
fn test_container_entries_are_visible_through_the_factory() {
  // Arrange
  let container = Arc::new(SimpleContainer::new());
  container.add_instance("db.dsn", "sqlite::memory:");
  let factory = Factory::builder()
    .classes(classes())
    .container(container.clone())
    .build()
    .unwrap();

  // Act
  let dsn = factory.get("db.dsn").unwrap();

  // Assert
  assert!(factory.has("db.dsn"));
  assert!(container.has("db.dsn"));
  assert_eq!(dsn.as_str(), Some("sqlite::memory:"));
}

#[test]
fn test_container_type_mismatch_is_reported() {
  // Arrange
  let container = Arc::new(SimpleContainer::new());
  container.add_instance("EngineInterface", "not an engine");
  let factory = Factory::builder()
    .classes(classes())
    .container(container)
    .build()
    .unwrap();

  // Act
  let err = factory.create("Car").unwrap_err();

  // Assert
  assert_eq!(
    err.to_string(),
    "Container returned incorrect type \"string\" for service \"EngineInterface\"."
  );
}
