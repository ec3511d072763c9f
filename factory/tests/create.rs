mod common;

use common::{classes, engine_of, unwrap_object, Car, EngineMarkOne, Phone, Recorder};
use fibre_factory::{array, ArrayDefinition, Error, Factory, Reference, Value};
use pretty_assertions::assert_eq;

// --- Creating From Configs ---

#[test]
fn test_array_definition_end_to_end() {
  // Arrange
  let factory = Factory::new(classes());

  // Act
  let phone = factory
    .create(array! {
      "class" => "Phone",
      "__construct()" => array!["Kiradzu"],
      "$dev" => true,
      "setId()" => array!["abc"],
    })
    .unwrap();

  // Assert
  let phone = unwrap_object::<Phone>(&phone);
  assert_eq!(phone.name.as_deref(), Some("Kiradzu"));
  assert!(phone.dev);
  assert_eq!(phone.id.as_deref(), Some("abc"));
  assert_eq!(phone.version, None);
}

#[test]
fn test_create_by_class_name_autowires() {
  // Arrange
  let mut factory = Factory::new(classes());
  factory.set("EngineInterface", "EngineMarkOne").unwrap();

  // Act
  let car = factory.create("Car").unwrap();

  // Assert
  let engine = engine_of(&car);
  assert_eq!(engine.class_name(), "EngineMarkOne");
  assert_eq!(engine.get::<EngineMarkOne>(), Some(EngineMarkOne { number: 1 }));
}

#[test]
fn test_create_returns_a_new_instance_each_call() {
  // Arrange
  let mut factory = Factory::new(classes());
  factory.set("EngineInterface", "EngineMarkOne").unwrap();

  // Act
  let first = factory.create("Car").unwrap();
  let second = factory.create("Car").unwrap();

  // Assert
  assert!(!first.as_object().unwrap().ptr_eq(second.as_object().unwrap()));
}

#[test]
fn test_create_with_arguments() {
  // Arrange
  let factory = Factory::new(classes());

  // Act
  let phone = factory.create_with("Phone", array!["Kiradzu", "2.0"]).unwrap();

  // Assert
  let phone = unwrap_object::<Phone>(&phone);
  assert_eq!(phone.name.as_deref(), Some("Kiradzu"));
  assert_eq!(phone.version.as_deref(), Some("2.0"));
}

#[test]
fn test_create_with_arguments_overrides_registered_ones() {
  // Arrange
  let mut factory = Factory::new(classes());
  factory
    .set("phone", array! { "class" => "Phone", "__construct()" => array!["Kiradzu", "1.0"] })
    .unwrap();

  // Act
  let phone = factory.create_with("phone", array!["Nokia"]).unwrap();

  // Assert
  let phone = unwrap_object::<Phone>(&phone);
  assert_eq!(phone.name.as_deref(), Some("Nokia"));
  assert_eq!(phone.version.as_deref(), Some("1.0"));
}

#[test]
fn test_create_with_arguments_rejects_non_array_definitions() {
  // Arrange
  let mut factory = Factory::new(classes());
  factory.set("engine", Reference::to("EngineMarkOne")).unwrap();

  // Act
  let err = factory.create_with("engine", array![5]).unwrap_err();

  // Assert
  assert!(matches!(err, Error::InvalidConfig(_)));
}

#[test]
fn test_create_unknown_id_is_not_found() {
  let factory = Factory::new(classes());

  let err = factory.create("Tablet").unwrap_err();

  assert!(err.is_not_found());
  assert_eq!(
    err.to_string(),
    "No definition or class found or resolvable for \"Tablet\" while building nothing."
  );
}

#[test]
fn test_create_from_prepared_definition() {
  let factory = Factory::new(classes());

  let engine = factory.create(ArrayDefinition::for_class("EngineMarkOne")).unwrap();

  assert_eq!(unwrap_object::<EngineMarkOne>(&engine).number, 1);
}

// --- Methods And Properties ---

#[test]
fn test_methods_and_properties_run_in_declaration_order() {
  // Arrange
  let factory = Factory::new(classes());

  // Act
  let recorder = factory
    .create(array! {
      "class" => "Recorder",
      "second()" => array![],
      "$flag" => true,
      "first()" => array![],
    })
    .unwrap();

  // Assert
  let recorder = unwrap_object::<Recorder>(&recorder);
  assert_eq!(recorder.calls, ["second()", "$flag", "first()"]);
}

#[test]
fn test_fluent_method_replaces_the_object() {
  // Arrange
  let mut factory = Factory::new(classes());
  factory.set("EngineInterface", "EngineMarkOne").unwrap();

  // Act
  let car = factory
    .create(array! { "class" => "Car", "withColor()" => array!["blue"] })
    .unwrap();

  // Assert
  assert_eq!(unwrap_object::<Car>(&car).color.as_deref(), Some("blue"));
}

#[test]
fn test_inherited_methods_apply_to_subclasses() {
  // Arrange
  let factory = Factory::new(classes());

  // Act
  let car = factory
    .create(array! { "class" => "SportCar", "setColor()" => array! { "color" => "green" } })
    .unwrap();

  // Assert
  assert_eq!(car.as_object().unwrap().class_name(), "SportCar");
  assert_eq!(unwrap_object::<Car>(&car).color.as_deref(), Some("green"));
  assert_eq!(engine_of(&car).class_name(), "EngineMarkTwo");
}

#[test]
fn test_failing_method_aborts_creation() {
  let factory = Factory::new(classes());

  let err = factory
    .create(array! { "class" => "Phone", "setId()" => array![42] })
    .unwrap_err();

  assert_eq!(
    err.to_string(),
    "Phone::setId: argument #1 must be of type string, int given"
  );
}

// --- Merging With Registered Definitions ---

#[test]
fn test_create_merges_with_the_registered_class_definition() {
  // Arrange
  let mut factory = Factory::new(classes());
  factory
    .set(
      "Phone",
      array! {
        "__construct()" => array!["Kiradzu", "1.0"],
        "$dev" => true,
        "setId()" => array!["registered"],
      },
    )
    .unwrap();

  // Act
  let phone = factory
    .create(array! {
      "class" => "Phone",
      "__construct()" => array!["Nokia"],
      "setId()" => array!["created"],
    })
    .unwrap();

  // Assert
  let phone = unwrap_object::<Phone>(&phone);
  assert_eq!(phone.name.as_deref(), Some("Nokia"));
  assert_eq!(phone.version.as_deref(), Some("1.0"));
  assert!(phone.dev);
  assert_eq!(phone.id.as_deref(), Some("created"));
}

#[test]
fn test_registered_reference_is_not_merged() {
  // Arrange
  let mut factory = Factory::new(classes());
  factory.set("EngineMarkOne", Reference::to("EngineMarkTwo")).unwrap();

  // Act
  let engine = factory
    .create(array! { "class" => "EngineMarkOne", "__construct()" => array![7] })
    .unwrap();

  // Assert
  assert_eq!(unwrap_object::<EngineMarkOne>(&engine).number, 7);
}

// --- Registration ---

#[test]
fn test_get_builds_registered_definitions_anew() {
  // Arrange
  let mut factory = Factory::new(classes());
  factory
    .set("engine", array! { "class" => "EngineMarkOne", "__construct()" => array![3] })
    .unwrap();

  // Act
  let first = factory.get("engine").unwrap();
  let second = factory.get("engine").unwrap();

  // Assert
  assert_eq!(unwrap_object::<EngineMarkOne>(&first).number, 3);
  assert!(!first.as_object().unwrap().ptr_eq(second.as_object().unwrap()));
}

#[test]
fn test_has_checks_definitions_and_classes() {
  let mut factory = Factory::new(classes());
  factory.set("engine", "EngineMarkOne").unwrap();

  assert!(factory.has("engine"));
  assert!(factory.has("Car"));
  assert!(!factory.has("EngineInterface"));
  assert!(!factory.has("Tablet"));
}

#[test]
fn test_set_replaces_previous_definition() {
  // Arrange
  let mut factory = Factory::new(classes());
  factory.set("engine", "EngineMarkOne").unwrap();
  let before = factory.get("engine").unwrap();

  // Act
  factory.set("engine", "EngineMarkTwo").unwrap();
  let after = factory.get("engine").unwrap();

  // Assert
  assert_eq!(before.as_object().unwrap().class_name(), "EngineMarkOne");
  assert_eq!(after.as_object().unwrap().class_name(), "EngineMarkTwo");
}

#[test]
fn test_registered_value_is_returned_as_is() {
  let mut factory = Factory::new(classes());
  factory
    .set("settings", Value::from(fibre_factory::ValueDefinition::new(array! { "debug" => true })))
    .unwrap();

  let settings = factory.get("settings").unwrap();

  assert_eq!(
    settings.as_array().and_then(|a| a.get_name("debug")).and_then(Value::as_bool),
    Some(true)
  );
}
