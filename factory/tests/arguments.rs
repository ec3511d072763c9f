mod common;

use common::{classes, unwrap_object, EngineMarkOne, Phone};
use fibre_factory::{array, Array, Error, Factory};
use pretty_assertions::assert_eq;

// --- Positional And Named ---

#[test]
fn test_named_arguments_bind_by_parameter_name() {
  // Arrange
  let factory = Factory::new(classes());

  // Act
  let phone = factory
    .create(array! {
      "class" => "Phone",
      "__construct()" => array! { "version" => "3.1", "name" => "Kiradzu" },
    })
    .unwrap();

  // Assert
  let phone = unwrap_object::<Phone>(&phone);
  assert_eq!(phone.name.as_deref(), Some("Kiradzu"));
  assert_eq!(phone.version.as_deref(), Some("3.1"));
}

#[test]
fn test_missing_arguments_fall_back_to_defaults() {
  let factory = Factory::new(classes());

  let phone = factory
    .create(array! { "class" => "Phone", "__construct()" => array! { "version" => "3.1" } })
    .unwrap();

  let phone = unwrap_object::<Phone>(&phone);
  assert_eq!(phone.name, None);
  assert_eq!(phone.version.as_deref(), Some("3.1"));
}

#[test]
fn test_mixed_argument_keys_are_rejected() {
  // Arrange
  let factory = Factory::new(classes());
  let mut arguments = array!["Kiradzu"];
  arguments.insert("version", "1.0");

  // Act
  let err = factory
    .create(array! { "class" => "Phone", "__construct()" => arguments.clone() })
    .unwrap_err();
  let err_with = factory.create_with("Phone", arguments).unwrap_err();

  // Assert
  for err in [err, err_with] {
    assert!(matches!(err, Error::InvalidConfig(_)));
    assert_eq!(
      err.to_string(),
      "Arguments indexed both by name and by position are not allowed in the same array."
    );
  }
}

#[test]
fn test_mixed_keys_are_rejected_wherever_they_collide() {
  let factory = Factory::new(classes());
  let mut arguments = Array::new();
  arguments.insert("name", "Kiradzu");
  arguments.insert(5usize, "late");

  let err = factory.create_with("Phone", arguments).unwrap_err();

  assert!(matches!(err, Error::InvalidConfig(_)));
}

// --- Variadics ---

#[test]
fn test_positional_extras_flow_into_the_variadic_parameter() {
  // Arrange
  let factory = Factory::new(classes());

  // Act
  let phone = factory
    .create_with("Phone", array!["Kiradzu", "1.0", "red", "green", "blue"])
    .unwrap();

  // Assert
  let phone = unwrap_object::<Phone>(&phone);
  assert_eq!(phone.name.as_deref(), Some("Kiradzu"));
  assert_eq!(phone.colors, ["red", "green", "blue"]);
}

#[test]
fn test_named_extras_flow_into_the_variadic_parameter_in_key_order() {
  // Arrange
  let factory = Factory::new(classes());

  // Act
  let phone = factory
    .create_with(
      "Phone",
      array! {
        "primary" => "black",
        "name" => "Kiradzu",
        "secondary" => "white",
      },
    )
    .unwrap();

  // Assert
  let phone = unwrap_object::<Phone>(&phone);
  assert_eq!(phone.name.as_deref(), Some("Kiradzu"));
  assert_eq!(phone.version, None);
  assert_eq!(phone.colors, ["black", "white"]);
}

#[test]
fn test_variadic_without_extras_is_empty() {
  let factory = Factory::new(classes());

  let phone = factory.create("Phone").unwrap();

  assert!(unwrap_object::<Phone>(&phone).colors.is_empty());
}

// --- Excess Arguments ---

#[test]
fn test_excess_positional_arguments_are_rejected() {
  let factory = Factory::new(classes());

  let err = factory.create_with("EngineMarkOne", array![1, 2]).unwrap_err();

  assert_eq!(
    err.to_string(),
    "Invalid definition: constructor of \"EngineMarkOne\" has no parameter for the argument(s) 1."
  );
}

#[test]
fn test_unknown_named_arguments_are_rejected() {
  let factory = Factory::new(classes());

  let err = factory
    .create_with("EngineMarkOne", array! { "number" => 4, "power" => 9 })
    .unwrap_err();

  assert_eq!(
    err.to_string(),
    "Invalid definition: constructor of \"EngineMarkOne\" has no parameter for the argument(s) \"power\"."
  );
}

#[test]
fn test_literal_arguments_override_defaults() {
  let factory = Factory::new(classes());

  let engine = factory.create_with("EngineMarkOne", array! { "number" => 4 }).unwrap();

  assert_eq!(unwrap_object::<EngineMarkOne>(&engine).number, 4);
}

// --- Method Arguments ---

#[test]
fn test_named_method_arguments() {
  let factory = Factory::new(classes());

  let phone = factory
    .create(array! { "class" => "Phone", "setId()" => array! { "id" => "named" } })
    .unwrap();

  assert_eq!(unwrap_object::<Phone>(&phone).id.as_deref(), Some("named"));
}

#[test]
fn test_unknown_named_method_argument_fails() {
  let factory = Factory::new(classes());

  let err = factory
    .create(array! { "class" => "Phone", "setId()" => array! { "code" => "x" } })
    .unwrap_err();

  assert_eq!(err.to_string(), "Phone::setId: unknown named parameter $code");
}
