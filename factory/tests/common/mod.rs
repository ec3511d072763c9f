// Shared fixture classes for the integration tests.
#![allow(dead_code)]

use fibre_factory::{Class, ClassRegistry, Error, Method, Object, Parameter, Value};
use std::sync::Arc;

// --- Engines ---

#[derive(Debug, Clone, PartialEq)]
pub struct EngineMarkOne {
  pub number: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineMarkTwo {
  pub number: i64,
}

// --- Car ---

#[derive(Debug, Clone)]
pub struct Car {
  pub engine: Object,
  pub color: Option<String>,
}

// --- Phone ---

#[derive(Debug, Clone, Default)]
pub struct Phone {
  pub name: Option<String>,
  pub version: Option<String>,
  pub colors: Vec<String>,
  pub dev: bool,
  pub id: Option<String>,
}

// --- Recorder ---

#[derive(Debug, Clone, Default)]
pub struct Recorder {
  pub calls: Vec<String>,
}

// --- Misc ---

#[derive(Debug, Clone)]
pub struct Holder {
  pub inner: Option<Object>,
}

#[derive(Debug, Clone)]
pub struct Needy {
  pub vin: String,
}

#[derive(Debug, Clone)]
pub struct EngineFactory;

/// Registers every fixture class.
pub fn classes() -> Arc<ClassRegistry> {
  let classes = ClassRegistry::new();

  classes.register(Class::interface("EngineInterface"));
  classes.register(Class::abstract_class("BrokenEngine").implements("EngineInterface"));
  classes.register(
    Class::new("RepairedEngine")
      .extends("BrokenEngine")
      .constructor(|_| Ok(EngineMarkOne { number: 5 })),
  );
  classes.register(
    Class::new("EngineMarkOne")
      .implements("EngineInterface")
      .param(Parameter::new("number").builtin("int").default(1))
      .constructor(|args| Ok(EngineMarkOne { number: args.int(0)? })),
  );
  classes.register(
    Class::new("EngineMarkTwo")
      .implements("EngineInterface")
      .param(Parameter::new("number").builtin("int").default(2))
      .constructor(|args| Ok(EngineMarkTwo { number: args.int(0)? })),
  );

  classes.register(
    Class::new("Car")
      .param(Parameter::new("engine").class("EngineInterface"))
      .constructor(|args| {
        Ok(Car {
          engine: args.object(0)?,
          color: None,
        })
      })
      .method(
        Method::instance("setColor", |car: &mut Car, args| {
          car.color = Some(args.string(0)?);
          Ok(Value::Null)
        })
        .param(Parameter::new("color").builtin("string")),
      )
      .method(
        Method::fluent("withColor", |car: &Car, args| {
          let mut copy = car.clone();
          copy.color = Some(args.string(0)?);
          Ok(copy)
        })
        .param(Parameter::new("color").builtin("string")),
      ),
  );
  classes.register(
    Class::new("SportCar")
      .extends("Car")
      .param(Parameter::new("engine").class("EngineMarkTwo"))
      .constructor(|args| {
        Ok(Car {
          engine: args.object(0)?,
          color: Some("red".to_string()),
        })
      }),
  );
  classes.register(
    Class::new("UnionCar")
      .param(Parameter::new("engine").class("BrokenEngine").class("EngineMarkTwo"))
      .constructor(|args| {
        Ok(Car {
          engine: args.object(0)?,
          color: None,
        })
      }),
  );

  classes.register(
    Class::new("Phone")
      .param(Parameter::new("name").builtin("string").default(Value::Null))
      .param(Parameter::new("version").builtin("string").default(Value::Null))
      .param(Parameter::new("colors").builtin("string").variadic())
      .constructor(|args| {
        let colors = args
          .rest(2)
          .iter()
          .map(|color| color.as_str().map(str::to_owned).unwrap_or_default())
          .collect();
        Ok(Phone {
          name: args.optional_string(0)?,
          version: args.optional_string(1)?,
          colors,
          ..Phone::default()
        })
      })
      .method(
        Method::instance("setId", |phone: &mut Phone, args| {
          phone.id = Some(args.string(0)?);
          Ok(Value::Null)
        })
        .param(Parameter::new("id").builtin("string")),
      )
      .property("dev", |phone: &mut Phone, value: Value| {
        phone.dev = value.as_bool().unwrap_or_default();
        Ok(())
      }),
  );

  classes.register(
    Class::new("Recorder")
      .constructor(|_| Ok(Recorder::default()))
      .method(Method::instance("first", |recorder: &mut Recorder, _| {
        recorder.calls.push("first()".to_string());
        Ok(Value::Null)
      }))
      .method(Method::instance("second", |recorder: &mut Recorder, _| {
        recorder.calls.push("second()".to_string());
        Ok(Value::Null)
      }))
      .property("flag", |recorder: &mut Recorder, _| {
        recorder.calls.push("$flag".to_string());
        Ok(())
      }),
  );

  classes.register(
    Class::new("ChainA")
      .param(Parameter::new("b").class("ChainB"))
      .constructor(|args| Ok(Holder { inner: Some(args.object(0)?) })),
  );
  classes.register(
    Class::new("ChainB")
      .param(Parameter::new("a").class("ChainA"))
      .constructor(|args| Ok(Holder { inner: Some(args.object(0)?) })),
  );
  classes.register(
    Class::new("OptionalHolder")
      .param(Parameter::new("inner").class("EngineInterface").nullable())
      .constructor(|args| Ok(Holder { inner: args.optional_object(0)? })),
  );
  classes.register(
    Class::new("OptionalUnionHolder")
      .param(
        Parameter::new("inner")
          .class("BrokenEngine")
          .class("EngineInterface")
          .nullable(),
      )
      .constructor(|args| Ok(Holder { inner: args.optional_object(0)? })),
  );
  classes.register(
    Class::new("UnionHolder")
      .param(Parameter::new("inner").class("BrokenEngine").class("EngineInterface"))
      .constructor(|args| Ok(Holder { inner: Some(args.object(0)?) })),
  );
  classes.register(
    Class::new("Needy")
      .param(Parameter::new("vin").builtin("string"))
      .constructor(|args| Ok(Needy { vin: args.string(0)? })),
  );

  classes.register(
    Class::new("EngineFactory")
      .constructor(|_| Ok(EngineFactory))
      .method(Method::static_fn("createMarkTwo", |_| {
        Ok(Value::Object(Object::new("EngineMarkTwo", EngineMarkTwo { number: 22 })))
      }))
      .method(
        Method::instance("createMarkOne", |_: &mut EngineFactory, args| {
          let number = args.int(0)?;
          Ok(Value::Object(Object::new("EngineMarkOne", EngineMarkOne { number })))
        })
        .param(Parameter::new("number").builtin("int").default(11)),
      )
      .method(Method::static_fn("fail", |args| {
        Err(Error::Invocation {
          target: args.target().to_string(),
          message: "out of engines".to_string(),
        })
      })),
  );

  Arc::new(classes)
}

/// Copies the `T` out of an object value, panicking on anything else.
pub fn unwrap_object<T: Clone + 'static>(value: &Value) -> T {
  value
    .as_object()
    .and_then(|object| object.get::<T>())
    .unwrap_or_else(|| panic!("expected an object holding {}, got {:?}", std::any::type_name::<T>(), value))
}

/// The engine object a car was built with.
pub fn engine_of(car: &Value) -> Object {
  unwrap_object::<Car>(car).engine
}
