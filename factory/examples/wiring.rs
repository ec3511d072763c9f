use fibre_factory::{array, Class, ClassRegistry, Factory, Method, Object, Parameter, Reference, Value};
use std::sync::Arc;

// 1. Plain Rust types the factory will build.
#[derive(Clone)]
struct Engine {
  name: &'static str,
  power: i64,
}

#[derive(Clone)]
struct Car {
  engine: Object,
  color: String,
}

fn main() -> fibre_factory::Result<()> {
  // --- Class Metadata ---
  // Describe constructors, parents and methods so definitions can refer to them by name.
  let classes = Arc::new(ClassRegistry::new());
  classes.register(Class::interface("EngineInterface"));
  classes.register(
    Class::new("EngineMarkOne")
      .implements("EngineInterface")
      .param(Parameter::new("power").builtin("int").default(100))
      .constructor(|args| {
        Ok(Engine {
          name: "Mark One",
          power: args.int(0)?,
        })
      }),
  );
  classes.register(
    Class::new("Car")
      .param(Parameter::new("engine").class("EngineInterface"))
      .param(Parameter::new("color").builtin("string").default("white"))
      .constructor(|args| {
        Ok(Car {
          engine: args.object(0)?,
          color: args.string(1)?,
        })
      })
      .method(
        Method::instance("paint", |car: &mut Car, args| {
          car.color = args.string(0)?;
          Ok(Value::Null)
        })
        .param(Parameter::new("color").builtin("string")),
      ),
  );

  // --- Definitions ---
  // Bind the interface to a concrete class with a tuned constructor argument.
  let mut factory = Factory::new(classes);
  factory.set(
    "EngineInterface",
    array! { "class" => "EngineMarkOne", "__construct()" => array! { "power" => 250 } },
  )?;
  factory.set("car.red", array! { "class" => "Car", "paint()" => array!["red"] })?;

  // --- Creation ---
  println!("Creating a car by class name (autowired)...");
  let plain = factory.create("Car")?;
  describe(&plain);

  println!("Creating a car from a registered definition...");
  let red = factory.get("car.red")?;
  describe(&red);

  println!("Creating a car with an explicit engine reference...");
  let custom = factory.create(array! {
    "class" => "Car",
    "__construct()" => array! { "engine" => Reference::to("EngineMarkOne"), "color" => "green" },
  })?;
  describe(&custom);

  Ok(())
}

fn describe(car: &Value) {
  if let Some(car) = car.as_object().and_then(|object| object.get::<Car>()) {
    let engine = car.engine.get::<Engine>();
    match engine {
      Some(engine) => println!("  {} car, {} engine ({} hp)", car.color, engine.name, engine.power),
      None => println!("  {} car, unknown engine", car.color),
    }
  }
}
