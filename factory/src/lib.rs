//! # Fibre Factory
//!
//! A declarative object factory with dependency injection.
//!
//! Objects are described by *definitions* instead of being wired by hand: a class
//! name, an array config naming constructor arguments, method calls and property
//! assignments, a reference to another entry, a callable, or a ready value. The
//! factory resolves a definition into a fully constructed object graph, autowiring
//! constructor parameters from their declared types.
//!
//! ## Core Concepts
//!
//! - **ClassRegistry**: what the factory knows about classes: constructor
//!   parameters, parents and interfaces, methods and properties.
//! - **Definitions**: recipes registered by id with [`Factory::set`] or passed to
//!   [`Factory::create`].
//! - **Container**: an optional external lookup the factory falls back to for ids
//!   it has no definition for.
//!
//! ## Quick Start
//!
//! ```
//! use fibre_factory::{array, Class, ClassRegistry, Factory, Parameter, Reference};
//! use std::sync::Arc;
//!
//! #[derive(Clone)]
//! struct Engine {
//!   power: i64,
//! }
//!
//! #[derive(Clone)]
//! struct Car {
//!   engine: Engine,
//!   color: String,
//! }
//!
//! let classes = Arc::new(ClassRegistry::new());
//! classes.register(Class::interface("EngineInterface"));
//! classes.register(
//!   Class::new("EngineMarkOne")
//!     .implements("EngineInterface")
//!     .constructor(|_| Ok(Engine { power: 100 })),
//! );
//! classes.register(
//!   Class::new("Car")
//!     .param(Parameter::new("engine").class("EngineInterface"))
//!     .param(Parameter::new("color").builtin("string").default("white"))
//!     .constructor(|args| {
//!       Ok(Car {
//!         engine: args.downcast::<Engine>(0)?,
//!         color: args.string(1)?,
//!       })
//!     }),
//! );
//!
//! let mut factory = Factory::new(classes);
//! factory.set("EngineInterface", Reference::to("EngineMarkOne")).unwrap();
//!
//! let car = factory
//!   .create(array! { "class" => "Car", "__construct()" => array! { "color" => "red" } })
//!   .unwrap();
//! let car = car.as_object().and_then(|o| o.get::<Car>()).unwrap();
//!
//! assert_eq!(car.engine.power, 100);
//! assert_eq!(car.color, "red");
//! ```

mod arguments;
mod builder;
mod callable;
mod container;
pub mod definitions;
mod dependency_resolver;
mod error;
mod extractor;
mod factory;
mod injector;
mod macros;
mod normalizer;
mod object;
mod reflection;
mod resolver;
mod validator;
mod value;

pub use arguments::Arguments;
pub use builder::ArrayDefinitionBuilder;
pub use callable::{Callable, Function, MethodTarget, INVOKE};
pub use container::{Container, SimpleContainer};
pub use definitions::{
  ArrayDefinition, CallableDefinition, ClassDefinition, Definition, DynamicReference,
  InvalidDefinition, Mutation, ParameterDefinition, Reference, ValueDefinition,
};
pub use dependency_resolver::ResolverContext;
pub use error::{Error, Result};
pub use extractor::DefinitionExtractor;
pub use factory::{Factory, FactoryBuilder, FactoryConfig};
pub use injector::Injector;
pub use normalizer::Normalizer;
pub use object::Object;
pub use reflection::{Class, ClassKind, ClassRegistry, Dependencies, Method, Parameter, TypeName};
pub use resolver::DefinitionResolver;
pub use validator::DefinitionValidator;
pub use value::{Array, Key, Value};
