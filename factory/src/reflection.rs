//! Registered class metadata: the reflective surface the factory builds objects from.
//!
//! Each [`Class`] describes how to construct an instance (constructor parameters plus
//! a constructor closure), which classes and interfaces it is an instance of, and the
//! methods and properties definitions may call or assign by name. A [`ClassRegistry`]
//! holds the classes keyed by name and memoizes the constructor dependencies the
//! extractor derives from them.

use crate::arguments::Arguments;
use crate::definitions::Definition;
use crate::error::{Error, Result};
use crate::object::Object;
use crate::value::Value;

use core::fmt;
use std::any::Any;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use dashmap::DashMap;
use indexmap::IndexMap;
use once_cell::sync::OnceCell;

type ConstructorFn = Arc<dyn Fn(Arguments) -> Result<Object> + Send + Sync>;
type InstanceFn = Arc<dyn Fn(&Object, Arguments) -> Result<Value> + Send + Sync>;
type StaticFn = Arc<dyn Fn(Arguments) -> Result<Value> + Send + Sync>;
pub(crate) type PropertySetter = Arc<dyn Fn(&Object, Value) -> Result<()> + Send + Sync>;

/// Constructor dependencies of a class, keyed by parameter name in declaration order.
pub type Dependencies = IndexMap<String, Definition>;

/// One member of a parameter's declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeName {
  /// A scalar or other non-class type such as `int` or `string`.
  Builtin(String),
  Class(String),
  /// The class that declares the parameter.
  SelfType,
}

/// A declared parameter of a constructor, method or function.
#[derive(Debug, Clone)]
pub struct Parameter {
  name: String,
  types: Vec<TypeName>,
  allows_null: bool,
  default: Option<Value>,
  variadic: bool,
  declaring_class: Option<String>,
}

impl Parameter {
  /// An untyped parameter.
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      types: Vec::new(),
      allows_null: false,
      default: None,
      variadic: false,
      declaring_class: None,
    }
  }

  /// Adds a class or interface to the declared type. Call repeatedly for a union.
  pub fn class(mut self, class: impl Into<String>) -> Self {
    self.types.push(TypeName::Class(class.into()));
    self
  }

  /// Adds a builtin (non-class) type to the declared type.
  pub fn builtin(mut self, name: impl Into<String>) -> Self {
    self.types.push(TypeName::Builtin(name.into()));
    self
  }

  /// Adds the declaring class (`self`) to the declared type.
  pub fn self_type(mut self) -> Self {
    self.types.push(TypeName::SelfType);
    self
  }

  pub fn nullable(mut self) -> Self {
    self.allows_null = true;
    self
  }

  /// Declares a default value. A `null` default makes the parameter nullable.
  pub fn default(mut self, value: impl Into<Value>) -> Self {
    let value = value.into();
    if value.is_null() {
      self.allows_null = true;
    }
    self.default = Some(value);
    self
  }

  pub fn variadic(mut self) -> Self {
    self.variadic = true;
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn types(&self) -> &[TypeName] {
    &self.types
  }

  pub fn allows_null(&self) -> bool {
    self.allows_null
  }

  pub fn default_value(&self) -> Option<&Value> {
    self.default.as_ref()
  }

  pub fn is_variadic(&self) -> bool {
    self.variadic
  }

  pub fn declaring_class(&self) -> Option<&str> {
    self.declaring_class.as_deref()
  }

  /// The class members of the declared type, with `self` replaced by the declaring class.
  pub fn class_names(&self) -> Vec<String> {
    self
      .types
      .iter()
      .filter_map(|ty| match ty {
        TypeName::Builtin(_) => None,
        TypeName::Class(name) => Some(name.clone()),
        TypeName::SelfType => Some(
          self
            .declaring_class
            .clone()
            .unwrap_or_else(|| "self".to_string()),
        ),
      })
      .collect()
  }

  /// The declared type as written, e.g. `?int` or `Engine|string`.
  pub fn type_description(&self) -> String {
    if self.types.is_empty() {
      return "mixed".to_string();
    }
    let joined = self
      .types
      .iter()
      .map(|ty| match ty {
        TypeName::Builtin(name) | TypeName::Class(name) => name.as_str(),
        TypeName::SelfType => "self",
      })
      .collect::<Vec<_>>()
      .join("|");
    if self.allows_null && self.types.len() == 1 {
      format!("?{}", joined)
    } else {
      joined
    }
  }

  pub(crate) fn declared_by(mut self, class: &str) -> Self {
    self.declaring_class = Some(class.to_owned());
    self
  }
}

#[derive(Clone)]
enum MethodBody {
  Instance(InstanceFn),
  Static(StaticFn),
}

/// A named method that array definitions and callables can invoke.
#[derive(Clone)]
pub struct Method {
  name: String,
  params: Vec<Parameter>,
  body: MethodBody,
}

impl Method {
  /// An instance method operating on the concrete value behind the object.
  pub fn instance<T, F>(name: impl Into<String>, f: F) -> Self
  where
    T: Any,
    F: Fn(&mut T, Arguments) -> Result<Value> + Send + Sync + 'static,
  {
    let name = name.into();
    let method = name.clone();
    Self::raw(name, move |object: &Object, args: Arguments| {
      let class = object.class_name().to_owned();
      object
        .write(|value: &mut T| f(value, args))
        .unwrap_or_else(|| Err(holds_wrong_type::<T>(&class, &method)))
    })
  }

  /// An immutable-builder method: returns a modified copy as a new instance of the
  /// object's class, leaving the receiver untouched.
  pub fn fluent<T, F>(name: impl Into<String>, f: F) -> Self
  where
    T: Any + Send + Sync + Clone,
    F: Fn(&T, Arguments) -> Result<T> + Send + Sync + 'static,
  {
    let name = name.into();
    let method = name.clone();
    Self::raw(name, move |object: &Object, args: Arguments| {
      let class = object.class_name().to_owned();
      let copy = object
        .read(|value: &T| f(value, args))
        .unwrap_or_else(|| Err(holds_wrong_type::<T>(&class, &method)))?;
      Ok(Value::Object(Object::new(class, copy)))
    })
  }

  /// An instance method with access to the object handle itself.
  pub fn raw<F>(name: impl Into<String>, f: F) -> Self
  where
    F: Fn(&Object, Arguments) -> Result<Value> + Send + Sync + 'static,
  {
    Self {
      name: name.into(),
      params: Vec::new(),
      body: MethodBody::Instance(Arc::new(f)),
    }
  }

  pub fn static_fn<F>(name: impl Into<String>, f: F) -> Self
  where
    F: Fn(Arguments) -> Result<Value> + Send + Sync + 'static,
  {
    Self {
      name: name.into(),
      params: Vec::new(),
      body: MethodBody::Static(Arc::new(f)),
    }
  }

  pub fn param(mut self, parameter: Parameter) -> Self {
    self.params.push(parameter);
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn params(&self) -> &[Parameter] {
    &self.params
  }

  pub fn is_static(&self) -> bool {
    matches!(self.body, MethodBody::Static(_))
  }

  /// Invokes the method. Instance methods need a receiver; static ones ignore it.
  pub(crate) fn call(&self, receiver: Option<&Object>, args: Arguments) -> Result<Value> {
    match (&self.body, receiver) {
      (MethodBody::Static(f), _) => f(args),
      (MethodBody::Instance(f), Some(object)) => f(object, args),
      (MethodBody::Instance(_), None) => Err(Error::invocation(
        args.target(),
        "non-static method cannot be called statically",
      )),
    }
  }
}

impl fmt::Debug for Method {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Method")
      .field("name", &self.name)
      .field("params", &self.params)
      .field("static", &self.is_static())
      .finish()
  }
}

fn holds_wrong_type<T>(class: &str, member: &str) -> Error {
  Error::invocation(
    format!("{}::{}", class, member),
    format!("instance does not hold a {}", std::any::type_name::<T>()),
  )
}

/// Whether a class can be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
  Concrete,
  Abstract,
  Interface,
}

/// Metadata describing one class.
pub struct Class {
  name: String,
  kind: ClassKind,
  parents: Vec<String>,
  params: Vec<Parameter>,
  constructor: Option<ConstructorFn>,
  methods: HashMap<String, Method>,
  properties: HashMap<String, PropertySetter>,
  pub(crate) dependencies: OnceCell<Arc<Dependencies>>,
}

impl Class {
  /// A concrete class. It needs a constructor before it can be instantiated.
  pub fn new(name: impl Into<String>) -> Self {
    Self::with_kind(name.into(), ClassKind::Concrete)
  }

  pub fn interface(name: impl Into<String>) -> Self {
    Self::with_kind(name.into(), ClassKind::Interface)
  }

  pub fn abstract_class(name: impl Into<String>) -> Self {
    Self::with_kind(name.into(), ClassKind::Abstract)
  }

  fn with_kind(name: String, kind: ClassKind) -> Self {
    Self {
      name,
      kind,
      parents: Vec::new(),
      params: Vec::new(),
      constructor: None,
      methods: HashMap::new(),
      properties: HashMap::new(),
      dependencies: OnceCell::new(),
    }
  }

  /// Declares a parent class.
  pub fn extends(mut self, parent: impl Into<String>) -> Self {
    self.parents.push(parent.into());
    self
  }

  /// Declares an implemented interface.
  pub fn implements(mut self, interface: impl Into<String>) -> Self {
    self.parents.push(interface.into());
    self
  }

  /// Appends a constructor parameter.
  pub fn param(mut self, parameter: Parameter) -> Self {
    let parameter = parameter.declared_by(&self.name);
    self.params.push(parameter);
    self
  }

  /// Sets the constructor. Instances it produces can be duplicated.
  pub fn constructor<T, F>(mut self, f: F) -> Self
  where
    T: Any + Send + Sync + Clone,
    F: Fn(Arguments) -> Result<T> + Send + Sync + 'static,
  {
    let class: Arc<str> = Arc::from(self.name.as_str());
    self.constructor = Some(Arc::new(move |args| {
      f(args).map(|value| Object::new(class.clone(), value))
    }));
    self
  }

  /// Sets a constructor that builds the object handle itself.
  pub fn constructor_object<F>(mut self, f: F) -> Self
  where
    F: Fn(Arguments) -> Result<Object> + Send + Sync + 'static,
  {
    self.constructor = Some(Arc::new(f));
    self
  }

  pub fn method(mut self, method: Method) -> Self {
    let Method { name, params, body } = method;
    let params = params
      .into_iter()
      .map(|parameter| parameter.declared_by(&self.name))
      .collect();
    self.methods.insert(name.clone(), Method { name, params, body });
    self
  }

  /// Declares an assignable property.
  pub fn property<T, F>(mut self, name: impl Into<String>, f: F) -> Self
  where
    T: Any,
    F: Fn(&mut T, Value) -> Result<()> + Send + Sync + 'static,
  {
    let name = name.into();
    let property = format!("${}", name);
    let setter: PropertySetter = Arc::new(move |object: &Object, value: Value| {
      let class = object.class_name().to_owned();
      object
        .write(|target: &mut T| f(target, value))
        .unwrap_or_else(|| Err(holds_wrong_type::<T>(&class, &property)))
    });
    self.properties.insert(name, setter);
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn kind(&self) -> ClassKind {
    self.kind
  }

  pub fn parents(&self) -> &[String] {
    &self.parents
  }

  pub fn params(&self) -> &[Parameter] {
    &self.params
  }

  pub fn has_constructor(&self) -> bool {
    self.constructor.is_some()
  }

  pub fn is_instantiable(&self) -> bool {
    self.kind == ClassKind::Concrete && self.constructor.is_some()
  }

  pub(crate) fn construct(&self, args: Arguments) -> Result<Object> {
    match &self.constructor {
      Some(constructor) => constructor(args),
      None => Err(self.not_instantiable()),
    }
  }

  /// The error describing why this class cannot be instantiated.
  pub(crate) fn not_instantiable(&self) -> Error {
    let reason = match self.kind {
      ClassKind::Interface => "It is an interface.",
      ClassKind::Abstract => "It is an abstract class.",
      ClassKind::Concrete => "It has no constructor.",
    };
    Error::not_instantiable_class(&self.name, reason)
  }
}

impl fmt::Debug for Class {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Class")
      .field("name", &self.name)
      .field("kind", &self.kind)
      .field("parents", &self.parents)
      .field("params", &self.params)
      .field("has_constructor", &self.constructor.is_some())
      .finish_non_exhaustive()
  }
}

/// The registry of classes known to a factory.
///
/// Registering a class under an existing name replaces it, together with its
/// memoized dependencies. A registry can be shared by several factories.
#[derive(Default)]
pub struct ClassRegistry {
  classes: DashMap<String, Arc<Class>>,
}

impl ClassRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn register(&self, class: Class) {
    self.classes.insert(class.name.clone(), Arc::new(class));
  }

  pub fn get(&self, name: &str) -> Option<Arc<Class>> {
    self.classes.get(name).map(|entry| entry.value().clone())
  }

  /// Whether a class, abstract class or interface is registered under `name`.
  pub fn contains(&self, name: &str) -> bool {
    self.classes.contains_key(name)
  }

  pub fn is_instantiable(&self, name: &str) -> bool {
    self.get(name).is_some_and(|class| class.is_instantiable())
  }

  /// Whether `name` is a concrete or abstract class. Interfaces are not.
  pub fn is_class(&self, name: &str) -> bool {
    self.get(name).is_some_and(|class| class.kind() != ClassKind::Interface)
  }

  pub fn len(&self) -> usize {
    self.classes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.classes.is_empty()
  }

  /// `class` itself followed by all of its registered ancestors, breadth first.
  fn lineage(&self, class: &str) -> Vec<Arc<Class>> {
    let mut seen = HashSet::new();
    let mut queue = VecDeque::from([class.to_owned()]);
    let mut lineage = Vec::new();
    while let Some(name) = queue.pop_front() {
      if !seen.insert(name.clone()) {
        continue;
      }
      if let Some(descriptor) = self.get(&name) {
        queue.extend(descriptor.parents.iter().cloned());
        lineage.push(descriptor);
      }
    }
    lineage
  }

  /// Whether `class` is `ancestor` or extends/implements it, directly or transitively.
  pub fn is_subclass_of(&self, class: &str, ancestor: &str) -> bool {
    class == ancestor
      || self
        .lineage(class)
        .iter()
        .any(|descriptor| descriptor.parents.iter().any(|parent| parent == ancestor))
  }

  /// Whether `value` is an object whose class is `class` or one of its descendants.
  pub fn is_instance_of(&self, value: &Value, class: &str) -> bool {
    match value {
      Value::Object(object) => self.is_subclass_of(object.class_name(), class),
      _ => false,
    }
  }

  /// Looks a method up on `class` and then on its ancestors.
  pub fn find_method(&self, class: &str, method: &str) -> Option<Method> {
    self
      .lineage(class)
      .into_iter()
      .find_map(|descriptor| descriptor.methods.get(method).cloned())
  }

  pub(crate) fn find_property(&self, class: &str, property: &str) -> Option<PropertySetter> {
    self
      .lineage(class)
      .into_iter()
      .find_map(|descriptor| descriptor.properties.get(property).cloned())
  }

  pub fn has_property(&self, class: &str, property: &str) -> bool {
    self.find_property(class, property).is_some()
  }

  /// Names of every method callable on `class`, sorted.
  pub fn method_names(&self, class: &str) -> Vec<String> {
    let mut names: Vec<String> = self
      .lineage(class)
      .iter()
      .flat_map(|descriptor| descriptor.methods.keys().cloned())
      .collect();
    names.sort();
    names.dedup();
    names
  }

  /// Names of every property assignable on `class`, sorted.
  pub fn property_names(&self, class: &str) -> Vec<String> {
    let mut names: Vec<String> = self
      .lineage(class)
      .iter()
      .flat_map(|descriptor| descriptor.properties.keys().cloned())
      .collect();
    names.sort();
    names.dedup();
    names
  }
}

impl fmt::Debug for ClassRegistry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut names: Vec<String> = self.classes.iter().map(|e| e.key().clone()).collect();
    names.sort();
    f.debug_struct("ClassRegistry").field("classes", &names).finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Clone)]
  struct Engine;

  fn registry() -> ClassRegistry {
    let registry = ClassRegistry::new();
    registry.register(Class::interface("EngineInterface"));
    registry.register(Class::abstract_class("AbstractEngine").implements("EngineInterface"));
    registry.register(
      Class::new("EngineMarkOne")
        .extends("AbstractEngine")
        .constructor(|_| Ok(Engine))
        .method(Method::instance("start", |_: &mut Engine, _| Ok(Value::Bool(true)))),
    );
    registry
  }

  #[test]
  fn subclass_checks_follow_the_whole_lineage() {
    let registry = registry();

    assert!(registry.is_subclass_of("EngineMarkOne", "EngineInterface"));
    assert!(registry.is_subclass_of("EngineMarkOne", "EngineMarkOne"));
    assert!(!registry.is_subclass_of("EngineInterface", "EngineMarkOne"));
  }

  #[test]
  fn instantiability_depends_on_kind_and_constructor() {
    let registry = registry();
    registry.register(Class::new("NoConstructor"));

    assert!(registry.is_instantiable("EngineMarkOne"));
    assert!(!registry.is_instantiable("AbstractEngine"));
    assert!(!registry.is_instantiable("EngineInterface"));
    assert!(!registry.is_instantiable("NoConstructor"));
    assert!(!registry.is_instantiable("Missing"));
  }

  #[test]
  fn self_type_resolves_to_the_declaring_class() {
    let class = Class::new("Node").param(Parameter::new("parent").self_type().nullable());

    assert_eq!(class.params()[0].class_names(), vec!["Node".to_string()]);
    assert_eq!(class.params()[0].type_description(), "?self");
  }

  #[test]
  fn methods_are_inherited() {
    let registry = registry();
    registry.register(Class::new("Turbo").extends("EngineMarkOne"));

    assert!(registry.find_method("Turbo", "start").is_some());
    assert_eq!(registry.method_names("Turbo"), vec!["start".to_string()]);
  }
}
