use fibre_factory::{array, Class, ClassRegistry, Factory, Object, Parameter, SimpleContainer, Value};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

// A connection that records which instance it is.
#[derive(Clone)]
struct Connection {
  id: usize,
}

#[derive(Clone)]
struct Repository {
  connection: Object,
  table: String,
}

static CONNECTIONS: AtomicUsize = AtomicUsize::new(0);

fn main() -> fibre_factory::Result<()> {
  let classes = Arc::new(ClassRegistry::new());
  classes.register(Class::interface("ConnectionInterface"));
  classes.register(
    Class::new("Connection")
      .implements("ConnectionInterface")
      .constructor(|_| {
        Ok(Connection {
          id: CONNECTIONS.fetch_add(1, Ordering::SeqCst),
        })
      }),
  );
  classes.register(
    Class::new("Repository")
      .param(Parameter::new("connection").class("ConnectionInterface"))
      .param(Parameter::new("table").builtin("string"))
      .constructor(|args| {
        Ok(Repository {
          connection: args.object(0)?,
          table: args.string(1)?,
        })
      }),
  );

  // --- External Container ---
  // The connection lives in the application's container as a lazy singleton.
  let container = Arc::new(SimpleContainer::new());
  container.add_singleton("ConnectionInterface", || {
    println!("Opening the shared connection...");
    Ok(Value::Object(Object::new(
      "Connection",
      Connection {
        id: CONNECTIONS.fetch_add(1, Ordering::SeqCst),
      },
    )))
  });

  let factory = Factory::builder()
    .classes(classes)
    .container(container)
    .definition("users", array! { "class" => "Repository", "__construct()" => array! { "table" => "users" } })
    .definition("orders", array! { "class" => "Repository", "__construct()" => array! { "table" => "orders" } })
    .build()?;

  // --- Resolution ---
  // Every repository is new, the connection from the container is shared.
  for id in ["users", "orders", "users"] {
    let repository = factory.get(id)?;
    if let Some(repository) = repository.as_object().and_then(|object| object.get::<Repository>()) {
      let connection = repository.connection.get::<Connection>().map_or(usize::MAX, |c| c.id);
      println!("{} repository on connection #{}", repository.table, connection);
      assert_eq!(connection, 0);
    }
  }

  Ok(())
}
