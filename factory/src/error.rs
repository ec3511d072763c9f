use thiserror::Error;

/// The error type for every fallible factory operation.
#[derive(Debug, Clone, Error)]
pub enum Error {
  /// A definition has a malformed shape: mixed argument keys, unknown config keys,
  /// an empty or non-string class name, a bare definition used as a constructor
  /// override, and so on.
  #[error("{0}")]
  InvalidConfig(String),

  /// An id has no definition, is unknown to the external container and is not a
  /// registered class.
  #[error("No definition or class found or resolvable for \"{id}\" while building {}.", format_chain(.building))]
  NotFound { id: String, building: Vec<String> },

  /// A value could not be produced, e.g. a required parameter with no information.
  #[error("{0}")]
  NotInstantiable(String),

  /// The class itself cannot be constructed.
  #[error("Can not instantiate {class}. {reason}")]
  NotInstantiableClass { class: String, reason: String },

  /// An id reappeared in its own resolution chain.
  #[error("Circular reference to \"{id}\" detected while creating: {}.", .chain.join(", "))]
  CircularReference { id: String, chain: Vec<String> },

  /// A lookup produced a value that is not an instance of the requested type.
  #[error("Container returned incorrect type \"{actual}\" for service \"{expected}\".")]
  TypeMismatch { expected: String, actual: String },

  /// A registered constructor, method, property setter or function failed.
  #[error("{target}: {message}")]
  Invocation { target: String, message: String },
}

impl Error {
  pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
    Error::InvalidConfig(message.into())
  }

  pub(crate) fn invocation(target: impl Into<String>, message: impl Into<String>) -> Self {
    Error::Invocation {
      target: target.into(),
      message: message.into(),
    }
  }

  pub(crate) fn not_instantiable_class(class: impl Into<String>, reason: impl Into<String>) -> Self {
    Error::NotInstantiableClass {
      class: class.into(),
      reason: reason.into(),
    }
  }

  /// Returns `true` for errors that mean "nothing is registered under that id".
  pub fn is_not_found(&self) -> bool {
    matches!(self, Error::NotFound { .. })
  }
}

fn format_chain(building: &[String]) -> String {
  if building.is_empty() {
    "nothing".to_string()
  } else {
    format!("\"{}\"", building.join("\" -> \""))
  }
}

/// A specialized `Result` type for `fibre_factory` operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
