//! Public macros for writing definitions.

/// Builds an [`Array`](crate::Array).
///
/// Values are converted with `Value::from`, so literals, strings, objects,
/// references and nested arrays can be mixed freely.
///
/// # Examples
///
/// A positional list:
///
/// ```
/// use fibre_factory::array;
///
/// let arguments = array!["Kiradzu", 42, true];
/// assert_eq!(arguments.len(), 3);
/// assert_eq!(arguments.get_index(1).and_then(|v| v.as_int()), Some(42));
/// ```
///
/// A named map, e.g. an array definition config:
///
/// ```
/// use fibre_factory::{array, Reference};
///
/// let config = array! {
///   "class" => "Car",
///   "__construct()" => array! { "engine" => Reference::to("engine") },
///   "$color" => "red",
/// };
/// assert_eq!(config.get_name("$color").and_then(|v| v.as_str()), Some("red"));
/// ```
#[macro_export]
macro_rules! array {
    // Arm for an empty array: array![]
    () => {
        $crate::Array::new()
    };

    // Arm for named entries: array! { "key" => value, ... }
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut array = $crate::Array::new();
        $(
            array.insert($key, $crate::Value::from($value));
        )+
        array
    }};

    // Arm for positional entries: array![a, b, c]
    ($($value:expr),+ $(,)?) => {{
        let mut array = $crate::Array::new();
        $(
            array.push($crate::Value::from($value));
        )+
        array
    }};
}
