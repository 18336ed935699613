use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::ast::Literal;

/// Shared, fixed-length array storage. Cloning an `Array` clones the handle,
/// not the elements.
#[derive(Debug, Clone)]
pub(crate) struct Array(Rc<RefCell<Vec<Value>>>);

impl Array {
    pub(crate) fn new(values: Vec<Value>) -> Self {
        Self(Rc::new(RefCell::new(values)))
    }

    pub(crate) fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub(crate) fn get(&self, index: usize) -> Option<Value> {
        self.0.borrow().get(index).cloned()
    }

    /// Returns `false` when `index` is out of bounds.
    pub(crate) fn set(&self, index: usize, value: Value) -> bool {
        match self.0.borrow_mut().get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub(crate) fn elements(&self) -> Ref<'_, Vec<Value>> {
        self.0.borrow()
    }

    pub(crate) fn ptr_eq(&self, other: &Array) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn address(&self) -> *const RefCell<Vec<Value>> {
        Rc::as_ptr(&self.0)
    }
}

/// Arrays are equal only to themselves.
impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

/// A runtime value. Values live on the thread that runs the program.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Value {
    Integer(i32),
    Double(f64),
    Boolean(bool),
    String(Rc<str>),
    Array(Array),
    Null,
}

impl Value {
    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "int",
            Value::Double(_) => "double",
            Value::Boolean(_) => "boolean",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Null => "null",
        }
    }

    pub(crate) fn string(value: impl AsRef<str>) -> Self {
        Value::String(Rc::from(value.as_ref()))
    }

    /// Numeric view used for int/double promotion.
    pub(crate) fn as_double(&self) -> Option<f64> {
        match self {
            Value::Integer(value) => Some(f64::from(*value)),
            Value::Double(value) => Some(*value),
            _ => None,
        }
    }

    /// Initial element of `new <type_name>[n]`.
    pub(crate) fn default_for(type_name: &str) -> Self {
        match type_name {
            "int" => Value::Integer(0),
            "double" => Value::Double(0.0),
            "boolean" => Value::Boolean(false),
            _ => Value::Null,
        }
    }

    fn write_to(
        &self,
        f: &mut fmt::Formatter<'_>,
        open_arrays: &mut Vec<*const RefCell<Vec<Value>>>,
    ) -> fmt::Result {
        match self {
            Value::Integer(value) => write!(f, "{value}"),
            Value::Double(value) => f.write_str(&format_double(*value)),
            Value::Boolean(value) => write!(f, "{value}"),
            Value::String(value) => f.write_str(value),
            Value::Null => f.write_str("null"),
            Value::Array(array) => {
                // an array that (transitively) contains itself
                if open_arrays.contains(&array.address()) {
                    return f.write_str("[...]");
                }
                open_arrays.push(array.address());
                f.write_str("[")?;
                for (index, element) in array.elements().iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    element.write_to(f, open_arrays)?;
                }
                open_arrays.pop();
                f.write_str("]")
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f, &mut Vec::new())
    }
}

impl From<&Literal> for Value {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Integer(value) => Value::Integer(*value),
            Literal::Double(value) => Value::Double(*value),
            Literal::String(value) => Value::string(value),
            Literal::Boolean(value) => Value::Boolean(*value),
            Literal::Null => Value::Null,
        }
    }
}

/// Renders a double the way Java's `Double.toString` does: plain notation in
/// `[1e-3, 1e7)`, `1.0E10` style outside of it.
pub(crate) fn format_double(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let magnitude = value.abs();
    if magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
        return format!("{value:?}");
    }
    let scientific = format!("{value:e}");
    match scientific.split_once('e') {
        Some((mantissa, exponent)) if mantissa.contains('.') => format!("{mantissa}E{exponent}"),
        Some((mantissa, exponent)) => format!("{mantissa}.0E{exponent}"),
        None => scientific,
    }
}
