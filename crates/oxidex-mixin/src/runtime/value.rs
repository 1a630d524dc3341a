//! Dynamic values and callable functions.
//!
//! Composed classes hold their members as [`Value`]s. Primitive values are
//! copied on assignment; functions, classes, instances and declarative mixin
//! specifications are shared handles, so assigning one never duplicates the
//! thing it points to.

use crate::error::{Error, Result};
use crate::runtime::{Class, Object, TypeDefinition};
use std::fmt;
use std::sync::Arc;

/// Signature shared by every native function: receiver (`this`) and arguments.
pub type NativeFn = dyn Fn(&Value, &[Value]) -> Result<Value> + Send + Sync;

/// A callable value.
///
/// The receiver is passed explicitly: instance methods are called with the
/// instance as `this`, static members with the class, and imperative mixins
/// with `Value::Undefined` and the target class as their only argument.
///
/// # Example
///
/// ```rust
/// use oxidex_mixin::{Function, Value};
///
/// let double = Function::new("double", |_this, args| {
///     let n = args.first().cloned().unwrap_or_default();
///     Ok(Value::from(n.as_number()? * 2.0))
/// });
///
/// let result = double.call(&Value::Undefined, &[Value::from(21)]).unwrap();
/// assert_eq!(result, Value::from(42));
/// ```
#[derive(Clone)]
pub struct Function {
    name: Arc<str>,
    imp: Arc<NativeFn>,
}

impl Function {
    /// Creates a function from a closure taking the receiver and arguments.
    pub fn new<F>(name: &str, imp: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Function {
            name: Arc::from(name),
            imp: Arc::new(imp),
        }
    }

    /// Creates a function whose receiver must be an instance.
    ///
    /// Calling it with any other receiver fails with
    /// [`Error::TypeMismatch`].
    pub fn method<F>(name: &str, imp: F) -> Self
    where
        F: Fn(&Object, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Self::new(name, move |this, args| imp(this.as_object()?, args))
    }

    /// Creates a function whose receiver must be a class.
    pub fn class_method<F>(name: &str, imp: F) -> Self
    where
        F: Fn(&Class, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Self::new(name, move |this, args| imp(this.as_class()?, args))
    }

    /// Creates an imperative mixin: a function that receives the target
    /// class as its first argument and mutates it directly.
    ///
    /// # Example
    ///
    /// ```rust
    /// use oxidex_mixin::{Function, TypeDefinition, Value};
    ///
    /// let can_dance = Function::mixin("CanDance", |class| {
    ///     class.define_member("canDance", Value::from(true))
    /// });
    ///
    /// let cat = TypeDefinition::new().include(can_dance).compose().unwrap();
    /// let tom = cat.instantiate(&[]).unwrap();
    /// assert_eq!(tom.get("canDance").unwrap(), Value::from(true));
    /// ```
    pub fn mixin<F>(name: &str, imp: F) -> Self
    where
        F: Fn(&Class) -> Result<()> + Send + Sync + 'static,
    {
        Self::new(name, move |_this, args| {
            let target = args.first().unwrap_or(&Value::Undefined);
            imp(target.as_class()?)?;
            Ok(Value::Undefined)
        })
    }

    /// Returns the function's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invokes the function.
    ///
    /// # Errors
    ///
    /// Propagates whatever the implementation returns.
    pub fn call(&self, this: &Value, args: &[Value]) -> Result<Value> {
        (self.imp)(this, args)
    }

    /// Returns `true` if both handles share one implementation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Function) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.imp), Arc::as_ptr(&other.imp))
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function({})", self.name)
    }
}

/// A dynamically typed value.
#[derive(Clone, Default)]
pub enum Value {
    /// Absent value; reading a missing member yields this.
    #[default]
    Undefined,
    /// Explicit null.
    Null,
    /// Boolean.
    Bool(bool),
    /// Double-precision number.
    Number(f64),
    /// Immutable string.
    Str(Arc<str>),
    /// Callable function.
    Function(Function),
    /// Composed class.
    Class(Class),
    /// Class instance.
    Object(Object),
    /// Declarative mixin specification.
    Mixin(Arc<TypeDefinition>),
}

impl Value {
    /// Returns the kind name used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Function(_) => "function",
            Value::Class(_) => "class",
            Value::Object(_) => "object",
            Value::Mixin(_) => "mixin",
        }
    }

    /// Returns `true` for [`Value::Undefined`].
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Truthiness: `undefined`, `null`, `false`, `0`, `NaN` and the empty
    /// string are falsy, everything else is truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Str(s) => !s.is_empty(),
            _ => true,
        }
    }

    fn mismatch(&self, expected: &'static str) -> Error {
        Error::TypeMismatch {
            expected,
            got: self.kind(),
        }
    }

    /// Borrows the string payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] for any other kind.
    pub fn as_str(&self) -> Result<&str> {
        match self {
            Value::Str(s) => Ok(s),
            other => Err(other.mismatch("string")),
        }
    }

    /// Returns the numeric payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] for any other kind.
    pub fn as_number(&self) -> Result<f64> {
        match self {
            Value::Number(n) => Ok(*n),
            other => Err(other.mismatch("number")),
        }
    }

    /// Returns the boolean payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] for any other kind.
    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(other.mismatch("boolean")),
        }
    }

    /// Borrows the function payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] for any other kind.
    pub fn as_function(&self) -> Result<&Function> {
        match self {
            Value::Function(f) => Ok(f),
            other => Err(other.mismatch("function")),
        }
    }

    /// Borrows the class payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] for any other kind.
    pub fn as_class(&self) -> Result<&Class> {
        match self {
            Value::Class(c) => Ok(c),
            other => Err(other.mismatch("class")),
        }
    }

    /// Borrows the instance payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] for any other kind.
    pub fn as_object(&self) -> Result<&Object> {
        match self {
            Value::Object(o) => Ok(o),
            other => Err(other.mismatch("object")),
        }
    }
}

impl PartialEq for Value {
    /// Primitives compare by value, handles by identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Class(a), Value::Class(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Mixin(a), Value::Mixin(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) if n.is_nan() => f.write_str("NaN"),
            Value::Number(n) if n.is_infinite() => {
                f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Value::Number(n) => write!(f, "{n}"),
            Value::Str(s) => f.write_str(s),
            Value::Function(func) => write!(f, "[function {}]", func.name()),
            Value::Class(class) => write!(f, "[class {}]", class.name()),
            Value::Object(object) => {
                write!(f, "[object {}]", object.class().name())
            }
            Value::Mixin(_) => f.write_str("[mixin]"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Function(func) => write!(f, "{func:?}"),
            other => write!(f, "{other}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Value::Function(f)
    }
}

impl From<Class> for Value {
    fn from(c: Class) -> Self {
        Value::Class(c)
    }
}

impl From<&Class> for Value {
    fn from(c: &Class) -> Self {
        Value::Class(c.clone())
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Object(o)
    }
}

impl From<TypeDefinition> for Value {
    fn from(spec: TypeDefinition) -> Self {
        Value::Mixin(Arc::new(spec))
    }
}

impl From<Arc<TypeDefinition>> for Value {
    fn from(spec: Arc<TypeDefinition>) -> Self {
        Value::Mixin(spec)
    }
}
