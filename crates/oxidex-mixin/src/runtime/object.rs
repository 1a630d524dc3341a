//! Instances of composed classes.
//!
//! An [`Object`] owns a table of own fields and reads through to its class's
//! instance members for anything it does not own. Assigning a name creates or
//! updates an own field; the class's shared member is never modified, so a
//! per-instance override leaves the default seen by other instances intact.
//!
//! Assignments that land on an accessor call its setter instead, and
//! assignments to getter-only accessors or read-only data members fail.

use crate::error::{Error, Result};
use crate::runtime::member::{Assign, MemberTable};
use crate::runtime::{Class, Value};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

struct ObjectInner {
    class: Class,
    fields: RwLock<MemberTable>,
}

/// A class instance.
///
/// Cloning an `Object` clones the handle; both handles see the same fields.
///
/// # Example
///
/// ```rust
/// use oxidex_mixin::{TypeDefinition, Value};
///
/// let point = TypeDefinition::new()
///     .named("Point")
///     .member("x", 0)
///     .compose()
///     .unwrap();
///
/// let p = point.instantiate(&[]).unwrap();
/// assert_eq!(p.get("x").unwrap(), Value::from(0));
///
/// p.set("x", 4).unwrap();
/// assert_eq!(p.get("x").unwrap(), Value::from(4));
/// assert_eq!(p.class().name(), "Point");
/// ```
#[derive(Clone)]
pub struct Object {
    inner: Arc<ObjectInner>,
}

impl Object {
    /// Allocates an instance without running any initializer.
    pub(crate) fn alloc(class: &Class) -> Self {
        Object {
            inner: Arc::new(ObjectInner {
                class: class.clone(),
                fields: RwLock::new(MemberTable::default()),
            }),
        }
    }

    fn fields(&self) -> RwLockReadGuard<'_, MemberTable> {
        self.inner
            .fields
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn fields_mut(&self) -> RwLockWriteGuard<'_, MemberTable> {
        self.inner
            .fields
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the class this object is an instance of.
    #[must_use]
    pub fn class(&self) -> &Class {
        &self.inner.class
    }

    /// Checks if this object is an instance of `class` or of a subclass.
    #[must_use]
    pub fn is_instance_of(&self, class: &Class) -> bool {
        self.inner.class.is_subclass_of(class)
    }

    /// Returns `true` if both handles refer to the same instance.
    #[must_use]
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Returns `true` if `name` is an own field of this instance.
    #[must_use]
    pub fn has_own(&self, name: &str) -> bool {
        self.fields().contains(name)
    }

    /// Reads a member: own field first, then the class's instance member.
    /// Getters run with this object as receiver. Missing names read as
    /// `undefined`.
    ///
    /// # Errors
    ///
    /// Propagates getter failures.
    pub fn get(&self, name: &str) -> Result<Value> {
        let own = self
            .fields()
            .get(name)
            .map(|field| field.read(&Value::Undefined));
        if let Some(value) = own {
            return value;
        }

        match self.inner.class.member(name) {
            Some(member) => member.read(&Value::Object(self.clone())),
            None => Ok(Value::Undefined),
        }
    }

    /// Assigns a member.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReadOnlyMember`] when the class member under `name`
    /// is a getter-only accessor or a non-writable data member, and
    /// propagates setter failures.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();

        if self.has_own(name) {
            self.fields_mut().store(name, value);
            return Ok(());
        }

        let assign = self
            .inner
            .class
            .member(name)
            .map(|member| member.assignment(name))
            .transpose()?;

        match assign {
            Some(Assign::Setter(setter)) => {
                setter.call(&Value::Object(self.clone()), &[value])?;
            }
            Some(Assign::Store) | None => self.fields_mut().store(name, value),
        }

        Ok(())
    }

    /// Calls a function member with this object as receiver.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotCallable`] if the member does not hold a function,
    /// and propagates the function's own errors.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value> {
        match self.get(name)? {
            Value::Function(function) => {
                function.call(&Value::Object(self.clone()), args)
            }
            _ => Err(Error::NotCallable {
                name: name.to_owned(),
            }),
        }
    }

    /// Returns own field names followed by the class's enumerable members
    /// that are not shadowed by an own field.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let fields = self.fields();
        let mut keys: Vec<String> =
            fields.iter().map(|(name, _)| name.to_owned()).collect();

        keys.extend(
            self.inner
                .class
                .member_names()
                .into_iter()
                .filter(|name| !fields.contains(name)),
        );

        keys
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("class", &self.class().name())
            .field("fields", &self.fields().len())
            .finish()
    }
}
